//! NotificationCenter - the notifications screen over a [`NotificationStore`].

use std::sync::Arc;

use tracing::{debug, info};

use crate::application::retry::{retry_transient, RetryConfig};
use crate::domain::foundation::{DomainError, NotificationId};
use crate::domain::notification::{Notification, NotificationType};
use crate::ports::NotificationStore;

pub struct NotificationCenter {
    store: Arc<dyn NotificationStore>,
    retry: RetryConfig,
}

impl NotificationCenter {
    pub fn new(store: Arc<dyn NotificationStore>, retry: RetryConfig) -> Self {
        Self { store, retry }
    }

    /// All notifications, newest first.
    pub async fn list(&self) -> Result<Vec<Notification>, DomainError> {
        Ok(retry_transient(&self.retry, "list_notifications", || self.store.list()).await?)
    }

    pub async fn list_of(&self, kind: NotificationType) -> Result<Vec<Notification>, DomainError> {
        let mut all = self.list().await?;
        all.retain(|n| n.kind == kind);
        Ok(all)
    }

    /// Badge count for the dashboard bell.
    pub async fn unread_count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.iter().filter(|n| !n.read).count())
    }

    /// Creates and stores a new unread notification.
    pub async fn push(
        &self,
        kind: NotificationType,
        title: &str,
        message: &str,
    ) -> Result<Notification, DomainError> {
        let notification = Notification::new(kind, title, message)?;
        retry_transient(&self.retry, "insert_notification", || {
            self.store.insert(&notification)
        })
        .await?;
        info!(id = %notification.id, kind = %kind, "notification pushed");
        Ok(notification)
    }

    /// Marks one notification read. Already-read notifications are left
    /// untouched.
    pub async fn mark_read(&self, id: &NotificationId) -> Result<Notification, DomainError> {
        let mut notification = self.store.get(id).await?;
        if notification.read {
            return Ok(notification);
        }
        notification.mark_read();
        retry_transient(&self.retry, "update_notification", || {
            self.store.update(&notification)
        })
        .await?;
        debug!(id = %id, "notification read");
        Ok(notification)
    }

    /// Marks every unread notification read; returns how many changed.
    pub async fn mark_all_read(&self) -> Result<usize, DomainError> {
        let mut changed = 0;
        for mut notification in self.list().await?.into_iter().filter(|n| !n.read) {
            notification.mark_read();
            self.store.update(&notification).await?;
            changed += 1;
        }
        info!(changed, "notifications marked read");
        Ok(changed)
    }

    /// Removes a notification from the list.
    pub async fn dismiss(&self, id: &NotificationId) -> Result<(), DomainError> {
        self.store.delete(id).await?;
        debug!(id = %id, "notification dismissed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fake::InMemoryNotificationStore;
    use crate::domain::foundation::{ErrorCode, Timestamp};
    use crate::ports::NotificationError;

    fn note(kind: NotificationType, title: &str, secs: u64) -> Notification {
        Notification::new(kind, title, "body")
            .unwrap()
            .at(Timestamp::from_unix_secs(secs))
    }

    fn center(store: InMemoryNotificationStore) -> NotificationCenter {
        NotificationCenter::new(Arc::new(store), RetryConfig::none())
    }

    #[tokio::test]
    async fn unread_count_and_mark_read() {
        let first = note(NotificationType::Device, "Pad connected", 100);
        let c = center(
            InMemoryNotificationStore::new()
                .with_notification(first.clone())
                .with_notification(note(NotificationType::Reminder, "Session due", 200)),
        );
        assert_eq!(c.unread_count().await.unwrap(), 2);

        let read = c.mark_read(&first.id).await.unwrap();
        assert!(read.read);
        assert_eq!(c.unread_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_all_read_reports_changes() {
        let c = center(
            InMemoryNotificationStore::new()
                .with_notification(note(NotificationType::Therapy, "Done", 1))
                .with_notification(note(NotificationType::System, "Update", 2)),
        );
        assert_eq!(c.mark_all_read().await.unwrap(), 2);
        assert_eq!(c.mark_all_read().await.unwrap(), 0);
        assert_eq!(c.unread_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn push_then_dismiss() {
        let c = center(InMemoryNotificationStore::new());
        let pushed = c
            .push(NotificationType::Therapy, "Session complete", "15 minutes of heat")
            .await
            .unwrap();
        assert_eq!(c.list_of(NotificationType::Therapy).await.unwrap().len(), 1);

        c.dismiss(&pushed.id).await.unwrap();
        assert!(c.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_title_is_rejected_locally() {
        let c = center(InMemoryNotificationStore::new());
        let err = c.push(NotificationType::System, " ", "x").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let c = center(InMemoryNotificationStore::new());
        let err = c.mark_read(&NotificationId::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn storage_failure_surfaces() {
        let c = center(
            InMemoryNotificationStore::new().with_error(NotificationError::Storage("disk".into())),
        );
        assert!(c.list().await.is_err());
    }
}
