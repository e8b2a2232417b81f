use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::NotificationId;
use crate::domain::notification::Notification;
use crate::ports::{NotificationError, NotificationStore};

/// Notifications held in memory.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<Vec<Notification>>,
    force_error: RwLock<Option<NotificationError>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notification(self, notification: Notification) -> Self {
        self.notifications.write().unwrap().push(notification);
        self
    }

    /// Forces every call to fail with `error`.
    pub fn with_error(self, error: NotificationError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    pub fn len(&self) -> usize {
        self.notifications.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_error(&self) -> Result<(), NotificationError> {
        match self.force_error.read().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn list(&self) -> Result<Vec<Notification>, NotificationError> {
        self.check_error()?;
        let mut all = self.notifications.read().unwrap().clone();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(all)
    }

    async fn get(&self, id: &NotificationId) -> Result<Notification, NotificationError> {
        self.check_error()?;
        self.notifications
            .read()
            .unwrap()
            .iter()
            .find(|n| &n.id == id)
            .cloned()
            .ok_or(NotificationError::NotFound(*id))
    }

    async fn insert(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.check_error()?;
        let mut all = self.notifications.write().unwrap();
        if all.iter().any(|n| n.id == notification.id) {
            return Err(NotificationError::AlreadyExists(notification.id));
        }
        all.push(notification.clone());
        Ok(())
    }

    async fn update(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.check_error()?;
        let mut all = self.notifications.write().unwrap();
        let slot = all
            .iter_mut()
            .find(|n| n.id == notification.id)
            .ok_or(NotificationError::NotFound(notification.id))?;
        *slot = notification.clone();
        Ok(())
    }

    async fn delete(&self, id: &NotificationId) -> Result<(), NotificationError> {
        self.check_error()?;
        let mut all = self.notifications.write().unwrap();
        let before = all.len();
        all.retain(|n| &n.id != id);
        if all.len() == before {
            return Err(NotificationError::NotFound(*id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::notification::NotificationType;

    fn note(title: &str, secs: u64) -> Notification {
        Notification::new(NotificationType::System, title, "body")
            .unwrap()
            .at(Timestamp::from_unix_secs(secs))
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = InMemoryNotificationStore::new()
            .with_notification(note("old", 100))
            .with_notification(note("new", 200));
        let titles: Vec<String> = store.list().await.unwrap().into_iter().map(|n| n.title).collect();
        assert_eq!(titles, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_ids() {
        let store = InMemoryNotificationStore::new();
        let n = note("a", 1);
        store.insert(&n).await.unwrap();
        assert_eq!(
            store.insert(&n).await,
            Err(NotificationError::AlreadyExists(n.id))
        );
    }

    #[tokio::test]
    async fn update_and_delete_unknown_ids_fail() {
        let store = InMemoryNotificationStore::new();
        let n = note("a", 1);
        assert!(store.update(&n).await.is_err());
        assert!(store.delete(&n.id).await.is_err());
    }

    #[tokio::test]
    async fn update_replaces_stored_copy() {
        let mut n = note("a", 1);
        let store = InMemoryNotificationStore::new().with_notification(n.clone());
        n.mark_read();
        store.update(&n).await.unwrap();
        assert!(store.get(&n.id).await.unwrap().read);
    }

    #[tokio::test]
    async fn forced_error_applies_to_all_calls() {
        let store = InMemoryNotificationStore::new()
            .with_error(NotificationError::Storage("disk full".into()));
        assert!(store.list().await.is_err());
        store.clear_error();
        assert!(store.list().await.is_ok());
    }
}
