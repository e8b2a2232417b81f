//! Notification store port - CRUD over in-app notifications.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId};
use crate::domain::notification::Notification;

/// Persistence for notifications.
///
/// # Contract
///
/// - `list` returns newest first
/// - `update` and `delete` return `NotFound` for unknown ids
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Notification>, NotificationError>;

    async fn get(&self, id: &NotificationId) -> Result<Notification, NotificationError>;

    async fn insert(&self, notification: &Notification) -> Result<(), NotificationError>;

    /// Replaces a stored notification with the same id.
    async fn update(&self, notification: &Notification) -> Result<(), NotificationError>;

    async fn delete(&self, id: &NotificationId) -> Result<(), NotificationError>;
}

/// Notification store errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotificationError {
    #[error("notification not found: {0}")]
    NotFound(NotificationId),

    #[error("notification already exists: {0}")]
    AlreadyExists(NotificationId),

    #[error("storage error: {0}")]
    Storage(String),
}

impl NotificationError {
    pub fn is_transient(&self) -> bool {
        matches!(self, NotificationError::Storage(_))
    }
}

impl From<NotificationError> for DomainError {
    fn from(err: NotificationError) -> Self {
        match &err {
            NotificationError::NotFound(id) => {
                DomainError::new(ErrorCode::NotFound, err.to_string())
                    .with_detail("notification_id", id.to_string())
            }
            NotificationError::AlreadyExists(_) => {
                DomainError::new(ErrorCode::InternalError, err.to_string())
            }
            NotificationError::Storage(_) => {
                DomainError::collaborator_unavailable("notifications", err.to_string())
            }
        }
    }
}
