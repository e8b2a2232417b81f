//! Notification module - in-app notifications shown on the notifications screen.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{NotificationId, Timestamp, ValidationError};

/// Source category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    Device,
    Therapy,
    Reminder,
    System,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationType::Device => "device",
            NotificationType::Therapy => "therapy",
            NotificationType::Reminder => "reminder",
            NotificationType::System => "system",
        };
        write!(f, "{}", s)
    }
}

/// A single in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub timestamp: Timestamp,
    pub read: bool,
}

impl Notification {
    /// Creates an unread notification stamped with the current time.
    pub fn new(
        kind: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self {
            id: NotificationId::new(),
            kind,
            title,
            message: message.into(),
            timestamp: Timestamp::now(),
            read: false,
        })
    }

    /// Overrides the timestamp (used for seeded and replayed notifications).
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn mark_read(&mut self) {
        self.read = true;
    }
}
