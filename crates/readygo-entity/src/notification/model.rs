//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use readygo_core::types::{NotificationId, UserId};

/// A user-facing event record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    /// Message text.
    pub message: String,
    /// Optional in-app link.
    pub link: Option<String>,
    /// Whether the recipient has read it.
    pub is_read: bool,
    /// When it was emitted.
    pub created_at: DateTime<Utc>,
}

/// Data required to emit a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    /// Recipient.
    pub user_id: UserId,
    /// Message text.
    pub message: String,
    /// Optional in-app link.
    pub link: Option<String>,
}

impl NewNotification {
    /// Create a notification with a link.
    pub fn linked(user_id: UserId, message: impl Into<String>, link: &str) -> Self {
        Self {
            user_id,
            message: message.into(),
            link: Some(link.to_string()),
        }
    }

    /// Build the stored row.
    pub fn into_notification(self) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: self.user_id,
            message: self.message,
            link: self.link,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}
