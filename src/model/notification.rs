//! Store-level notifications (toasts) with auto-expiry

use serde::{Deserialize, Serialize};

/// Most notifications kept at once; older ones are dropped first
pub const MAX_NOTIFICATIONS: usize = 5;

/// Default time a notification stays visible
pub const DEFAULT_NOTIFICATION_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// A notification held in the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Lifetime in milliseconds; zero means sticky
    pub duration: u64,
    /// Creation time in milliseconds (store clock)
    pub timestamp: u64,
}

/// Payload handed to the external notification sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub duration: u64,
}

impl From<&Notification> for NotificationRequest {
    fn from(n: &Notification) -> Self {
        Self {
            kind: n.kind,
            title: n.title.clone(),
            message: n.message.clone(),
            duration: n.duration,
        }
    }
}
