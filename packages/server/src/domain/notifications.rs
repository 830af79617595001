//! In-app notifications and the activity audit trail.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::value_object::UserId;

/// An in-app notification queued for a user's next visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub user_id: UserId,
    pub kind: String,
    pub title: String,
    pub body: String,
}

/// One row of the activity audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub user_id: UserId,
    pub action: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub details: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("notification sink unavailable: {0}")]
    Unavailable(String),
}

/// Write side of the notification and activity tables. All writes are
/// best-effort from the chat's point of view: a failed write must never
/// fail the message send.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn queue_notification(&self, notification: Notification) -> Result<(), SinkError>;

    async fn record_activity(&self, entry: ActivityEntry) -> Result<(), SinkError>;
}
