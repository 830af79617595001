//! In-memory notification sink.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ActivityEntry, Notification, NotificationSink, SinkError};

/// Collects in-app notifications and activity entries in memory. Stands
/// in for the application's notification and activity tables.
pub struct InMemoryNotificationSink {
    notifications: Mutex<Vec<Notification>>,
    activity: Mutex<Vec<ActivityEntry>>,
}

impl InMemoryNotificationSink {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            activity: Mutex::new(Vec::new()),
        }
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }

    pub async fn activity(&self) -> Vec<ActivityEntry> {
        self.activity.lock().await.clone()
    }
}

impl Default for InMemoryNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn queue_notification(&self, notification: Notification) -> Result<(), SinkError> {
        self.notifications.lock().await.push(notification);
        Ok(())
    }

    async fn record_activity(&self, entry: ActivityEntry) -> Result<(), SinkError> {
        self.activity.lock().await.push(entry);
        Ok(())
    }
}
