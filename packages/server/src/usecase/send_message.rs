//! UseCase: accept, persist and fan out a chat message.

use std::sync::Arc;

use pavlac_shared::time::Clock;

use crate::domain::{
    ActivityEntry, ChatMessage, ConnectionRegistry, MessageContent, MessageStore, Notification,
    NotificationSink, PushGateway, Timestamp, UserDirectory, UserId, UserProfile,
};

use super::error::SendMessageError;

/// Title of chat push and in-app notifications.
const NOTIFICATION_TITLE: &str = "Nová zpráva";

/// A persisted message staged for broadcasting: the stored row, the
/// sender's profile and the presence snapshot taken at send time.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub message: ChatMessage,
    pub sender: UserProfile,
    pub online_users: Vec<UserId>,
}

pub struct SendMessageUseCase {
    store: Arc<dyn MessageStore>,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<ConnectionRegistry>,
    push_gateway: Arc<dyn PushGateway>,
    notification_sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        store: Arc<dyn MessageStore>,
        directory: Arc<dyn UserDirectory>,
        registry: Arc<ConnectionRegistry>,
        push_gateway: Arc<dyn PushGateway>,
        notification_sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            directory,
            registry,
            push_gateway,
            notification_sink,
            clock,
        }
    }

    /// Validate and persist a chat message.
    ///
    /// The returned [`SentMessage`] carries everything the broadcast frame
    /// needs. Persistence happens before any broadcast: when this returns
    /// an error, nobody has seen the message.
    pub async fn execute(
        &self,
        sender_id: UserId,
        text: String,
    ) -> Result<SentMessage, SendMessageError> {
        let content = MessageContent::new(text)?;
        let created_at = Timestamp::new(self.clock.now_millis());

        let message = self.store.append(sender_id, content, created_at).await?;

        let sender = self
            .directory
            .profile(sender_id)
            .await
            .ok_or(SendMessageError::UnknownSender(sender_id))?;
        let online_users = self.registry.present_user_ids().await;

        tracing::debug!(
            "User {} sent message {} ({} users online)",
            sender_id.value(),
            message.id.value(),
            online_users.len()
        );

        Ok(SentMessage {
            message,
            sender,
            online_users,
        })
    }

    /// Best-effort side channels, run after the message was broadcast:
    /// a push notification batched to every absent user with a registered
    /// push id, an in-app notification for every other user, and one
    /// activity entry. Failures here are logged and never fail the send.
    pub async fn fan_out(&self, sent: &SentMessage) {
        let body = format!(
            "{}: {}",
            sent.sender.display_label(),
            sent.message.content.as_str()
        );
        let profiles = self.directory.all_profiles().await;

        let push_recipients: Vec<String> = profiles
            .iter()
            .filter(|profile| !sent.online_users.contains(&profile.id))
            .filter_map(|profile| profile.push_external_id.clone())
            .collect();
        if !push_recipients.is_empty()
            && let Err(e) = self
                .push_gateway
                .push(NOTIFICATION_TITLE, &body, &push_recipients)
                .await
        {
            tracing::warn!("Failed to push message {}: {}", sent.message.id.value(), e);
        }

        for profile in profiles
            .iter()
            .filter(|profile| profile.id != sent.sender.id)
        {
            let notification = Notification {
                user_id: profile.id,
                kind: "chat".to_string(),
                title: NOTIFICATION_TITLE.to_string(),
                body: body.clone(),
            };
            if let Err(e) = self.notification_sink.queue_notification(notification).await {
                tracing::warn!(
                    "Failed to queue notification for user {}: {}",
                    profile.id.value(),
                    e
                );
            }
        }

        let entry = ActivityEntry {
            user_id: sent.sender.id,
            action: "chat_message".to_string(),
            entity_type: "message".to_string(),
            entity_id: sent.message.id.value(),
            details: format!(
                "Sent a chat message ({} characters)",
                sent.message.content.as_str().chars().count()
            ),
        };
        if let Err(e) = self.notification_sink.record_activity(entry).await {
            tracing::warn!(
                "Failed to record activity for message {}: {}",
                sent.message.id.value(),
                e
            );
        }
    }
}
