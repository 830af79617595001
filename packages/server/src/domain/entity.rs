//! Entities of the chat domain.

use crate::domain::value_object::{MessageContent, MessageId, Timestamp, UserId};

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub sender_id: UserId,
    pub content: MessageContent,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        sender_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            sender_id,
            content,
            created_at,
        }
    }
}

/// Projection of a user account as the chat needs it: identity, names
/// and the optional push-provider recipient id.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub display_name: Option<String>,
    pub push_external_id: Option<String>,
}

impl UserProfile {
    pub fn new(
        id: UserId,
        username: String,
        display_name: Option<String>,
        push_external_id: Option<String>,
    ) -> Self {
        Self {
            id,
            username,
            display_name,
            push_external_id,
        }
    }

    /// Human-facing name: the display name when set, the username otherwise.
    pub fn display_label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}
