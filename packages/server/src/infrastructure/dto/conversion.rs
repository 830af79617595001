//! Conversions from domain types into wire DTOs.
//!
//! The constructors here are the only place where domain entities are
//! flattened into the JSON shapes clients consume.

use pavlac_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, MessageId, OfflineNotice, UserId, UserProfile};
use crate::infrastructure::dto::http::HistoryMessage;
use crate::infrastructure::dto::websocket::{MessageData, ServerFrame};

impl MessageData {
    pub fn new(message: &ChatMessage, author: &UserProfile, online_users: &[UserId]) -> Self {
        Self {
            id: message.id.value(),
            content: message.content.as_str().to_string(),
            user_id: message.sender_id.value(),
            created_at: timestamp_to_rfc3339(message.created_at.value()),
            username: author.username.clone(),
            display_name: author.display_name.clone(),
            online_users: online_users.iter().map(|id| id.value()).collect(),
        }
    }
}

impl ServerFrame {
    pub fn message(
        message: &ChatMessage,
        author: &UserProfile,
        online_users: &[UserId],
    ) -> Self {
        Self::Message {
            data: MessageData::new(message, author, online_users),
        }
    }

    pub fn read(user_id: UserId, message_id: MessageId) -> Self {
        Self::Read {
            user_id: user_id.value(),
            message_id: message_id.value(),
        }
    }

    pub fn user_offline(notice: &OfflineNotice) -> Self {
        Self::UserOffline {
            user_id: notice.user_id.value(),
            online_users: notice.online_users.iter().map(|id| id.value()).collect(),
        }
    }
}

impl HistoryMessage {
    pub fn new(message: &ChatMessage, author: &UserProfile) -> Self {
        Self {
            id: message.id.value(),
            content: message.content.as_str().to_string(),
            user_id: message.sender_id.value(),
            created_at: timestamp_to_rfc3339(message.created_at.value()),
            username: author.username.clone(),
            display_name: author.display_name.clone(),
        }
    }
}
