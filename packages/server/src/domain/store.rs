//! Persistence seam for the chat timeline.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entity::ChatMessage;
use crate::domain::value_object::{MessageContent, Timestamp, UserId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage of chat messages.
///
/// Messages must be persisted before they are broadcast; a message that
/// fails to persist is never announced to anyone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a message and return it with its store-assigned id.
    async fn append(
        &self,
        sender_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Result<ChatMessage, StoreError>;

    /// The most recent `limit` messages, oldest first.
    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError>;
}
