//! In-memory message store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageContent, MessageId, MessageStore, StoreError, Timestamp, UserId};

/// Keeps the chat timeline in insertion order with sequential ids
/// starting at 1, mirroring an auto-increment primary key.
pub struct InMemoryMessageStore {
    messages: Mutex<Vec<ChatMessage>>,
    next_id: AtomicI64,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(
        &self,
        sender_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Result<ChatMessage, StoreError> {
        let id = MessageId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let message = ChatMessage::new(id, sender_id, content, created_at);
        self.messages.lock().await.push(message.clone());
        Ok(message)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, StoreError> {
        let messages = self.messages.lock().await;
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.iter().skip(skip).cloned().collect())
    }
}
