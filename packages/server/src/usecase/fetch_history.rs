//! UseCase: assemble recent history and presence for a joining client.

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionRegistry, MessageStore, UserDirectory, UserId, UserProfile};

use super::error::FetchHistoryError;

/// How many messages the history hands out, counted from the newest.
pub const HISTORY_LIMIT: usize = 50;

/// One history row: the message joined with its author's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub message: ChatMessage,
    pub author: UserProfile,
}

/// What a client needs to render the room on arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    pub entries: Vec<HistoryEntry>,
    pub online_users: Vec<UserId>,
}

pub struct FetchHistoryUseCase {
    store: Arc<dyn MessageStore>,
    directory: Arc<dyn UserDirectory>,
    registry: Arc<ConnectionRegistry>,
}

impl FetchHistoryUseCase {
    pub fn new(
        store: Arc<dyn MessageStore>,
        directory: Arc<dyn UserDirectory>,
        registry: Arc<ConnectionRegistry>,
    ) -> Self {
        Self {
            store,
            directory,
            registry,
        }
    }

    /// Load the most recent messages, oldest first, joined with their
    /// authors, plus the current presence snapshot. Messages whose author
    /// is no longer known are dropped from the view.
    pub async fn execute(&self) -> Result<HistoryView, FetchHistoryError> {
        let messages = self.store.recent(HISTORY_LIMIT).await?;

        let mut entries = Vec::with_capacity(messages.len());
        for message in messages {
            match self.directory.profile(message.sender_id).await {
                Some(author) => entries.push(HistoryEntry { message, author }),
                None => tracing::warn!(
                    "Dropping message {} from history: unknown author {}",
                    message.id.value(),
                    message.sender_id.value()
                ),
            }
        }

        let online_users = self.registry.present_user_ids().await;
        Ok(HistoryView {
            entries,
            online_users,
        })
    }
}
