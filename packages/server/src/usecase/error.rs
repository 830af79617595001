//! Errors returned by the use cases.

use thiserror::Error;

use crate::domain::{StoreError, UserId, ValueObjectError};

/// Why a connection attempt was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("session token is missing or invalid")]
    InvalidSession,
}

/// Why a chat message was not accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    #[error("invalid message content: {0}")]
    InvalidContent(#[from] ValueObjectError),
    #[error("no profile found for sender {}", .0.value())]
    UnknownSender(UserId),
    #[error("failed to persist message: {0}")]
    StoreFailed(#[from] StoreError),
}

/// Why the message history could not be assembled.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchHistoryError {
    #[error("failed to load message history: {0}")]
    StoreFailed(#[from] StoreError),
}
