//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the session token; reconnecting cannot help
    #[error("Session rejected by the server, log in again")]
    SessionRejected,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
