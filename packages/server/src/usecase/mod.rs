//! Application use cases of the chat server.

pub mod connect_user;
pub mod disconnect_user;
pub mod error;
pub mod fetch_history;
pub mod send_message;

pub use connect_user::{ConnectUserUseCase, ConnectedUser};
pub use disconnect_user::DisconnectUserUseCase;
pub use error::{ConnectError, FetchHistoryError, SendMessageError};
pub use fetch_history::{FetchHistoryUseCase, HISTORY_LIMIT, HistoryEntry, HistoryView};
pub use send_message::{SendMessageUseCase, SentMessage};
