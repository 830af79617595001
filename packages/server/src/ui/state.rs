//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, SessionStore};
use crate::usecase::{
    ConnectUserUseCase, DisconnectUserUseCase, FetchHistoryUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// Registry of live connections, used to broadcast frames
    pub registry: Arc<ConnectionRegistry>,
    /// Session store, used to authenticate plain HTTP requests
    pub session_store: Arc<dyn SessionStore>,
    /// UseCase for connecting a user
    pub connect_user_usecase: Arc<ConnectUserUseCase>,
    /// UseCase for disconnecting a user
    pub disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// UseCase for sending a chat message
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// UseCase for fetching message history
    pub fetch_history_usecase: Arc<FetchHistoryUseCase>,
}
