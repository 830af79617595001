//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::{ConnectionRegistry, SessionStore};
use crate::usecase::{
    ConnectUserUseCase, DisconnectUserUseCase, FetchHistoryUseCase, SendMessageUseCase,
};

use super::{
    handler::{get_messages, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Build the router serving the WebSocket endpoint and the HTTP API.
///
/// Kept separate from [`Server::run`] so tests can mount the same routes
/// on an ephemeral port.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket endpoint
        .route("/ws", get(websocket_handler))
        // HTTP endpoints
        .route("/api/messages", get(get_messages))
        .route("/api/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// WebSocket chat server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     registry,
///     session_store,
///     connect_user_usecase,
///     disconnect_user_usecase,
///     send_message_usecase,
///     fetch_history_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// ConnectionRegistry for broadcasting frames
    registry: Arc<ConnectionRegistry>,
    /// SessionStore for authenticating HTTP requests
    session_store: Arc<dyn SessionStore>,
    /// UseCase for connecting a user
    connect_user_usecase: Arc<ConnectUserUseCase>,
    /// UseCase for disconnecting a user
    disconnect_user_usecase: Arc<DisconnectUserUseCase>,
    /// UseCase for sending a chat message
    send_message_usecase: Arc<SendMessageUseCase>,
    /// UseCase for fetching message history
    fetch_history_usecase: Arc<FetchHistoryUseCase>,
}

impl Server {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        session_store: Arc<dyn SessionStore>,
        connect_user_usecase: Arc<ConnectUserUseCase>,
        disconnect_user_usecase: Arc<DisconnectUserUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        fetch_history_usecase: Arc<FetchHistoryUseCase>,
    ) -> Self {
        Self {
            registry,
            session_store,
            connect_user_usecase,
            disconnect_user_usecase,
            send_message_usecase,
            fetch_history_usecase,
        }
    }

    /// Run the WebSocket chat server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            registry: self.registry,
            session_store: self.session_store,
            connect_user_usecase: self.connect_user_usecase,
            disconnect_user_usecase: self.disconnect_user_usecase,
            send_message_usecase: self.send_message_usecase,
            fetch_history_usecase: self.fetch_history_usecase,
        });

        let app = build_router(app_state);

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
