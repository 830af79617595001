//! WebSocket chat server.
//!
//! Accepts authenticated WebSocket connections, persists chat messages and
//! broadcasts them to every connected client, the sender included.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pavlac-server
//! cargo run --bin pavlac-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use pavlac_server::{
    domain::{ConnectionRegistry, PushGateway, UserId, UserProfile},
    infrastructure::{
        HttpPushGateway, InMemoryMessageStore, InMemoryNotificationSink, InMemorySessionStore,
        InMemoryUserDirectory, NoopPushGateway,
    },
    ui::Server,
    usecase::{ConnectUserUseCase, DisconnectUserUseCase, FetchHistoryUseCase, SendMessageUseCase},
};
use pavlac_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "WebSocket chat server with broadcast support", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry and stores
    // 2. PushGateway
    // 3. UseCases
    // 4. Server

    // 1. Create the connection registry and the in-memory stores
    let registry = Arc::new(ConnectionRegistry::new());
    let message_store = Arc::new(InMemoryMessageStore::new());
    let directory = Arc::new(InMemoryUserDirectory::new());
    let sessions = Arc::new(InMemorySessionStore::new());
    let notification_sink = Arc::new(InMemoryNotificationSink::new());
    seed_demo_users(&directory, &sessions).await;

    // 2. Create the PushGateway from the environment, or fall back to a no-op
    let push_gateway: Arc<dyn PushGateway> = match HttpPushGateway::from_env() {
        Some(gateway) => {
            tracing::info!("Push notifications enabled");
            Arc::new(gateway)
        }
        None => {
            tracing::info!("PUSH_APP_ID / PUSH_API_KEY not set, push notifications disabled");
            Arc::new(NoopPushGateway)
        }
    };

    // 3. Create UseCases
    let clock = Arc::new(SystemClock);
    let connect_user_usecase =
        Arc::new(ConnectUserUseCase::new(sessions.clone(), registry.clone()));
    let disconnect_user_usecase = Arc::new(DisconnectUserUseCase::new(registry.clone()));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        message_store.clone(),
        directory.clone(),
        registry.clone(),
        push_gateway,
        notification_sink.clone(),
        clock,
    ));
    let fetch_history_usecase = Arc::new(FetchHistoryUseCase::new(
        message_store.clone(),
        directory.clone(),
        registry.clone(),
    ));

    // 4. Create and run the server
    let server = Server::new(
        registry,
        sessions,
        connect_user_usecase,
        disconnect_user_usecase,
        send_message_usecase,
        fetch_history_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Seed a few demo accounts and log their session tokens so clients can
/// connect right away.
async fn seed_demo_users(directory: &InMemoryUserDirectory, sessions: &InMemorySessionStore) {
    let users = [
        (1, "alena", Some("Alena N.")),
        (2, "bedrich", None),
        (3, "cyril", None),
    ];
    for (id, username, display_name) in users {
        let user_id = UserId::new(id);
        directory
            .upsert(UserProfile::new(
                user_id,
                username.to_string(),
                display_name.map(str::to_string),
                None,
            ))
            .await;
        let token = sessions.issue(user_id).await;
        tracing::info!("Session for {} (user {}): {}", username, id, token);
    }
}
