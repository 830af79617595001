//! Terminal chat client with session authentication and reconnection.
//!
//! Fetches recent history over HTTP, then connects to the chat server
//! with a session token and sends messages from stdin. Messages from
//! others are acknowledged with read receipts. On disconnection it
//! retries with exponential backoff (1s base, x1.5 growth, capped at
//! 10s, at most 5 attempts); retries pause while the client is hidden
//! via SIGUSR1 and resume on SIGUSR2.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin pavlac-client -- --session <token> --user-id 1
//! ```

use clap::Parser;

use pavlac_client::{
    ClientError, ReconnectPolicy, SessionConfig, bootstrap_history, run_client,
    spawn_input_thread, spawn_signal_watcher,
};
use pavlac_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Chat client with read receipts and automatic reconnection", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// HTTP API base URL
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    api_url: String,

    /// Session token issued by the server
    #[arg(short = 's', long)]
    session: String,

    /// Id of the user the session belongs to
    #[arg(long)]
    user_id: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();
    let config = SessionConfig {
        ws_url: args.url,
        api_url: args.api_url,
        session_token: args.session,
        user_id: args.user_id,
    };

    // Show recent history before connecting
    if let Err(e) = bootstrap_history(&config).await {
        tracing::error!("Failed to load history: {}", e);
        if matches!(e, ClientError::SessionRejected) {
            std::process::exit(1);
        }
    }

    let gate = spawn_signal_watcher();
    let mut input = spawn_input_thread(config.prompt());

    // Run the client
    if let Err(e) = run_client(config, ReconnectPolicy::default(), gate, &mut input).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
