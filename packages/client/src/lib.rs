//! Terminal chat client: authenticated WebSocket session, read receipts
//! and automatic reconnection with exponential backoff.

mod error;
mod formatter;
mod reconnect;
mod runner;
mod session;
mod ui;
mod visibility;

pub use error::ClientError;
pub use reconnect::{ConnectionPhase, ReconnectController, ReconnectPolicy, RetryDecision};
pub use runner::{bootstrap_history, run_client};
pub use session::{InputEvent, SessionConfig};
pub use ui::spawn_input_thread;
pub use visibility::{Visibility, VisibilityGate, spawn_signal_watcher};
