//! HTTP and WebSocket request handlers.

mod http;
mod websocket;

pub use http::{get_messages, health_check};
pub use websocket::websocket_handler;

use axum::http::{HeaderMap, header};

/// Name of the cookie carrying the session token.
const SESSION_COOKIE: &str = "session_id";

/// Extract the session token from the request's `Cookie` header.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}
