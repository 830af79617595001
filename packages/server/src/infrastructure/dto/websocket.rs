//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object whose `type` field selects the shape.
//! Frames that do not parse into [`ClientFrame`] are dropped by the
//! server without closing the connection.

use serde::{Deserialize, Serialize};

/// Frames a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientFrame {
    /// A new chat message. `user_id` must match the connection's
    /// authenticated user or the frame is dropped.
    #[serde(rename_all = "camelCase")]
    Chat { content: String, user_id: i64 },
    /// Read receipt for a previously received message.
    #[serde(rename_all = "camelCase")]
    Read { message_id: i64, user_id: i64 },
}

/// Frames the server broadcasts to every connected client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerFrame {
    /// A freshly persisted chat message.
    Message { data: MessageData },
    /// A relayed read receipt.
    #[serde(rename_all = "camelCase")]
    Read { user_id: i64, message_id: i64 },
    /// A connection closed. `online_users` is the authoritative presence
    /// list; `user_id` may still appear in it when the user has another
    /// connection open.
    #[serde(rename_all = "camelCase")]
    UserOffline {
        user_id: i64,
        online_users: Vec<i64>,
    },
}

/// Payload of a `message` frame: the stored message joined with its
/// author and the presence snapshot at send time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub created_at: String,
    pub username: String,
    pub display_name: Option<String>,
    pub online_users: Vec<i64>,
}
