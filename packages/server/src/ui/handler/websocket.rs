//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{MessageId, UserId, frame_channel},
    infrastructure::dto::websocket::{ClientFrame, ServerFrame},
    ui::state::AppState,
    usecase::{ConnectError, ConnectedUser},
};

use super::session_token;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    // Identity is settled before the upgrade; frames never change it
    let Some(token) = session_token(&headers) else {
        tracing::warn!("Rejecting WebSocket upgrade without a session cookie");
        return Err(StatusCode::UNAUTHORIZED);
    };

    // Create the outbound frame queue for this connection
    let (sender, receiver) = frame_channel();

    // Use ConnectUserUseCase to authenticate and register the connection
    match state.connect_user_usecase.execute(&token, sender).await {
        Ok(connected) => {
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connected, receiver)))
        }
        Err(ConnectError::InvalidSession) => {
            tracing::warn!("Rejecting WebSocket upgrade with an invalid session token");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Spawns a task that drains the connection's frame queue into the
/// WebSocket sender.
///
/// Broadcasts only ever enqueue; this task is the single writer of the
/// socket.
fn forward_frames(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connected: ConnectedUser,
    rx: mpsc::Receiver<String>,
) {
    let (ws_sender, ws_receiver) = socket.split();

    let mut send_task = forward_frames(rx, ws_sender);
    let mut recv_task = {
        let state = state.clone();
        tokio::spawn(async move { handle_incoming(ws_receiver, state, connected).await })
    };

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Use DisconnectUserUseCase to handle disconnection. When it returns
    // None the connection was already evicted and announced elsewhere.
    if let Some(notice) = state
        .disconnect_user_usecase
        .execute(connected.connection_id)
        .await
    {
        let frame = serde_json::to_string(&ServerFrame::user_offline(&notice)).unwrap();
        broadcast_frame(&state, frame).await;
    }
}

/// Reads frames from the socket until it closes or errors.
async fn handle_incoming(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connected: ConnectedUser,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(
                    "WebSocket error on connection {}: {}",
                    connected.connection_id.value(),
                    e
                );
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                dispatch_frame(&state, connected, &text).await;
            }
            Message::Close(_) => {
                tracing::info!(
                    "Connection {} requested close",
                    connected.connection_id.value()
                );
                break;
            }
            Message::Ping(_) => {
                tracing::debug!("Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            _ => {}
        }
    }
}

/// Parse one inbound frame and act on it. Frames that do not parse, and
/// frames claiming a different user than the connection's, are dropped
/// without closing the connection.
async fn dispatch_frame(state: &Arc<AppState>, connected: ConnectedUser, text: &str) {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(
                "Dropping malformed frame on connection {}: {}",
                connected.connection_id.value(),
                e
            );
            return;
        }
    };

    match frame {
        ClientFrame::Chat { content, user_id } => {
            if UserId::new(user_id) != connected.user_id {
                tracing::warn!(
                    "Dropping chat frame claiming user {} on a connection of user {}",
                    user_id,
                    connected.user_id.value()
                );
                return;
            }

            // Use SendMessageUseCase to validate and persist the message
            match state
                .send_message_usecase
                .execute(connected.user_id, content)
                .await
            {
                Ok(sent) => {
                    let frame = serde_json::to_string(&ServerFrame::message(
                        &sent.message,
                        &sent.sender,
                        &sent.online_users,
                    ))
                    .unwrap();
                    // Everyone gets the frame, the sender included
                    broadcast_frame(state, frame).await;
                    state.send_message_usecase.fan_out(&sent).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Rejected chat message from user {}: {}",
                        connected.user_id.value(),
                        e
                    );
                }
            }
        }
        ClientFrame::Read {
            message_id,
            user_id,
        } => {
            if UserId::new(user_id) != connected.user_id {
                tracing::warn!(
                    "Dropping read frame claiming user {} on a connection of user {}",
                    user_id,
                    connected.user_id.value()
                );
                return;
            }

            // Receipts are relayed as-is; the message id is not looked up
            let frame = serde_json::to_string(&ServerFrame::read(
                connected.user_id,
                MessageId::new(message_id),
            ))
            .unwrap();
            broadcast_frame(state, frame).await;
        }
    }
}

/// Broadcast a frame to every connection, announcing any connections the
/// broadcast itself evicted.
///
/// Each eviction produces a `userOffline` frame, which is broadcast in
/// turn and may evict further connections, so this loops until a
/// broadcast passes without casualties.
async fn broadcast_frame(state: &Arc<AppState>, frame: String) {
    let mut pending = vec![frame];
    while let Some(frame) = pending.pop() {
        for notice in state.registry.broadcast(&frame).await {
            pending.push(serde_json::to_string(&ServerFrame::user_offline(&notice)).unwrap());
        }
    }
}
