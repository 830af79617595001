//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{StatusCode, header};
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite};

use pavlac_server::infrastructure::dto::websocket::{ClientFrame, ServerFrame};

use crate::error::ClientError;
use crate::formatter::{MessageFormatter, ReceiptLedger};
use crate::ui::redisplay_prompt;

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Everything a session needs to connect and identify itself.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket endpoint, e.g. `ws://127.0.0.1:8080/ws`
    pub ws_url: String,
    /// HTTP API base, e.g. `http://127.0.0.1:8080`
    pub api_url: String,
    /// Session token presented as a cookie
    pub session_token: String,
    /// Id of the user the session belongs to
    pub user_id: i64,
}

impl SessionConfig {
    pub fn prompt(&self) -> String {
        format!("user{} > ", self.user_id)
    }

    pub(crate) fn cookie(&self) -> String {
        format!("session_id={}", self.session_token)
    }
}

/// A line read from stdin, or the user quitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    Quit,
}

/// Open the WebSocket connection, presenting the session cookie.
///
/// An HTTP 401 rejection means the session is dead and retrying is
/// pointless; every other failure is worth a reconnect.
pub async fn open_session(config: &SessionConfig) -> Result<WsStream, ClientError> {
    let mut request = config
        .ws_url
        .as_str()
        .into_client_request()
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    request.headers_mut().insert(
        header::COOKIE,
        config
            .cookie()
            .parse()
            .map_err(|_| ClientError::ConnectionError("session token is not a valid cookie value".to_string()))?,
    );

    match connect_async(request).await {
        Ok((ws_stream, _response)) => Ok(ws_stream),
        Err(tungstenite::Error::Http(response))
            if response.status() == StatusCode::UNAUTHORIZED =>
        {
            Err(ClientError::SessionRejected)
        }
        Err(e) => Err(ClientError::ConnectionError(e.to_string())),
    }
}

/// Run one connected session until the socket closes or the user quits.
///
/// Returns `Ok(())` when the user quit and `Err` when the connection was
/// lost, so the caller knows whether a reconnect should follow. The input
/// receiver is borrowed, not owned: the same stdin reader feeds every
/// session across reconnects.
pub async fn drive_session(
    mut ws_stream: WsStream,
    config: &SessionConfig,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
) -> Result<(), ClientError> {
    let mut receipts = ReceiptLedger::new();
    let prompt = config.prompt();

    loop {
        tokio::select! {
            incoming = ws_stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        let Some(ack) =
                            handle_server_frame(&text, &mut receipts, config.user_id, &prompt)
                        else {
                            continue;
                        };
                        let json = match serde_json::to_string(&ack) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to serialize read receipt: {}", e);
                                continue;
                            }
                        };
                        if let Err(e) = ws_stream.send(Message::Text(json.into())).await {
                            tracing::warn!("Failed to send read receipt: {}", e);
                            return Err(ClientError::ConnectionError(e.to_string()));
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionError(
                            "server closed the connection".to_string(),
                        ));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                    None => {
                        return Err(ClientError::ConnectionError(
                            "connection lost".to_string(),
                        ));
                    }
                }
            }
            line = input.recv() => {
                match line {
                    Some(InputEvent::Line(text)) => {
                        let frame = ClientFrame::Chat {
                            content: text,
                            user_id: config.user_id,
                        };
                        let json = match serde_json::to_string(&frame) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("Failed to serialize message: {}", e);
                                continue;
                            }
                        };
                        if let Err(e) = ws_stream.send(Message::Text(json.into())).await {
                            tracing::warn!("Failed to send message: {}", e);
                            return Err(ClientError::ConnectionError(e.to_string()));
                        }
                    }
                    Some(InputEvent::Quit) | None => {
                        let _ = ws_stream.close(None).await;
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// React to one server frame: print it, update the receipt ledger, and
/// possibly produce a read receipt to send back.
///
/// Receipts are produced for other users' messages only; a client never
/// confirms reading its own words.
fn handle_server_frame(
    text: &str,
    receipts: &mut ReceiptLedger,
    own_user_id: i64,
    prompt: &str,
) -> Option<ClientFrame> {
    let frame = match serde_json::from_str::<ServerFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!("Ignoring unknown frame: {}", e);
            return None;
        }
    };

    match frame {
        ServerFrame::Message { data } => {
            print!("{}", MessageFormatter::format_message(&data));
            redisplay_prompt(prompt);
            (data.user_id != own_user_id).then(|| ClientFrame::Read {
                message_id: data.id,
                user_id: own_user_id,
            })
        }
        ServerFrame::Read {
            user_id,
            message_id,
        } => {
            let distinct = receipts.record(message_id, user_id);
            print!(
                "{}",
                MessageFormatter::format_read_receipt(message_id, distinct)
            );
            redisplay_prompt(prompt);
            None
        }
        ServerFrame::UserOffline {
            user_id,
            online_users,
        } => {
            print!(
                "{}",
                MessageFormatter::format_user_offline(user_id, &online_users)
            );
            redisplay_prompt(prompt);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "user1 > ";

    #[test]
    fn test_message_from_another_user_is_acknowledged() {
        // Test case: a broadcast message by someone else produces a read
        // receipt bound to our own user id
        // given:
        let mut receipts = ReceiptLedger::new();
        let raw = r#"{"type":"message","data":{"id":10,"content":"Ahoj!","userId":2,"createdAt":"2023-01-01T00:00:00.000Z","username":"bedrich","displayName":null,"onlineUsers":[1,2]}}"#;

        // when:
        let ack = handle_server_frame(raw, &mut receipts, 1, PROMPT);

        // then:
        assert_eq!(
            ack,
            Some(ClientFrame::Read {
                message_id: 10,
                user_id: 1,
            })
        );
    }

    #[test]
    fn test_own_message_is_not_acknowledged() {
        // Test case: our own broadcast message comes back without an ack
        // given:
        let mut receipts = ReceiptLedger::new();
        let raw = r#"{"type":"message","data":{"id":11,"content":"Ahoj!","userId":1,"createdAt":"2023-01-01T00:00:00.000Z","username":"alena","displayName":null,"onlineUsers":[1]}}"#;

        // when:
        let ack = handle_server_frame(raw, &mut receipts, 1, PROMPT);

        // then:
        assert_eq!(ack, None);
    }

    #[test]
    fn test_read_frame_updates_the_ledger() {
        // Test case: a relayed receipt is recorded and produces no reply
        // given:
        let mut receipts = ReceiptLedger::new();
        let raw = r#"{"type":"read","userId":2,"messageId":7}"#;

        // when:
        let ack = handle_server_frame(raw, &mut receipts, 1, PROMPT);

        // then:
        assert_eq!(ack, None);
        // the reader is already counted
        assert_eq!(receipts.record(7, 2), 1);
        assert_eq!(receipts.record(7, 3), 2);
    }

    #[test]
    fn test_user_offline_frame_produces_no_reply() {
        // Test case: a departure notice is displayed only
        // given:
        let mut receipts = ReceiptLedger::new();
        let raw = r#"{"type":"userOffline","userId":3,"onlineUsers":[1]}"#;

        // when / then:
        assert_eq!(handle_server_frame(raw, &mut receipts, 1, PROMPT), None);
    }

    #[test]
    fn test_unknown_frames_are_ignored() {
        // Test case: unknown frame types and non-JSON input are dropped
        // given:
        let mut receipts = ReceiptLedger::new();

        // when / then:
        assert_eq!(
            handle_server_frame(r#"{"type":"typing","userId":2}"#, &mut receipts, 1, PROMPT),
            None
        );
        assert_eq!(
            handle_server_frame("not even json", &mut receipts, 1, PROMPT),
            None
        );
    }

    #[test]
    fn test_prompt_names_the_user() {
        // Test case: the prompt is derived from the configured user id
        // given:
        let config = SessionConfig {
            ws_url: "ws://127.0.0.1:8080/ws".to_string(),
            api_url: "http://127.0.0.1:8080".to_string(),
            session_token: "token".to_string(),
            user_id: 42,
        };

        // when / then:
        assert_eq!(config.prompt(), "user42 > ");
        assert_eq!(config.cookie(), "session_id=token");
    }
}
