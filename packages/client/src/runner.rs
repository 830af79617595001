//! Client execution logic with reconnection support.

use tokio::sync::mpsc;

use pavlac_server::infrastructure::dto::http::HistoryResponse;

use crate::{
    error::ClientError,
    formatter::MessageFormatter,
    reconnect::{ReconnectController, ReconnectPolicy, RetryDecision},
    session::{InputEvent, SessionConfig, drive_session, open_session},
    ui::redisplay_prompt,
    visibility::VisibilityGate,
};

/// Fetch recent history and presence over HTTP and print them, before
/// the WebSocket session starts.
pub async fn bootstrap_history(config: &SessionConfig) -> Result<(), ClientError> {
    let url = format!("{}/api/messages", config.api_url);
    let response = reqwest::Client::new()
        .get(&url)
        .header(reqwest::header::COOKIE, config.cookie())
        .send()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ClientError::SessionRejected);
    }
    if !response.status().is_success() {
        return Err(ClientError::ConnectionError(format!(
            "history request failed with {}",
            response.status()
        )));
    }

    let history: HistoryResponse = response
        .json()
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    for message in &history.messages {
        print!("{}", MessageFormatter::format_history_message(message));
    }
    print!(
        "{}",
        MessageFormatter::format_online_users(&history.online_users)
    );
    Ok(())
}

/// Run the client: connect, drive the session, and reconnect with
/// exponential backoff until the user quits, the session is rejected, or
/// the retry limit is reached.
pub async fn run_client(
    config: SessionConfig,
    policy: ReconnectPolicy,
    mut gate: VisibilityGate,
    input: &mut mpsc::UnboundedReceiver<InputEvent>,
) -> Result<(), ClientError> {
    let mut controller = ReconnectController::new(policy);

    loop {
        controller.on_connecting();
        tracing::info!("Connecting to {}", config.ws_url);

        let ws_stream = match open_session(&config).await {
            Ok(ws_stream) => ws_stream,
            // A dead session cannot be fixed by retrying
            Err(ClientError::SessionRejected) => return Err(ClientError::SessionRejected),
            Err(e) => {
                tracing::warn!("Connect failed: {}", e);
                if !wait_for_retry(&mut controller, &mut gate).await {
                    return Err(e);
                }
                continue;
            }
        };

        controller.on_open();
        print!("{}", MessageFormatter::format_connected());
        redisplay_prompt(&config.prompt());

        match drive_session(ws_stream, &config, input).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                return Ok(());
            }
            Err(e) => {
                print!("{}", MessageFormatter::format_disconnected());
                tracing::warn!("Connection lost: {}", e);
                if !wait_for_retry(&mut controller, &mut gate).await {
                    return Err(e);
                }
            }
        }
    }
}

/// Sleep out the backoff delay, then wait until the client is visible.
/// Returns false when the controller has given up.
async fn wait_for_retry(controller: &mut ReconnectController, gate: &mut VisibilityGate) -> bool {
    match controller.on_closed() {
        RetryDecision::Retry { attempt, delay } => {
            tracing::info!(
                "Reconnecting in {:.1}s (attempt {}/{})",
                delay.as_secs_f64(),
                attempt,
                controller.max_attempts()
            );
            tokio::time::sleep(delay).await;
            if !gate.is_visible() {
                tracing::info!("Client hidden, holding the reconnect until it is visible again");
                gate.wait_until_visible().await;
            }
            true
        }
        RetryDecision::GiveUp => {
            tracing::error!(
                "Failed to reconnect after {} attempts, giving up",
                controller.max_attempts()
            );
            false
        }
    }
}
