//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use crate::{
    infrastructure::dto::http::{HealthResponse, HistoryMessage, HistoryResponse},
    ui::state::AppState,
    usecase::FetchHistoryError,
};

use super::session_token;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Recent message history plus the current presence list. Requires the
/// same session cookie as the WebSocket upgrade.
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<HistoryResponse>, StatusCode> {
    let authenticated = match session_token(&headers) {
        Some(token) => state.session_store.authenticate(&token).await.is_some(),
        None => false,
    };
    if !authenticated {
        return Err(StatusCode::UNAUTHORIZED);
    }

    match state.fetch_history_usecase.execute().await {
        Ok(view) => {
            // Domain model to DTO conversion
            let messages: Vec<HistoryMessage> = view
                .entries
                .iter()
                .map(|entry| HistoryMessage::new(&entry.message, &entry.author))
                .collect();
            let online_users = view.online_users.iter().map(|id| id.value()).collect();
            Ok(Json(HistoryResponse {
                messages,
                online_users,
            }))
        }
        Err(FetchHistoryError::StoreFailed(e)) => {
            tracing::error!("Failed to load message history: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
