//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

/// Response body of `GET /api/messages`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub messages: Vec<HistoryMessage>,
    pub online_users: Vec<i64>,
}

/// One stored message joined with its author, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
    pub created_at: String,
    pub username: String,
    pub display_name: Option<String>,
}

/// Response body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
