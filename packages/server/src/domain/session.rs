//! Session lookup used to authenticate connections.

use async_trait::async_trait;

use crate::domain::value_object::UserId;

/// Resolves session tokens (carried in the `session_id` cookie) to user
/// ids. Connections without a resolvable session are refused before the
/// WebSocket upgrade.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn authenticate(&self, token: &str) -> Option<UserId>;
}
