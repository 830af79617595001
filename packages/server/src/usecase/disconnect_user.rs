//! UseCase: unregister a connection when its socket closes.

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, OfflineNotice};

pub struct DisconnectUserUseCase {
    registry: Arc<ConnectionRegistry>,
}

impl DisconnectUserUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Remove the connection and report the departure for broadcasting.
    ///
    /// Returns `None` when the connection was already removed, e.g. after
    /// an eviction during a broadcast. The departure is then announced by
    /// whoever removed it, never twice.
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<OfflineNotice> {
        let user_id = self.registry.unregister(connection_id).await?;
        let online_users = self.registry.present_user_ids().await;
        tracing::info!(
            "User {} disconnected (connection {})",
            user_id.value(),
            connection_id.value()
        );
        Some(OfflineNotice {
            user_id,
            online_users,
        })
    }
}
