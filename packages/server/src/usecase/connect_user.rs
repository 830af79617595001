//! UseCase: authenticate a session and register the connection.

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, FrameSender, SessionStore, UserId};

use super::error::ConnectError;

/// Outcome of a successful connect: the registered connection and the
/// user the session resolved to. Every later frame on this connection is
/// checked against `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectedUser {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
}

pub struct ConnectUserUseCase {
    session_store: Arc<dyn SessionStore>,
    registry: Arc<ConnectionRegistry>,
}

impl ConnectUserUseCase {
    pub fn new(session_store: Arc<dyn SessionStore>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            session_store,
            registry,
        }
    }

    /// Resolve the session token and register the connection.
    ///
    /// Nothing is sent to anyone on connect; joining becomes visible to
    /// other users through the `onlineUsers` list of later frames.
    pub async fn execute(
        &self,
        session_token: &str,
        sender: FrameSender,
    ) -> Result<ConnectedUser, ConnectError> {
        let Some(user_id) = self.session_store.authenticate(session_token).await else {
            return Err(ConnectError::InvalidSession);
        };

        let connection_id = self.registry.register(user_id, sender).await;
        tracing::info!(
            "User {} connected (connection {})",
            user_id.value(),
            connection_id.value()
        );

        Ok(ConnectedUser {
            connection_id,
            user_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame_channel;
    use crate::infrastructure::InMemorySessionStore;

    #[tokio::test]
    async fn test_connect_with_valid_session_registers_connection() {
        // Test case: a valid session token registers the connection under
        // the session's user
        // given:
        let sessions = Arc::new(InMemorySessionStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let token = sessions.issue(UserId::new(42)).await;
        let usecase = ConnectUserUseCase::new(sessions, registry.clone());
        let (sender, _receiver) = frame_channel();

        // when:
        let result = usecase.execute(&token, sender).await;

        // then:
        let connected = result.unwrap();
        assert_eq!(connected.user_id, UserId::new(42));
        assert_eq!(registry.connection_count().await, 1);
        assert!(registry.is_present(UserId::new(42)).await);
    }

    #[tokio::test]
    async fn test_connect_with_unknown_token_is_refused() {
        // Test case: an unknown token is refused and nothing is registered
        // given:
        let sessions = Arc::new(InMemorySessionStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let usecase = ConnectUserUseCase::new(sessions, registry.clone());
        let (sender, _receiver) = frame_channel();

        // when:
        let result = usecase.execute("no-such-token", sender).await;

        // then:
        assert_eq!(result, Err(ConnectError::InvalidSession));
        assert_eq!(registry.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_same_user_can_hold_multiple_connections() {
        // Test case: connecting twice with the same session yields two
        // registered connections of one user
        // given:
        let sessions = Arc::new(InMemorySessionStore::new());
        let registry = Arc::new(ConnectionRegistry::new());
        let token = sessions.issue(UserId::new(7)).await;
        let usecase = ConnectUserUseCase::new(sessions, registry.clone());
        let (sender1, _receiver1) = frame_channel();
        let (sender2, _receiver2) = frame_channel();

        // when:
        let first = usecase.execute(&token, sender1).await.unwrap();
        let second = usecase.execute(&token, sender2).await.unwrap();

        // then:
        assert_ne!(first.connection_id, second.connection_id);
        assert_eq!(registry.connection_count().await, 2);
        assert_eq!(registry.present_user_ids().await, vec![UserId::new(7)]);
    }
}
