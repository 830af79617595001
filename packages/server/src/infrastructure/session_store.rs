//! In-memory session store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{SessionStore, UserId};

/// Maps opaque session tokens to user ids. The surrounding application
/// normally owns login and logout; here tokens are issued directly.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, UserId>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session for `user_id` and return its token.
    pub async fn issue(&self, user_id: UserId) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.lock().await.insert(token.clone(), user_id);
        token
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn authenticate(&self, token: &str) -> Option<UserId> {
        self.sessions.lock().await.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issued_token_authenticates_to_its_user() {
        // Test case: a freshly issued token resolves to the user it was
        // issued for
        // given:
        let store = InMemorySessionStore::new();

        // when:
        let token = store.issue(UserId::new(5)).await;

        // then:
        assert_eq!(store.authenticate(&token).await, Some(UserId::new(5)));
    }

    #[tokio::test]
    async fn test_unknown_token_does_not_authenticate() {
        // Test case: a token that was never issued resolves to nothing
        // given:
        let store = InMemorySessionStore::new();
        store.issue(UserId::new(5)).await;

        // when:
        let result = store.authenticate("forged-token").await;

        // then:
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_one_user_may_hold_several_sessions() {
        // Test case: issuing twice for one user yields two distinct,
        // independently valid tokens
        // given:
        let store = InMemorySessionStore::new();

        // when:
        let first = store.issue(UserId::new(5)).await;
        let second = store.issue(UserId::new(5)).await;

        // then:
        assert_ne!(first, second);
        assert_eq!(store.authenticate(&first).await, Some(UserId::new(5)));
        assert_eq!(store.authenticate(&second).await, Some(UserId::new(5)));
    }
}
