//! In-memory user directory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{UserDirectory, UserId, UserProfile};

/// Profile lookup backed by a map, seeded at startup. Stands in for the
/// application's user table.
pub struct InMemoryUserDirectory {
    profiles: Mutex<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
        }
    }

    pub async fn upsert(&self, profile: UserProfile) {
        self.profiles.lock().await.insert(profile.id, profile);
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn profile(&self, user_id: UserId) -> Option<UserProfile> {
        self.profiles.lock().await.get(&user_id).cloned()
    }

    async fn all_profiles(&self) -> Vec<UserProfile> {
        let mut profiles: Vec<UserProfile> = self.profiles.lock().await.values().cloned().collect();
        profiles.sort_by_key(|profile| profile.id);
        profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i64, username: &str) -> UserProfile {
        UserProfile::new(UserId::new(id), username.to_string(), None, None)
    }

    #[tokio::test]
    async fn test_profile_returns_the_seeded_user() {
        // Test case: a seeded profile is found by id
        // given:
        let directory = InMemoryUserDirectory::new();
        directory.upsert(profile(1, "alena")).await;

        // when:
        let found = directory.profile(UserId::new(1)).await;

        // then:
        assert_eq!(found.unwrap().username, "alena");
    }

    #[tokio::test]
    async fn test_profile_of_unknown_user_is_none() {
        // Test case: an unknown user id yields None
        // given:
        let directory = InMemoryUserDirectory::new();

        // when:
        let found = directory.profile(UserId::new(404)).await;

        // then:
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_all_profiles_are_ordered_by_user_id() {
        // Test case: all_profiles comes back sorted regardless of insert order
        // given:
        let directory = InMemoryUserDirectory::new();
        directory.upsert(profile(3, "cyril")).await;
        directory.upsert(profile(1, "alena")).await;
        directory.upsert(profile(2, "bedrich")).await;

        // when:
        let all = directory.all_profiles().await;

        // then:
        let usernames: Vec<&str> = all.iter().map(|p| p.username.as_str()).collect();
        assert_eq!(usernames, vec!["alena", "bedrich", "cyril"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_an_existing_profile() {
        // Test case: upserting the same id twice keeps the latest profile
        // given:
        let directory = InMemoryUserDirectory::new();
        directory.upsert(profile(1, "alena")).await;
        directory
            .upsert(UserProfile::new(
                UserId::new(1),
                "alena".to_string(),
                Some("Alena Nová".to_string()),
                None,
            ))
            .await;

        // when:
        let found = directory.profile(UserId::new(1)).await.unwrap();

        // then:
        assert_eq!(found.display_name.as_deref(), Some("Alena Nová"));
    }
}
