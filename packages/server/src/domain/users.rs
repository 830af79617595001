//! Read access to user accounts.

use async_trait::async_trait;

use crate::domain::entity::UserProfile;
use crate::domain::value_object::UserId;

/// Lookup of user profiles. The chat only reads accounts; it never
/// creates or modifies them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn profile(&self, user_id: UserId) -> Option<UserProfile>;

    /// Every known profile, ordered by user id.
    async fn all_profiles(&self) -> Vec<UserProfile>;
}
