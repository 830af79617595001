//! Seam to the external push notification provider.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PushError {
    #[error("push provider rejected the request: {0}")]
    Rejected(String),
    #[error("push transport failed: {0}")]
    Transport(String),
}

/// Delivery of push notifications to devices of users who are not
/// currently connected. Recipients are addressed by the external id they
/// registered with the provider, not by chat user id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Deliver one notification to every given external recipient id.
    async fn push(&self, title: &str, body: &str, external_ids: &[String])
    -> Result<(), PushError>;
}
