//! Network-facing share exchange.

use async_trait::async_trait;
use quadrant_share_primitives::{Coordinate, Root, Share};
use tokio::time::Instant;

/// Errors reported by a [`ShareExchange`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// No peer could provide the share.
    #[error("no provider for share")]
    NotFound,

    /// The exchange gave up before the deadline.
    #[error("exchange timed out")]
    Timeout,

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),
}

/// Fetch shares from the peer network.
///
/// Implementations own discovery, transport and any retry/backoff policy.
/// Returned shares are untrusted: the caller verifies them against the root
/// before use. No ordering is guaranteed across concurrent calls.
#[async_trait]
pub trait ShareExchange: Send + Sync + 'static {
    /// Fetch the share at `coordinate` of the square committed to by `root`.
    ///
    /// `deadline` is advisory; the caller also drops the future once it
    /// passes.
    async fn fetch(
        &self,
        root: &Root,
        coordinate: Coordinate,
        deadline: Option<Instant>,
    ) -> Result<Share, ExchangeError>;
}

#[async_trait]
impl<T: ShareExchange + ?Sized> ShareExchange for std::sync::Arc<T> {
    async fn fetch(
        &self,
        root: &Root,
        coordinate: Coordinate,
        deadline: Option<Instant>,
    ) -> Result<Share, ExchangeError> {
        (**self).fetch(root, coordinate, deadline).await
    }
}
