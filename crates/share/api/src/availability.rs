//! Data availability capability.

use async_trait::async_trait;
use quadrant_share_primitives::Root;

use crate::{ShareContext, ShareResult};

/// Subjective judgment of whether a square's data is retrievable.
#[async_trait]
pub trait Availability: Send + Sync + 'static {
    /// Check whether the shares committed to by `root` are available.
    ///
    /// Returns [`ShareError::Unavailable`](crate::ShareError::Unavailable)
    /// when they are judged not to be.
    async fn shares_available(&self, ctx: &ShareContext, root: &Root) -> ShareResult<()>;

    /// Current confidence, in `[0, 1]`, that square reconstruction would succeed.
    fn probability_of_availability(&self) -> f64;
}

#[async_trait]
impl<T: Availability + ?Sized> Availability for std::sync::Arc<T> {
    async fn shares_available(&self, ctx: &ShareContext, root: &Root) -> ShareResult<()> {
        (**self).shares_available(ctx, root).await
    }

    fn probability_of_availability(&self) -> f64 {
        (**self).probability_of_availability()
    }
}
