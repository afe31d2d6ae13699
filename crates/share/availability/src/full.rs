//! Full availability: retrieve and verify every share of the square.
//!
//! A square is available when the getter returns the whole grid. Any missing
//! share makes it unavailable; cancellation and deadlines pass through.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quadrant_share_api::{
    Availability, Lifecycle, Root, ShareContext, ShareError, ShareGetter, ShareResult,
};
use tracing::debug;

use crate::metrics::SamplerMetrics;

/// Availability judged by retrieving the entire square.
///
/// Used by nodes that store every share anyway. Once any square has been
/// retrieved in full, the probability of availability is `1.0`.
pub struct FullAvailability<G> {
    getter: G,
    retrieved: AtomicBool,
    metrics: SamplerMetrics,
}

impl<G: ShareGetter> FullAvailability<G> {
    /// Create a full availability checker over `getter`.
    pub fn new(getter: G) -> Self {
        Self {
            getter,
            retrieved: AtomicBool::new(false),
            metrics: SamplerMetrics::default(),
        }
    }
}

#[async_trait]
impl<G: ShareGetter> Availability for FullAvailability<G> {
    async fn shares_available(&self, ctx: &ShareContext, root: &Root) -> ShareResult<()> {
        self.metrics.checks_total.increment(1);
        match self.getter.get_shares(ctx, root).await {
            Ok(grid) => {
                let shares = grid.iter().map(Vec::len).sum::<usize>() as u64;
                self.retrieved.store(true, Ordering::SeqCst);
                self.metrics.samples_total.increment(shares);
                self.metrics.probability.set(1.0);
                debug!(%root, shares, "Data square retrieved in full");
                Ok(())
            }
            Err(err) if err.is_unavailable() => {
                self.metrics.unavailable_total.increment(1);
                Err(ShareError::Unavailable { root: root.hash() })
            }
            Err(err) => Err(err),
        }
    }

    fn probability_of_availability(&self) -> f64 {
        if self.retrieved.load(Ordering::SeqCst) { 1.0 } else { 0.0 }
    }
}

#[async_trait]
impl<G: ShareGetter> Lifecycle for FullAvailability<G> {}
