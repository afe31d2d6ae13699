//! Light availability: random coordinate sampling.
//!
//! # Why sampling works
//!
//! Erasure coding means a square can be reconstructed from any large enough
//! subset of its shares. To prevent reconstruction, a withholder has to hide
//! a large fraction of the square, so a uniform sample hits a hidden share
//! with high probability. Each confirming sample is treated as dividing the
//! chance of undetected withholding by the configured base, giving
//! `P(available) = 1 - base^-k` after `k` confirmed samples.
//!
//! # State
//!
//! No per-root state is kept: every call draws a fresh sample. The only
//! mutable state is the lifetime counter of confirmed samples, which only
//! grows.

use core::time::Duration;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures::future::try_join_all;
use parking_lot::Mutex;
use quadrant_share_api::{
    Availability, Coordinate, DEFAULT_CONFIDENCE_BASE, Lifecycle, Root, SamplingConfig,
    ShareContext, ShareError, ShareGetter, ShareResult,
};
use rand::{SeedableRng, rngs::StdRng, seq::index};
use tracing::{debug, warn};

use crate::metrics::SamplerMetrics;

/// Availability judged by sampling random coordinates.
pub struct LightAvailability<G> {
    getter: G,
    sample_count: usize,
    confidence_base: f64,
    timeout: Duration,
    rng: Mutex<StdRng>,
    /// Samples confirmed over the sampler's lifetime.
    confirmed: AtomicU64,
    metrics: SamplerMetrics,
}

impl<G: ShareGetter> LightAvailability<G> {
    /// Create a sampler seeded from the OS.
    pub fn new(getter: G, config: &impl SamplingConfig) -> Self {
        Self::with_rng(getter, config, StdRng::from_os_rng())
    }

    /// Create a sampler with an explicit random source.
    pub fn with_rng(getter: G, config: &impl SamplingConfig, rng: StdRng) -> Self {
        let mut confidence_base = config.confidence_base();
        if !confidence_base.is_finite() || confidence_base <= 1.0 {
            warn!(
                confidence_base,
                fallback = DEFAULT_CONFIDENCE_BASE,
                "Confidence base must be greater than one"
            );
            confidence_base = DEFAULT_CONFIDENCE_BASE;
        }

        Self {
            getter,
            sample_count: config.sample_count().max(1),
            confidence_base,
            timeout: config.sampling_timeout(),
            rng: Mutex::new(rng),
            confirmed: AtomicU64::new(0),
            metrics: SamplerMetrics::default(),
        }
    }

    /// Number of samples confirmed so far.
    pub fn confirmed_samples(&self) -> u64 {
        self.confirmed.load(Ordering::SeqCst)
    }

    /// Draw distinct coordinates uniformly from the square.
    ///
    /// Squares smaller than the sample count are sampled in full.
    fn sample(&self, root: &Root) -> Vec<Coordinate> {
        let total = root.share_count();
        let amount = self.sample_count.min(total);
        let width = root.width();

        let mut rng = self.rng.lock();
        index::sample(&mut *rng, total, amount)
            .into_iter()
            .map(|index| Coordinate::from_index(index, width))
            .collect()
    }

    fn probability(&self, confirmed: u64) -> f64 {
        if confirmed == 0 {
            return 0.0;
        }
        1.0 - self.confidence_base.powf(-(confirmed as f64))
    }
}

#[async_trait]
impl<G: ShareGetter> Availability for LightAvailability<G> {
    async fn shares_available(&self, ctx: &ShareContext, root: &Root) -> ShareResult<()> {
        let ctx = match ctx.deadline() {
            Some(_) => ctx.clone(),
            None => ctx.clone().with_timeout(self.timeout),
        };

        let samples = self.sample(root);
        self.metrics.checks_total.increment(1);
        debug!(%root, samples = samples.len(), "Sampling data square");

        let result = ctx
            .run(try_join_all(samples.iter().map(|coordinate| {
                self.getter.get_share(
                    &ctx,
                    root,
                    coordinate.row as usize,
                    coordinate.col as usize,
                )
            })))
            .await;

        match result {
            Ok(_) => {
                let confirmed = samples.len() as u64;
                let total = self.confirmed.fetch_add(confirmed, Ordering::SeqCst) + confirmed;
                self.metrics.samples_total.increment(confirmed);
                self.metrics.probability.set(self.probability(total));
                debug!(%root, confirmed, total, "Data square available");
                Ok(())
            }
            Err(err) if err.is_unavailable() => {
                self.metrics.unavailable_total.increment(1);
                debug!(%root, %err, "Data square unavailable");
                Err(ShareError::Unavailable { root: root.hash() })
            }
            Err(err) => Err(err),
        }
    }

    fn probability_of_availability(&self) -> f64 {
        self.probability(self.confirmed_samples())
    }
}

#[async_trait]
impl<G: ShareGetter> Lifecycle for LightAvailability<G> {}
