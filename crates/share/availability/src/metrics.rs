//! Availability metrics.

use metrics::{Counter, Gauge};

/// Availability metrics.
#[derive(Clone, Debug)]
pub(crate) struct SamplerMetrics {
    /// Availability checks started
    pub(crate) checks_total: Counter,
    /// Checks that judged a square unavailable
    pub(crate) unavailable_total: Counter,
    /// Samples confirmed by successful checks
    pub(crate) samples_total: Counter,
    /// Current probability of availability
    pub(crate) probability: Gauge,
}

impl Default for SamplerMetrics {
    fn default() -> Self {
        Self {
            checks_total: metrics::counter!("share.availability.checks_total"),
            unavailable_total: metrics::counter!("share.availability.unavailable_total"),
            samples_total: metrics::counter!("share.availability.samples_total"),
            probability: metrics::gauge!("share.availability.probability"),
        }
    }
}
