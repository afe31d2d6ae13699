//! Share getter metrics.

use metrics::Counter;

/// Share getter metrics.
#[derive(Clone, Debug)]
pub(crate) struct GetterMetrics {
    /// Shares served from the local store
    pub(crate) store_hits_total: Counter,
    /// Lookups that missed the local store
    pub(crate) store_misses_total: Counter,
    /// Fetches issued to the exchange
    pub(crate) exchange_fetches_total: Counter,
    /// Fetches the exchange could not satisfy
    pub(crate) exchange_failures_total: Counter,
    /// Fetched shares rejected by verification
    pub(crate) verification_failures_total: Counter,
    /// Verified shares that could not be persisted
    pub(crate) store_write_failures_total: Counter,
}

impl Default for GetterMetrics {
    fn default() -> Self {
        Self {
            store_hits_total: metrics::counter!("share.getter.store_hits_total"),
            store_misses_total: metrics::counter!("share.getter.store_misses_total"),
            exchange_fetches_total: metrics::counter!("share.getter.exchange_fetches_total"),
            exchange_failures_total: metrics::counter!("share.getter.exchange_failures_total"),
            verification_failures_total: metrics::counter!(
                "share.getter.verification_failures_total"
            ),
            store_write_failures_total: metrics::counter!(
                "share.getter.store_write_failures_total"
            ),
        }
    }
}
