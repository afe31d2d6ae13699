//! Configuration traits for share components.
//!
//! Traits define *what* configuration is needed. CLI args implement them
//! directly and builders receive `impl ConfigTrait`.

use core::time::Duration;

/// Default width of the concurrent fetch pool.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 64;

/// Default number of coordinates sampled per availability check.
pub const DEFAULT_SAMPLE_COUNT: usize = 16;

/// Default confidence base: each confirming sample divides the chance of
/// undetected withholding by this factor.
pub const DEFAULT_CONFIDENCE_BASE: f64 = 2.0;

/// Default deadline for an availability check without one of its own.
pub const DEFAULT_SAMPLING_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the share getter.
pub trait GetterConfig {
    /// Maximum number of concurrent share fetches.
    fn max_concurrent_fetches(&self) -> usize;
}

/// Configuration for availability sampling.
pub trait SamplingConfig {
    /// Number of distinct coordinates sampled per check.
    fn sample_count(&self) -> usize;

    /// Base `b` of the confidence estimate `1 - b^-k`.
    fn confidence_base(&self) -> f64;

    /// Deadline applied when the caller's context has none.
    fn sampling_timeout(&self) -> Duration;
}

/// Built-in defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultShareConfig;

impl GetterConfig for DefaultShareConfig {
    fn max_concurrent_fetches(&self) -> usize {
        DEFAULT_MAX_CONCURRENT_FETCHES
    }
}

impl SamplingConfig for DefaultShareConfig {
    fn sample_count(&self) -> usize {
        DEFAULT_SAMPLE_COUNT
    }

    fn confidence_base(&self) -> f64 {
        DEFAULT_CONFIDENCE_BASE
    }

    fn sampling_timeout(&self) -> Duration {
        DEFAULT_SAMPLING_TIMEOUT
    }
}
