//! Share CLI arguments.

use core::time::Duration;
use std::path::PathBuf;

use clap::Args;
use quadrant_share_api::{
    DEFAULT_CONFIDENCE_BASE, DEFAULT_MAX_CONCURRENT_FETCHES, DEFAULT_SAMPLE_COUNT,
    DEFAULT_SAMPLING_TIMEOUT, GetterConfig, SamplingConfig,
};
use serde::{Deserialize, Serialize};

/// Default read cache capacity in front of the share database, in shares.
pub const DEFAULT_CACHE_SHARES: u64 = 4096;

/// Share retrieval arguments.
#[derive(Debug, Args, Clone, PartialEq, Serialize, Deserialize)]
#[command(next_help_heading = "Share")]
#[serde(default)]
pub struct ShareArgs {
    /// Maximum number of concurrent share fetches from the network.
    #[arg(long = "share.max-concurrent-fetches", default_value_t = DEFAULT_MAX_CONCURRENT_FETCHES)]
    pub max_concurrent_fetches: usize,

    /// Read cache capacity in front of the share database, in shares.
    /// Unused for the in-memory store.
    #[arg(long = "share.cache-shares", default_value_t = DEFAULT_CACHE_SHARES)]
    pub cache_shares: u64,

    /// Path of the share database. Shares are kept in memory when unset.
    #[arg(long = "share.store-path", value_name = "PATH")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
}

impl Default for ShareArgs {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            cache_shares: DEFAULT_CACHE_SHARES,
            store_path: None,
        }
    }
}

impl GetterConfig for ShareArgs {
    fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
    }
}

/// Availability sampling arguments.
#[derive(Debug, Args, Clone, PartialEq, Serialize, Deserialize)]
#[command(next_help_heading = "Availability")]
#[serde(default)]
pub struct AvailabilityArgs {
    /// Number of distinct coordinates sampled per availability check.
    #[arg(long = "availability.sample-count", default_value_t = DEFAULT_SAMPLE_COUNT)]
    pub sample_count: usize,

    /// Each confirming sample divides the chance of undetected withholding
    /// by this factor.
    #[arg(long = "availability.confidence-base", default_value_t = DEFAULT_CONFIDENCE_BASE)]
    pub confidence_base: f64,

    /// Deadline for an availability check whose caller set none.
    #[arg(
        long = "availability.timeout",
        value_name = "DURATION",
        default_value = "60s",
        value_parser = humantime::parse_duration
    )]
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,
}

impl Default for AvailabilityArgs {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            confidence_base: DEFAULT_CONFIDENCE_BASE,
            timeout: DEFAULT_SAMPLING_TIMEOUT,
        }
    }
}

impl SamplingConfig for AvailabilityArgs {
    fn sample_count(&self) -> usize {
        self.sample_count
    }

    fn confidence_base(&self) -> f64 {
        self.confidence_base
    }

    fn sampling_timeout(&self) -> Duration {
        self.timeout
    }
}

/// Durations as human-readable strings (`"1m 30s"`).
mod humantime_duration {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub(super) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let value = String::deserialize(deserializer)?;
        humantime::parse_duration(&value).map_err(D::Error::custom)
    }
}
