//! Error types for share operations.
//!
//! Callers see a small closed set of conditions. Commitment mismatches are
//! folded into [`ShareError::NotFound`]: a share that fails
//! verification is treated exactly like a share nobody has.

use quadrant_share_primitives::{B256, Coordinate};

/// Error type for share retrieval and availability operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    /// Neither the local store nor the network could supply a valid share.
    #[error("share not found at {coordinate} in square {root}")]
    NotFound {
        /// Hash of the square's root.
        root: B256,
        /// Coordinate that could not be resolved.
        coordinate: Coordinate,
    },

    /// Aggregate judgment that a square's data cannot be retrieved.
    #[error("data square {root} is unavailable")]
    Unavailable {
        /// Hash of the square's root.
        root: B256,
    },

    /// The caller's deadline expired.
    #[error("deadline exceeded")]
    Timeout,

    /// The caller cancelled the request, or the service shut down under it.
    #[error("request cancelled")]
    Cancelled,

    /// Coordinate lies outside the square.
    #[error("coordinate ({row}, {col}) out of bounds for square of width {width}")]
    InvalidCoordinate {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Square width.
        width: usize,
    },

    /// Service is not open.
    #[error("share service is closed")]
    Closed,

    /// The local store failed on a query that has no network fallback.
    #[error("local share store failed: {0}")]
    Storage(String),
}

impl ShareError {
    /// Whether the caller may usefully retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Whether this error means the data could not be found.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Unavailable { .. })
    }

    /// Escalate a per-coordinate miss into an aggregate [`ShareError::Unavailable`].
    ///
    /// Timeouts, cancellation and lifecycle errors pass through unchanged.
    pub fn into_unavailable(self, root: B256) -> Self {
        match self {
            Self::NotFound { .. } => Self::Unavailable { root },
            other => other,
        }
    }
}

/// Result type for share operations.
pub type ShareResult<T> = core::result::Result<T, ShareError>;
