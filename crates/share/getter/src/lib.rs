//! Share service: resolves shares local-first with network fallback.
//!
//! Every coordinate is resolved with the same policy:
//!
//! 1. Look the share up in the local [`ShareStore`](quadrant_share_store::ShareStore).
//!    A hit returns immediately without touching the network.
//! 2. On a miss, fetch it through the [`ShareExchange`](quadrant_share_api::ShareExchange).
//! 3. Verify the fetched share against the root. A share that fails
//!    verification is treated as absent.
//! 4. Persist the verified share (best-effort) and return it.
//!
//! Multi-share operations fan out over a bounded pool and rebuild their
//! output from coordinates, so completion order never reorders results.

mod metrics;
mod service;

pub use service::ShareService;
