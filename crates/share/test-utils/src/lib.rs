//! Test fixtures for share retrieval and availability.
//!
//! - [`SquareFixture`] - a committed square with known shares
//! - [`MockExchange`] - scriptable in-memory [`ShareExchange`](quadrant_share_api::ShareExchange)
//! - [`FixtureVerifier`] - verifier that accepts exactly the committed shares
//! - [`CountingStore`] - store wrapper that counts calls and can fail reads or writes
//! - [`BlockingStore`] - store wrapper whose reads stall until released

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod exchange;
mod fixture;
mod store;

pub use exchange::MockExchange;
pub use fixture::{FixtureVerifier, SquareFixture, namespace};
pub use store::{BlockingStore, CountingStore};
