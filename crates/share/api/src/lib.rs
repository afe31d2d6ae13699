//! Share API - core abstractions for share retrieval and availability.
//!
//! This crate defines the contracts the rest of the workspace is built
//! against. Implementations live elsewhere: storage backends in
//! `quadrant-share-store`, retrieval in `quadrant-share-getter`, sampling in
//! `quadrant-share-availability`.
//!
//! # Collaborators
//!
//! - [`ShareExchange`] - fetch shares from peers by coordinate
//! - [`ShareVerifier`] - check a share against its row and column commitments
//!
//! # Capabilities
//!
//! - [`ShareGetter`] - resolve single shares, full squares and namespace subsets
//! - [`Availability`] - judge whether a square is retrievable
//! - [`Lifecycle`] - explicit open/close hooks for the owning process
//!
//! Every capability call takes a [`ShareContext`] carrying cancellation and
//! an optional deadline.

#![warn(missing_docs)]

mod availability;
mod config;
mod context;
mod error;
mod exchange;
mod getter;
mod lifecycle;
mod verifier;

pub use availability::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use exchange::*;
pub use getter::*;
pub use lifecycle::*;
pub use verifier::*;

// Re-export primitives for convenience
pub use quadrant_share_primitives::{
    B256, Coordinate, NAMESPACE_SIZE, NamespaceId, NamespacedRoot, Root, SHARE_SIZE, Share,
    ShareKey,
};
