//! Core primitive types for erasure-coded data squares.
//!
//! A block's data is laid out as an `N x N` square of fixed-size [`Share`]s.
//! The top-left `N/2 x N/2` quadrant holds the original data and the rest is
//! erasure-coding parity. A [`Root`] commits to the square through one
//! [`NamespacedRoot`] per row and per column.
//!
//! These types are kept in their own crate so storage, networking and
//! sampling code can share them without depending on each other.

mod coordinate;
mod error;
mod namespace;
mod root;
mod share;

pub use coordinate::Coordinate;
pub use error::PrimitivesError;
pub use namespace::{NAMESPACE_SIZE, NamespaceId};
pub use root::{NamespacedRoot, Root, ShareKey};
pub use share::{SHARE_SIZE, Share};

/// Re-exported digest type used for root and key hashes.
pub use alloy_primitives::B256;
