//! Commitment verification.

use quadrant_share_primitives::{Coordinate, Root, Share};

/// Checks a share against the row and column commitments of its square.
///
/// This is the boundary to the erasure-coding and commitment math, which is
/// assumed correct. A `false` result means the share must not be stored or
/// returned.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait ShareVerifier: Send + Sync {
    /// Whether `share` is the committed share at `coordinate` of `root`.
    fn verify(&self, root: &Root, coordinate: Coordinate, share: &Share) -> bool;
}
