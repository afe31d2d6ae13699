//! Data square commitments.

use core::fmt;

use alloy_primitives::{B256, Keccak256};

use crate::{Coordinate, NamespaceId, PrimitivesError};

/// Storage and exchange identity of a share: `keccak256(root || row || col)`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[display("{_0}")]
pub struct ShareKey(B256);

impl ShareKey {
    /// Wrap a raw key.
    pub const fn new(key: B256) -> Self {
        Self(key)
    }

    /// Raw 32-byte key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0.0
    }
}

impl fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareKey({})", self.0)
    }
}

/// Namespaced merkle commitment over one row or column.
///
/// `min` and `max` bound the namespaces present under the commitment, which
/// lets namespace queries skip whole rows without fetching them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "NamespacedRootSerde", into = "NamespacedRootSerde")
)]
pub struct NamespacedRoot {
    min: NamespaceId,
    max: NamespaceId,
    digest: B256,
}

impl NamespacedRoot {
    /// Create a commitment, rejecting inverted ranges.
    pub fn new(min: NamespaceId, max: NamespaceId, digest: B256) -> Result<Self, PrimitivesError> {
        if min > max {
            return Err(PrimitivesError::InvertedRange { min, max });
        }
        Ok(Self { min, max, digest })
    }

    /// Smallest namespace under this commitment.
    pub fn min(&self) -> NamespaceId {
        self.min
    }

    /// Largest namespace under this commitment.
    pub fn max(&self) -> NamespaceId {
        self.max
    }

    /// Merkle digest.
    pub fn digest(&self) -> B256 {
        self.digest
    }

    /// Whether `namespace` falls within `[min, max]`.
    pub fn contains(&self, namespace: &NamespaceId) -> bool {
        self.min <= *namespace && *namespace <= self.max
    }

    fn hash_into(&self, hasher: &mut Keccak256) {
        hasher.update(self.min.as_bytes());
        hasher.update(self.max.as_bytes());
        hasher.update(self.digest);
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct NamespacedRootSerde {
    min: NamespaceId,
    max: NamespaceId,
    digest: B256,
}

#[cfg(feature = "serde")]
impl TryFrom<NamespacedRootSerde> for NamespacedRoot {
    type Error = PrimitivesError;

    fn try_from(value: NamespacedRootSerde) -> Result<Self, Self::Error> {
        Self::new(value.min, value.max, value.digest)
    }
}

#[cfg(feature = "serde")]
impl From<NamespacedRoot> for NamespacedRootSerde {
    fn from(root: NamespacedRoot) -> Self {
        Self {
            min: root.min,
            max: root.max,
            digest: root.digest,
        }
    }
}

/// Commitment to one block's `N x N` data square.
///
/// Immutable once built. The hash is computed at construction and used as
/// the square's identity for storage and exchange. It is never serialized;
/// decoding recomputes it from the commitments.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RootSerde", into = "RootSerde")
)]
pub struct Root {
    row_roots: Vec<NamespacedRoot>,
    column_roots: Vec<NamespacedRoot>,
    hash: B256,
}

impl Root {
    /// Build a root from row and column commitments.
    ///
    /// Both sequences must be non-empty, equally long, and a power of two.
    pub fn new(
        row_roots: Vec<NamespacedRoot>,
        column_roots: Vec<NamespacedRoot>,
    ) -> Result<Self, PrimitivesError> {
        if row_roots.is_empty() || column_roots.is_empty() {
            return Err(PrimitivesError::EmptyRoot);
        }
        if row_roots.len() != column_roots.len() {
            return Err(PrimitivesError::NotSquare {
                rows: row_roots.len(),
                columns: column_roots.len(),
            });
        }
        let width = row_roots.len();
        if !width.is_power_of_two() {
            return Err(PrimitivesError::WidthNotPowerOfTwo(width));
        }
        if width > u16::MAX as usize + 1 {
            return Err(PrimitivesError::WidthTooLarge(width));
        }

        let mut hasher = Keccak256::new();
        for root in row_roots.iter().chain(column_roots.iter()) {
            root.hash_into(&mut hasher);
        }
        let hash = hasher.finalize();

        Ok(Self {
            row_roots,
            column_roots,
            hash,
        })
    }

    /// Square width `N`.
    pub fn width(&self) -> usize {
        self.row_roots.len()
    }

    /// Width of the original-data quadrant.
    pub fn original_width(&self) -> usize {
        (self.width() / 2).max(1)
    }

    /// Total number of shares in the square.
    pub fn share_count(&self) -> usize {
        self.width() * self.width()
    }

    /// Row commitments in row order.
    pub fn row_roots(&self) -> &[NamespacedRoot] {
        &self.row_roots
    }

    /// Column commitments in column order.
    pub fn column_roots(&self) -> &[NamespacedRoot] {
        &self.column_roots
    }

    /// Hash identifying this square.
    pub fn hash(&self) -> B256 {
        self.hash
    }

    /// Whether `coordinate` lies inside the square.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (coordinate.row as usize) < self.width() && (coordinate.col as usize) < self.width()
    }

    /// Storage and exchange key for the share at `coordinate`.
    pub fn share_key(&self, coordinate: Coordinate) -> ShareKey {
        let mut hasher = Keccak256::new();
        hasher.update(self.hash);
        hasher.update(coordinate.row.to_be_bytes());
        hasher.update(coordinate.col.to_be_bytes());
        ShareKey(hasher.finalize())
    }

    /// All coordinates of the square in row-major order.
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        let width = self.width();
        (0..self.share_count()).map(move |index| Coordinate::from_index(index, width))
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RootSerde {
    row_roots: Vec<NamespacedRoot>,
    column_roots: Vec<NamespacedRoot>,
}

#[cfg(feature = "serde")]
impl TryFrom<RootSerde> for Root {
    type Error = PrimitivesError;

    fn try_from(value: RootSerde) -> Result<Self, Self::Error> {
        Self::new(value.row_roots, value.column_roots)
    }
}

#[cfg(feature = "serde")]
impl From<Root> for RootSerde {
    fn from(root: Root) -> Self {
        Self {
            row_roots: root.row_roots,
            column_roots: root.column_roots,
        }
    }
}

impl fmt::Display for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("hash", &self.hash)
            .field("width", &self.width())
            .finish()
    }
}
