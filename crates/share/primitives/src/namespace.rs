//! Namespace identifiers.

use core::fmt;

use crate::PrimitivesError;

/// Width in bytes of a namespace identifier.
pub const NAMESPACE_SIZE: usize = 8;

/// Fixed-width tag prefixing every share's payload.
///
/// Ordering is lexicographic over the raw bytes, which is the order row
/// commitments use for their `[min, max]` ranges.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamespaceId([u8; NAMESPACE_SIZE]);

impl NamespaceId {
    /// Smallest possible namespace.
    pub const MIN: Self = Self([0x00; NAMESPACE_SIZE]);

    /// Largest possible namespace, used for parity shares.
    pub const MAX: Self = Self([0xff; NAMESPACE_SIZE]);

    /// Create a namespace from raw bytes.
    pub const fn new(bytes: [u8; NAMESPACE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Create a namespace from a slice, checking its width.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let array: [u8; NAMESPACE_SIZE] =
            bytes
                .try_into()
                .map_err(|_| PrimitivesError::InvalidNamespaceSize {
                    expected: NAMESPACE_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Raw bytes of the namespace.
    pub const fn as_bytes(&self) -> &[u8; NAMESPACE_SIZE] {
        &self.0
    }
}

impl From<[u8; NAMESPACE_SIZE]> for NamespaceId {
    fn from(bytes: [u8; NAMESPACE_SIZE]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for NamespaceId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for NamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NamespaceId({self})")
    }
}
