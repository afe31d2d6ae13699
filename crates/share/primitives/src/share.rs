//! Fixed-size namespaced shares.

use bytes::Bytes;

use crate::{NAMESPACE_SIZE, NamespaceId, PrimitivesError};

/// Size in bytes of every share.
pub const SHARE_SIZE: usize = 256;

/// A fixed-size payload whose first [`NAMESPACE_SIZE`] bytes are its namespace.
///
/// Shares carry no position of their own. The same bytes may legitimately
/// appear at several coordinates, so storage and exchange address them by
/// [`ShareKey`](crate::ShareKey) rather than by content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Bytes", into = "Bytes")
)]
pub struct Share(Bytes);

impl Share {
    /// Create a share, checking its size.
    pub fn new(data: impl Into<Bytes>) -> Result<Self, PrimitivesError> {
        let data = data.into();
        if data.len() != SHARE_SIZE {
            return Err(PrimitivesError::InvalidShareSize {
                expected: SHARE_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self(data))
    }

    /// Create a share from a namespace and a body, zero-padding the body.
    ///
    /// Bodies longer than `SHARE_SIZE - NAMESPACE_SIZE` are rejected.
    pub fn with_namespace(namespace: NamespaceId, body: &[u8]) -> Result<Self, PrimitivesError> {
        let mut data = Vec::with_capacity(SHARE_SIZE);
        data.extend_from_slice(namespace.as_bytes());
        data.extend_from_slice(body);
        if data.len() > SHARE_SIZE {
            return Err(PrimitivesError::InvalidShareSize {
                expected: SHARE_SIZE,
                actual: data.len(),
            });
        }
        data.resize(SHARE_SIZE, 0);
        Ok(Self(Bytes::from(data)))
    }

    /// Namespace this share belongs to.
    pub fn namespace(&self) -> NamespaceId {
        let mut ns = [0u8; NAMESPACE_SIZE];
        ns.copy_from_slice(&self.0[..NAMESPACE_SIZE]);
        NamespaceId::new(ns)
    }

    /// Payload following the namespace.
    pub fn body(&self) -> &[u8] {
        &self.0[NAMESPACE_SIZE..]
    }

    /// Full share bytes, namespace included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Share {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Bytes> for Share {
    type Error = PrimitivesError;

    fn try_from(data: Bytes) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl From<Share> for Bytes {
    fn from(share: Share) -> Self {
        share.0
    }
}
