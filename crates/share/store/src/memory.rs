//! In-memory share store.

use std::collections::HashMap;

use bytes::Bytes;
use parking_lot::RwLock;
use quadrant_share_primitives::ShareKey;

use crate::{ShareStore, StoreResult};

/// Share store held entirely in memory.
///
/// Used for light nodes without a data directory, and in tests.
#[derive(Debug, Default)]
pub struct MemoryShareStore {
    shares: RwLock<HashMap<ShareKey, Bytes>>,
}

impl MemoryShareStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ShareStore for MemoryShareStore {
    fn put(&self, key: &ShareKey, data: &[u8]) -> StoreResult<()> {
        let mut shares = self.shares.write();
        shares
            .entry(*key)
            .or_insert_with(|| Bytes::copy_from_slice(data));
        Ok(())
    }

    fn get(&self, key: &ShareKey) -> StoreResult<Option<Bytes>> {
        let shares = self.shares.read();
        Ok(shares.get(key).cloned())
    }

    fn contains(&self, key: &ShareKey) -> StoreResult<bool> {
        let shares = self.shares.read();
        Ok(shares.contains_key(key))
    }

    fn delete(&self, key: &ShareKey) -> StoreResult<()> {
        let mut shares = self.shares.write();
        shares.remove(key);
        Ok(())
    }

    fn count(&self) -> StoreResult<u64> {
        let shares = self.shares.read();
        Ok(shares.len() as u64)
    }
}
