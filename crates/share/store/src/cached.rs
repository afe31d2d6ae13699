//! LRU read cache over a persistent share store.
//!
//! Sampling the same square repeatedly hits the same few keys, and each miss
//! against redb opens a read transaction. The cache keeps the most recently
//! read or written shares in memory. It only makes sense over a store that is
//! not already in memory.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use hashlink::LruCache;
use parking_lot::Mutex;
use quadrant_share_primitives::ShareKey;
use tracing::trace;

use crate::{ShareStore, StoreResult};

/// Snapshot of cache effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Maximum number of cached shares.
    pub capacity: usize,
    /// Shares currently cached.
    pub cached: usize,
    /// Reads answered from the cache.
    pub hits: u64,
    /// Reads passed to the backing store.
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of reads answered from the cache, in `[0, 1]`.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            reads => self.hits as f64 / reads as f64,
        }
    }
}

/// [`ShareStore`] with an LRU of share bytes in front of `S`.
///
/// Writes reach `S` before the cache, so a cached share is always persisted.
pub struct CachedShareStore<S> {
    store: S,
    lru: Mutex<LruCache<ShareKey, Bytes>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: ShareStore> CachedShareStore<S> {
    /// Cache up to `capacity` shares (at least one) in front of `store`.
    pub fn new(store: S, capacity: usize) -> Self {
        Self {
            store,
            lru: Mutex::new(LruCache::new(capacity.max(1))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Current cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        let lru = self.lru.lock();
        CacheStats {
            capacity: lru.capacity(),
            cached: lru.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<S: ShareStore> ShareStore for CachedShareStore<S> {
    fn put(&self, key: &ShareKey, data: &[u8]) -> StoreResult<()> {
        self.store.put(key, data)?;
        self.lru.lock().insert(*key, Bytes::copy_from_slice(data));
        Ok(())
    }

    fn get(&self, key: &ShareKey) -> StoreResult<Option<Bytes>> {
        if let Some(data) = self.lru.lock().get(key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(%key, "Share cache hit");
            return Ok(Some(data));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);

        let data = self.store.get(key)?;
        if let Some(data) = &data {
            self.lru.lock().insert(*key, data.clone());
        }
        Ok(data)
    }

    fn contains(&self, key: &ShareKey) -> StoreResult<bool> {
        if self.lru.lock().contains_key(key) {
            return Ok(true);
        }
        self.store.contains(key)
    }

    fn delete(&self, key: &ShareKey) -> StoreResult<()> {
        self.lru.lock().remove(key);
        self.store.delete(key)
    }

    fn count(&self) -> StoreResult<u64> {
        self.store.count()
    }
}
