//! Share storage backend trait.

use bytes::Bytes;
use quadrant_share_primitives::ShareKey;

use crate::StoreResult;

/// Key-value persistence for share bytes.
///
/// Bytes are opaque here; callers validate them on read. A key always maps
/// to the same bytes, so `put` is idempotent and concurrent writers need no
/// coordination.
///
/// Calls may block on disk I/O. Async callers run them on the blocking pool
/// rather than on a runtime worker.
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait ShareStore: Send + Sync {
    /// Persist `data` under `key`. Existing entries are left untouched.
    fn put(&self, key: &ShareKey, data: &[u8]) -> StoreResult<()>;

    /// Bytes stored under `key`, if any.
    fn get(&self, key: &ShareKey) -> StoreResult<Option<Bytes>>;

    /// Whether `key` is present.
    fn contains(&self, key: &ShareKey) -> StoreResult<bool>;

    /// Remove `key`. Removing an absent key succeeds.
    fn delete(&self, key: &ShareKey) -> StoreResult<()>;

    /// Number of stored shares.
    fn count(&self) -> StoreResult<u64>;
}
