//! Local share storage.
//!
//! Shares are persisted under their [`ShareKey`], which is derived from the
//! square's root and the share's coordinate. Backends implement
//! [`ShareStore`]: [`MemoryShareStore`] for nodes without a data directory,
//! [`RedbShareStore`] on disk, optionally behind a [`CachedShareStore`].

mod cached;
mod error;
mod memory;
mod redb_store;
mod traits;

pub use cached::{CacheStats, CachedShareStore};
pub use error::{StoreError, StoreResult};
pub use memory::MemoryShareStore;
pub use redb_store::RedbShareStore;
pub use traits::ShareStore;

pub use quadrant_share_primitives::ShareKey;
