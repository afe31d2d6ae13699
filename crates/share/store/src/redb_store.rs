//! Persistent share store on redb.
//!
//! All shares live in one table keyed by the 32-byte [`ShareKey`]. Each call
//! runs in its own transaction, so a write is durable once `put` returns.

use std::path::Path;

use bytes::Bytes;
use quadrant_share_primitives::ShareKey;
use redb::{Database, ReadOnlyTable, ReadableTable, ReadableTableMetadata, Table, TableDefinition};
use tracing::debug;

use crate::{ShareStore, StoreResult};

const SHARES_TABLE: TableDefinition<&[u8; 32], &[u8]> = TableDefinition::new("shares");

type SharesTable<'txn> = Table<'txn, &'static [u8; 32], &'static [u8]>;
type SharesReadTable = ReadOnlyTable<&'static [u8; 32], &'static [u8]>;

/// Share store backed by a redb database file.
pub struct RedbShareStore {
    db: Database,
}

impl RedbShareStore {
    /// Open the database at `path`, creating it and its directory if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let store = Self {
            db: Database::create(path).map_err(redb::Error::from)?,
        };
        // Readers expect the table to exist.
        store.write(|_| Ok(()))?;

        debug!(path = %path.display(), "Opened share database");
        Ok(store)
    }

    fn read<T>(
        &self,
        op: impl FnOnce(&SharesReadTable) -> Result<T, redb::Error>,
    ) -> StoreResult<T> {
        let txn = self.db.begin_read().map_err(redb::Error::from)?;
        let table = txn.open_table(SHARES_TABLE).map_err(redb::Error::from)?;
        Ok(op(&table)?)
    }

    fn write<T>(
        &self,
        op: impl FnOnce(&mut SharesTable<'_>) -> Result<T, redb::Error>,
    ) -> StoreResult<T> {
        let txn = self.db.begin_write().map_err(redb::Error::from)?;
        let value = {
            let mut table = txn.open_table(SHARES_TABLE).map_err(redb::Error::from)?;
            op(&mut table)?
        };
        txn.commit().map_err(redb::Error::from)?;
        Ok(value)
    }
}

impl ShareStore for RedbShareStore {
    fn put(&self, key: &ShareKey, data: &[u8]) -> StoreResult<()> {
        self.write(|table| {
            if table.get(key.as_bytes())?.is_none() {
                table.insert(key.as_bytes(), data)?;
            }
            Ok(())
        })
    }

    fn get(&self, key: &ShareKey) -> StoreResult<Option<Bytes>> {
        self.read(|table| {
            Ok(table
                .get(key.as_bytes())?
                .map(|value| Bytes::copy_from_slice(value.value())))
        })
    }

    fn contains(&self, key: &ShareKey) -> StoreResult<bool> {
        self.read(|table| Ok(table.get(key.as_bytes())?.is_some()))
    }

    fn delete(&self, key: &ShareKey) -> StoreResult<()> {
        self.write(|table| {
            table.remove(key.as_bytes())?;
            Ok(())
        })
    }

    fn count(&self) -> StoreResult<u64> {
        self.read(|table| Ok(table.len()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadrant_share_primitives::B256;
    use tempfile::tempdir;

    fn test_key(n: u8) -> ShareKey {
        ShareKey::new(B256::repeat_byte(n))
    }

    #[test]
    fn test_put_get() {
        let dir = tempdir().unwrap();
        let store = RedbShareStore::open(dir.path().join("shares.redb")).unwrap();

        let key = test_key(1);
        store.put(&key, b"hello world").unwrap();

        let retrieved = store.get(&key).unwrap();
        assert_eq!(retrieved.as_deref(), Some(&b"hello world"[..]));
        assert!(store.contains(&key).unwrap());
        assert!(!store.contains(&test_key(9)).unwrap());
    }

    #[test]
    fn test_delete_and_count() {
        let dir = tempdir().unwrap();
        let store = RedbShareStore::open(dir.path().join("shares.redb")).unwrap();

        for i in 0..5 {
            store.put(&test_key(i), b"data").unwrap();
        }
        assert_eq!(store.count().unwrap(), 5);

        store.delete(&test_key(3)).unwrap();
        assert_eq!(store.count().unwrap(), 4);
        assert!(store.get(&test_key(3)).unwrap().is_none());
    }

    #[test]
    fn test_idempotent_put() {
        let dir = tempdir().unwrap();
        let store = RedbShareStore::open(dir.path().join("shares.redb")).unwrap();

        let key = test_key(4);
        store.put(&key, b"first").unwrap();
        store.put(&key, b"second").unwrap();

        // Should still have first data (no overwrite)
        let retrieved = store.get(&key).unwrap();
        assert_eq!(retrieved.as_deref(), Some(&b"first"[..]));
    }

    #[test]
    fn test_reopen_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("shares.redb");
        {
            let store = RedbShareStore::open(&path).unwrap();
            store.put(&test_key(7), b"kept").unwrap();
        }
        let store = RedbShareStore::open(&path).unwrap();
        assert_eq!(store.get(&test_key(7)).unwrap().as_deref(), Some(&b"kept"[..]));
    }
}
