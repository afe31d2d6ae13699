//! Module assembly from configuration.

use std::sync::Arc;

use eyre::Result;
use quadrant_share_api::{ShareExchange, ShareVerifier};
use quadrant_share_availability::{FullAvailability, LightAvailability};
use quadrant_share_getter::ShareService;
use quadrant_share_store::{CachedShareStore, MemoryShareStore, RedbShareStore, ShareStore};
use tracing::info;

use crate::{ShareArgs, ShareConfig, ShareModule};

/// Local store chosen by [`ShareArgs::store_path`].
pub type ModuleStore = Box<dyn ShareStore>;

/// Share service shared by the module and its availability checker.
pub type ModuleService<E, V> = Arc<ShareService<ModuleStore, E, V>>;

/// Module for nodes that sample.
pub type LightShareModule<E, V> =
    ShareModule<LightAvailability<ModuleService<E, V>>, ModuleService<E, V>>;

/// Module for nodes that retrieve every square in full.
pub type FullShareModule<E, V> =
    ShareModule<FullAvailability<ModuleService<E, V>>, ModuleService<E, V>>;

/// Open the configured local store.
///
/// A redb database behind an LRU read cache when a path is set, memory
/// otherwise.
pub fn open_store(args: &ShareArgs) -> Result<ModuleStore> {
    match &args.store_path {
        Some(path) => {
            let capacity = usize::try_from(args.cache_shares).unwrap_or(usize::MAX);
            info!(path = %path.display(), cache_shares = capacity, "Opening share database");
            let database = RedbShareStore::open(path)?;
            Ok(Box::new(CachedShareStore::new(database, capacity)))
        }
        None => {
            info!("Using in-memory share store");
            Ok(Box::new(MemoryShareStore::new()))
        }
    }
}

fn service<E, V>(args: &ShareArgs, exchange: E, verifier: V) -> Result<ModuleService<E, V>>
where
    E: ShareExchange,
    V: ShareVerifier + 'static,
{
    let store = open_store(args)?;
    Ok(Arc::new(ShareService::new(store, exchange, verifier, args)))
}

/// Build a sampling module. The module is returned closed.
pub fn build_light_module<E, V>(
    config: &ShareConfig,
    exchange: E,
    verifier: V,
) -> Result<LightShareModule<E, V>>
where
    E: ShareExchange,
    V: ShareVerifier + 'static,
{
    let service = service(&config.share, exchange, verifier)?;
    let availability = LightAvailability::new(Arc::clone(&service), &config.availability);
    Ok(ShareModule::new(availability, service))
}

/// Build a full-retrieval module. The module is returned closed.
pub fn build_full_module<E, V>(
    config: &ShareConfig,
    exchange: E,
    verifier: V,
) -> Result<FullShareModule<E, V>>
where
    E: ShareExchange,
    V: ShareVerifier + 'static,
{
    let service = service(&config.share, exchange, verifier)?;
    let availability = FullAvailability::new(Arc::clone(&service));
    Ok(ShareModule::new(availability, service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadrant_share_test_utils::SquareFixture;

    #[test]
    fn test_database_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let args = ShareArgs {
            cache_shares: 2,
            store_path: Some(dir.path().join("db").join("shares.redb")),
            ..Default::default()
        };
        let fixture = SquareFixture::by_row(2);

        let store = open_store(&args).unwrap();
        fixture.populate(&store);
        // More shares than the cache holds are all readable.
        for coord in fixture.root().coordinates() {
            let key = fixture.root().share_key(coord);
            assert!(store.get(&key).unwrap().is_some());
        }
        drop(store);

        let reopened = open_store(&args).unwrap();
        assert_eq!(reopened.count().unwrap(), 4);
    }

    #[test]
    fn test_memory_store_without_path() {
        let args = ShareArgs::default();
        let fixture = SquareFixture::by_row(2);

        let store = open_store(&args).unwrap();
        fixture.populate(&store);
        assert_eq!(store.count().unwrap(), 4);
        // Nothing outlives the store.
        assert_eq!(open_store(&args).unwrap().count().unwrap(), 0);
    }
}
