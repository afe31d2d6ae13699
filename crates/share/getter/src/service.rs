//! Share service implementation.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use parking_lot::RwLock;
use quadrant_share_api::{
    Coordinate, ExchangeError, GetterConfig, Lifecycle, NamespaceId, Root, Share, ShareContext,
    ShareError, ShareExchange, ShareGetter, ShareKey, ShareResult, ShareVerifier,
};
use quadrant_share_store::{ShareStore, StoreError, StoreResult};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::metrics::GetterMetrics;

/// Why a single coordinate could not be fetched from the network.
///
/// Never leaves this crate: every variant surfaces to callers as
/// [`ShareError::NotFound`].
#[derive(Debug)]
enum FetchError {
    Exchange(ExchangeError),
    VerificationFailed,
}

/// Share service over a local store, a network exchange and a verifier.
///
/// The service must be opened before use; closing it aborts every request in
/// flight with [`ShareError::Cancelled`] and rejects new ones with
/// [`ShareError::Closed`].
pub struct ShareService<S, E, V> {
    /// Shared with blocking-pool tasks.
    store: Arc<S>,
    exchange: E,
    verifier: V,
    /// Bounds concurrent exchange fetches across all callers.
    fetch_permits: Arc<Semaphore>,
    /// Per-call fan-out width.
    concurrency: usize,
    /// `Some` while open; cancelled on close.
    shutdown: RwLock<Option<CancellationToken>>,
    metrics: GetterMetrics,
}

impl<S, E, V> ShareService<S, E, V>
where
    S: ShareStore + 'static,
    E: ShareExchange,
    V: ShareVerifier + 'static,
{
    /// Create a closed service.
    pub fn new(store: S, exchange: E, verifier: V, config: &impl GetterConfig) -> Self {
        let concurrency = config.max_concurrent_fetches().max(1);
        Self {
            store: Arc::new(store),
            exchange,
            verifier,
            fetch_permits: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            shutdown: RwLock::new(None),
            metrics: GetterMetrics::default(),
        }
    }

    /// The local store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the share at `(row, col)` is present locally.
    ///
    /// Never touches the network. Store failures are returned as
    /// [`ShareError::Storage`].
    pub async fn has_share(&self, root: &Root, row: usize, col: usize) -> ShareResult<bool> {
        let key = root.share_key(Self::coordinate(root, row, col)?);
        self.on_store(move |store| store.contains(&key))
            .await
            .map_err(|err| ShareError::Storage(err.to_string()))
    }

    /// Run a store call on the blocking pool.
    ///
    /// The call itself runs to completion, but dropping the returned future
    /// stops waiting for it, so the request's context still bounds the caller.
    async fn on_store<T, F>(&self, op: F) -> StoreResult<T>
    where
        F: FnOnce(&S) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|err| StoreError::Io(std::io::Error::other(err)))?
    }

    fn coordinate(root: &Root, row: usize, col: usize) -> ShareResult<Coordinate> {
        let width = root.width();
        if row >= width || col >= width {
            return Err(ShareError::InvalidCoordinate { row, col, width });
        }
        Ok(Coordinate::new(row as u16, col as u16))
    }

    fn shutdown_token(&self) -> ShareResult<CancellationToken> {
        self.shutdown.read().clone().ok_or(ShareError::Closed)
    }

    /// Run `fut` bounded by the caller's context and the service lifetime.
    async fn scoped<T, F>(&self, ctx: &ShareContext, fut: F) -> ShareResult<T>
    where
        F: Future<Output = ShareResult<T>>,
    {
        let shutdown = self.shutdown_token()?;
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => Err(ShareError::Cancelled),
            result = ctx.run(fut) => result,
        }
    }

    /// Resolve one coordinate: store, then exchange, then persist.
    async fn resolve(
        &self,
        ctx: &ShareContext,
        root: &Root,
        coordinate: Coordinate,
    ) -> ShareResult<Share> {
        let key = root.share_key(coordinate);

        if let Some(share) = self.load(key, root, coordinate).await {
            self.metrics.store_hits_total.increment(1);
            trace!(%root, %coordinate, "Share served from store");
            return Ok(share);
        }
        self.metrics.store_misses_total.increment(1);

        let share = self
            .fetch(ctx, root, coordinate)
            .await
            .map_err(|err| {
                match err {
                    FetchError::Exchange(err) => {
                        debug!(%root, %coordinate, %err, "Exchange could not provide share")
                    }
                    FetchError::VerificationFailed => {
                        debug!(%root, %coordinate, "Treating unverifiable share as absent")
                    }
                }
                ShareError::NotFound {
                    root: root.hash(),
                    coordinate,
                }
            })?;

        self.persist(key, &share).await;
        Ok(share)
    }

    async fn load(&self, key: ShareKey, root: &Root, coordinate: Coordinate) -> Option<Share> {
        match self.on_store(move |store| store.get(&key)).await {
            Ok(Some(bytes)) => match Share::new(bytes) {
                Ok(share) => Some(share),
                Err(err) => {
                    warn!(%root, %coordinate, %err, "Discarding malformed stored share");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!(%root, %coordinate, %err, "Store lookup failed, falling back to network");
                None
            }
        }
    }

    async fn fetch(
        &self,
        ctx: &ShareContext,
        root: &Root,
        coordinate: Coordinate,
    ) -> Result<Share, FetchError> {
        // The semaphore is never closed, so acquire cannot fail.
        let _permit = self
            .fetch_permits
            .acquire()
            .await
            .map_err(|_| FetchError::Exchange(ExchangeError::NotFound))?;

        self.metrics.exchange_fetches_total.increment(1);
        let share = self
            .exchange
            .fetch(root, coordinate, ctx.deadline())
            .await
            .map_err(|err| {
                self.metrics.exchange_failures_total.increment(1);
                FetchError::Exchange(err)
            })?;

        if !self.verifier.verify(root, coordinate, &share) {
            self.metrics.verification_failures_total.increment(1);
            warn!(%root, %coordinate, "Fetched share failed verification");
            return Err(FetchError::VerificationFailed);
        }

        Ok(share)
    }

    /// Best-effort write; a failure is logged and the share still returned.
    async fn persist(&self, key: ShareKey, share: &Share) {
        let data = share.clone();
        let written = self
            .on_store(move |store| store.put(&key, data.as_bytes()))
            .await;
        if let Err(err) = written {
            self.metrics.store_write_failures_total.increment(1);
            warn!(%key, %err, "Failed to persist fetched share");
        }
    }

    async fn square(&self, ctx: &ShareContext, root: &Root) -> ShareResult<Vec<Vec<Share>>> {
        let width = root.width();
        let mut slots: Vec<Option<Share>> = vec![None; root.share_count()];

        let mut results = stream::iter(root.coordinates())
            .map(|coordinate| async move {
                self.resolve(ctx, root, coordinate)
                    .await
                    .map(|share| (coordinate, share))
            })
            .buffer_unordered(self.concurrency);

        while let Some(result) = results.next().await {
            let (coordinate, share) = result.map_err(|err| err.into_unavailable(root.hash()))?;
            if let Some(slot) = slots.get_mut(coordinate.index(width)) {
                *slot = Some(share);
            }
        }

        let mut shares = slots.into_iter();
        let mut grid = Vec::with_capacity(width);
        for _ in 0..width {
            let row = shares
                .by_ref()
                .take(width)
                .collect::<Option<Vec<_>>>()
                .ok_or(ShareError::Unavailable { root: root.hash() })?;
            grid.push(row);
        }
        Ok(grid)
    }

    async fn namespace_row(
        &self,
        ctx: &ShareContext,
        root: &Root,
        row: u16,
        namespace: NamespaceId,
    ) -> ShareResult<Vec<Share>> {
        let width = root.width();
        let shares: Vec<Share> = stream::iter(0..width)
            .map(|col| self.resolve(ctx, root, Coordinate::new(row, col as u16)))
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(shares
            .into_iter()
            .filter(|share| share.namespace() == namespace)
            .collect())
    }

    async fn namespace(
        &self,
        ctx: &ShareContext,
        root: &Root,
        namespace: NamespaceId,
    ) -> ShareResult<Vec<Share>> {
        let rows: Vec<u16> = root
            .row_roots()
            .iter()
            .enumerate()
            .filter(|(_, row_root)| row_root.contains(&namespace))
            .map(|(row, _)| row as u16)
            .collect();

        debug!(
            %root,
            %namespace,
            rows = rows.len(),
            width = root.width(),
            "Collecting namespace shares"
        );

        // `buffered` yields in input order, keeping rows sorted.
        let per_row: Vec<Vec<Share>> = stream::iter(rows)
            .map(|row| self.namespace_row(ctx, root, row, namespace))
            .buffered(self.concurrency)
            .try_collect()
            .await
            .map_err(|err| err.into_unavailable(root.hash()))?;

        Ok(per_row.into_iter().flatten().collect())
    }
}

#[async_trait]
impl<S, E, V> ShareGetter for ShareService<S, E, V>
where
    S: ShareStore + 'static,
    E: ShareExchange,
    V: ShareVerifier + 'static,
{
    async fn get_share(
        &self,
        ctx: &ShareContext,
        root: &Root,
        row: usize,
        col: usize,
    ) -> ShareResult<Share> {
        let coordinate = Self::coordinate(root, row, col)?;
        self.scoped(ctx, self.resolve(ctx, root, coordinate)).await
    }

    async fn get_shares(&self, ctx: &ShareContext, root: &Root) -> ShareResult<Vec<Vec<Share>>> {
        self.scoped(ctx, self.square(ctx, root)).await
    }

    async fn get_shares_by_namespace(
        &self,
        ctx: &ShareContext,
        root: &Root,
        namespace: NamespaceId,
    ) -> ShareResult<Vec<Share>> {
        self.scoped(ctx, self.namespace(ctx, root, namespace)).await
    }
}

#[async_trait]
impl<S, E, V> Lifecycle for ShareService<S, E, V>
where
    S: ShareStore + 'static,
    E: ShareExchange,
    V: ShareVerifier + 'static,
{
    async fn open(&self) -> ShareResult<()> {
        let mut shutdown = self.shutdown.write();
        if shutdown.is_none() {
            *shutdown = Some(CancellationToken::new());
            debug!("Share service opened");
        }
        Ok(())
    }

    async fn close(&self) -> ShareResult<()> {
        if let Some(token) = self.shutdown.write().take() {
            token.cancel();
            debug!("Share service closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use core::time::Duration;
    use quadrant_share_api::DefaultShareConfig;
    use quadrant_share_store::MemoryShareStore;
    use quadrant_share_test_utils::{
        BlockingStore, CountingStore, FixtureVerifier, MockExchange, SquareFixture, namespace,
    };

    type TestService =
        ShareService<Arc<CountingStore<MemoryShareStore>>, Arc<MockExchange>, FixtureVerifier>;

    struct Harness {
        fixture: SquareFixture,
        store: Arc<CountingStore<MemoryShareStore>>,
        exchange: Arc<MockExchange>,
        service: TestService,
    }

    async fn harness(fixture: SquareFixture) -> Harness {
        let store = Arc::new(CountingStore::new(MemoryShareStore::new()));
        let exchange = Arc::new(fixture.exchange());
        let service = ShareService::new(
            Arc::clone(&store),
            Arc::clone(&exchange),
            fixture.verifier(),
            &DefaultShareConfig,
        );
        service.open().await.unwrap();
        Harness {
            fixture,
            store,
            exchange,
            service,
        }
    }

    #[tokio::test]
    async fn test_store_hit_skips_exchange() {
        let h = harness(SquareFixture::by_row(4)).await;
        h.fixture.populate(&*h.store);
        let root = h.fixture.root();

        for coordinate in root.coordinates() {
            let share = h
                .service
                .get_share(
                    &ShareContext::new(),
                    root,
                    coordinate.row as usize,
                    coordinate.col as usize,
                )
                .await
                .unwrap();
            assert_eq!(&share, h.fixture.share(coordinate));
        }
        assert_eq!(h.exchange.calls(), 0);
        assert_eq!(h.store.gets(), 16);
    }

    #[tokio::test]
    async fn test_miss_fetches_then_persists() {
        let h = harness(SquareFixture::by_row(4)).await;
        let root = h.fixture.root();
        let ctx = ShareContext::new();

        let first = h.service.get_share(&ctx, root, 1, 2).await.unwrap();
        assert_eq!(h.exchange.calls(), 1);
        assert!(h.service.has_share(root, 1, 2).await.unwrap());
        assert_eq!(h.store.puts(), 1);

        let second = h.service.get_share(&ctx, root, 1, 2).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(h.exchange.calls(), 1);
    }

    #[tokio::test]
    async fn test_out_of_bounds() {
        let h = harness(SquareFixture::by_row(2)).await;
        let result = h
            .service
            .get_share(&ShareContext::new(), h.fixture.root(), 2, 0)
            .await;
        assert_matches!(
            result,
            Err(ShareError::InvalidCoordinate { row: 2, col: 0, width: 2 })
        );
    }

    #[tokio::test]
    async fn test_withheld_share_is_not_found() {
        let h = harness(SquareFixture::by_row(4)).await;
        h.exchange.withhold(Coordinate::new(0, 3));

        let result = h
            .service
            .get_share(&ShareContext::new(), h.fixture.root(), 0, 3)
            .await;
        assert_matches!(result, Err(ShareError::NotFound { coordinate, .. }) if coordinate == Coordinate::new(0, 3));
    }

    #[tokio::test]
    async fn test_corrupt_share_is_not_found_and_not_stored() {
        let h = harness(SquareFixture::by_row(4)).await;
        h.exchange.corrupt(Coordinate::new(2, 2));
        let root = h.fixture.root();

        let result = h.service.get_share(&ShareContext::new(), root, 2, 2).await;
        assert_matches!(result, Err(ShareError::NotFound { .. }));
        assert!(!h.service.has_share(root, 2, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_write_failure_still_returns_share() {
        let h = harness(SquareFixture::by_row(2)).await;
        h.store.fail_writes(true);

        let share = h
            .service
            .get_share(&ShareContext::new(), h.fixture.root(), 1, 1)
            .await
            .unwrap();
        assert_eq!(&share, h.fixture.share(Coordinate::new(1, 1)));
        assert!(!h.service.has_share(h.fixture.root(), 1, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_read_failure_falls_back_to_network() {
        let h = harness(SquareFixture::by_row(2)).await;
        h.fixture.populate(&*h.store);
        h.store.fail_reads(true);
        let root = h.fixture.root();

        let share = h
            .service
            .get_share(&ShareContext::new(), root, 0, 1)
            .await
            .unwrap();
        assert_eq!(&share, h.fixture.share(Coordinate::new(0, 1)));
        assert_eq!(h.exchange.calls(), 1);

        // Presence checks have no fallback and surface the failure.
        assert_matches!(
            h.service.has_share(root, 0, 1).await,
            Err(ShareError::Storage(_))
        );
    }

    fn blocking_service(
        fixture: &SquareFixture,
    ) -> (Arc<BlockingStore<MemoryShareStore>>, impl ShareGetter + Lifecycle) {
        let store = Arc::new(BlockingStore::new(MemoryShareStore::new()));
        fixture.populate(store.inner());
        let service = ShareService::new(
            Arc::clone(&store),
            fixture.exchange(),
            fixture.verifier(),
            &DefaultShareConfig,
        );
        (store, service)
    }

    #[tokio::test]
    async fn test_blocked_store_read_honors_deadline() {
        let fixture = SquareFixture::by_row(2);
        let (store, service) = blocking_service(&fixture);
        service.open().await.unwrap();

        let ctx = ShareContext::new().with_timeout(Duration::from_millis(100));
        let started = std::time::Instant::now();
        let result = service.get_share(&ctx, fixture.root(), 0, 0).await;

        assert_matches!(result, Err(ShareError::Timeout));
        assert!(started.elapsed() < Duration::from_secs(2));
        store.release();
    }

    #[tokio::test]
    async fn test_blocked_store_read_honors_cancellation() {
        let fixture = SquareFixture::by_row(2);
        let (store, service) = blocking_service(&fixture);
        service.open().await.unwrap();

        let ctx = ShareContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let result = service.get_shares(&ctx, fixture.root()).await;

        assert_matches!(result, Err(ShareError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(2));
        store.release();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_get_shares_rebuilds_grid_in_order() {
        let fixture = SquareFixture::by_row(8);
        let h = harness(fixture).await;
        h.exchange.scramble_latency(Duration::from_millis(1));

        let grid = h
            .service
            .get_shares(&ShareContext::new(), h.fixture.root())
            .await
            .unwrap();
        assert_eq!(grid, h.fixture.grid());
        assert_eq!(h.exchange.calls(), 64);
    }

    #[tokio::test]
    async fn test_get_shares_fails_whole_call() {
        let h = harness(SquareFixture::by_row(4)).await;
        h.exchange.withhold(Coordinate::new(3, 1));

        let result = h
            .service
            .get_shares(&ShareContext::new(), h.fixture.root())
            .await;
        assert_matches!(result, Err(ShareError::Unavailable { root }) if root == h.fixture.root().hash());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_shares_cancelled_mid_fetch() {
        let h = harness(SquareFixture::by_row(4)).await;
        h.exchange.set_latency(Duration::from_secs(30));

        let ctx = ShareContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let started = tokio::time::Instant::now();
        let result = h.service.get_shares(&ctx, h.fixture.root()).await;
        assert_matches!(result, Err(ShareError::Cancelled));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_is_timeout() {
        let h = harness(SquareFixture::by_row(2)).await;
        h.exchange.set_latency(Duration::from_secs(30));

        let ctx = ShareContext::new().with_timeout(Duration::from_secs(1));
        let result = h.service.get_share(&ctx, h.fixture.root(), 0, 0).await;
        assert_matches!(result, Err(ShareError::Timeout));
    }

    #[tokio::test]
    async fn test_namespace_skips_excluded_rows() {
        // Row r holds namespace r; only row 2 can contain namespace 2.
        let h = harness(SquareFixture::by_row(4)).await;
        let root = h.fixture.root();

        let shares = h
            .service
            .get_shares_by_namespace(&ShareContext::new(), root, namespace(2))
            .await
            .unwrap();

        assert_eq!(shares, h.fixture.grid()[2]);
        assert_eq!(h.exchange.calls_for_row(2), 4);
        for row in [0u16, 1, 3] {
            assert_eq!(h.exchange.calls_for_row(row), 0);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_namespace_preserves_row_and_column_order() {
        // Namespace 1 in even columns of every row, namespace 9 elsewhere.
        let fixture = SquareFixture::new(8, |c| namespace(if c.col % 2 == 0 { 1 } else { 9 }));
        let h = harness(fixture).await;
        h.exchange.scramble_latency(Duration::from_millis(1));
        let root = h.fixture.root();

        let shares = h
            .service
            .get_shares_by_namespace(&ShareContext::new(), root, namespace(1))
            .await
            .unwrap();

        let expected: Vec<Share> = root
            .coordinates()
            .filter(|c| c.col % 2 == 0)
            .map(|c| h.fixture.share(c).clone())
            .collect();
        assert_eq!(shares, expected);
    }

    #[tokio::test]
    async fn test_namespace_absent_everywhere() {
        let h = harness(SquareFixture::by_row(4)).await;
        let shares = h
            .service
            .get_shares_by_namespace(&ShareContext::new(), h.fixture.root(), namespace(200))
            .await
            .unwrap();
        assert!(shares.is_empty());
        assert_eq!(h.exchange.calls(), 0);
    }

    #[tokio::test]
    async fn test_closed_service_rejects_requests() {
        let h = harness(SquareFixture::by_row(2)).await;
        h.service.close().await.unwrap();

        let result = h
            .service
            .get_share(&ShareContext::new(), h.fixture.root(), 0, 0)
            .await;
        assert_matches!(result, Err(ShareError::Closed));

        h.service.open().await.unwrap();
        assert!(
            h.service
                .get_share(&ShareContext::new(), h.fixture.root(), 0, 0)
                .await
                .is_ok()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_aborts_in_flight() {
        let h = Arc::new(harness(SquareFixture::by_row(2)).await);
        h.exchange.set_latency(Duration::from_secs(30));

        let request = {
            let h = Arc::clone(&h);
            tokio::spawn(async move {
                h.service
                    .get_share(&ShareContext::new(), h.fixture.root(), 0, 0)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.service.close().await.unwrap();

        assert_matches!(request.await.unwrap(), Err(ShareError::Cancelled));
    }
}
