//! Scriptable in-memory exchange.

use std::{
    collections::{HashMap, HashSet},
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use quadrant_share_api::{
    Coordinate, ExchangeError, NamespaceId, Root, SHARE_SIZE, Share, ShareExchange, ShareKey,
};
use tokio::time::Instant;

use crate::SquareFixture;

#[derive(Debug, Clone, Copy)]
enum Latency {
    None,
    Fixed(Duration),
    /// Varies per coordinate so completion order differs from request order.
    Scrambled(Duration),
}

/// In-memory [`ShareExchange`] with call accounting and fault injection.
#[derive(Debug)]
pub struct MockExchange {
    shares: RwLock<HashMap<ShareKey, Share>>,
    withheld: RwLock<HashSet<Coordinate>>,
    corrupted: RwLock<HashSet<Coordinate>>,
    latency: Mutex<Latency>,
    calls: AtomicUsize,
    calls_by_row: Mutex<HashMap<u16, usize>>,
}

impl Default for MockExchange {
    fn default() -> Self {
        Self {
            shares: RwLock::default(),
            withheld: RwLock::default(),
            corrupted: RwLock::default(),
            latency: Mutex::new(Latency::None),
            calls: AtomicUsize::new(0),
            calls_by_row: Mutex::default(),
        }
    }
}

impl MockExchange {
    /// An exchange that knows no shares.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every share of `fixture` available.
    pub fn insert_square(&self, fixture: &SquareFixture) {
        let root = fixture.root();
        let mut shares = self.shares.write();
        for coord in root.coordinates() {
            shares.insert(root.share_key(coord), fixture.share(coord).clone());
        }
    }

    /// Refuse to serve `coord`.
    pub fn withhold(&self, coord: Coordinate) {
        self.withheld.write().insert(coord);
    }

    /// Serve bytes for `coord` that will not verify.
    pub fn corrupt(&self, coord: Coordinate) {
        self.corrupted.write().insert(coord);
    }

    /// Delay every fetch by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Latency::Fixed(latency);
    }

    /// Delay fetches by a coordinate-dependent multiple of `unit`.
    pub fn scramble_latency(&self, unit: Duration) {
        *self.latency.lock() = Latency::Scrambled(unit);
    }

    /// Total fetches received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Fetches received for shares in `row`.
    pub fn calls_for_row(&self, row: u16) -> usize {
        self.calls_by_row.lock().get(&row).copied().unwrap_or(0)
    }

    fn delay_for(&self, coordinate: Coordinate) -> Option<Duration> {
        match *self.latency.lock() {
            Latency::None => None,
            Latency::Fixed(latency) => Some(latency),
            Latency::Scrambled(unit) => {
                let factor = (coordinate.row as u32 * 7 + coordinate.col as u32 * 13) % 5;
                Some(unit * (5 - factor))
            }
        }
    }
}

#[async_trait]
impl ShareExchange for MockExchange {
    async fn fetch(
        &self,
        root: &Root,
        coordinate: Coordinate,
        _deadline: Option<Instant>,
    ) -> Result<Share, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.calls_by_row.lock().entry(coordinate.row).or_default() += 1;

        if let Some(delay) = self.delay_for(coordinate) {
            tokio::time::sleep(delay).await;
        }

        if self.withheld.read().contains(&coordinate) {
            return Err(ExchangeError::NotFound);
        }
        if self.corrupted.read().contains(&coordinate) {
            let garbage = Share::with_namespace(NamespaceId::MAX, &[0xde; SHARE_SIZE / 2])
                .map_err(|err| ExchangeError::Network(err.to_string()))?;
            return Ok(garbage);
        }

        self.shares
            .read()
            .get(&root.share_key(coordinate))
            .cloned()
            .ok_or(ExchangeError::NotFound)
    }
}
