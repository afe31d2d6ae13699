//! Committed square fixtures.

use std::{collections::HashMap, sync::Arc};

use alloy_primitives::{B256, Keccak256};
use quadrant_share_api::{
    Coordinate, NAMESPACE_SIZE, NamespaceId, NamespacedRoot, Root, Share, ShareKey, ShareVerifier,
};
use quadrant_share_store::ShareStore;

use crate::MockExchange;

/// Namespace whose last byte is `n`.
pub fn namespace(n: u8) -> NamespaceId {
    let mut bytes = [0u8; NAMESPACE_SIZE];
    bytes[NAMESPACE_SIZE - 1] = n;
    NamespaceId::new(bytes)
}

/// A square of known shares together with its root.
#[derive(Debug, Clone)]
pub struct SquareFixture {
    root: Root,
    /// Row-major.
    shares: Vec<Share>,
}

impl SquareFixture {
    /// Build a `width x width` square, placing shares in `namespace_at(coord)`.
    ///
    /// Each share's body encodes its coordinate, so all shares are distinct.
    pub fn new(width: usize, namespace_at: impl Fn(Coordinate) -> NamespaceId) -> Self {
        let shares: Vec<Share> = (0..width * width)
            .map(|index| {
                let coord = Coordinate::from_index(index, width);
                let mut body = Vec::with_capacity(4);
                body.extend_from_slice(&coord.row.to_be_bytes());
                body.extend_from_slice(&coord.col.to_be_bytes());
                Share::with_namespace(namespace_at(coord), &body).expect("body fits in a share")
            })
            .collect();

        let row_roots = (0..width)
            .map(|row| commit((0..width).map(|col| &shares[row * width + col])))
            .collect();
        let column_roots = (0..width)
            .map(|col| commit((0..width).map(|row| &shares[row * width + col])))
            .collect();

        let root = Root::new(row_roots, column_roots).expect("valid fixture root");
        Self { root, shares }
    }

    /// Square where every share in row `r` is in namespace `r`.
    pub fn by_row(width: usize) -> Self {
        Self::new(width, |coord| namespace(coord.row as u8))
    }

    /// The square's root.
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Committed share at `coord`.
    pub fn share(&self, coord: Coordinate) -> &Share {
        &self.shares[coord.index(self.root.width())]
    }

    /// All shares as a row-major grid.
    pub fn grid(&self) -> Vec<Vec<Share>> {
        self.shares
            .chunks(self.root.width())
            .map(<[Share]>::to_vec)
            .collect()
    }

    /// Write every share into `store`.
    pub fn populate(&self, store: &impl ShareStore) {
        for coord in self.root.coordinates() {
            store
                .put(&self.root.share_key(coord), self.share(coord).as_bytes())
                .expect("populate store");
        }
    }

    /// An exchange that can serve every share of this square.
    pub fn exchange(&self) -> MockExchange {
        let exchange = MockExchange::new();
        exchange.insert_square(self);
        exchange
    }

    /// A verifier accepting exactly this square's shares.
    pub fn verifier(&self) -> FixtureVerifier {
        let committed = self
            .root
            .coordinates()
            .map(|coord| (self.root.share_key(coord), self.share(coord).clone()))
            .collect();
        FixtureVerifier {
            committed: Arc::new(committed),
        }
    }
}

/// Commitment over a sequence of shares: namespace range plus a keccak digest.
fn commit<'a>(shares: impl Iterator<Item = &'a Share>) -> NamespacedRoot {
    let mut hasher = Keccak256::new();
    let mut min = NamespaceId::MAX;
    let mut max = NamespaceId::MIN;
    for share in shares {
        let ns = share.namespace();
        min = min.min(ns);
        max = max.max(ns);
        hasher.update(share.as_bytes());
    }
    let digest: B256 = hasher.finalize();
    NamespacedRoot::new(min, max, digest).expect("min <= max")
}

/// Verifier that accepts a share only if it equals the committed one.
#[derive(Debug, Clone)]
pub struct FixtureVerifier {
    committed: Arc<HashMap<ShareKey, Share>>,
}

impl ShareVerifier for FixtureVerifier {
    fn verify(&self, root: &Root, coordinate: Coordinate, share: &Share) -> bool {
        self.committed
            .get(&root.share_key(coordinate))
            .is_some_and(|committed| committed == share)
    }
}
