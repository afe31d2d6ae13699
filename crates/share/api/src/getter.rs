//! Share retrieval capability.

use async_trait::async_trait;
use quadrant_share_primitives::{NamespaceId, Root, Share};

use crate::{ShareContext, ShareResult};

/// Resolves shares for a square.
///
/// All methods follow the same policy per coordinate: serve from local
/// storage if present, otherwise fetch from the network, verify, persist and
/// return.
#[async_trait]
pub trait ShareGetter: Send + Sync + 'static {
    /// Get the share at `(row, col)`.
    async fn get_share(
        &self,
        ctx: &ShareContext,
        root: &Root,
        row: usize,
        col: usize,
    ) -> ShareResult<Share>;

    /// Get every share of the square as a row-major grid.
    ///
    /// Fails as a whole if any coordinate cannot be resolved; a partial grid
    /// is never returned.
    async fn get_shares(&self, ctx: &ShareContext, root: &Root) -> ShareResult<Vec<Vec<Share>>>;

    /// Get all shares in `namespace`, ordered by row then column.
    ///
    /// Rows whose commitment range excludes `namespace` are skipped without
    /// any fetch.
    async fn get_shares_by_namespace(
        &self,
        ctx: &ShareContext,
        root: &Root,
        namespace: NamespaceId,
    ) -> ShareResult<Vec<Share>>;
}

#[async_trait]
impl<T: ShareGetter + ?Sized> ShareGetter for std::sync::Arc<T> {
    async fn get_share(
        &self,
        ctx: &ShareContext,
        root: &Root,
        row: usize,
        col: usize,
    ) -> ShareResult<Share> {
        (**self).get_share(ctx, root, row, col).await
    }

    async fn get_shares(&self, ctx: &ShareContext, root: &Root) -> ShareResult<Vec<Vec<Share>>> {
        (**self).get_shares(ctx, root).await
    }

    async fn get_shares_by_namespace(
        &self,
        ctx: &ShareContext,
        root: &Root,
        namespace: NamespaceId,
    ) -> ShareResult<Vec<Share>> {
        (**self).get_shares_by_namespace(ctx, root, namespace).await
    }
}
