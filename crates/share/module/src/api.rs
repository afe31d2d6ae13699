//! Function-field adapter for transport layers.
//!
//! RPC servers want a plain value whose fields can be invoked without naming
//! the concrete module type. [`ShareApi::from_module`] derives one from any
//! [`Module`], so the adapter cannot drift from the capability set.

use core::fmt;
use std::sync::Arc;

use futures::{FutureExt, future::BoxFuture};
use quadrant_share_api::{NamespaceId, Root, Share, ShareContext, ShareResult};

use crate::Module;

/// Boxed future returned by every asynchronous [`ShareApi`] field.
pub type ApiFuture<T> = BoxFuture<'static, ShareResult<T>>;

type SharesAvailableFn = dyn Fn(ShareContext, Root) -> ApiFuture<()> + Send + Sync;
type ProbabilityFn = dyn Fn() -> f64 + Send + Sync;
type GetShareFn = dyn Fn(ShareContext, Root, usize, usize) -> ApiFuture<Share> + Send + Sync;
type GetSharesFn = dyn Fn(ShareContext, Root) -> ApiFuture<Vec<Vec<Share>>> + Send + Sync;
type GetSharesByNamespaceFn =
    dyn Fn(ShareContext, Root, NamespaceId) -> ApiFuture<Vec<Share>> + Send + Sync;

/// One callable field per module operation.
#[derive(Clone)]
pub struct ShareApi {
    /// See [`Availability::shares_available`](quadrant_share_api::Availability::shares_available).
    pub shares_available: Arc<SharesAvailableFn>,
    /// See [`Availability::probability_of_availability`](quadrant_share_api::Availability::probability_of_availability).
    pub probability_of_availability: Arc<ProbabilityFn>,
    /// See [`ShareGetter::get_share`](quadrant_share_api::ShareGetter::get_share).
    pub get_share: Arc<GetShareFn>,
    /// See [`ShareGetter::get_shares`](quadrant_share_api::ShareGetter::get_shares).
    pub get_shares: Arc<GetSharesFn>,
    /// See [`ShareGetter::get_shares_by_namespace`](quadrant_share_api::ShareGetter::get_shares_by_namespace).
    pub get_shares_by_namespace: Arc<GetSharesByNamespaceFn>,
}

impl ShareApi {
    /// Bind every field to `module`.
    pub fn from_module<M: Module>(module: Arc<M>) -> Self {
        Self {
            shares_available: {
                let module = Arc::clone(&module);
                Arc::new(move |ctx: ShareContext, root: Root| {
                    let module = Arc::clone(&module);
                    async move { module.shares_available(&ctx, &root).await }.boxed()
                })
            },
            probability_of_availability: {
                let module = Arc::clone(&module);
                Arc::new(move || module.probability_of_availability())
            },
            get_share: {
                let module = Arc::clone(&module);
                Arc::new(move |ctx: ShareContext, root: Root, row: usize, col: usize| {
                    let module = Arc::clone(&module);
                    async move { module.get_share(&ctx, &root, row, col).await }.boxed()
                })
            },
            get_shares: {
                let module = Arc::clone(&module);
                Arc::new(move |ctx: ShareContext, root: Root| {
                    let module = Arc::clone(&module);
                    async move { module.get_shares(&ctx, &root).await }.boxed()
                })
            },
            get_shares_by_namespace: Arc::new(
                move |ctx: ShareContext, root: Root, namespace: NamespaceId| {
                    let module = Arc::clone(&module);
                    async move {
                        module
                            .get_shares_by_namespace(&ctx, &root, namespace)
                            .await
                    }
                    .boxed()
                },
            ),
        }
    }
}

impl fmt::Debug for ShareApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareApi").finish_non_exhaustive()
    }
}
