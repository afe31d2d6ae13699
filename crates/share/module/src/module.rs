//! Capability set exposed outward.

use async_trait::async_trait;
use quadrant_share_api::{
    Availability, Lifecycle, NamespaceId, Root, Share, ShareContext, ShareGetter, ShareResult,
};
use tracing::debug;

/// Everything the share layer offers: retrieval plus availability.
///
/// Implemented for any type that is both a [`ShareGetter`] and an
/// [`Availability`].
pub trait Module: ShareGetter + Availability {}

impl<T: ShareGetter + Availability> Module for T {}

/// Composition of an availability checker and a share getter.
///
/// Holds no state of its own; every call forwards to one of the two
/// delegates and propagates whatever it returns.
#[derive(Debug)]
pub struct ShareModule<A, G> {
    availability: A,
    getter: G,
}

impl<A, G> ShareModule<A, G> {
    /// Compose `availability` and `getter`.
    pub fn new(availability: A, getter: G) -> Self {
        Self {
            availability,
            getter,
        }
    }

    /// The availability delegate.
    pub fn availability(&self) -> &A {
        &self.availability
    }

    /// The getter delegate.
    pub fn getter(&self) -> &G {
        &self.getter
    }
}

#[async_trait]
impl<A, G> Availability for ShareModule<A, G>
where
    A: Availability,
    G: Send + Sync + 'static,
{
    async fn shares_available(&self, ctx: &ShareContext, root: &Root) -> ShareResult<()> {
        self.availability.shares_available(ctx, root).await
    }

    fn probability_of_availability(&self) -> f64 {
        self.availability.probability_of_availability()
    }
}

#[async_trait]
impl<A, G> ShareGetter for ShareModule<A, G>
where
    A: Send + Sync + 'static,
    G: ShareGetter,
{
    async fn get_share(
        &self,
        ctx: &ShareContext,
        root: &Root,
        row: usize,
        col: usize,
    ) -> ShareResult<Share> {
        self.getter.get_share(ctx, root, row, col).await
    }

    async fn get_shares(&self, ctx: &ShareContext, root: &Root) -> ShareResult<Vec<Vec<Share>>> {
        self.getter.get_shares(ctx, root).await
    }

    async fn get_shares_by_namespace(
        &self,
        ctx: &ShareContext,
        root: &Root,
        namespace: NamespaceId,
    ) -> ShareResult<Vec<Share>> {
        self.getter
            .get_shares_by_namespace(ctx, root, namespace)
            .await
    }
}

#[async_trait]
impl<A, G> Lifecycle for ShareModule<A, G>
where
    A: Lifecycle,
    G: Lifecycle,
{
    /// Open the getter, then the availability checker that depends on it.
    async fn open(&self) -> ShareResult<()> {
        self.getter.open().await?;
        self.availability.open().await?;
        debug!("Share module opened");
        Ok(())
    }

    /// Close in reverse order. Both delegates are closed even if the first
    /// fails; the first error is returned.
    async fn close(&self) -> ShareResult<()> {
        let availability = self.availability.close().await;
        let getter = self.getter.close().await;
        debug!("Share module closed");
        availability.and(getter)
    }
}
