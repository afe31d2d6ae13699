//! Explicit start/stop hooks.

use async_trait::async_trait;

use crate::ShareResult;

/// Open/close hooks invoked by the owning process.
///
/// Nothing registers itself globally; whoever builds a component decides
/// when to open and close it.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Prepare the component to serve requests.
    async fn open(&self) -> ShareResult<()> {
        Ok(())
    }

    /// Stop serving requests and abort any in flight.
    async fn close(&self) -> ShareResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<T: Lifecycle + ?Sized> Lifecycle for std::sync::Arc<T> {
    async fn open(&self) -> ShareResult<()> {
        (**self).open().await
    }

    async fn close(&self) -> ShareResult<()> {
        (**self).close().await
    }
}
