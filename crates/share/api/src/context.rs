//! Request context: cancellation plus an optional deadline.

use core::{future::Future, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{ShareError, ShareResult};

/// Cancellation and deadline scope for one request.
///
/// Cloning shares the same cancellation; [`child`](Self::child) derives a
/// scope that is cancelled with its parent but can also be cancelled alone.
#[derive(Debug, Clone, Default)]
pub struct ShareContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ShareContext {
    /// A context with no deadline that is never cancelled unless asked.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context driven by an existing token, such as a node-wide shutdown
    /// token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Tighten the deadline to `timeout` from now.
    ///
    /// An earlier existing deadline is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Tighten the deadline to `deadline`.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derive a child scope.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this scope and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether this scope was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail immediately if the scope is already cancelled or expired.
    pub fn check(&self) -> ShareResult<()> {
        if self.token.is_cancelled() {
            return Err(ShareError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(ShareError::Timeout);
        }
        Ok(())
    }

    /// Run `fut` within this scope.
    ///
    /// Returns [`ShareError::Cancelled`] or [`ShareError::Timeout`] as soon as
    /// either fires; `fut` is dropped at that point, aborting its work.
    pub async fn run<T, F>(&self, fut: F) -> ShareResult<T>
    where
        F: Future<Output = ShareResult<T>>,
    {
        self.check()?;
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(ShareError::Cancelled),
                _ = tokio::time::sleep_until(deadline) => Err(ShareError::Timeout),
                result = fut => result,
            },
            None => tokio::select! {
                biased;
                _ = self.token.cancelled() => Err(ShareError::Cancelled),
                result = fut => result,
            },
        }
    }
}
