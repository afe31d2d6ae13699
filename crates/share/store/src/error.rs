//! Store error types.

/// Errors from share store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The redb backend failed. Every redb error type converts into
    /// [`redb::Error`], so backends map with `.map_err(redb::Error::from)`.
    #[error("share database: {0}")]
    Database(#[from] redb::Error),

    /// Filesystem failure, including opening the database directory.
    #[error("share store io: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
