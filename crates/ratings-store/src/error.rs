//! Error types for ratings storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// A stored key or value is not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error while preparing the data directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
