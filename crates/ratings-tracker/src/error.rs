//! Error types for the ratings tracker.

use ratings_store::StoreError;

/// Result type for tracker operations that propagate failures.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors that can occur in tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The underlying key-value store failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// A persisted value could not be decoded.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// The key holding the value.
        key: String,
        /// The raw stored value.
        value: String,
    },

    /// The positive-event counter cannot be incremented further.
    #[error("positive event count overflow")]
    CountOverflow,

    /// Reset was requested but is not enabled in the configuration.
    #[error("reset is disabled")]
    ResetDisabled,
}
