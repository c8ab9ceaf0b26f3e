//! Outcome of a tracker operation.
//!
//! Tracker reads and writes never return `Err`. A failed operation is logged
//! and reported as [`Outcome::Unavailable`], which callers must treat as
//! "state unknown". It is never a stand-in for zero or "never happened".

use crate::error::TrackerError;

/// Either the operation's value or the reason it is unavailable.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    /// The operation succeeded.
    Value(T),
    /// The operation failed; the state it concerns is unknown.
    Unavailable(TrackerError),
}

impl<T> Outcome<T> {
    /// Borrow the value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    /// Take the value, discarding the failure reason.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    /// Borrow the failure reason, if any.
    pub fn error(&self) -> Option<&TrackerError> {
        match self {
            Self::Value(_) => None,
            Self::Unavailable(err) => Some(err),
        }
    }

    /// Whether the operation failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// The value, or `default` when unavailable.
    pub fn unwrap_or(self, default: T) -> T {
        self.into_value().unwrap_or(default)
    }

    /// Map the value, keeping any failure.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Value(value) => Outcome::Value(f(value)),
            Self::Unavailable(err) => Outcome::Unavailable(err),
        }
    }

    /// Convert into a `Result` for callers that prefer `?`.
    ///
    /// # Errors
    ///
    /// Returns the failure reason when the outcome is unavailable.
    pub fn into_result(self) -> Result<T, TrackerError> {
        self.into()
    }
}

impl<T> From<Result<T, TrackerError>> for Outcome<T> {
    fn from(result: Result<T, TrackerError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(err) => Self::Unavailable(err),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, TrackerError> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Value(value) => Ok(value),
            Outcome::Unavailable(err) => Err(err),
        }
    }
}
