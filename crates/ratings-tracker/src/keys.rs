//! Persisted key names.
//!
//! These strings are shared with data written by earlier releases and must
//! not change.

/// Prefix shared by every key the tracker owns.
pub const KEY_PREFIX: &str = "@RatingRequestData.";

/// Positive-event counter, stored as a decimal integer.
pub const EVENT_COUNT: &str = "@RatingRequestData.positiveEventCount";

/// Epoch milliseconds of the last "rated" response.
pub const RATED_TIMESTAMP: &str = "@RatingRequestData.ratedTimestamp";

/// Epoch milliseconds of the last "declined" response.
pub const DECLINED_TIMESTAMP: &str = "@RatingRequestData.declinedTimestamp";

/// Epoch milliseconds of the last "gave feedback" response.
pub const FEEDBACK_TIMESTAMP: &str = "@RatingRequestData.feedbackTimestamp";

/// Timestamp keys in the order they are read back.
pub const TIMESTAMP_KEYS: [&str; 3] = [RATED_TIMESTAMP, DECLINED_TIMESTAMP, FEEDBACK_TIMESTAMP];
