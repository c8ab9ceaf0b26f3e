//! Persistent state behind the in-app "please rate us" prompt.
//!
//! This crate tracks a counter of positive user events and the last time the
//! user rated the app, declined to, or sent feedback instead. State lives in
//! an injected [`KeyValueStore`](ratings_store::KeyValueStore) under fixed
//! `@RatingRequestData.*` keys, with every value encoded as a decimal string.
//!
//! Deciding *when* to show the prompt is left to the host application.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ratings_store::MemoryStore;
//! use ratings_tracker::{RatingsTracker, TrackerConfig};
//!
//! # async fn demo() {
//! let tracker = RatingsTracker::open(Arc::new(MemoryStore::new()), TrackerConfig::from_env()).await;
//!
//! if let Some(count) = tracker.increment_count().await.into_value() {
//!     println!("{count} positive events so far");
//! }
//!
//! // Later, the user dismisses the prompt.
//! if tracker.record_decline().await.is_unavailable() {
//!     // State unknown; the failure has already been logged.
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod clock;
pub mod config;
pub mod error;
pub mod keys;
pub mod outcome;
pub mod timestamps;
pub mod tracker;

pub use clock::{Clock, SystemClock};
pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use outcome::Outcome;
pub use timestamps::{ActionKind, ActionTimestamps, StoredTimestamp};
pub use tracker::RatingsTracker;
