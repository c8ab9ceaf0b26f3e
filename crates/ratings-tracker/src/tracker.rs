//! The ratings tracker.
//!
//! [`RatingsTracker`] owns the persisted state behind the "please rate us"
//! prompt: a counter of positive events and the last time the user rated,
//! declined, or sent feedback. Every operation except [`RatingsTracker::reset_data`]
//! logs failures and reports them as [`Outcome::Unavailable`] instead of
//! returning an error.

use std::sync::Arc;

use tokio::sync::Mutex;

use ratings_store::KeyValueStore;

use crate::clock::{Clock, SystemClock};
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::keys;
use crate::outcome::Outcome;
use crate::timestamps::{ActionKind, ActionTimestamps};

/// Counter and action-timestamp bookkeeping over an injected key-value store.
///
/// Build one per application and share it (it is `Send + Sync`).
pub struct RatingsTracker<S: KeyValueStore + ?Sized = dyn KeyValueStore> {
    store: Arc<S>,
    config: TrackerConfig,
    clock: Arc<dyn Clock>,
    /// Serializes read-modify-write of the counter within this instance.
    /// Writers outside this instance are not excluded.
    count_lock: Mutex<()>,
}

impl<S: KeyValueStore + ?Sized> RatingsTracker<S> {
    /// Create a tracker without touching the store.
    ///
    /// Call [`initialize`](Self::initialize) before first use, or use
    /// [`open`](Self::open) to do both.
    #[must_use]
    pub fn new(store: Arc<S>, config: TrackerConfig) -> Self {
        Self {
            store,
            config,
            clock: Arc::new(SystemClock),
            count_lock: Mutex::new(()),
        }
    }

    /// Create a tracker and initialize its keys.
    ///
    /// Never fails: an initialization failure is logged and the tracker is
    /// returned anyway.
    pub async fn open(store: Arc<S>, config: TrackerConfig) -> Self {
        let tracker = Self::new(store, config);
        // Failure is already logged; the counter reads as zero until seeded.
        let _ = tracker.initialize().await;
        tracker
    }

    /// Replace the clock used to stamp recorded actions.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The tracker configuration.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Seed the positive-event counter with `0` if it is absent.
    ///
    /// Idempotent. Yields `true` if the counter was seeded by this call.
    pub async fn initialize(&self) -> Outcome<bool> {
        let result = self.seed_count().await;
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "Failed to initialize rating request data");
        }
        result.into()
    }

    async fn seed_count(&self) -> Result<bool> {
        let present = self.store.all_keys().await?;
        if present.iter().any(|key| key == keys::EVENT_COUNT) {
            return Ok(false);
        }

        tracing::info!(key = keys::EVENT_COUNT, "Initializing blank positive event count");
        self.store.set(keys::EVENT_COUNT, "0").await?;
        Ok(true)
    }

    // =========================================================================
    // Positive Event Counter
    // =========================================================================

    /// Current number of positive events.
    ///
    /// A counter that was never written reads as `0`. A failed read or a
    /// stored value that is not a non-negative integer is unavailable.
    pub async fn get_count(&self) -> Outcome<u64> {
        let result = self.read_count().await;
        if let Err(ref e) = result {
            tracing::warn!(
                key = keys::EVENT_COUNT,
                error = %e,
                "Couldn't retrieve positive events count"
            );
        }
        result.into()
    }

    /// Add one positive event and yield the new count.
    ///
    /// Nothing is written if the current count cannot be read.
    pub async fn increment_count(&self) -> Outcome<u64> {
        let _guard = self.count_lock.lock().await;

        let result = self.bump_count().await;
        match &result {
            Ok(count) => tracing::debug!(count, "Positive event recorded"),
            Err(e) => tracing::warn!(
                key = keys::EVENT_COUNT,
                error = %e,
                "Could not increment positive events count"
            ),
        }
        result.into()
    }

    async fn read_count(&self) -> Result<u64> {
        match self.store.get(keys::EVENT_COUNT).await? {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| TrackerError::InvalidValue {
                    key: keys::EVENT_COUNT.to_string(),
                    value: raw,
                }),
            None => {
                tracing::debug!(key = keys::EVENT_COUNT, "Count not initialized, reading as zero");
                Ok(0)
            }
        }
    }

    async fn bump_count(&self) -> Result<u64> {
        let current = self.read_count().await?;
        let next = current.checked_add(1).ok_or(TrackerError::CountOverflow)?;
        self.store
            .set(keys::EVENT_COUNT, &next.to_string())
            .await?;
        Ok(next)
    }

    // =========================================================================
    // Action Timestamps
    // =========================================================================

    /// Last recorded time of each action, read in one batch.
    ///
    /// An unavailable outcome means the store read failed and the timestamps
    /// are unknown, not that no action was taken. A single corrupt value is
    /// reported on its own entry as [`StoredTimestamp::Invalid`](crate::StoredTimestamp::Invalid) and does not
    /// hide the others.
    pub async fn get_action_timestamps(&self) -> Outcome<ActionTimestamps> {
        let result = self.read_timestamps().await;
        if let Err(ref e) = result {
            tracing::warn!(error = %e, "Could not retrieve rating action timestamps");
        }
        result.into()
    }

    async fn read_timestamps(&self) -> Result<ActionTimestamps> {
        let pairs = self.store.multi_get(&keys::TIMESTAMP_KEYS).await?;
        let timestamps = ActionTimestamps::from_pairs(pairs);
        for (kind, raw) in timestamps.invalid() {
            tracing::warn!(
                action = %kind,
                key = kind.key(),
                value = raw,
                "Ignoring undecodable rating action timestamp"
            );
        }
        Ok(timestamps)
    }

    /// Record that the user declined to rate. Yields the stored timestamp.
    pub async fn record_decline(&self) -> Outcome<i64> {
        self.record_action(ActionKind::Declined).await
    }

    /// Record that the user rated the app. Yields the stored timestamp.
    pub async fn record_rated(&self) -> Outcome<i64> {
        self.record_action(ActionKind::Rated).await
    }

    /// Record that the user sent feedback. Yields the stored timestamp.
    pub async fn record_feedback(&self) -> Outcome<i64> {
        self.record_action(ActionKind::Feedback).await
    }

    /// Stamp `kind` with the current time, overwriting any earlier value.
    pub async fn record_action(&self, kind: ActionKind) -> Outcome<i64> {
        let now = self.clock.now_millis();

        match self.store.set(kind.key(), &now.to_string()).await {
            Ok(()) => {
                tracing::debug!(action = %kind, timestamp = now, "Rating action recorded");
                Outcome::Value(now)
            }
            Err(e) => {
                tracing::warn!(
                    action = %kind,
                    key = kind.key(),
                    error = %e,
                    "Couldn't set rating action timestamp"
                );
                Outcome::Unavailable(e.into())
            }
        }
    }

    // =========================================================================
    // Debug
    // =========================================================================

    /// Clear all action timestamps and set the counter back to zero.
    ///
    /// Debug only: refused unless [`TrackerConfig::allow_reset`] is set.
    /// That flag defaults to on in debug builds and off in release builds;
    /// `RATINGS_ALLOW_RESET` overrides it when the config comes from
    /// [`TrackerConfig::from_env`]. Unlike every other operation, store
    /// failures are returned to the caller.
    ///
    /// # Errors
    ///
    /// - `TrackerError::ResetDisabled` if reset is not enabled.
    /// - `TrackerError::Store` if any removal or write fails; keys handled
    ///   before the failure stay cleared.
    pub async fn reset_data(&self) -> Result<()> {
        if !self.config.allow_reset {
            tracing::warn!("Refusing to reset rating request data: reset is disabled");
            return Err(TrackerError::ResetDisabled);
        }

        let _guard = self.count_lock.lock().await;

        for key in keys::TIMESTAMP_KEYS {
            self.store.remove(key).await?;
        }
        self.store.set(keys::EVENT_COUNT, "0").await?;

        tracing::info!("Rating request data reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratings_store::MemoryStore;

    fn tracker_with(store: MemoryStore) -> RatingsTracker<MemoryStore> {
        RatingsTracker::new(Arc::new(store), TrackerConfig::default().with_allow_reset(true))
    }

    #[tokio::test]
    async fn initialize_seeds_only_once() {
        let tracker = tracker_with(MemoryStore::new());

        assert!(matches!(tracker.initialize().await, Outcome::Value(true)));
        assert!(matches!(tracker.initialize().await, Outcome::Value(false)));
        assert_eq!(
            tracker.store().get(keys::EVENT_COUNT).await.unwrap().as_deref(),
            Some("0")
        );
    }

    #[tokio::test]
    async fn initialize_keeps_existing_count() {
        let tracker = tracker_with(MemoryStore::with_entries([(keys::EVENT_COUNT, "12")]));

        assert!(matches!(tracker.initialize().await, Outcome::Value(false)));
        assert_eq!(tracker.get_count().await.into_value(), Some(12));
    }

    #[tokio::test]
    async fn missing_count_reads_as_zero() {
        let tracker = tracker_with(MemoryStore::new());
        assert_eq!(tracker.get_count().await.into_value(), Some(0));

        // Incrementing an unseeded counter starts from zero.
        assert_eq!(tracker.increment_count().await.into_value(), Some(1));
    }

    #[tokio::test]
    async fn corrupt_count_is_unavailable() {
        let tracker = tracker_with(MemoryStore::with_entries([(keys::EVENT_COUNT, "NaN")]));

        let outcome = tracker.get_count().await;
        assert!(matches!(
            outcome,
            Outcome::Unavailable(TrackerError::InvalidValue { .. })
        ));

        // The corrupt value is left alone.
        assert!(tracker.increment_count().await.is_unavailable());
        assert_eq!(
            tracker.store().get(keys::EVENT_COUNT).await.unwrap().as_deref(),
            Some("NaN")
        );
    }

    #[tokio::test]
    async fn count_overflow_is_unavailable() {
        let max = u64::MAX.to_string();
        let tracker = tracker_with(MemoryStore::with_entries([(keys::EVENT_COUNT, max.as_str())]));

        assert!(matches!(
            tracker.increment_count().await,
            Outcome::Unavailable(TrackerError::CountOverflow)
        ));
    }

    #[tokio::test]
    async fn record_uses_injected_clock() {
        let tracker = tracker_with(MemoryStore::new()).with_clock(|| 1_700_000_000_000_i64);

        assert_eq!(tracker.record_feedback().await.into_value(), Some(1_700_000_000_000));
        assert_eq!(
            tracker.store().get(keys::FEEDBACK_TIMESTAMP).await.unwrap().as_deref(),
            Some("1700000000000")
        );

        let timestamps = tracker.get_action_timestamps().await.into_value().unwrap();
        assert_eq!(timestamps.feedback(), Some(1_700_000_000_000));
        assert_eq!(timestamps.rated(), None);
        assert_eq!(timestamps.declined(), None);
    }

    #[tokio::test]
    async fn reset_refused_when_disabled() {
        let store = Arc::new(MemoryStore::with_entries([(keys::EVENT_COUNT, "5")]));
        let tracker = RatingsTracker::new(store, TrackerConfig::default().with_allow_reset(false));

        assert!(matches!(
            tracker.reset_data().await,
            Err(TrackerError::ResetDisabled)
        ));
        assert_eq!(tracker.get_count().await.into_value(), Some(5));
    }

    #[tokio::test]
    async fn reset_leaves_foreign_keys() {
        let tracker = tracker_with(MemoryStore::with_entries([
            ("@Settings.theme", "dark"),
            (keys::RATED_TIMESTAMP, "1"),
        ]));

        tracker.reset_data().await.unwrap();

        assert_eq!(
            tracker.store().get("@Settings.theme").await.unwrap().as_deref(),
            Some("dark")
        );
        assert!(tracker.store().get(keys::RATED_TIMESTAMP).await.unwrap().is_none());
    }
}
