//! Common test utilities for ratings tracker integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ratings_store::{KeyValueStore, MemoryStore, Result, StoreError};
use ratings_tracker::{Clock, RatingsTracker, TrackerConfig};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// In-memory store whose reads and writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read (`get`, `multi_get`, `all_keys`) fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write (`set`, `remove`) fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_all(&self, fail: bool) {
        self.fail_reads(fail);
        self.fail_writes(fail);
    }

    fn check(flag: &AtomicBool) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("injected failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Self::check(&self.fail_reads)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        Self::check(&self.fail_writes)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        Self::check(&self.fail_writes)?;
        self.inner.remove(key).await
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>> {
        Self::check(&self.fail_reads)?;
        self.inner.multi_get(keys).await
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        Self::check(&self.fail_reads)?;
        self.inner.all_keys().await
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn starting_at(millis: i64) -> Self {
        Self(Arc::new(AtomicI64::new(millis)))
    }

    pub fn advance(&self, millis: i64) {
        self.0.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Config used by tests: reset allowed regardless of build profile.
pub fn test_config() -> TrackerConfig {
    TrackerConfig::default().with_allow_reset(true)
}

/// A tracker over a fresh flaky store, plus a handle to that store.
pub fn flaky_tracker() -> (RatingsTracker<FlakyStore>, Arc<FlakyStore>) {
    init_tracing();
    let store = Arc::new(FlakyStore::new());
    let tracker = RatingsTracker::new(Arc::clone(&store), test_config());
    (tracker, store)
}
