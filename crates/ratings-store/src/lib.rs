//! Key-value storage layer for the ratings tracker.
//!
//! This crate defines the asynchronous string key-value contract the tracker
//! persists through, together with two backends:
//!
//! - [`MemoryStore`]: process-local map, used by tests and ephemeral hosts
//! - [`RocksStore`]: `RocksDB` database with a single `kv` column family
//!   (feature `rocksdb-backend`, enabled by default)
//!
//! Values are always strings. Encoding domain values into strings is the
//! caller's business.
//!
//! # Example
//!
//! ```no_run
//! use ratings_store::{KeyValueStore, MemoryStore};
//!
//! # async fn demo() -> ratings_store::Result<()> {
//! let store = MemoryStore::new();
//! store.set("@Example.key", "42").await?;
//! assert_eq!(store.get("@Example.key").await?.as_deref(), Some("42"));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod memory;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

pub use config::{open_store, Backend, StoreConfig};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use async_trait::async_trait;

/// The storage trait defining all key-value operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `RocksDB`, in-memory for testing). Each call is applied on its own;
/// there are no transactions spanning several calls.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Get the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a key that is not present succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Read several keys at once.
    ///
    /// The result holds one `(key, value)` pair per requested key, in request
    /// order, with `None` for keys that are not present.
    ///
    /// # Errors
    ///
    /// Returns an error if any read fails.
    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>> {
        let mut pairs = Vec::with_capacity(keys.len());
        for key in keys {
            pairs.push(((*key).to_string(), self.get(key).await?));
        }
        Ok(pairs)
    }

    /// List every key currently present.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    async fn all_keys(&self) -> Result<Vec<String>>;
}
