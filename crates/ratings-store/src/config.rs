//! Storage backend configuration.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::{KeyValueStore, MemoryStore};

/// Default directory for the `RocksDB` backend.
pub const DEFAULT_DATA_DIR: &str = "./data/ratings";

/// Backend selection for key-value persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-local map; nothing survives a restart.
    Memory,
    /// `RocksDB` database under [`StoreConfig::data_dir`].
    #[cfg(feature = "rocksdb-backend")]
    #[serde(rename = "rocksdb")]
    Rocks,
}

impl Backend {
    /// Parse a backend name. Unknown names, and `rocksdb` when the backend is
    /// not compiled in, return `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            #[cfg(feature = "rocksdb-backend")]
            "rocksdb" | "rocks" => Some(Self::Rocks),
            _ => None,
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        #[cfg(feature = "rocksdb-backend")]
        {
            Self::Rocks
        }
        #[cfg(not(feature = "rocksdb-backend"))]
        {
            Self::Memory
        }
    }
}

/// Storage configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Which backend to open (env `RATINGS_STORE_BACKEND`).
    #[serde(default)]
    pub backend: Backend,

    /// Data directory for persistent backends (env `RATINGS_DATA_DIR`).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

impl StoreConfig {
    /// Configuration for a process-local store.
    #[must_use]
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let backend = match std::env::var("RATINGS_STORE_BACKEND") {
            Ok(name) => Backend::parse(&name).unwrap_or_else(|| {
                tracing::warn!(
                    backend = %name,
                    "Unknown or unavailable store backend, falling back to memory"
                );
                Backend::Memory
            }),
            Err(_) => Backend::default(),
        };

        Self {
            backend,
            data_dir: std::env::var("RATINGS_DATA_DIR")
                .map_or_else(|_| default_data_dir(), PathBuf::from),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            data_dir: default_data_dir(),
        }
    }
}

/// Build the store selected by `config`.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or the database
/// cannot be opened.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>> {
    Ok(match config.backend {
        Backend::Memory => {
            tracing::info!("Opening in-memory ratings store");
            Arc::new(MemoryStore::new())
        }
        #[cfg(feature = "rocksdb-backend")]
        Backend::Rocks => {
            std::fs::create_dir_all(&config.data_dir)?;
            tracing::info!(path = %config.data_dir.display(), "Opening RocksDB ratings store");
            Arc::new(crate::RocksStore::open(&config.data_dir)?)
        }
    })
}
