//! `RocksDB` backend for the ratings key-value store.
//!
//! Every entry lives in the `kv` column family with the key and value stored
//! as raw UTF-8. Reads and writes are local and short, so they run inline on
//! the calling task.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options,
};

use crate::error::{Result, StoreError};
use crate::schema::{all_column_families, cf};
use crate::KeyValueStore;

/// Persistent string key-value store on top of `RocksDB`.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open the ratings database at `path`, creating it and its `kv`
    /// column family on first use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if `RocksDB` refuses to open the path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Handle for a column family declared in [`all_column_families`].
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    fn decode(bytes: Vec<u8>) -> Result<String> {
        String::from_utf8(bytes).map_err(|e| StoreError::Encoding(e.to_string()))
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let cf = self.cf(cf::KV)?;

        self.db
            .get_cf(&cf, key.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(Self::decode)
            .transpose()
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let cf = self.cf(cf::KV)?;

        self.db
            .put_cf(&cf, key.as_bytes(), value.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let cf = self.cf(cf::KV)?;

        self.db
            .delete_cf(&cf, key.as_bytes())
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    fn read_many(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>> {
        let cf = self.cf(cf::KV)?;

        let values = self
            .db
            .multi_get_cf(keys.iter().map(|key| (&cf, key.as_bytes())));

        keys.iter()
            .zip(values)
            .map(|(key, value)| {
                let value = value
                    .map_err(|e| StoreError::Database(e.to_string()))?
                    .map(Self::decode)
                    .transpose()?;
                Ok(((*key).to_string(), value))
            })
            .collect()
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let cf = self.cf(cf::KV)?;

        let mut keys = Vec::new();
        for item in self.db.iterator_cf(&cf, IteratorMode::Start) {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            keys.push(Self::decode(key.into_vec())?);
        }

        Ok(keys)
    }
}

#[async_trait]
impl KeyValueStore for RocksStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.read(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.write(key, value)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.delete(key)
    }

    async fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>> {
        self.read_many(keys)
    }

    async fn all_keys(&self) -> Result<Vec<String>> {
        self.list_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn key_value_crud() {
        let (store, _dir) = create_test_store();

        // Create
        store.set("@Test.count", "0").await.unwrap();
        assert_eq!(store.get("@Test.count").await.unwrap().as_deref(), Some("0"));

        // Update
        store.set("@Test.count", "7").await.unwrap();
        assert_eq!(store.get("@Test.count").await.unwrap().as_deref(), Some("7"));

        // Delete
        store.remove("@Test.count").await.unwrap();
        assert!(store.get("@Test.count").await.unwrap().is_none());

        // Deleting a missing key is fine
        store.remove("@Test.count").await.unwrap();
    }

    #[tokio::test]
    async fn multi_get_preserves_order() {
        let (store, _dir) = create_test_store();
        store.set("first", "1").await.unwrap();
        store.set("third", "3").await.unwrap();

        let pairs = store.multi_get(&["third", "second", "first"]).await.unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("third".to_string(), Some("3".to_string())));
        assert_eq!(pairs[1], ("second".to_string(), None));
        assert_eq!(pairs[2], ("first".to_string(), Some("1".to_string())));
    }

    #[tokio::test]
    async fn all_keys_lists_present_keys() {
        let (store, _dir) = create_test_store();
        assert!(store.all_keys().await.unwrap().is_empty());

        store.set("b", "x").await.unwrap();
        store.set("a", "y").await.unwrap();
        store.remove("b").await.unwrap();

        assert_eq!(store.all_keys().await.unwrap(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn non_utf8_bytes_are_encoding_errors() {
        let (store, _dir) = create_test_store();
        {
            let cf = store.cf(cf::KV).unwrap();
            store.db.put_cf(&cf, b"bad-value", [0xff_u8, 0xfe]).unwrap();
        }

        assert!(matches!(store.get("bad-value").await, Err(StoreError::Encoding(_))));
        assert!(matches!(
            store.multi_get(&["bad-value"]).await,
            Err(StoreError::Encoding(_))
        ));

        // A bad value does not break key listing; a bad key does.
        assert_eq!(store.all_keys().await.unwrap(), vec!["bad-value".to_string()]);
        {
            let cf = store.cf(cf::KV).unwrap();
            store.db.put_cf(&cf, [0xc3_u8, 0x28], b"ok").unwrap();
        }
        assert!(matches!(store.all_keys().await, Err(StoreError::Encoding(_))));
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let store = RocksStore::open(dir.path()).unwrap();
            store.set("persisted", "1700000000000").await.unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get("persisted").await.unwrap().as_deref(),
            Some("1700000000000")
        );
    }
}
