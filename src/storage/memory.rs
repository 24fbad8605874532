//! Implements the `Storage` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that the whole app can be
//! run, top-to-bottom, without touching the disk.

use crate::storage::Storage;
use crate::Result;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// An implementation of the `Storage` trait that holds every value in a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `MemoryStorage` seeded with `data`. The map key is the storage key and the map
    /// value is the stored bytes.
    pub fn with_data(data: HashMap<String, Vec<u8>>) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }

    /// A copy of everything currently stored.
    pub fn get_state(&self) -> HashMap<String, Vec<u8>> {
        self.data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(data.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<()> {
        let mut data = self.data.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            data.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.read("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let storage = MemoryStorage::new();
        storage.write("a", b"[1]").await.unwrap();
        storage.write("b", b"[2]").await.unwrap();
        storage.write("a", b"[3]").await.unwrap();
        assert_eq!(storage.read("a").await.unwrap(), Some(b"[3]".to_vec()));

        storage.delete(&["a", "missing"]).await.unwrap();
        assert!(storage.read("a").await.unwrap().is_none());
        assert_eq!(storage.get_state().len(), 1);
    }

    #[tokio::test]
    async fn test_with_data() {
        let mut seed = HashMap::new();
        seed.insert("k".to_string(), b"v".to_vec());
        let storage = MemoryStorage::with_data(seed);
        assert_eq!(storage.read("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
