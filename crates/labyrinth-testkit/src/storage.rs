//! Mock storage effect handlers for testing
//!
//! Shared in-memory storage behind `Arc<RwLock<>>`. Clones see the same data,
//! which lets two registries contend over one store.

use async_lock::RwLock;
use async_trait::async_trait;
use labyrinth_core::effects::{StorageEffects, StorageError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Memory storage handler for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageHandler {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStorageHandler {
    /// Create a new memory storage handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored keys (for testing)
    pub fn len(&self) -> usize {
        self.data.try_read().map(|g| g.len()).unwrap_or(0)
    }

    /// Check if storage is empty (for testing)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored entry (for byte-for-byte comparisons)
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl StorageEffects for MemoryStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        self.data.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.data.write().await.remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.data.read().await.contains_key(key))
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        let data = self.data.read().await;
        Ok(data
            .keys()
            .filter(|k| prefix.map_or(true, |p| k.starts_with(p)))
            .cloned()
            .collect())
    }
}
