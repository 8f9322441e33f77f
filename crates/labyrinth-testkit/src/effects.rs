//! Composite test effects
//!
//! One value implementing every registry effect with stateful mocks, so a
//! test can drive a registry and then inspect storage and events directly.

use crate::{MemoryStorageHandler, MockNotificationHandler, MockRandomHandler};
use async_trait::async_trait;
use labyrinth_core::effects::{
    NotificationEffects, RandomEffects, StorageEffects, StorageError,
};
use std::collections::BTreeMap;

/// Memory storage, deterministic randomness and captured notifications
#[derive(Debug, Clone, Default)]
pub struct TestEffects {
    storage: MemoryStorageHandler,
    random: MockRandomHandler,
    notifications: MockNotificationHandler,
}

impl TestEffects {
    /// Fresh storage, seed 42, no events
    pub fn new() -> Self {
        Self::default()
    }

    /// Share `storage` with other effect instances
    pub fn with_storage(storage: MemoryStorageHandler) -> Self {
        Self {
            storage,
            ..Self::default()
        }
    }

    /// Replace the entropy source
    pub fn with_random(mut self, random: MockRandomHandler) -> Self {
        self.random = random;
        self
    }

    /// The storage handler
    pub fn storage(&self) -> &MemoryStorageHandler {
        &self.storage
    }

    /// Captured events (for testing)
    pub fn events(&self) -> Vec<String> {
        self.notifications.events()
    }

    /// Captured events starting with `prefix` (for testing)
    pub fn events_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.notifications.events_with_prefix(prefix)
    }

    /// Forget captured events (for testing)
    pub fn clear_events(&self) {
        self.notifications.clear();
    }

    /// Copy of every stored entry (for testing)
    pub async fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        self.storage.snapshot().await
    }
}

#[async_trait]
impl StorageEffects for TestEffects {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        self.storage.store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.storage.retrieve(key).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.storage.remove(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.storage.exists(key).await
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        self.storage.list_keys(prefix).await
    }
}

#[async_trait]
impl RandomEffects for TestEffects {
    async fn random_u64(&self) -> u64 {
        self.random.random_u64().await
    }
}

#[async_trait]
impl NotificationEffects for TestEffects {
    async fn emit(&self, message: &str) {
        self.notifications.emit(message).await;
    }
}
