//! Composite production effect system

use crate::{FilesystemStorageHandler, RealRandomHandler, TracingNotificationHandler};
use async_trait::async_trait;
use labyrinth_core::effects::{
    NotificationEffects, RandomEffects, StorageEffects, StorageError,
};
use std::path::PathBuf;

/// Production handlers bundled behind every registry effect trait
#[derive(Debug, Clone)]
pub struct ProductionEffects {
    storage: FilesystemStorageHandler,
    random: RealRandomHandler,
    notifications: TracingNotificationHandler,
}

impl ProductionEffects {
    /// Filesystem storage rooted at `data_dir`, OS randomness, tracing events
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            storage: FilesystemStorageHandler::new(data_dir),
            random: RealRandomHandler::new(),
            notifications: TracingNotificationHandler::new(),
        }
    }

    /// The storage handler
    pub fn storage(&self) -> &FilesystemStorageHandler {
        &self.storage
    }
}

#[async_trait]
impl StorageEffects for ProductionEffects {
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
impl RandomEffects for ProductionEffects {
    async fn random_u64(&self) -> u64 {
        self.random.random_u64().await
    }

    async fn random_range(&self, min: u64, max: u64) -> u64 {
        self.random.random_range(min, max).await
    }
}

#[async_trait]
impl NotificationEffects for ProductionEffects {
    async fn emit(&self, message: &str) {
        self.notifications.emit(message).await;
    }
}
