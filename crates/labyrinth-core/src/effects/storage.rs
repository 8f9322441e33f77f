//! Storage effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `labyrinth-effects` (filesystem), `labyrinth-testkit` (memory)
//! - **Usage**: Counter ledger and token records
//!
//! Keys are strings, values opaque bytes. Handlers attach no meaning to either.

use crate::errors::LabyrinthError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum StorageError {
    /// Key rejected by the backend
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// Backend read failed
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Backend write failed
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Backend delete failed
    #[error("Delete failed: {0}")]
    DeleteFailed(String),
}

impl From<StorageError> for LabyrinthError {
    fn from(err: StorageError) -> Self {
        LabyrinthError::storage(err.to_string())
    }
}

/// Persistent key-value store
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Write `value` under `key`, replacing any previous value
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Read the value under `key`, `None` when absent
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Delete `key`, returning whether it existed
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// Whether `key` holds a value
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Keys starting with `prefix` (all keys when `None`), sorted
    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError>;
}

#[async_trait]
impl<T: StorageEffects + ?Sized> StorageEffects for Arc<T> {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        (**self).store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).retrieve(key).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        (**self).remove(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        (**self).exists(key).await
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        (**self).list_keys(prefix).await
    }
}
