//! Storage effect handlers
//!
//! Stateless implementation of `StorageEffects` backed by the local
//! filesystem. Each key is one `<key>.dat` file directly under the base
//! directory; keys are flat names, never paths.
//!
//! In-memory storage for tests lives in `labyrinth-testkit`.

use async_trait::async_trait;
use labyrinth_core::effects::{StorageEffects, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;

const DATA_EXTENSION: &str = "dat";
const STAGING_EXTENSION: &str = "tmp";

/// Filesystem-based storage handler for production use
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    /// Base directory for storage files
    base_path: PathBuf,
}

impl FilesystemStorageHandler {
    /// Create a new filesystem storage handler
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Directory holding the data files
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        if key.starts_with('.') || key.contains(['/', '\\']) {
            return Err(StorageError::InvalidKey {
                reason: format!("Key '{key}' is not a flat file name"),
            });
        }
        Ok(self.base_path.join(format!("{key}.{DATA_EXTENSION}")))
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let file_path = self.file_path(key)?;
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to create directory: {e}")))?;

        // Write beside the target and rename so readers never see a torn value.
        let staging_path = file_path.with_extension(STAGING_EXTENSION);
        fs::write(&staging_path, value)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write file: {e}")))?;
        fs::rename(&staging_path, &file_path)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to replace file: {e}")))?;

        tracing::trace!(key, "stored");
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let file_path = self.file_path(key)?;
        match fs::read(&file_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!("Failed to read file: {e}"))),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let file_path = self.file_path(key)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to remove file: {e}"
            ))),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let file_path = self.file_path(key)?;
        fs::try_exists(&file_path)
            .await
            .map_err(|e| StorageError::ReadFailed(format!("Failed to stat file: {e}")))
    }

    async fn list_keys(&self, prefix: Option<&str>) -> Result<Vec<String>, StorageError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to read directory: {e}"
                )))
            }
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ReadFailed(format!("Failed to read directory entry: {e}")))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DATA_EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if prefix.map_or(true, |p| key.starts_with(p)) {
                keys.push(key.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }
}
