//! Exclusive access to a data directory
//!
//! A registry commit validates its read set and then applies its writes in
//! two steps, so two processes writing one data directory could both pass
//! validation. [`DataDirLock`] holds an advisory exclusive lock on
//! `<data_dir>/.lock` for as long as it lives; every process that opens the
//! directory through it is serialized.

use fs2::FileExt;
use labyrinth_core::effects::StorageError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = ".lock";

/// Guard for exclusive use of a data directory; unlocks on drop
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
}

impl DataDirLock {
    /// Block until the lock on `data_dir` is held
    pub fn acquire(data_dir: &Path) -> Result<Self, StorageError> {
        let (file, path) = Self::open(data_dir)?;
        if file.try_lock_exclusive().is_err() {
            tracing::info!(
                path = %path.display(),
                "waiting for another process to release the data directory"
            );
            file.lock_exclusive().map_err(|e| {
                StorageError::WriteFailed(format!("Failed to lock {}: {e}", path.display()))
            })?;
        }
        tracing::debug!(path = %path.display(), "data directory locked");
        Ok(Self { file, path })
    }

    /// Take the lock only if nobody else holds it
    pub fn try_acquire(data_dir: &Path) -> Result<Option<Self>, StorageError> {
        let (file, path) = Self::open(data_dir)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file, path })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(StorageError::WriteFailed(format!(
                "Failed to lock {}: {e}",
                path.display()
            ))),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(data_dir: &Path) -> Result<(File, PathBuf), StorageError> {
        std::fs::create_dir_all(data_dir).map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create directory: {e}"))
        })?;
        let path = data_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                StorageError::WriteFailed(format!("Failed to open {}: {e}", path.display()))
            })?;
        Ok((file, path))
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to unlock data directory"
            );
        }
    }
}
