//! Transaction wrapper for registry operations
//!
//! A [`Transaction`] stages every write, delete and notification of one
//! operation in memory. Reads pass through the staged overlay to the backing
//! effects and the first value observed for each key is kept in a read set.
//!
//! [`Transaction::commit`] re-reads the read set from the backing store and
//! refuses to apply anything if a value moved underneath it. Otherwise it
//! applies the staged mutations and flushes the notifications in emission
//! order. Dropping a transaction without committing discards everything, so a
//! rejected operation leaves the store untouched and emits nothing.
//!
//! Validation and apply are separate steps against the backing store. A
//! writer that slips in between them is not detected, so callers must hold
//! exclusive write access for the whole transaction.

use async_lock::Mutex;
use async_trait::async_trait;
use labyrinth_core::effects::{
    NotificationEffects, RandomEffects, RegistryEffects, StorageEffects, StorageError,
};
use labyrinth_core::{LabyrinthError, Result};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Staged {
    /// `None` marks a delete
    writes: BTreeMap<String, Option<Vec<u8>>>,
    reads: BTreeMap<String, Option<Vec<u8>>>,
    events: Vec<String>,
}

/// What a committed transaction applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Keys written
    pub stored: usize,
    /// Keys deleted
    pub removed: usize,
    /// Notifications flushed
    pub emitted: usize,
}

/// One operation's staged view over the backing effects
pub struct Transaction<'a, E: ?Sized> {
    inner: &'a E,
    staged: Mutex<Staged>,
}

impl<'a, E> Transaction<'a, E>
where
    E: RegistryEffects + ?Sized,
{
    /// Open a transaction over `inner`
    pub fn begin(inner: &'a E) -> Self {
        Self {
            inner,
            staged: Mutex::new(Staged::default()),
        }
    }

    /// Validate the read set and apply staged mutations and notifications
    pub async fn commit(self) -> Result<CommitSummary> {
        let staged = self.staged.into_inner();

        for (key, observed) in &staged.reads {
            let current = self.inner.retrieve(key).await?;
            if &current != observed {
                tracing::warn!(key, "read set changed before commit");
                return Err(LabyrinthError::Conflict { key: key.clone() });
            }
        }

        let mut summary = CommitSummary::default();
        for (key, value) in staged.writes {
            match value {
                Some(bytes) => {
                    self.inner.store(&key, bytes).await?;
                    summary.stored += 1;
                }
                None => {
                    self.inner.remove(&key).await?;
                    summary.removed += 1;
                }
            }
        }

        for event in &staged.events {
            self.inner.emit(event).await;
        }
        summary.emitted = staged.events.len();

        tracing::debug!(
            stored = summary.stored,
            removed = summary.removed,
            emitted = summary.emitted,
            "transaction committed"
        );
        Ok(summary)
    }

    /// Drop every staged change
    pub fn rollback(self) {
        tracing::debug!("transaction rolled back");
    }
}

#[async_trait]
impl<'a, E> StorageEffects for Transaction<'a, E>
where
    E: RegistryEffects + ?Sized,
{
    async fn store(&self, key: &str, value: Vec<u8>) -> std::result::Result<(), StorageError> {
        self.staged
            .lock()
            .await
            .writes
            .insert(key.to_string(), Some(value));
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> std::result::Result<Option<Vec<u8>>, StorageError> {
        let mut staged = self.staged.lock().await;
        if let Some(value) = staged.writes.get(key) {
            return Ok(value.clone());
        }
        if let Some(value) = staged.reads.get(key) {
            return Ok(value.clone());
        }

        let value = self.inner.retrieve(key).await?;
        staged.reads.insert(key.to_string(), value.clone());
        Ok(value)
    }

    async fn remove(&self, key: &str) -> std::result::Result<bool, StorageError> {
        let existed = self.retrieve(key).await?.is_some();
        self.staged
            .lock()
            .await
            .writes
            .insert(key.to_string(), None);
        Ok(existed)
    }

    async fn exists(&self, key: &str) -> std::result::Result<bool, StorageError> {
        Ok(self.retrieve(key).await?.is_some())
    }

    async fn list_keys(
        &self,
        prefix: Option<&str>,
    ) -> std::result::Result<Vec<String>, StorageError> {
        let mut keys: std::collections::BTreeSet<String> =
            self.inner.list_keys(prefix).await?.into_iter().collect();

        let staged = self.staged.lock().await;
        for (key, value) in &staged.writes {
            if !prefix.map_or(true, |p| key.starts_with(p)) {
                continue;
            }
            match value {
                Some(_) => {
                    keys.insert(key.clone());
                }
                None => {
                    keys.remove(key);
                }
            }
        }
        Ok(keys.into_iter().collect())
    }
}

#[async_trait]
impl<'a, E> RandomEffects for Transaction<'a, E>
where
    E: RegistryEffects + ?Sized,
{
    async fn random_u64(&self) -> u64 {
        self.inner.random_u64().await
    }

    async fn random_range(&self, min: u64, max: u64) -> u64 {
        self.inner.random_range(min, max).await
    }
}

#[async_trait]
impl<'a, E> NotificationEffects for Transaction<'a, E>
where
    E: RegistryEffects + ?Sized,
{
    async fn emit(&self, message: &str) {
        self.staged.lock().await.events.push(message.to_string());
    }
}
