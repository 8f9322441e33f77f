//! Counter ledger
//!
//! Two persisted issuance counters, stored as 8-byte little-endian values
//! under `CaveCounter` and `KeyCounter`. The ledger does no arithmetic:
//! callers load a [`Counters`] snapshot, derive the next one, and persist it.
//! It provides no locking either; run it inside a
//! [`Transaction`](crate::Transaction) under the registry's serialization.

use labyrinth_core::effects::StorageEffects;
use labyrinth_core::{LabyrinthError, Result};
use encoding::CounterBytes;
use std::fmt;

/// The two issuance counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    /// Number of caves minted
    Cave,
    /// Number of live keys, also the id of the newest one
    Key,
}

impl Counter {
    /// Storage key of the counter
    pub fn storage_key(self) -> &'static str {
        match self {
            Counter::Cave => "CaveCounter",
            Counter::Key => "KeyCounter",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.storage_key())
    }
}

/// Snapshot of both counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Counters {
    /// `caveCounter`
    pub cave: u64,
    /// `keyCounter`
    pub key: u64,
}

impl Counters {
    /// Snapshot with explicit values
    pub fn new(cave: u64, key: u64) -> Self {
        Self { cave, key }
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "caves={} keys={}", self.cave, self.key)
    }
}

/// Read-modify-write access to the persisted counters
#[derive(Debug, Clone, Copy, Default)]
pub struct CounterLedger;

impl CounterLedger {
    /// Read one counter; a counter that was never written reads as 0
    pub async fn read<E>(effects: &E, counter: Counter) -> Result<u64>
    where
        E: StorageEffects + ?Sized,
    {
        let value = match effects.retrieve(counter.storage_key()).await? {
            Some(bytes) => CounterBytes::decode(counter, &bytes)?,
            None => 0,
        };
        tracing::debug!(%counter, value, "read counter");
        Ok(value)
    }

    /// Persist one counter unconditionally
    pub async fn write<E>(effects: &E, counter: Counter, value: u64) -> Result<()>
    where
        E: StorageEffects + ?Sized,
    {
        tracing::debug!(%counter, value, "write counter");
        effects
            .store(counter.storage_key(), CounterBytes::encode(value))
            .await
            .map_err(LabyrinthError::from)
    }

    /// Read both counters as one snapshot
    pub async fn load<E>(effects: &E) -> Result<Counters>
    where
        E: StorageEffects + ?Sized,
    {
        Ok(Counters {
            cave: Self::read(effects, Counter::Cave).await?,
            key: Self::read(effects, Counter::Key).await?,
        })
    }

    /// Write the counters that differ between `before` and `after`
    pub async fn persist<E>(effects: &E, before: Counters, after: Counters) -> Result<()>
    where
        E: StorageEffects + ?Sized,
    {
        if after.cave != before.cave {
            Self::write(effects, Counter::Cave, after.cave).await?;
        }
        if after.key != before.key {
            Self::write(effects, Counter::Key, after.key).await?;
        }
        Ok(())
    }

    /// Write both counters regardless of their previous values
    pub async fn reset<E>(effects: &E) -> Result<()>
    where
        E: StorageEffects + ?Sized,
    {
        Self::write(effects, Counter::Cave, 0).await?;
        Self::write(effects, Counter::Key, 0).await
    }
}

mod encoding {
    //! Fixed-width counter encoding

    use super::Counter;
    use labyrinth_core::{LabyrinthError, Result};

    pub(super) struct CounterBytes;

    impl CounterBytes {
        pub(super) fn encode(value: u64) -> Vec<u8> {
            value.to_le_bytes().to_vec()
        }

        pub(super) fn decode(counter: Counter, bytes: &[u8]) -> Result<u64> {
            let raw: [u8; 8] = bytes.try_into().map_err(|_| {
                LabyrinthError::serialization(format!(
                    "{counter} holds {} bytes, expected 8",
                    bytes.len()
                ))
            })?;
            Ok(u64::from_le_bytes(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use labyrinth_testkit::MemoryStorageHandler;

    #[tokio::test]
    async fn missing_counter_reads_zero() {
        let storage = MemoryStorageHandler::new();
        assert_eq!(
            CounterLedger::read(&storage, Counter::Cave).await.unwrap(),
            0
        );
        assert_eq!(CounterLedger::load(&storage).await.unwrap(), Counters::default());
    }

    #[tokio::test]
    async fn counters_are_little_endian_u64() {
        let storage = MemoryStorageHandler::new();
        CounterLedger::write(&storage, Counter::Key, 258).await.unwrap();

        let raw = storage.retrieve("KeyCounter").await.unwrap().unwrap();
        assert_eq!(raw, vec![2, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(CounterLedger::read(&storage, Counter::Key).await.unwrap(), 258);
    }

    #[tokio::test]
    async fn persist_writes_only_changed_counters() {
        let storage = MemoryStorageHandler::new();
        CounterLedger::persist(&storage, Counters::new(0, 0), Counters::new(1, 0))
            .await
            .unwrap();

        assert!(storage.exists("CaveCounter").await.unwrap());
        assert!(!storage.exists("KeyCounter").await.unwrap());
    }

    #[tokio::test]
    async fn malformed_counter_is_a_serialization_error() {
        let storage = MemoryStorageHandler::new();
        storage.store("CaveCounter", vec![1, 2, 3]).await.unwrap();

        assert_matches!(
            CounterLedger::read(&storage, Counter::Cave).await,
            Err(LabyrinthError::Serialization { .. })
        );
    }

    #[tokio::test]
    async fn reset_zeroes_both_counters() {
        let storage = MemoryStorageHandler::new();
        CounterLedger::persist(&storage, Counters::default(), Counters::new(9, 4))
            .await
            .unwrap();
        CounterLedger::reset(&storage).await.unwrap();

        assert_eq!(CounterLedger::load(&storage).await.unwrap(), Counters::default());
        assert_eq!(storage.len(), 2);
    }
}
