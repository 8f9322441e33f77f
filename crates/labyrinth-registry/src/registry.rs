//! Collectible registry
//!
//! Entry point tying the policies to one set of effects. Every mutating
//! operation takes the registry's [`RegistryGate`], runs inside a fresh
//! [`Transaction`], and commits only if its policy succeeded.
//!
//! The store is single-writer. Registries over the same storage must share
//! one gate, and separate processes must hold an exclusive lock on the
//! backing store (the CLI takes `DataDirLock` from `labyrinth-effects`). The
//! transaction's read-set check only reports writes that land before commit
//! validation; it does not make validate-then-apply atomic.

use crate::identity::{KeyDerivation, OWNER_KEY};
use crate::ledger::{CounterLedger, Counters};
use crate::mint::{MintMode, MintPolicy, MintReceipt};
use crate::transaction::Transaction;
use crate::unlock::{UnlockPolicy, UnlockReceipt};
use labyrinth_core::effects::{RegistryEffects, StorageEffects};
use labyrinth_core::{
    CaveId, CaveRecord, Identity, InvocationContext, KeyId, KeyRecord, LabyrinthError,
    RegistryConfig, Result,
};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Serializes mutating operations across every registry that shares it
#[derive(Debug, Clone, Default)]
pub struct RegistryGate {
    inner: Arc<Mutex<()>>,
}

impl RegistryGate {
    /// A gate no other registry holds yet
    pub fn new() -> Self {
        Self::default()
    }

    async fn enter(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}

/// Paired cave/key registry over one set of effects
pub struct CollectibleRegistry<E> {
    config: RegistryConfig,
    effects: E,
    mint: MintPolicy,
    unlock: UnlockPolicy,
    keys: KeyDerivation,
    gate: RegistryGate,
}

impl<E> std::fmt::Debug for CollectibleRegistry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectibleRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E> CollectibleRegistry<E>
where
    E: RegistryEffects,
{
    /// Build a registry with its own gate after validating `config`
    pub fn new(config: RegistryConfig, effects: E) -> Result<Self> {
        Self::with_gate(config, effects, RegistryGate::new())
    }

    /// Build a registry that serializes through `gate`, for registries
    /// sharing one store
    pub fn with_gate(config: RegistryConfig, effects: E, gate: RegistryGate) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            mint: MintPolicy::from_config(&config),
            unlock: UnlockPolicy::from_config(&config),
            keys: KeyDerivation::new(config.identity_scheme),
            config,
            effects,
            gate,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Underlying effects
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Gate this registry serializes through
    pub fn gate(&self) -> &RegistryGate {
        &self.gate
    }

    /// Write zeroed counters and optionally record the privileged owner.
    ///
    /// Only a registry that has issued nothing can be initialized; resetting
    /// the counters over live records would reissue their ids.
    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self, owner: Option<Identity>) -> Result<Counters> {
        let _serialized = self.gate.enter().await;
        let tx = Transaction::begin(&self.effects);

        let previous = match CounterLedger::load(&tx).await {
            Ok(previous) => previous,
            Err(err) => {
                tx.rollback();
                return Err(err);
            }
        };
        if previous != Counters::default() {
            tx.rollback();
            let err = LabyrinthError::AlreadyInitialized {
                caves: previous.cave,
                keys: previous.key,
            };
            log_rejection(&err);
            return Err(err);
        }

        CounterLedger::reset(&tx).await?;
        if let Some(owner) = &owner {
            tx.store(OWNER_KEY, owner.to_bytes()).await?;
        }

        tx.commit().await?;
        tracing::info!("registry initialized");
        Ok(Counters::default())
    }

    /// Mint a cave (and a key on even ids), charging non-owners the mint price
    #[tracing::instrument(skip(self, ctx), fields(caller = %ctx.caller, payment = %ctx.payment))]
    pub async fn mint(&self, ctx: &InvocationContext) -> Result<MintReceipt> {
        self.run_mint(ctx, MintMode::Public).await
    }

    /// Fee-exempt mint, open only to the privileged owner
    #[tracing::instrument(skip(self, ctx), fields(caller = %ctx.caller))]
    pub async fn mint_privileged(&self, ctx: &InvocationContext) -> Result<MintReceipt> {
        self.run_mint(ctx, MintMode::Privileged).await
    }

    /// Burn the newest key to unlock `cave`
    #[tracing::instrument(skip(self, ctx), fields(caller = %ctx.caller, cave = %cave))]
    pub async fn unlock(&self, ctx: &InvocationContext, cave: CaveId) -> Result<UnlockReceipt> {
        let _serialized = self.gate.enter().await;
        let tx = Transaction::begin(&self.effects);

        match self.unlock.execute(&tx, ctx, cave).await {
            Ok(receipt) => {
                tx.commit().await?;
                tracing::info!(
                    burned = %receipt.burned,
                    counters = %receipt.counters,
                    "cave unlocked"
                );
                Ok(receipt)
            }
            Err(err) => {
                tx.rollback();
                log_rejection(&err);
                Err(err)
            }
        }
    }

    /// Privileged identity: the recorded owner, else the configured one
    pub async fn owner(&self) -> Result<Identity> {
        self.resolve_owner(&self.effects).await
    }

    async fn resolve_owner<S>(&self, storage: &S) -> Result<Identity>
    where
        S: StorageEffects + ?Sized,
    {
        match storage.retrieve(OWNER_KEY).await? {
            Some(bytes) => String::from_utf8(bytes).map(Identity::from).map_err(|e| {
                LabyrinthError::serialization(format!("recorded owner is not UTF-8: {e}"))
            }),
            None => Ok(self.config.owner.clone()),
        }
    }

    /// Current counters
    pub async fn counters(&self) -> Result<Counters> {
        let _serialized = self.gate.enter().await;
        CounterLedger::load(&self.effects).await
    }

    /// Look up one cave; `owner` only matters under the owner-scoped scheme
    pub async fn cave(&self, id: CaveId, owner: &Identity) -> Result<Option<CaveRecord>> {
        self.effects
            .retrieve(&self.keys.cave_key(id, owner))
            .await?
            .map(|bytes| CaveRecord::from_bytes(&bytes))
            .transpose()
    }

    /// Look up one live key; `owner` only matters under the owner-scoped scheme
    pub async fn key(&self, id: KeyId, owner: &Identity) -> Result<Option<KeyRecord>> {
        self.effects
            .retrieve(&self.keys.key_key(id, owner))
            .await?
            .map(|bytes| KeyRecord::from_bytes(&bytes))
            .transpose()
    }

    async fn run_mint(&self, ctx: &InvocationContext, mode: MintMode) -> Result<MintReceipt> {
        let _serialized = self.gate.enter().await;
        let tx = Transaction::begin(&self.effects);

        let owner = match self.resolve_owner(&tx).await {
            Ok(owner) => owner,
            Err(err) => {
                tx.rollback();
                return Err(err);
            }
        };
        match self.mint.execute(&tx, ctx, &owner, mode).await {
            Ok(receipt) => {
                tx.commit().await?;
                tracing::info!(
                    cave = %receipt.cave.number,
                    gemstone = %receipt.cave.gemstone,
                    key = ?receipt.key.map(|k| k.number.number()),
                    counters = %receipt.counters,
                    "cave minted"
                );
                Ok(receipt)
            }
            Err(err) => {
                tx.rollback();
                log_rejection(&err);
                Err(err)
            }
        }
    }
}

fn log_rejection(err: &LabyrinthError) {
    if err.is_rejection() {
        tracing::warn!(error = %err, "operation rejected");
    } else {
        tracing::error!(error = %err, "operation failed");
    }
}
