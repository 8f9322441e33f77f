//! Mint policy
//!
//! Decides whether a caller may mint, what they pay, and whether the new cave
//! comes with a key. Every even cave id pairs one key, so after `n` mints with
//! no unlocks there are exactly `n / 2` keys.

use crate::identity::KeyDerivation;
use crate::ledger::{CounterLedger, Counters};
use labyrinth_core::effects::RegistryEffects;
use labyrinth_core::{
    Amount, CaveId, CaveRecord, Gemstone, Identity, InvocationContext, KeyId, KeyRecord,
    LabyrinthError, RegistryConfig, Result, Supply, TokenClass,
};

/// Who is asking for the mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintMode {
    /// Anyone; pays the mint price unless they are the owner
    Public,
    /// Owner only; never pays
    Privileged,
}

/// Outcome of a successful mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintReceipt {
    /// The new cave
    pub cave: CaveRecord,
    /// The key paired with an even cave
    pub key: Option<KeyRecord>,
    /// Counters after the mint
    pub counters: Counters,
}

/// Eligibility, fee and pairing rules for new caves
#[derive(Debug, Clone)]
pub struct MintPolicy {
    max_caves: u64,
    max_keys: u64,
    price: Amount,
    keys: KeyDerivation,
}

impl MintPolicy {
    /// Policy for `config`
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            max_caves: config.max_caves,
            max_keys: config.max_keys,
            price: config.mint_price,
            keys: KeyDerivation::new(config.identity_scheme),
        }
    }

    /// Check the caller against the payment and privilege rules
    pub fn authorize(
        &self,
        ctx: &InvocationContext,
        owner: &Identity,
        mode: MintMode,
    ) -> Result<()> {
        let privileged = &ctx.caller == owner;
        match mode {
            MintMode::Privileged if !privileged => Err(LabyrinthError::Unauthorized {
                caller: ctx.caller.to_string(),
            }),
            MintMode::Public if !privileged && ctx.payment < self.price => {
                Err(LabyrinthError::InsufficientPayment {
                    required: self.price.value(),
                    provided: ctx.payment.value(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Check both supply caps against the current counters
    pub fn check_supply(&self, counters: Counters) -> Result<()> {
        if counters.cave >= self.max_caves {
            return Err(LabyrinthError::SupplyExhausted(Supply::Cave));
        }
        let next_is_odd = (counters.cave + 1) % 2 == 1;
        if counters.key >= self.max_keys && !next_is_odd {
            return Err(LabyrinthError::SupplyExhausted(Supply::Key));
        }
        Ok(())
    }

    /// Mint the next cave, and its key when the new cave id is even
    pub async fn execute<E>(
        &self,
        effects: &E,
        ctx: &InvocationContext,
        owner: &Identity,
        mode: MintMode,
    ) -> Result<MintReceipt>
    where
        E: RegistryEffects + ?Sized,
    {
        self.authorize(ctx, owner, mode)?;

        let before = CounterLedger::load(effects).await?;
        self.check_supply(before)?;
        let mut after = before;

        after.cave += 1;
        let cave = CaveRecord::locked(CaveId(after.cave), pick_gemstone(effects).await);
        effects
            .store(&self.keys.cave_key(cave.number, &ctx.caller), cave.to_bytes())
            .await?;
        effects
            .emit(&format!(
                "Minted {} #{} for {}. Metadata: {cave}",
                TokenClass::Cave.storage_name(),
                after.cave,
                ctx.caller
            ))
            .await;

        let key = if after.cave % 2 == 0 {
            after.key += 1;
            let key = KeyRecord::new(KeyId(after.key));
            effects
                .store(&self.keys.key_key(key.number, &ctx.caller), key.to_bytes())
                .await?;
            effects
                .emit(&format!(
                    "Minted {} #{} for {}. Metadata: {key}",
                    TokenClass::Key.storage_name(),
                    after.key,
                    ctx.caller
                ))
                .await;
            Some(key)
        } else {
            None
        };

        CounterLedger::persist(effects, before, after).await?;

        Ok(MintReceipt {
            cave,
            key,
            counters: after,
        })
    }
}

/// Draw a cosmetic tier from the entropy source
pub async fn pick_gemstone<E>(effects: &E) -> Gemstone
where
    E: RegistryEffects + ?Sized,
{
    Gemstone::from_entropy(effects.random_range(0, Gemstone::ALL.len() as u64).await)
}
