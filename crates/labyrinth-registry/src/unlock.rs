//! Unlock policy
//!
//! Burns one key to flip a locked cave to unlocked. Keys form a fungible
//! stack addressed only by the key counter: the key burned is always the
//! newest live one, whichever cave it was minted alongside.

use crate::identity::KeyDerivation;
use crate::ledger::{CounterLedger, Counters};
use labyrinth_core::effects::RegistryEffects;
use labyrinth_core::{
    Amount, CaveId, CaveRecord, InvocationContext, KeyId, LabyrinthError, RegistryConfig,
    Result, Supply, TokenClass,
};

/// Outcome of a successful unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockReceipt {
    /// The cave after the transition
    pub cave: CaveRecord,
    /// Key that was burned
    pub burned: KeyId,
    /// Counters after the unlock
    pub counters: Counters,
}

/// Validates and executes the key-for-unlock exchange
#[derive(Debug, Clone)]
pub struct UnlockPolicy {
    fee: Amount,
    burn_address: String,
    keys: KeyDerivation,
}

impl UnlockPolicy {
    /// Policy for `config`
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            fee: config.unlock_fee,
            burn_address: config.burn_address.clone(),
            keys: KeyDerivation::new(config.identity_scheme),
        }
    }

    /// Check the attached payment against the unlock fee; a zero fee never gates
    pub fn check_fee(&self, ctx: &InvocationContext) -> Result<()> {
        if ctx.payment < self.fee {
            return Err(LabyrinthError::InsufficientPayment {
                required: self.fee.value(),
                provided: ctx.payment.value(),
            });
        }
        Ok(())
    }

    /// Burn the newest key and unlock `cave_id`
    pub async fn execute<E>(
        &self,
        effects: &E,
        ctx: &InvocationContext,
        cave_id: CaveId,
    ) -> Result<UnlockReceipt>
    where
        E: RegistryEffects + ?Sized,
    {
        self.check_fee(ctx)?;

        let cave_key = self.keys.cave_key(cave_id, &ctx.caller);
        let cave = match effects.retrieve(&cave_key).await? {
            Some(bytes) => CaveRecord::from_bytes(&bytes)?,
            None => {
                return Err(LabyrinthError::not_found(
                    TokenClass::Cave,
                    cave_id.number(),
                ))
            }
        };
        if !cave.is_locked() {
            return Err(LabyrinthError::AlreadyUnlocked {
                number: cave_id.number(),
            });
        }

        let before = CounterLedger::load(effects).await?;
        if before.key == 0 {
            return Err(LabyrinthError::SupplyExhausted(Supply::NoKeysAvailable));
        }
        let burned = KeyId(before.key);
        let key_key = self.keys.key_key(burned, &ctx.caller);
        if !effects.exists(&key_key).await? {
            tracing::error!(
                key = %burned,
                "key counter points at a missing key record"
            );
            return Err(LabyrinthError::not_found(TokenClass::Key, burned.number()));
        }

        effects.remove(&key_key).await?;
        effects
            .emit(&format!(
                "Burned {} #{} from {} to burn address {}.",
                TokenClass::Key.storage_name(),
                burned.number(),
                ctx.caller,
                self.burn_address
            ))
            .await;

        let unlocked = cave.unlocked();
        effects.store(&cave_key, unlocked.to_bytes()).await?;
        effects
            .emit(&format!(
                "Unlocked {} #{}. Metadata: {unlocked}",
                TokenClass::Cave.storage_name(),
                cave_id.number()
            ))
            .await;

        let after = Counters {
            key: before.key - 1,
            ..before
        };
        CounterLedger::persist(effects, before, after).await?;

        Ok(UnlockReceipt {
            cave: unlocked,
            burned,
            counters: after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn zero_fee_accepts_unpaid_calls() {
        let policy = UnlockPolicy::from_config(&RegistryConfig::default());
        policy.check_fee(&InvocationContext::unpaid("alice")).unwrap();
    }

    #[test]
    fn fee_gate_rejects_short_payment() {
        let policy = UnlockPolicy::from_config(&RegistryConfig {
            unlock_fee: Amount(50),
            ..RegistryConfig::default()
        });
        assert_matches!(
            policy.check_fee(&InvocationContext::new("alice", 49u64)),
            Err(LabyrinthError::InsufficientPayment {
                required: 50,
                provided: 49
            })
        );
        policy
            .check_fee(&InvocationContext::new("alice", 50u64))
            .unwrap();
    }
}
