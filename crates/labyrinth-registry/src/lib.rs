//! Labyrinth Registry - paired collectible lifecycle
//!
//! Mints caves and keys and burns keys to unlock caves, keeping the pairing
//! invariants between the two supplies:
//!
//! - after `n` mints and no unlocks there are `n / 2` keys
//! - every unlock burns exactly one live key and decrements the key counter
//! - no cave is unlocked without a key burned in the same operation
//! - caves never exceed `max_caves`; keys stop at `max_keys`, while odd caves
//!   (which pair no key) can still be minted
//!
//! # Architecture
//!
//! - `ledger`: persisted issuance counters
//! - `identity`: storage key derivation, global or owner-scoped
//! - `mint` / `unlock`: the two policies, written against effect traits
//! - `transaction`: staged writes with a read-set check at commit
//! - `registry`: the serialized, transactional entry point

#![forbid(unsafe_code)]

pub mod identity;
pub mod ledger;
pub mod mint;
pub mod registry;
pub mod transaction;
pub mod unlock;

pub use identity::{KeyDerivation, OWNER_KEY};
pub use ledger::{Counter, CounterLedger, Counters};
pub use mint::{pick_gemstone, MintMode, MintPolicy, MintReceipt};
pub use registry::{CollectibleRegistry, RegistryGate};
pub use transaction::{CommitSummary, Transaction};
pub use unlock::{UnlockPolicy, UnlockReceipt};
