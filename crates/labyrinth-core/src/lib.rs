//! Labyrinth Core - types and interfaces for the paired collectible registry
//!
//! The registry mints two linked token classes: caves, which start locked,
//! and scarcer keys, which exist only to be burned to unlock a cave. This
//! crate holds everything the registry and its handlers share; it has no
//! implementation of any effect.
//!
//! # Contents
//!
//! - `types`: identities, token ids, records and their storage encoding
//! - `effects`: storage, random and notification effect traits
//! - `config`: supply caps, fees, owner and identity scheme
//! - `errors`: the unified error taxonomy

#![forbid(unsafe_code)]

/// Identities, token ids and records
pub mod types;

/// Pure effect interfaces (no implementations)
pub mod effects;

/// Registry configuration
pub mod config;

/// Unified error handling
pub mod errors;

pub use config::{IdentityScheme, RegistryConfig};
pub use errors::{LabyrinthError, Result, Supply};
pub use types::{
    Amount, CaveId, CaveRecord, CaveStatus, Gemstone, Identity, InvocationContext, KeyId,
    KeyRecord, TokenClass,
};
