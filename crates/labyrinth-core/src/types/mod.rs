//! Domain types for the collectible registry

pub mod identifiers;
pub mod token;

pub use identifiers::{Amount, CaveId, Identity, InvocationContext, KeyId};
pub use token::{CaveRecord, CaveStatus, Gemstone, KeyRecord, TokenClass};
