//! Storage key derivation
//!
//! A pure mapping `(class, id[, owner]) -> key`. Which variant applies is
//! fixed per registry instance by [`IdentityScheme`].

use labyrinth_core::{CaveId, Identity, IdentityScheme, KeyId, TokenClass};

/// Storage key of the recorded privileged identity
pub const OWNER_KEY: &str = "Owner";

/// Derives record keys for one identity scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDerivation {
    scheme: IdentityScheme,
}

impl KeyDerivation {
    /// Derivation for `scheme`
    pub fn new(scheme: IdentityScheme) -> Self {
        Self { scheme }
    }

    /// Scheme in use
    pub fn scheme(&self) -> IdentityScheme {
        self.scheme
    }

    /// Key for token `number` of `class`; `owner` is ignored by the global scheme
    pub fn token_key(&self, class: TokenClass, number: u64, owner: &Identity) -> String {
        match self.scheme {
            IdentityScheme::Global => format!("{}_{number}", class.storage_name()),
            IdentityScheme::OwnerScoped => {
                format!("{}_{number}_{owner}", class.storage_name())
            }
        }
    }

    /// Key of a cave record
    pub fn cave_key(&self, id: CaveId, owner: &Identity) -> String {
        self.token_key(TokenClass::Cave, id.number(), owner)
    }

    /// Key of a key record
    pub fn key_key(&self, id: KeyId, owner: &Identity) -> String {
        self.token_key(TokenClass::Key, id.number(), owner)
    }
}
