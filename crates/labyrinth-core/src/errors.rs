//! Unified error system for the labyrinth registry
//!
//! A single error type carries every rejection the registry can produce. The
//! precondition variants mirror the registry's taxonomy one to one; the
//! trailing variants cover infrastructure failures underneath it.

use crate::types::TokenClass;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which supply ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supply {
    /// Every cave up to the cap has been minted
    Cave,
    /// Every key up to the cap has been minted and the next cave would pair one
    Key,
    /// No live key is left to burn
    NoKeysAvailable,
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Supply::Cave => write!(f, "Cave"),
            Supply::Key => write!(f, "Key"),
            Supply::NoKeysAvailable => write!(f, "NoKeysAvailable"),
        }
    }
}

/// Unified error type for all registry operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LabyrinthError {
    /// Attached payment is below the required amount
    #[error("Insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        /// Amount the operation requires
        required: u64,
        /// Amount that was attached
        provided: u64,
    },

    /// A supply cap has been reached
    #[error("Supply exhausted: {0}")]
    SupplyExhausted(Supply),

    /// No record exists at the derived storage key
    #[error("Not found: {class} #{number}")]
    NotFound {
        /// Token class that was looked up
        class: TokenClass,
        /// Token number that was looked up
        number: u64,
    },

    /// The cave has already been unlocked
    #[error("Invalid state: cave #{number} is already unlocked")]
    AlreadyUnlocked {
        /// Number of the cave
        number: u64,
    },

    /// Tokens were already issued, so the counters cannot be reset
    #[error("Invalid state: registry already issued {caves} caves and holds {keys} keys")]
    AlreadyInitialized {
        /// Current cave counter
        caves: u64,
        /// Current key counter
        keys: u64,
    },

    /// Caller is not the privileged identity
    #[error("Unauthorized: {caller} is not the registry owner")]
    Unauthorized {
        /// Identity that attempted the privileged operation
        caller: String,
    },

    /// A key read by the transaction changed before commit
    #[error("Conflict: {key} changed during the operation")]
    Conflict {
        /// Storage key that changed
        key: String,
    },

    /// Storage backend failed
    #[error("Storage error: {message}")]
    Storage {
        /// Error message describing the storage failure
        message: String,
    },

    /// Stored bytes could not be decoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the decoding failure
        message: String,
    },

    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },
}

impl LabyrinthError {
    /// Create a not found error for a token
    pub fn not_found(class: TokenClass, number: u64) -> Self {
        Self::NotFound { class, number }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// True for precondition rejections the caller can fix by changing the
    /// request; false for backend and decoding failures.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientPayment { .. }
                | Self::SupplyExhausted(_)
                | Self::NotFound { .. }
                | Self::AlreadyUnlocked { .. }
                | Self::AlreadyInitialized { .. }
                | Self::Unauthorized { .. }
        )
    }
}

/// Standard result type for registry operations
pub type Result<T> = std::result::Result<T, LabyrinthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_classification() {
        assert!(LabyrinthError::SupplyExhausted(Supply::Cave).is_rejection());
        assert!(LabyrinthError::not_found(TokenClass::Key, 3).is_rejection());
        assert!(LabyrinthError::AlreadyInitialized { caves: 2, keys: 1 }.is_rejection());
        assert!(!LabyrinthError::storage("disk full").is_rejection());
        assert!(!LabyrinthError::Conflict {
            key: "CaveCounter".into()
        }
        .is_rejection());
    }

    #[test]
    fn messages_name_the_token() {
        let err = LabyrinthError::not_found(TokenClass::Cave, 7);
        assert_eq!(err.to_string(), "Not found: Cave #7");

        let err = LabyrinthError::SupplyExhausted(Supply::NoKeysAvailable);
        assert_eq!(err.to_string(), "Supply exhausted: NoKeysAvailable");
    }
}
