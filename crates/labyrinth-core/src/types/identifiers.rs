//! Identifiers and amounts passed across the registry boundary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, comparable identity of an invocation's initiator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identity string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw bytes as persisted under the owner key
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Native value in the smallest denomination
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(pub u64);

impl Amount {
    /// No value attached
    pub const ZERO: Amount = Amount(0);

    /// Raw value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

macro_rules! token_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Sequential number of the token
            pub fn number(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

token_id!(CaveId, "1-based sequential id of a cave token");
token_id!(KeyId, "1-based sequential id of a key token");

/// Who is calling and what they attached.
///
/// Ambient host context made explicit so registry operations stay pure
/// functions of their inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationContext {
    /// Initiator of the call
    pub caller: Identity,
    /// Value transferred with the call
    pub payment: Amount,
}

impl InvocationContext {
    /// Build a context
    pub fn new(caller: impl Into<Identity>, payment: impl Into<Amount>) -> Self {
        Self {
            caller: caller.into(),
            payment: payment.into(),
        }
    }

    /// Context with nothing attached
    pub fn unpaid(caller: impl Into<Identity>) -> Self {
        Self::new(caller, Amount::ZERO)
    }
}
