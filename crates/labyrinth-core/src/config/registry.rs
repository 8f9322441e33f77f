//! Registry configuration
//!
//! Layering: built-in defaults, then an optional TOML file, then `LABYRINTH_*`
//! environment variables. [`RegistryConfig::validate`] runs last.

use super::validation::ConfigValidator;
use crate::errors::{LabyrinthError, Result};
use crate::types::{Amount, Identity};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "LABYRINTH_";

/// Default cave supply cap
pub const DEFAULT_MAX_CAVES: u64 = 1000;
/// Default key supply cap
pub const DEFAULT_MAX_KEYS: u64 = 500;
/// Default public mint price (0.1 of the native coin)
pub const DEFAULT_MINT_PRICE: u64 = 100_000_000_000;
/// Default privileged identity
pub const DEFAULT_OWNER: &str = "AU125B4vA84Fbq4kAs5fX15JJ3AkUneA3YKDyJseQxv7Cmv9EDSc6";
/// Address named in burn events
pub const DEFAULT_BURN_ADDRESS: &str = "0000000000000000000000000000000000000000000000000000";

/// How token storage keys are derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityScheme {
    /// `<Class>_<id>`; any caller may unlock any cave
    #[default]
    Global,
    /// `<Class>_<id>_<owner>`; tokens are visible only to their minter
    OwnerScoped,
}

impl std::str::FromStr for IdentityScheme {
    type Err = LabyrinthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "global" => Ok(Self::Global),
            "owner_scoped" => Ok(Self::OwnerScoped),
            other => Err(LabyrinthError::invalid(format!(
                "unknown identity scheme '{other}', expected 'global' or 'owner_scoped'"
            ))),
        }
    }
}

/// Supply caps, fees and identities for one registry instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum number of caves ever minted
    pub max_caves: u64,
    /// Maximum key counter value at which keys are still minted
    pub max_keys: u64,
    /// Payment required from non-privileged minters
    pub mint_price: Amount,
    /// Payment required to unlock; zero disables the fee gate
    pub unlock_fee: Amount,
    /// Fallback privileged identity when none was recorded at initialization
    pub owner: Identity,
    /// Storage key derivation variant
    pub identity_scheme: IdentityScheme,
    /// Address named in burn events
    pub burn_address: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_caves: DEFAULT_MAX_CAVES,
            max_keys: DEFAULT_MAX_KEYS,
            mint_price: Amount(DEFAULT_MINT_PRICE),
            unlock_fee: Amount::ZERO,
            owner: Identity::new(DEFAULT_OWNER),
            identity_scheme: IdentityScheme::Global,
            burn_address: DEFAULT_BURN_ADDRESS.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Parse a TOML document; missing fields keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LabyrinthError::invalid(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LabyrinthError::invalid(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `LABYRINTH_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `LABYRINTH_*` overrides from an explicit variable list
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            if let Some(field) = key.as_ref().strip_prefix(ENV_PREFIX) {
                self.set_from_string(&field.to_lowercase(), value.as_ref())?;
            }
        }
        Ok(())
    }

    /// Set one field from its string form, used for env and CLI overrides
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "max_caves" => self.max_caves = parse_u64(key, value)?,
            "max_keys" => self.max_keys = parse_u64(key, value)?,
            "mint_price" => self.mint_price = Amount(parse_u64(key, value)?),
            "unlock_fee" => self.unlock_fee = Amount(parse_u64(key, value)?),
            "owner" => self.owner = Identity::new(value),
            "identity_scheme" => self.identity_scheme = value.parse()?,
            "burn_address" => self.burn_address = value.to_string(),
            // Unrelated LABYRINTH_* variables such as LABYRINTH_LOG are not ours.
            _ => tracing::debug!(key, "ignoring unknown configuration key"),
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ConfigValidator::new()
            .require_at_least("max_caves", self.max_caves, 1)
            .require_at_least("max_keys", self.max_keys, 1)
            .require_at_most("max_keys", self.max_keys, self.max_caves)
            .require_non_empty("owner", self.owner.as_str())
            .require_no_whitespace("owner", self.owner.as_str())
            .require_non_empty("burn_address", &self.burn_address)
            .finish()
            .map_err(LabyrinthError::from)
    }

    /// Defaults, then `path` if given, then the environment, then validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .replace('_', "")
        .parse()
        .map_err(|e| LabyrinthError::invalid(format!("'{key}' expects an unsigned integer: {e}")))
}
