//! Token records and their storage encoding
//!
//! Records are typed in memory and only turned into the human-readable
//! `Field: value` layout at the storage boundary:
//!
//! - cave: `Number: #<id>, Status: <Locked|Unlocked>, Gemstone: <tier>`
//! - key: `Number: #<id>`
//!
//! Decoding is strict. Every field must be present, in order, with a known
//! value, so a status check never depends on substring matching.

use super::identifiers::{CaveId, KeyId};
use crate::errors::{LabyrinthError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const NUMBER_FIELD: &str = "Number";
const STATUS_FIELD: &str = "Status";
const GEMSTONE_FIELD: &str = "Gemstone";
const FIELD_SEPARATOR: &str = ", ";

/// The two token classes the registry issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenClass {
    /// Primary collectible
    Cave,
    /// Consumable unlock token
    Key,
}

impl TokenClass {
    /// Class name used as the storage key prefix
    pub fn storage_name(self) -> &'static str {
        match self {
            TokenClass::Cave => "CaveLabyrints",
            TokenClass::Key => "LabyrintsKeys",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Cave => write!(f, "Cave"),
            TokenClass::Key => write!(f, "Key"),
        }
    }
}

/// Lock state of a cave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaveStatus {
    /// Freshly minted
    Locked,
    /// A key has been burned for it
    Unlocked,
}

impl CaveStatus {
    fn as_str(self) -> &'static str {
        match self {
            CaveStatus::Locked => "Locked",
            CaveStatus::Unlocked => "Unlocked",
        }
    }
}

impl fmt::Display for CaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaveStatus {
    type Err = LabyrinthError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Locked" => Ok(CaveStatus::Locked),
            "Unlocked" => Ok(CaveStatus::Unlocked),
            other => Err(LabyrinthError::serialization(format!(
                "unknown cave status '{other}'"
            ))),
        }
    }
}

/// Cosmetic rank assigned at mint time, in strictly increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gemstone {
    /// Tier `I`
    I,
    /// Tier `II`
    II,
    /// Tier `III`
    III,
    /// Tier `IIII`
    IIII,
    /// Tier `IIIII`
    IIIII,
}

impl Gemstone {
    /// All tiers in rank order
    pub const ALL: [Gemstone; 5] = [
        Gemstone::I,
        Gemstone::II,
        Gemstone::III,
        Gemstone::IIII,
        Gemstone::IIIII,
    ];

    /// Map an arbitrary entropy value onto a tier
    pub fn from_entropy(value: u64) -> Self {
        // len is 5, the cast cannot truncate
        Self::ALL[(value % Self::ALL.len() as u64) as usize]
    }

    fn as_str(self) -> &'static str {
        match self {
            Gemstone::I => "I",
            Gemstone::II => "II",
            Gemstone::III => "III",
            Gemstone::IIII => "IIII",
            Gemstone::IIIII => "IIIII",
        }
    }
}

impl fmt::Display for Gemstone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gemstone {
    type Err = LabyrinthError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| LabyrinthError::serialization(format!("unknown gemstone tier '{s}'")))
    }
}

/// Metadata of a minted cave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaveRecord {
    /// Sequential id, equal to the cave counter at mint time
    pub number: CaveId,
    /// Current lock state
    pub status: CaveStatus,
    /// Tier drawn at mint time
    pub gemstone: Gemstone,
}

impl CaveRecord {
    /// A freshly minted, locked cave
    pub fn locked(number: CaveId, gemstone: Gemstone) -> Self {
        Self {
            number,
            status: CaveStatus::Locked,
            gemstone,
        }
    }

    /// Whether the cave can still be unlocked
    pub fn is_locked(&self) -> bool {
        self.status == CaveStatus::Locked
    }

    /// Same cave with the status flipped to unlocked
    pub fn unlocked(self) -> Self {
        Self {
            status: CaveStatus::Unlocked,
            ..self
        }
    }

    /// Encode for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decode from storage
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_utf8(bytes)?.parse()
    }
}

impl fmt::Display for CaveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{NUMBER_FIELD}: #{}, {STATUS_FIELD}: {}, {GEMSTONE_FIELD}: {}",
            self.number.number(),
            self.status,
            self.gemstone
        )
    }
}

impl FromStr for CaveRecord {
    type Err = LabyrinthError;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split(FIELD_SEPARATOR);
        let number = parse_number(field(&mut fields, NUMBER_FIELD)?)?;
        let status = field(&mut fields, STATUS_FIELD)?.parse()?;
        let gemstone = field(&mut fields, GEMSTONE_FIELD)?.parse()?;
        if fields.next().is_some() {
            return Err(LabyrinthError::serialization(
                "unexpected trailing field in cave record",
            ));
        }
        Ok(Self {
            number: CaveId(number),
            status,
            gemstone,
        })
    }
}

/// Metadata of a minted key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRecord {
    /// Sequential id, equal to the key counter at mint time
    pub number: KeyId,
}

impl KeyRecord {
    /// Build a key record
    pub fn new(number: KeyId) -> Self {
        Self { number }
    }

    /// Encode for storage
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Decode from storage
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode_utf8(bytes)?.parse()
    }
}

impl fmt::Display for KeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{NUMBER_FIELD}: #{}", self.number.number())
    }
}

impl FromStr for KeyRecord {
    type Err = LabyrinthError;

    fn from_str(s: &str) -> Result<Self> {
        let mut fields = s.split(FIELD_SEPARATOR);
        let number = parse_number(field(&mut fields, NUMBER_FIELD)?)?;
        if fields.next().is_some() {
            return Err(LabyrinthError::serialization(
                "unexpected trailing field in key record",
            ));
        }
        Ok(Self {
            number: KeyId(number),
        })
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| LabyrinthError::serialization(format!("record is not UTF-8: {e}")))
}

fn field<'a>(fields: &mut impl Iterator<Item = &'a str>, name: &str) -> Result<&'a str> {
    let raw = fields
        .next()
        .ok_or_else(|| LabyrinthError::serialization(format!("missing field '{name}'")))?;
    raw.strip_prefix(name)
        .and_then(|rest| rest.strip_prefix(": "))
        .ok_or_else(|| {
            LabyrinthError::serialization(format!("expected field '{name}', found '{raw}'"))
        })
}

fn parse_number(value: &str) -> Result<u64> {
    value
        .strip_prefix('#')
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| LabyrinthError::serialization(format!("invalid token number '{value}'")))
}
