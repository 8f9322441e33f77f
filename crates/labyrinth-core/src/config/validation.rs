//! Configuration validation utilities and rules

use crate::errors::LabyrinthError;
use std::fmt;

/// Configuration validation result
pub type ValidationResult = Result<(), ValidationError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value is required but missing
    Required { field: String },
    /// Value is out of acceptable range
    OutOfRange {
        field: String,
        min: Option<u64>,
        max: Option<u64>,
        actual: u64,
    },
    /// Value format is invalid
    InvalidFormat {
        field: String,
        expected: String,
        actual: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { field } => {
                write!(f, "Field '{field}' is required but missing")
            }
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => {
                let range_desc = match (min, max) {
                    (Some(min), Some(max)) => format!("between {min} and {max}"),
                    (Some(min), None) => format!("at least {min}"),
                    (None, Some(max)) => format!("at most {max}"),
                    (None, None) => "in valid range".to_string(),
                };
                write!(f, "Field '{field}' must be {range_desc} (got {actual})")
            }
            ValidationError::InvalidFormat {
                field,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Field '{field}' has invalid format. Expected: {expected}, got: {actual}"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for LabyrinthError {
    fn from(err: ValidationError) -> Self {
        LabyrinthError::invalid(err.to_string())
    }
}

/// Configuration validator that accumulates validation rules
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
}

impl ConfigValidator {
    /// Start an empty validation pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-empty string
    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Required {
                field: field.to_string(),
            });
        }
        self
    }

    /// Require `min <= value`
    pub fn require_at_least(&mut self, field: &str, value: u64, min: u64) -> &mut Self {
        if value < min {
            self.errors.push(ValidationError::OutOfRange {
                field: field.to_string(),
                min: Some(min),
                max: None,
                actual: value,
            });
        }
        self
    }

    /// Require `value <= max`
    pub fn require_at_most(&mut self, field: &str, value: u64, max: u64) -> &mut Self {
        if value > max {
            self.errors.push(ValidationError::OutOfRange {
                field: field.to_string(),
                min: None,
                max: Some(max),
                actual: value,
            });
        }
        self
    }

    /// Require a string without whitespace
    pub fn require_no_whitespace(&mut self, field: &str, value: &str) -> &mut Self {
        if value.chars().any(char::is_whitespace) {
            self.errors.push(ValidationError::InvalidFormat {
                field: field.to_string(),
                expected: "identity without whitespace".to_string(),
                actual: value.to_string(),
            });
        }
        self
    }

    /// Accumulated errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// First accumulated error, if any
    pub fn finish(&self) -> ValidationResult {
        match self.errors.first() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
