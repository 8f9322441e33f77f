//! Configuration for registry instances

pub mod registry;
pub mod validation;

pub use registry::{IdentityScheme, RegistryConfig};
pub use validation::{ConfigValidator, ValidationError, ValidationResult};
