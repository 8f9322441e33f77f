//! Core effect trait definitions
//!
//! Pure trait definitions for every side effect the registry performs.
//! This module defines **what** effects can be performed; handlers define **how**.
//!
//! - **Storage**: persistent key-value store
//! - **Random**: entropy for gemstone tiers
//! - **Notification**: event emission
//!
//! Caller identity and attached payment are not effects. They travel as an
//! explicit [`InvocationContext`](crate::types::InvocationContext).

pub mod notification;
pub mod random;
pub mod storage;
pub mod supertraits;

pub use notification::NotificationEffects;
pub use random::RandomEffects;
pub use storage::{StorageEffects, StorageError};
pub use supertraits::RegistryEffects;
