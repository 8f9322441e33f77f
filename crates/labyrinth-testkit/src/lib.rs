//! Labyrinth Testkit - stateful handlers for tests
//!
//! Production handlers in `labyrinth-effects` are stateless. Tests need state
//! to inspect: what was stored, what was emitted, which entropy was drawn.
//! Those handlers live here.
//!
//! ```rust,ignore
//! use labyrinth_testkit::TestEffects;
//!
//! let effects = TestEffects::new();
//! let registry = CollectibleRegistry::new(RegistryConfig::default(), effects)?;
//! registry.mint(&InvocationContext::new("alice", price)).await?;
//! assert_eq!(registry.effects().events().len(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod effects;
pub mod notification;
pub mod random;
pub mod storage;
pub mod strategies;

pub use effects::TestEffects;
pub use notification::MockNotificationHandler;
pub use random::MockRandomHandler;
pub use storage::MemoryStorageHandler;
