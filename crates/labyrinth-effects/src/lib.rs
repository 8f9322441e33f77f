//! Labyrinth Effects - production effect handlers
//!
//! Stateless implementations of the effect traits from `labyrinth-core`:
//!
//! - [`FilesystemStorageHandler`]: one file per key under a data directory
//! - [`RealRandomHandler`]: thread-local OS-seeded randomness
//! - [`TracingNotificationHandler`]: events forwarded to `tracing`
//! - [`ProductionEffects`]: all three behind one value
//! - [`DataDirLock`]: exclusive use of a data directory across processes
//!
//! Stateful handlers for tests live in `labyrinth-testkit`.

#![forbid(unsafe_code)]

pub mod lock;
pub mod notification;
pub mod random;
pub mod storage;
pub mod system;

pub use lock::DataDirLock;
pub use notification::{TracingNotificationHandler, EVENT_TARGET};
pub use random::RealRandomHandler;
pub use storage::FilesystemStorageHandler;
pub use system::ProductionEffects;
