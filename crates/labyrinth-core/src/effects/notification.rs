//! Notification effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `labyrinth-effects` (tracing), `labyrinth-testkit` (captured)
//! - **Usage**: Mint, burn and unlock events
//!
//! Fire-and-forget. Handlers give no delivery guarantee and report no errors.

use async_trait::async_trait;
use std::sync::Arc;

/// Sink for human-readable registry events
#[async_trait]
pub trait NotificationEffects: Send + Sync {
    /// Emit one event
    async fn emit(&self, message: &str);
}

#[async_trait]
impl<T: NotificationEffects + ?Sized> NotificationEffects for Arc<T> {
    async fn emit(&self, message: &str) {
        (**self).emit(message).await;
    }
}
