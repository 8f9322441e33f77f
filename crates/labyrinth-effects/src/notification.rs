//! Notification effect handlers
//!
//! Forwards registry events to `tracing` under the `labyrinth::events`
//! target, so they land wherever the process subscriber sends its logs.

use async_trait::async_trait;
use labyrinth_core::effects::NotificationEffects;

/// Tracing target for registry events
pub const EVENT_TARGET: &str = "labyrinth::events";

/// Notification handler that logs each event at info level
#[derive(Debug, Clone, Default)]
pub struct TracingNotificationHandler;

impl TracingNotificationHandler {
    /// Create a new tracing notification handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationEffects for TracingNotificationHandler {
    async fn emit(&self, message: &str) {
        tracing::info!(target: EVENT_TARGET, "{message}");
    }
}
