//! Mock notification handler for testing

use async_trait::async_trait;
use labyrinth_core::effects::NotificationEffects;
use std::sync::{Arc, Mutex};

/// Captures every emitted event in order
#[derive(Debug, Clone, Default)]
pub struct MockNotificationHandler {
    events: Arc<Mutex<Vec<String>>>,
}

impl MockNotificationHandler {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events (for testing)
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Captured events starting with `prefix` (for testing)
    pub fn events_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    /// Forget captured events (for testing)
    pub fn clear(&self) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl NotificationEffects for MockNotificationHandler {
    async fn emit(&self, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
