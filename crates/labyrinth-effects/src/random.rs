//! Random effect handlers
//!
//! Standard implementation of the `RandomEffects` trait defined in
//! `labyrinth-core`. This is the handler layer, so it is the one place that
//! reaches for `rand::thread_rng()` directly.

use async_trait::async_trait;
use labyrinth_core::effects::RandomEffects;
use rand::Rng;

/// Random handler backed by the thread-local OS-seeded generator
#[derive(Debug, Clone, Default)]
pub struct RealRandomHandler;

impl RealRandomHandler {
    /// Create a new real random handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RandomEffects for RealRandomHandler {
    async fn random_u64(&self) -> u64 {
        rand::thread_rng().gen()
    }

    async fn random_range(&self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..max)
    }
}
