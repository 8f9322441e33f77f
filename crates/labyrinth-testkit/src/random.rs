//! Mock random effect handlers for testing
//!
//! Deterministic entropy: either a seeded ChaCha stream or a fixed script of
//! values replayed in a loop.

use async_trait::async_trait;
use labyrinth_core::effects::RandomEffects;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
enum Source {
    Seeded(ChaCha8Rng),
    Scripted { values: Vec<u64>, next: usize },
}

/// Deterministic random handler
#[derive(Debug, Clone)]
pub struct MockRandomHandler {
    source: Arc<Mutex<Source>>,
}

impl Default for MockRandomHandler {
    fn default() -> Self {
        Self::with_seed(42)
    }
}

impl MockRandomHandler {
    /// Reproducible stream from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self {
            source: Arc::new(Mutex::new(Source::Seeded(ChaCha8Rng::seed_from_u64(seed)))),
        }
    }

    /// Replay `values` in order, wrapping around; an empty script yields zeros
    pub fn scripted(values: impl Into<Vec<u64>>) -> Self {
        Self {
            source: Arc::new(Mutex::new(Source::Scripted {
                values: values.into(),
                next: 0,
            })),
        }
    }

    /// Always `value`
    pub fn constant(value: u64) -> Self {
        Self::scripted(vec![value])
    }

    fn next_value(&self) -> u64 {
        let mut source = self.source.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *source {
            Source::Seeded(rng) => rng.next_u64(),
            Source::Scripted { values, next } => {
                if values.is_empty() {
                    return 0;
                }
                let value = values[*next % values.len()];
                *next += 1;
                value
            }
        }
    }
}

#[async_trait]
impl RandomEffects for MockRandomHandler {
    async fn random_u64(&self) -> u64 {
        self.next_value()
    }
}
