//! Random effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `labyrinth-effects` (OS randomness), `labyrinth-testkit` (scripted)
//! - **Usage**: Gemstone selection
//!
//! No statistical quality is required of implementations. The values only
//! pick cosmetic tiers.

use async_trait::async_trait;
use std::sync::Arc;

/// Entropy source
#[async_trait]
pub trait RandomEffects: Send + Sync {
    /// Next random value
    async fn random_u64(&self) -> u64;

    /// Value in `min..max`; returns `min` when the range is empty
    async fn random_range(&self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + self.random_u64().await % (max - min)
    }
}

#[async_trait]
impl<T: RandomEffects + ?Sized> RandomEffects for Arc<T> {
    async fn random_u64(&self) -> u64 {
        (**self).random_u64().await
    }

    async fn random_range(&self, min: u64, max: u64) -> u64 {
        (**self).random_range(min, max).await
    }
}
