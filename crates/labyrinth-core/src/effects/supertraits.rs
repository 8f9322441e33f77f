//! Composite effect bounds

use super::{NotificationEffects, RandomEffects, StorageEffects};

/// Everything a registry operation touches
pub trait RegistryEffects: StorageEffects + RandomEffects + NotificationEffects {}

impl<T> RegistryEffects for T where T: StorageEffects + RandomEffects + NotificationEffects + ?Sized {}
