//! Property test strategies for registry operations
//!
//! Operations are drawn over a small pool of callers so that owner checks,
//! owner-scoped lookups and repeated unlocks of the same cave all show up in
//! short sequences.

use labyrinth_core::{Amount, CaveId, Identity, InvocationContext};
use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// Caller names used by the strategies; index 0 is the registry owner
pub const CALLERS: [&str; 3] = ["owner", "alice", "bob"];

/// Owner identity matching `CALLERS[0]`
pub fn owner() -> Identity {
    Identity::new(CALLERS[0])
}

/// One registry call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryOp {
    /// Public mint
    Mint(InvocationContext),
    /// Owner-only mint
    MintPrivileged(InvocationContext),
    /// Unlock a cave
    Unlock(InvocationContext, CaveId),
}

/// Strategy for a caller from the pool
pub fn arb_caller() -> impl Strategy<Value = Identity> + Clone {
    prop::sample::select(CALLERS.to_vec()).prop_map(Identity::new)
}

/// Strategy for a payment around `price`: zero, just short, exact, or over
pub fn arb_payment(price: u64) -> impl Strategy<Value = Amount> + Clone {
    prop_oneof![
        Just(Amount::ZERO),
        Just(Amount(price.saturating_sub(1))),
        Just(Amount(price)),
        (price..price.saturating_add(1_000)).prop_map(Amount),
    ]
}

/// Strategy for a registry call; unlocks target caves `1..=max_cave`
pub fn arb_registry_op(price: u64, max_cave: u64) -> impl Strategy<Value = RegistryOp> {
    let ctx = (arb_caller(), arb_payment(price))
        .prop_map(|(caller, payment)| InvocationContext { caller, payment });
    prop_oneof![
        4 => ctx.clone().prop_map(RegistryOp::Mint),
        1 => ctx.clone().prop_map(RegistryOp::MintPrivileged),
        3 => (ctx, 1..=max_cave.max(1)).prop_map(|(ctx, id)| RegistryOp::Unlock(ctx, CaveId(id))),
    ]
}

/// Strategy for a sequence of registry calls
pub fn arb_registry_ops(
    price: u64,
    max_cave: u64,
    len: std::ops::Range<usize>,
) -> impl Strategy<Value = Vec<RegistryOp>> {
    prop::collection::vec(arb_registry_op(price, max_cave), len)
}
