//! End-to-end registry scenarios over the in-memory test effects.

use assert_matches::assert_matches;
use labyrinth_core::config::registry::DEFAULT_MINT_PRICE;
use labyrinth_core::effects::StorageEffects;
use labyrinth_core::{
    Amount, CaveId, CaveStatus, Gemstone, Identity, IdentityScheme, InvocationContext, KeyId,
    LabyrinthError, RegistryConfig, Supply, TokenClass,
};
use labyrinth_registry::{CollectibleRegistry, Counters};
use labyrinth_testkit::{MockRandomHandler, TestEffects};

const OWNER: &str = "AU1owner";
const ALICE: &str = "AU1alice";
const BOB: &str = "AU1bob";

fn config() -> RegistryConfig {
    RegistryConfig {
        owner: Identity::new(OWNER),
        ..RegistryConfig::default()
    }
}

async fn registry_with(config: RegistryConfig) -> CollectibleRegistry<TestEffects> {
    let registry = CollectibleRegistry::new(config, TestEffects::new()).unwrap();
    registry.initialize(None).await.unwrap();
    registry.effects().clear_events();
    registry
}

fn paid(caller: &str) -> InvocationContext {
    InvocationContext::new(caller, DEFAULT_MINT_PRICE)
}

#[tokio::test]
async fn scenario_a_first_mint_is_a_lone_cave() {
    let registry = registry_with(config()).await;

    let receipt = registry.mint(&paid(ALICE)).await.unwrap();

    assert_eq!(receipt.cave.number, CaveId(1));
    assert_eq!(receipt.cave.status, CaveStatus::Locked);
    assert_eq!(receipt.key, None);
    assert_eq!(registry.counters().await.unwrap(), Counters::new(1, 0));
    assert!(registry
        .effects()
        .list_keys(Some("LabyrintsKeys_"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn scenario_b_second_mint_pairs_a_key() {
    let registry = registry_with(config()).await;
    registry.mint(&paid(ALICE)).await.unwrap();

    let receipt = registry.mint(&paid(ALICE)).await.unwrap();

    assert_eq!(receipt.cave.number, CaveId(2));
    assert_eq!(receipt.cave.status, CaveStatus::Locked);
    assert_eq!(receipt.key.map(|k| k.number), Some(KeyId(1)));
    assert_eq!(registry.counters().await.unwrap(), Counters::new(2, 1));
    assert!(registry
        .key(KeyId(1), &Identity::new(ALICE))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn scenario_c_unlock_burns_the_key() {
    let registry = registry_with(RegistryConfig {
        unlock_fee: Amount(5),
        ..config()
    })
    .await;
    registry.mint(&paid(ALICE)).await.unwrap();
    registry.mint(&paid(ALICE)).await.unwrap();

    let receipt = registry
        .unlock(&InvocationContext::new(ALICE, 5u64), CaveId(2))
        .await
        .unwrap();

    assert_eq!(receipt.burned, KeyId(1));
    assert_eq!(receipt.cave.status, CaveStatus::Unlocked);
    assert_eq!(registry.counters().await.unwrap(), Counters::new(2, 0));
    assert_eq!(
        registry.key(KeyId(1), &Identity::new(ALICE)).await.unwrap(),
        None
    );
    let cave = registry
        .cave(CaveId(2), &Identity::new(ALICE))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cave.status, CaveStatus::Unlocked);
}

#[tokio::test]
async fn scenario_d_second_unlock_is_rejected() {
    let registry = registry_with(config()).await;
    for _ in 0..4 {
        registry.mint(&paid(ALICE)).await.unwrap();
    }
    let alice = InvocationContext::unpaid(ALICE);
    registry.unlock(&alice, CaveId(2)).await.unwrap();
    let before = registry.effects().snapshot().await;

    assert_matches!(
        registry.unlock(&alice, CaveId(2)).await,
        Err(LabyrinthError::AlreadyUnlocked { number: 2 })
    );
    assert_eq!(registry.effects().snapshot().await, before);
    assert_eq!(registry.counters().await.unwrap(), Counters::new(4, 1));
}

#[tokio::test]
async fn scenario_e_underpaid_mint_changes_nothing() {
    let registry = registry_with(config()).await;
    let before = registry.effects().snapshot().await;

    assert_matches!(
        registry
            .mint(&InvocationContext::new(ALICE, DEFAULT_MINT_PRICE - 1))
            .await,
        Err(LabyrinthError::InsufficientPayment { .. })
    );
    assert_eq!(registry.effects().snapshot().await, before);
    assert_eq!(registry.counters().await.unwrap(), Counters::new(0, 0));
    assert!(registry.effects().events().is_empty());
}

#[tokio::test]
async fn owner_mints_for_free_on_both_paths() {
    let registry = registry_with(config()).await;
    let owner = InvocationContext::unpaid(OWNER);

    registry.mint(&owner).await.unwrap();
    registry.mint_privileged(&owner).await.unwrap();

    assert_eq!(registry.counters().await.unwrap(), Counters::new(2, 1));
}

#[tokio::test]
async fn privileged_mint_rejects_strangers_even_when_paying() {
    let registry = registry_with(config()).await;

    assert_matches!(
        registry.mint_privileged(&paid(ALICE)).await,
        Err(LabyrinthError::Unauthorized { caller }) if caller == ALICE
    );
    assert_eq!(registry.counters().await.unwrap(), Counters::default());
}

#[tokio::test]
async fn recorded_owner_replaces_configured_owner() {
    let registry = CollectibleRegistry::new(config(), TestEffects::new()).unwrap();
    registry
        .initialize(Some(Identity::new(BOB)))
        .await
        .unwrap();

    registry
        .mint_privileged(&InvocationContext::unpaid(BOB))
        .await
        .unwrap();
    assert_matches!(
        registry
            .mint_privileged(&InvocationContext::unpaid(OWNER))
            .await,
        Err(LabyrinthError::Unauthorized { .. })
    );
}

#[tokio::test]
async fn unlock_requires_an_existing_cave() {
    let registry = registry_with(config()).await;
    registry.mint(&paid(ALICE)).await.unwrap();
    registry.mint(&paid(ALICE)).await.unwrap();

    assert_matches!(
        registry
            .unlock(&InvocationContext::unpaid(ALICE), CaveId(3))
            .await,
        Err(LabyrinthError::NotFound {
            class: TokenClass::Cave,
            number: 3
        })
    );
}

#[tokio::test]
async fn unlock_without_keys_is_rejected() {
    let registry = registry_with(config()).await;
    registry.mint(&paid(ALICE)).await.unwrap();

    assert_matches!(
        registry
            .unlock(&InvocationContext::unpaid(ALICE), CaveId(1))
            .await,
        Err(LabyrinthError::SupplyExhausted(Supply::NoKeysAvailable))
    );
}

#[tokio::test]
async fn unlock_burns_the_newest_key_for_any_cave() {
    let registry = registry_with(config()).await;
    for _ in 0..4 {
        registry.mint(&paid(ALICE)).await.unwrap();
    }
    let bob = InvocationContext::unpaid(BOB);

    // Cave #1 never paired a key, yet key #2 (the newest) unlocks it.
    let first = registry.unlock(&bob, CaveId(1)).await.unwrap();
    assert_eq!(first.burned, KeyId(2));
    let second = registry.unlock(&bob, CaveId(4)).await.unwrap();
    assert_eq!(second.burned, KeyId(1));

    assert_eq!(registry.counters().await.unwrap(), Counters::new(4, 0));
    assert_matches!(
        registry.unlock(&bob, CaveId(3)).await,
        Err(LabyrinthError::SupplyExhausted(Supply::NoKeysAvailable))
    );
}

#[tokio::test]
async fn burned_key_ids_are_reissued_by_later_mints() {
    let registry = registry_with(config()).await;
    let alice = paid(ALICE);
    registry.mint(&alice).await.unwrap();
    registry.mint(&alice).await.unwrap();
    registry
        .unlock(&InvocationContext::unpaid(ALICE), CaveId(2))
        .await
        .unwrap();

    registry.mint(&alice).await.unwrap();
    let receipt = registry.mint(&alice).await.unwrap();

    assert_eq!(receipt.key.map(|k| k.number), Some(KeyId(1)));
    assert_eq!(registry.counters().await.unwrap(), Counters::new(4, 1));
}

#[tokio::test]
async fn cave_cap_stops_minting() {
    let registry = registry_with(RegistryConfig {
        max_caves: 3,
        max_keys: 3,
        ..config()
    })
    .await;
    for _ in 0..3 {
        registry.mint(&paid(ALICE)).await.unwrap();
    }

    assert_matches!(
        registry.mint(&paid(ALICE)).await,
        Err(LabyrinthError::SupplyExhausted(Supply::Cave))
    );
    assert_matches!(
        registry.mint_privileged(&InvocationContext::unpaid(OWNER)).await,
        Err(LabyrinthError::SupplyExhausted(Supply::Cave))
    );
}

#[tokio::test]
async fn key_cap_still_allows_odd_caves() {
    let registry = registry_with(RegistryConfig {
        max_caves: 10,
        max_keys: 1,
        ..config()
    })
    .await;
    registry.mint(&paid(ALICE)).await.unwrap();
    registry.mint(&paid(ALICE)).await.unwrap();

    let odd = registry.mint(&paid(ALICE)).await.unwrap();
    assert_eq!(odd.cave.number, CaveId(3));
    assert_eq!(odd.key, None);

    assert_matches!(
        registry.mint(&paid(ALICE)).await,
        Err(LabyrinthError::SupplyExhausted(Supply::Key))
    );
    assert_eq!(registry.counters().await.unwrap(), Counters::new(3, 1));
}

#[tokio::test]
async fn events_follow_committed_operations_in_order() {
    let registry = registry_with(config()).await;
    registry.mint(&paid(ALICE)).await.unwrap();
    registry.mint(&paid(ALICE)).await.unwrap();
    registry
        .unlock(&InvocationContext::unpaid(BOB), CaveId(2))
        .await
        .unwrap();

    let events = registry.effects().events();
    assert_eq!(events.len(), 5);
    assert!(events[0].starts_with(&format!(
        "Minted CaveLabyrints #1 for {ALICE}. Metadata: Number: #1, Status: Locked"
    )));
    assert!(events[1].starts_with("Minted CaveLabyrints #2"));
    assert_eq!(
        events[2],
        format!("Minted LabyrintsKeys #1 for {ALICE}. Metadata: Number: #1")
    );
    assert_eq!(
        events[3],
        format!(
            "Burned LabyrintsKeys #1 from {BOB} to burn address {}.",
            registry.config().burn_address
        )
    );
    assert!(events[4]
        .starts_with("Unlocked CaveLabyrints #2. Metadata: Number: #2, Status: Unlocked"));
}

#[tokio::test]
async fn gemstone_comes_from_the_entropy_source() {
    let effects = TestEffects::new().with_random(MockRandomHandler::scripted([4, 0]));
    let registry = CollectibleRegistry::new(config(), effects).unwrap();
    registry.initialize(None).await.unwrap();

    let first = registry.mint(&paid(ALICE)).await.unwrap();
    let second = registry.mint(&paid(ALICE)).await.unwrap();

    assert_eq!(first.cave.gemstone, Gemstone::IIIII);
    assert_eq!(second.cave.gemstone, Gemstone::I);
}

#[tokio::test]
async fn unlock_leaves_number_and_gemstone_intact() {
    let effects = TestEffects::new().with_random(MockRandomHandler::constant(2));
    let registry = CollectibleRegistry::new(config(), effects).unwrap();
    registry.initialize(None).await.unwrap();
    registry.mint(&paid(ALICE)).await.unwrap();
    let minted = registry.mint(&paid(ALICE)).await.unwrap().cave;

    let unlocked = registry
        .unlock(&InvocationContext::unpaid(ALICE), CaveId(2))
        .await
        .unwrap()
        .cave;

    assert_eq!(unlocked.number, minted.number);
    assert_eq!(unlocked.gemstone, Gemstone::III);
    assert_eq!(unlocked, minted.unlocked());
}

#[tokio::test]
async fn initialize_is_refused_once_tokens_exist() {
    let registry = registry_with(config()).await;
    for _ in 0..4 {
        registry.mint(&paid(ALICE)).await.unwrap();
    }
    registry
        .unlock(&InvocationContext::unpaid(ALICE), CaveId(2))
        .await
        .unwrap();
    let before = registry.effects().snapshot().await;

    assert_matches!(
        registry.initialize(Some(Identity::new(BOB))).await,
        Err(LabyrinthError::AlreadyInitialized { caves: 4, keys: 1 })
    );
    assert_eq!(registry.effects().snapshot().await, before);

    // Ids keep counting up, so the unlocked cave is never reissued.
    let next = registry.mint(&paid(ALICE)).await.unwrap();
    assert_eq!(next.cave.number, CaveId(5));
    let cave = registry
        .cave(CaveId(2), &Identity::new(ALICE))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cave.status, CaveStatus::Unlocked);
    assert_eq!(
        registry
            .effects()
            .list_keys(Some("LabyrintsKeys_"))
            .await
            .unwrap()
            .len() as u64,
        registry.counters().await.unwrap().key
    );
}

#[tokio::test]
async fn initialize_can_repeat_before_the_first_mint() {
    let registry = registry_with(config()).await;

    registry
        .initialize(Some(Identity::new(BOB)))
        .await
        .unwrap();

    assert_eq!(registry.owner().await.unwrap(), Identity::new(BOB));
    assert_eq!(registry.counters().await.unwrap(), Counters::default());
}

#[tokio::test]
async fn underpaid_unlock_changes_nothing() {
    let registry = registry_with(RegistryConfig {
        unlock_fee: Amount(5),
        ..config()
    })
    .await;
    registry.mint(&paid(ALICE)).await.unwrap();
    registry.mint(&paid(ALICE)).await.unwrap();
    registry.effects().clear_events();
    let before = registry.effects().snapshot().await;

    assert_matches!(
        registry
            .unlock(&InvocationContext::new(ALICE, 4u64), CaveId(2))
            .await,
        Err(LabyrinthError::InsufficientPayment {
            required: 5,
            provided: 4
        })
    );
    assert_eq!(registry.effects().snapshot().await, before);
    assert!(registry.effects().events_with_prefix("Burned").is_empty());
    assert_eq!(registry.counters().await.unwrap(), Counters::new(2, 1));
}

mod owner_scoped {
    use super::*;

    async fn registry() -> CollectibleRegistry<TestEffects> {
        registry_with(RegistryConfig {
            identity_scheme: IdentityScheme::OwnerScoped,
            ..config()
        })
        .await
    }

    #[tokio::test]
    async fn records_are_keyed_by_minter() {
        let registry = registry().await;
        registry.mint(&paid(ALICE)).await.unwrap();
        registry.mint(&paid(ALICE)).await.unwrap();

        let keys = registry.effects().list_keys(None).await.unwrap();
        assert!(keys.contains(&format!("CaveLabyrints_2_{ALICE}")));
        assert!(keys.contains(&format!("LabyrintsKeys_1_{ALICE}")));
        assert_eq!(
            registry.cave(CaveId(2), &Identity::new(BOB)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn only_the_minter_can_unlock() {
        let registry = registry().await;
        registry.mint(&paid(ALICE)).await.unwrap();
        registry.mint(&paid(ALICE)).await.unwrap();

        assert_matches!(
            registry
                .unlock(&InvocationContext::unpaid(BOB), CaveId(2))
                .await,
            Err(LabyrinthError::NotFound {
                class: TokenClass::Cave,
                number: 2
            })
        );

        registry
            .unlock(&InvocationContext::unpaid(ALICE), CaveId(2))
            .await
            .unwrap();
        assert_eq!(registry.counters().await.unwrap(), Counters::new(2, 0));
    }

    #[tokio::test]
    async fn top_key_owned_by_someone_else_is_not_found() {
        let registry = registry().await;
        // Alice mints caves #1 and #2 (key #1), Bob mints #3 and #4 (key #2).
        registry.mint(&paid(ALICE)).await.unwrap();
        registry.mint(&paid(ALICE)).await.unwrap();
        registry.mint(&paid(BOB)).await.unwrap();
        registry.mint(&paid(BOB)).await.unwrap();
        let before = registry.effects().snapshot().await;

        // The newest key belongs to Bob, so Alice cannot burn it.
        assert_matches!(
            registry
                .unlock(&InvocationContext::unpaid(ALICE), CaveId(2))
                .await,
            Err(LabyrinthError::NotFound {
                class: TokenClass::Key,
                number: 2
            })
        );
        assert_eq!(registry.effects().snapshot().await, before);
    }
}
