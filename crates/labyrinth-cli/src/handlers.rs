//! Command handlers
//!
//! Each handler runs one command against a registry and renders the outcome
//! as text. Handlers are generic over the effects so tests can drive them
//! with in-memory doubles.

use crate::commands::{Commands, ShowCommand};
use anyhow::{Context, Result};
use labyrinth_core::effects::RegistryEffects;
use labyrinth_core::{CaveId, Identity, InvocationContext, KeyId};
use labyrinth_registry::{CollectibleRegistry, MintReceipt};
use std::fmt::Write;

/// Run `command` and return what should be printed
pub async fn handle<E>(registry: &CollectibleRegistry<E>, command: Commands) -> Result<String>
where
    E: RegistryEffects,
{
    match command {
        Commands::Init { owner } => {
            let counters = registry
                .initialize(owner.map(Identity::new))
                .await
                .context("failed to initialize registry")?;
            Ok(format!("Initialized: {counters}"))
        }
        Commands::Mint { caller, payment } => {
            let receipt = registry
                .mint(&InvocationContext::new(caller, payment))
                .await
                .context("mint rejected")?;
            Ok(render_mint(&receipt))
        }
        Commands::MintPrivileged { caller } => {
            let receipt = registry
                .mint_privileged(&InvocationContext::unpaid(caller))
                .await
                .context("privileged mint rejected")?;
            Ok(render_mint(&receipt))
        }
        Commands::Unlock {
            caller,
            cave,
            payment,
        } => {
            let receipt = registry
                .unlock(&InvocationContext::new(caller, payment), CaveId(cave))
                .await
                .with_context(|| format!("unlock of cave #{cave} rejected"))?;
            Ok(format!(
                "Burned key {}\nCave: {}\nCounters: {}",
                receipt.burned, receipt.cave, receipt.counters
            ))
        }
        Commands::Show(show) => handle_show(registry, show).await,
    }
}

async fn handle_show<E>(registry: &CollectibleRegistry<E>, command: ShowCommand) -> Result<String>
where
    E: RegistryEffects,
{
    match command {
        ShowCommand::Cave { number, owner } => {
            let cave = registry
                .cave(CaveId(number), &Identity::new(owner))
                .await
                .context("failed to read cave")?;
            Ok(cave.map_or_else(|| format!("Cave #{number} not found"), |c| c.to_string()))
        }
        ShowCommand::Key { number, owner } => {
            let key = registry
                .key(KeyId(number), &Identity::new(owner))
                .await
                .context("failed to read key")?;
            Ok(key.map_or_else(|| format!("Key #{number} not found"), |k| k.to_string()))
        }
        ShowCommand::Counters => {
            let counters = registry.counters().await.context("failed to read counters")?;
            Ok(counters.to_string())
        }
    }
}

fn render_mint(receipt: &MintReceipt) -> String {
    let mut out = format!("Cave: {}", receipt.cave);
    if let Some(key) = &receipt.key {
        // Writing to a String cannot fail.
        let _ = write!(out, "\nKey: {key}");
    }
    let _ = write!(out, "\nCounters: {}", receipt.counters);
    out
}
