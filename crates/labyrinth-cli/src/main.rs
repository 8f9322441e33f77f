//! Command-line front end for the labyrinth registry
//!
//! Runs registry operations against a local data directory, using the
//! filesystem storage handler, OS randomness, and events logged through
//! `tracing`. Each invocation holds the data directory's lock for its whole
//! run, so concurrent invocations on one directory are serialized.

use anyhow::{bail, Context, Result};
use clap::Parser;
use labyrinth_core::RegistryConfig;
use labyrinth_effects::{DataDirLock, ProductionEffects};
use labyrinth_registry::CollectibleRegistry;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod commands;
mod handlers;

use commands::Commands;

const DEFAULT_CONFIG: &str = ".labyrinth/config.toml";

#[derive(Parser)]
#[command(name = "labyrinth")]
#[command(about = "Labyrinth - paired cave/key collectible registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path [default: .labyrinth/config.toml, skipped if absent]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding registry state
    #[arg(long, global = true, default_value = ".labyrinth/data")]
    data_dir: PathBuf,
}

/// Config file to load: an explicit path must exist, the default is optional
fn config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) if !path.exists() => bail!("config file {} does not exist", path.display()),
        Some(path) => Ok(Some(path.to_path_buf())),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            if default.exists() {
                Ok(Some(default))
            } else {
                tracing::debug!(path = DEFAULT_CONFIG, "no config file, using defaults");
                Ok(None)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = config_path(cli.config.as_deref())?;
    let config =
        RegistryConfig::load(config_path.as_deref()).context("failed to load configuration")?;

    let _lock = DataDirLock::acquire(&cli.data_dir)
        .with_context(|| format!("failed to lock {}", cli.data_dir.display()))?;
    let effects = ProductionEffects::new(cli.data_dir.clone());
    let registry = CollectibleRegistry::new(config, effects)?;

    let output = handlers::handle(&registry, cli.command).await?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_must_exist() {
        let err = config_path(Some(Path::new("/nonexistent/labyrinth.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn existing_explicit_config_is_used() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert_eq!(
            config_path(Some(file.path())).unwrap(),
            Some(file.path().to_path_buf())
        );
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "labyrinth",
            "mint",
            "--caller",
            "AU1alice",
            "--payment",
            "5",
            "-c",
            "custom.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Mint { payment: 5, .. }
        ));
    }
}
