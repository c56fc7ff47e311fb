//! Command-line entry point for the authoring backend.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use planforge::core::config::{config, set_config, ForgeConfig};
use planforge::core::error::Result;
use planforge::export::export_all;
use planforge::ops::{build_homes, seed_relationships, update_population};
use planforge::store::ContentStore;

#[derive(Parser)]
#[command(name = "forge", about = "Game content authoring and export tools")]
struct Cli {
    /// TOML config file overriding the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write one JSON document per table into the export directory.
    Export,
    /// Build a home compound for every character without one.
    BuildHomes {
        /// Seed for reproducible placement.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Recompute pairwise relationships between original characters.
    SeedRelationships,
    /// Recount the characters standing in each place.
    UpdatePopulation,
}

fn load_store() -> Result<ContentStore> {
    let path = &config().store_path;
    if path.exists() {
        ContentStore::load(path)
    } else {
        info!(path = %path.display(), "no snapshot, starting empty");
        Ok(ContentStore::new())
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        let loaded = ForgeConfig::load(path)?;
        if set_config(loaded).is_err() {
            error!("config already initialized");
        }
    }

    let mut store = load_store()?;
    match cli.command {
        Command::Export => {
            let written = export_all(&mut store, &config().export_dir)?;
            info!(files = written.len(), dir = %config().export_dir.display(), "export complete");
            store.save(&config().store_path)?;
        }
        Command::BuildHomes { seed } => {
            let mut rng = match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            };
            let built = build_homes(&mut store, &mut rng)?;
            info!(built, "homes built");
            store.save(&config().store_path)?;
        }
        Command::SeedRelationships => {
            let (created, updated) = seed_relationships(&mut store);
            info!(created, updated, "relationships seeded");
            store.save(&config().store_path)?;
        }
        Command::UpdatePopulation => {
            update_population(&mut store);
            store.save(&config().store_path)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
