//! `stargazer`: terminal front end for the Stargazer collection game.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration from `stargazer-config.yaml` (or `--config`)
//! 3. Initialize structured logging (tracing) on stderr
//! 4. Build the engine over the built-in catalog and a file-backed slot
//! 5. Restore the saved game and credit offline energy
//! 6. Run the subcommand

mod cli;
mod commands;
mod error;
mod play;
mod render;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use stargazer_core::config::LoggingConfig;
use stargazer_core::starting_catalog::starting_catalog;
use stargazer_core::{GameConfig, ProgressionEngine, SystemClock};
use stargazer_store::FileStore;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::Engine;
use crate::error::CliError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, catalog construction, or the
/// subcommand fails. Exploration rejections are not errors.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (config, from_file) = load_config(&cli.config)?;
    init_logging(&config.logging)?;
    if from_file {
        info!(path = %cli.config.display(), "configuration loaded");
    } else {
        info!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let catalog = starting_catalog().map_err(CliError::from)?;
    let store = FileStore::new(&config.storage.data_dir);
    debug!(
        data_dir = %store.dir().display(),
        slot = config.storage.slot,
        "save location"
    );

    let engine: Arc<Engine> = Arc::new(ProgressionEngine::new(
        &config,
        catalog,
        store,
        SystemClock,
        StdRng::from_os_rng(),
    ));

    // Store failures are logged by the engine; play continues from defaults.
    if let Ok(false) = engine.load_progress().await {
        info!("no saved game, starting fresh");
    }

    run(cli.command.unwrap_or(Command::Status), engine, &config, cli.json).await?;
    Ok(())
}

/// Dispatch one subcommand.
async fn run(
    command: Command,
    engine: Arc<Engine>,
    config: &GameConfig,
    json: bool,
) -> Result<(), CliError> {
    let output = match command {
        Command::Status => commands::status(&engine, json)?,
        Command::Explore { count } => commands::explore(&engine, count, json).await?,
        Command::Collection {
            object_type,
            rarity,
        } => commands::collection(&engine, object_type, rarity, json)?,
        Command::Missions => commands::missions(&engine, json)?,
        Command::Reset { yes: false } => {
            "This discards all progress. Run again with --yes to confirm.".to_owned()
        }
        Command::Reset { yes: true } => {
            engine.reset_game().await?;
            "Progress reset.".to_owned()
        }
        Command::Play => {
            return play::run(engine, config.energy.poll_interval()).await;
        }
    };
    println!("{output}");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults if the file
/// does not exist. Returns whether the file was read.
fn load_config(path: &Path) -> Result<(GameConfig, bool), CliError> {
    if path.exists() {
        Ok((GameConfig::from_file(path)?, true))
    } else {
        let mut config = GameConfig::default();
        config.storage.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CliError::Logging {
        message: e.to_string(),
    })
}
