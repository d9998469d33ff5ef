//! Pools - command-line host for line and media pools.
//!
//! # Overview
//!
//! The binary stands in for a home-automation host. On every invocation it:
//! 1. Initializes logging (`<config-dir>/logs/pools.<date>`, optional stderr console)
//! 2. Creates a tokio runtime
//! 3. Loads `pools.yaml` through [`ConfigManager`] (file + `POOLS_*` env overrides)
//! 4. Builds the [`PoolRegistry`](pools::PoolRegistry) and reloads every pool,
//!    the way a host reloads entities when they are added
//! 5. Runs the requested command and prints the resulting states as YAML
//! 6. Shuts the registry and runtime down
//!
//! Each invocation is one-shot: pools are rebuilt and reloaded every run, so
//! queue cursors, no-repeat history and counters do not carry over between
//! runs. `pools next` on a queue pool therefore always prints its second line.
//!
//! # Usage
//!
//! ```text
//! pools --config-dir /config list
//! pools shuffle sensor.pools_lines_greetings
//! pools get sensor.pools_media_alerts --shuffle
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use pools::logging::{LOG_PREFIX, setup_logging_with_console};
use pools::services::FsLoader;
use pools::{
    APP_NAME, ConfigManager, EventBus, PoolCommand, PoolKind, PoolRegistry, SelectionResult,
    VERSION, build_registry,
};
use tokio::sync::broadcast::error::RecvError;

#[derive(Parser, Debug)]
#[command(name = "pools", version, about = "Random and sequential line/media pools")]
struct Cli {
    /// Directory holding pools.yaml; relative pool paths resolve against it
    #[arg(long, env = "POOLS_CONFIG_DIR", default_value = ".")]
    config_dir: Utf8PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Mirror log output to stderr
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the state of every pool
    List,
    /// Advance the listed pools (all when none are given)
    Next { entity_ids: Vec<String> },
    /// Shuffle the listed pools (all when none are given)
    Shuffle { entity_ids: Vec<String> },
    /// Reload the listed pools from disk (all when none are given)
    Reload { entity_ids: Vec<String> },
    /// Clear history and counters of the listed pools (all when none are given)
    ResetStats { entity_ids: Vec<String> },
    /// Shuffle every pool
    ShuffleAll,
    /// Reload every pool
    ReloadAll,
    /// Print the current value of one pool
    Get {
        entity_id: String,
        /// Shuffle before reading
        #[arg(long)]
        shuffle: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging_with_console(
        &cli.config_dir.join("logs"),
        LOG_PREFIX,
        cli.debug,
        cli.verbose,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(4)
        .thread_name("pools-worker")
        .build()?;

    let result = runtime.block_on(run(cli));

    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    tracing::info!("Shutdown complete");

    result.inspect_err(|e| tracing::error!("pools failed: {:#}", e))
}

async fn run(cli: Cli) -> Result<()> {
    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let config = config_manager.load_config()?;

    let events = EventBus::default();
    spawn_event_logger(&events);

    let mut registry = build_registry(&config, Arc::new(FsLoader), events)
        .context("Failed to build pools from configuration")?;

    // Initial load, as when entities are added to the host
    registry.reload_all().await;

    let states = execute(&mut registry, cli.command).await?;
    print_states(&states)?;

    registry.shutdown();
    Ok(())
}

async fn execute(registry: &mut PoolRegistry, command: Command) -> Result<Vec<SelectionResult>> {
    let states = match command {
        Command::List => registry.states(),
        Command::Next { entity_ids } => registry.dispatch(PoolCommand::Next, &entity_ids).await,
        Command::Shuffle { entity_ids } => registry.dispatch(PoolCommand::Shuffle, &entity_ids).await,
        Command::Reload { entity_ids } => registry.dispatch(PoolCommand::Reload, &entity_ids).await,
        Command::ResetStats { entity_ids } => {
            registry.dispatch(PoolCommand::ResetStats, &entity_ids).await
        }
        Command::ShuffleAll => registry.shuffle_all().await,
        Command::ReloadAll => registry.reload_all().await,
        Command::Get { entity_id, shuffle } => {
            let kind = registry
                .get(&entity_id)
                .map(|pool| pool.state().kind)
                .with_context(|| format!("No pool bound to entity_id: {}", entity_id))?;
            let state = match kind {
                PoolKind::Lines => registry.get_line(&entity_id, shuffle).await?,
                PoolKind::Media => registry.get_media(&entity_id, shuffle).await?,
            };
            vec![state]
        }
    };
    Ok(states)
}

fn print_states(states: &[SelectionResult]) -> Result<()> {
    let yaml = serde_yaml_ng::to_string(states).context("Failed to serialize pool states")?;
    print!("{}", yaml);
    Ok(())
}

/// Log every published event at debug level.
fn spawn_event_logger(events: &EventBus) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => tracing::debug!(
                    "{} -> {:?} (empty: {})",
                    event.entity_id(),
                    event.result().value,
                    event.result().is_empty
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Event logger skipped {} events", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
