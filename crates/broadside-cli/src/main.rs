//! Broadside command line runner.
//!
//! Loads ship and weapon definitions from a game entities directory and
//! simulates fleet encounters between them.
//!
//! # Usage
//!
//! ```bash
//! # The stock encounter, 100 repetitions
//! broadside run --entities path/to/entities
//!
//! # Custom encounters, spread across cores, with a JSON export
//! broadside run --entities path/to/entities --encounters battles.json --parallel --json out.json
//!
//! # Which ships are combat-capable
//! broadside ships --entities path/to/entities
//! ```
//!
//! Logs go to stderr and honor `RUST_LOG`; tables go to stdout.

mod loader;
mod table;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use broadside_core::{BatchRunner, CatalogOptions, EngagementConfig, TracingSink};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "broadside")]
#[command(about = "Fleet engagement simulator for RTS balance analysis")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every battle event
    #[arg(long, global = true, conflicts_with = "verbose")]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EntityArgs {
    /// Directory holding `.weapon` and `.unit` files
    #[arg(short, long)]
    entities: PathBuf,

    /// Only load entities whose name starts with this
    #[arg(short, long, default_value = "trader_")]
    prefix: String,

    /// Stat level for levelled units
    #[arg(long, default_value = "0")]
    level: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate encounters and print a results table for each
    Run {
        #[command(flatten)]
        entities: EntityArgs,

        /// JSON list of encounters; defaults to LF vs LRC
        #[arg(long)]
        encounters: Option<PathBuf>,

        /// Repetitions per encounter
        #[arg(short, long, default_value = "100")]
        runs: u32,

        /// Simulated milliseconds per tick
        #[arg(long, default_value = "100")]
        tick_ms: u32,

        /// Longest battle in simulated seconds
        #[arg(long, default_value = "600")]
        duration_secs: u32,

        /// Base RNG seed
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Run encounters concurrently
        #[arg(long)]
        parallel: bool,

        /// Also write results as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List combat-capable ship types
    Ships {
        #[command(flatten)]
        entities: EntityArgs,
    },
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Run {
            entities,
            encounters,
            runs,
            tick_ms,
            duration_secs,
            seed,
            parallel,
            json,
        } => {
            let config = EngagementConfig::default()
                .with_repetitions(runs)
                .with_tick_interval_ms(tick_ms)
                .with_duration_secs(duration_secs)
                .with_seed(seed);
            cmd_run(&entities, encounters, config, parallel, json)
        }
        Commands::Ships { entities } => cmd_ships(&entities),
    }
}

fn cmd_run(
    entities: &EntityArgs,
    encounters: Option<PathBuf>,
    config: EngagementConfig,
    parallel: bool,
    json: Option<PathBuf>,
) -> Result<()> {
    let options = CatalogOptions::default().with_level(entities.level);
    let catalog = loader::load_catalog(&entities.entities, &entities.prefix, &options)?;
    let encounters = match encounters {
        Some(path) => loader::load_encounters(&path)?,
        None => loader::default_encounters(),
    };

    let results = BatchRunner::new(&catalog, config)
        .with_parallel(parallel)
        .with_sink(Arc::new(TracingSink))
        .run(&encounters)
        .context("invalid simulation settings")?;

    for result in &results {
        println!("{}", table::ResultsTable(result));
    }

    if let Some(path) = json {
        let body = serde_json::to_string_pretty(&results).context("serializing results")?;
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "results written");
    }
    Ok(())
}

fn cmd_ships(entities: &EntityArgs) -> Result<()> {
    let options = CatalogOptions::default().with_level(entities.level);
    let catalog = loader::load_catalog(&entities.entities, &entities.prefix, &options)?;

    for ship in catalog.ships() {
        let weapons: Vec<&str> = ship.weapons.iter().map(|w| w.name.as_str()).collect();
        println!(
            "{:<40} hull {:>7} shield {:>6} speed {:>5} supply {:>3}  [{}]  {}",
            ship.name,
            ship.max_hull,
            ship.max_shield,
            ship.speed,
            ship.cost.supply,
            ship.category,
            weapons.join(", ")
        );
    }
    Ok(())
}
