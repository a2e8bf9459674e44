//! tilemerge CLI - drive the rule engine from the command line
//!
//! Commands:
//! - play: apply a scripted sequence of moves and print the grid
//! - simulate: play many random games and report tile statistics

mod play;
mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use tilemerge_core::EngineConfig;

#[derive(Parser)]
#[command(name = "tilemerge")]
#[command(about = "Sliding-tile merge puzzle engine")]
struct Cli {
    /// Random seed for reproducible games (entropy when omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a move script to a fresh board
    Play(play::PlayArgs),
    /// Play random games and summarize the results
    Simulate(simulate::SimulateArgs),
}

/// Grid and spawn settings shared by every command
#[derive(Args, Clone, Debug)]
pub struct BoardArgs {
    /// Grid height (rows)
    #[arg(long, default_value = "4")]
    pub height: usize,

    /// Grid width (columns)
    #[arg(long, default_value = "4")]
    pub width: usize,

    /// Engine config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl BoardArgs {
    pub fn engine_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("Failed to load engine config: {}", path.display())),
            None => Ok(EngineConfig::default()),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Simulate(args) => simulate::run(args, cli.seed),
    }
}

/// Log to stderr so stdout stays clean for grid and JSON output
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Create RNG from seed or random
pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
