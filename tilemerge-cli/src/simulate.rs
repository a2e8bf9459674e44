//! Simulate command - random-policy games for engine statistics
//!
//! Each game gets its own engine and seed, so games run independently on
//! the rayon pool and results are reproducible for a given base seed.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use clap::Args;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use tilemerge_core::{Direction, Engine, EngineConfig, Tile};

use crate::BoardArgs;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Number of games to play
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Maximum effective moves per game
    #[arg(long, default_value = "100000")]
    pub max_moves: u32,

    /// Run games sequentially instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub game_number: usize,
    pub seed: u64,
    pub moves: u32,
    pub max_tile: Tile,
    pub tile_sum: Tile,
}

/// Aggregated results
#[derive(Clone, Debug, Serialize)]
pub struct SimulationResults {
    pub total_games: usize,
    pub avg_moves: f32,
    pub best_tile: Tile,
    /// Max tile -> number of games ending with it
    pub max_tile_histogram: BTreeMap<Tile, usize>,
    pub games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let config = args.board.engine_config()?;
    let base_seed = seed.unwrap_or_else(|| rand::thread_rng().gen());

    tracing::info!(
        "Simulating {} games on a {}x{} grid (seed={})",
        args.games,
        args.board.height,
        args.board.width,
        base_seed
    );

    let games = play_games(&args, &config, base_seed)?;
    let results = compute_statistics(games);

    tracing::info!(
        "Done: avg {:.1} moves, best tile {}",
        results.avg_moves,
        results.best_tile
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_text_results(&results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play_games(
    args: &SimulateArgs,
    config: &EngineConfig,
    base_seed: u64,
) -> Result<Vec<GameRecord>> {
    let play = |game_index: usize| {
        let seed = base_seed.wrapping_add(game_index as u64);
        play_single_game(
            game_index + 1,
            args.board.height,
            args.board.width,
            config,
            seed,
            args.max_moves,
        )
    };

    if args.sequential {
        (0..args.games).map(play).collect()
    } else {
        (0..args.games).into_par_iter().map(play).collect()
    }
}

/// Compute aggregate statistics from game records
pub fn compute_statistics(games: Vec<GameRecord>) -> SimulationResults {
    let total_moves: u64 = games.iter().map(|g| g.moves as u64).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    let mut max_tile_histogram = BTreeMap::new();
    for game in &games {
        *max_tile_histogram.entry(game.max_tile).or_insert(0) += 1;
    }

    SimulationResults {
        total_games: games.len(),
        avg_moves,
        best_tile: games.iter().map(|g| g.max_tile).max().unwrap_or(0),
        max_tile_histogram,
        games,
    }
}

// ============================================================================
// LEVEL 3 - SINGLE GAME
// ============================================================================

/// Play one game choosing uniformly among the moves that change the grid
pub fn play_single_game(
    game_number: usize,
    height: usize,
    width: usize,
    config: &EngineConfig,
    seed: u64,
    max_moves: u32,
) -> Result<GameRecord> {
    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut engine = Engine::with_config(height, width, config.clone(), rng)
        .with_context(|| format!("Failed to create engine for game {}", game_number))?;
    // Policy draws come from their own stream so they never shift spawn draws
    let mut policy_rng = ChaCha8Rng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut moves = 0;

    while moves < max_moves {
        let options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|&dir| engine.can_move(dir))
            .collect();
        let Some(&direction) = options.choose(&mut policy_rng) else {
            break;
        };
        engine.apply_move(direction)?;
        moves += 1;
    }

    if moves == max_moves {
        tracing::warn!("Game {} hit the {} move limit", game_number, max_moves);
    }
    tracing::debug!("Game {}: {} moves, max tile {}", game_number, moves, engine.max_tile());

    Ok(GameRecord {
        game_number,
        seed,
        moves,
        max_tile: engine.max_tile(),
        tile_sum: engine.board().tile_sum(),
    })
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(results: &SimulationResults) {
    println!("\n=== Simulation Results ===");
    println!("Total games: {}", results.total_games);
    println!("Avg moves:   {:.1}", results.avg_moves);
    println!("Best tile:   {}", results.best_tile);

    println!("\nMax tile reached:");
    for (tile, count) in &results.max_tile_histogram {
        let pct = *count as f32 / results.total_games.max(1) as f32 * 100.0;
        println!("  {:>6}: {:>5} ({:.1}%)", tile, count, pct);
    }
}

// ============================================================================
// TESTS
// ============================================================================
