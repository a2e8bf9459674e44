//! Play command - apply a scripted move sequence to a fresh board
//!
//! ## Architecture
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_script(), report_results()
//! - Level 3: is_game_over()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tilemerge_core::{Direction, Engine, Tile};

use crate::{create_rng, BoardArgs};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Moves to apply, e.g. "LLUR" (U/D/L/R, case-insensitive)
    #[arg(long)]
    pub moves: String,

    /// Output the final state as JSON
    #[arg(long)]
    pub json: bool,
}

/// One applied move
#[derive(Clone, Debug, Serialize)]
struct StepRecord {
    direction: Direction,
    moved: bool,
    grid: Vec<Vec<Tile>>,
}

/// Outcome of a scripted game
#[derive(Clone, Debug, Serialize)]
struct PlayResults {
    height: usize,
    width: usize,
    initial: Vec<Vec<Tile>>,
    steps: Vec<StepRecord>,
    game_over: bool,
    max_tile: Tile,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let script = Direction::parse_script(&args.moves).context("Invalid move script")?;
    let config = args.board.engine_config()?;
    let mut engine = Engine::with_config(
        args.board.height,
        args.board.width,
        config,
        create_rng(seed),
    )
    .context("Failed to create engine")?;

    tracing::info!(
        "Playing {} moves on a {}x{} grid",
        script.len(),
        engine.height(),
        engine.width()
    );

    let results = play_script(&mut engine, &script)?;

    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Apply moves until the script ends or no move is possible
fn play_script<R: rand::Rng>(
    engine: &mut Engine<R>,
    script: &[Direction],
) -> Result<PlayResults> {
    let initial = engine.board().to_rows();
    let mut steps = Vec::with_capacity(script.len());

    for &direction in script {
        if is_game_over(engine) {
            tracing::warn!("No moves left after {} steps, stopping early", steps.len());
            break;
        }
        let moved = engine
            .apply_move(direction)
            .with_context(|| format!("Move {} failed", direction))?;
        steps.push(StepRecord {
            direction,
            moved,
            grid: engine.board().to_rows(),
        });
    }

    Ok(PlayResults {
        height: engine.height(),
        width: engine.width(),
        initial,
        steps,
        game_over: is_game_over(engine),
        max_tile: engine.max_tile(),
    })
}

fn report_results(results: &PlayResults, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// The engine never refuses a move; the caller decides when play has ended
fn is_game_over<R: rand::Rng>(engine: &Engine<R>) -> bool {
    !Direction::ALL.iter().any(|&dir| engine.can_move(dir))
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_text_results(results: &PlayResults) {
    println!("Start:");
    print_grid(&results.initial);

    for (i, step) in results.steps.iter().enumerate() {
        let note = if step.moved { "" } else { " (no change)" };
        println!("\n{}. {}{}", i + 1, step.direction, note);
        print_grid(&step.grid);
    }

    println!("\nMax tile: {}", results.max_tile);
    if results.game_over {
        println!("Game over");
    }
}

/// Right-aligned grid dump
fn print_grid(grid: &[Vec<Tile>]) {
    let cell_width = grid
        .iter()
        .flatten()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);
    for row in grid {
        let cells: Vec<String> = row
            .iter()
            .map(|&v| {
                if v == 0 {
                    format!("{:>w$}", ".", w = cell_width)
                } else {
                    format!("{:>w$}", v, w = cell_width)
                }
            })
            .collect();
        println!("  {}", cells.join(" "));
    }
}

// ============================================================================
// TESTS
// ============================================================================
