//! Grid engine: move orchestration and tile spawning
//!
//! A move copies every line of the chosen direction out of the grid,
//! merges it, and writes it back. Any changed cell makes the move
//! effective, and an effective move spawns exactly one new tile.

use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::{Board, Position, Tile};
use crate::config::EngineConfig;
use crate::direction::{Direction, TraversalTable};
use crate::error::{EngineError, Result};
use crate::line::merge_line;

/// Rule engine owning one grid.
///
/// The random source is explicit: seed it for reproducible games, or use
/// [`Engine::new`] for an entropy-seeded generator.
#[derive(Clone, Debug)]
pub struct Engine<R = ChaCha8Rng> {
    board: Board,
    table: TraversalTable,
    config: EngineConfig,
    rng: R,
}

impl Engine<ChaCha8Rng> {
    /// Create an engine with an entropy-seeded generator
    pub fn new(height: usize, width: usize) -> Result<Self> {
        Self::with_rng(height, width, ChaCha8Rng::from_entropy())
    }

    /// Create a reproducible engine
    pub fn with_seed(height: usize, width: usize, seed: u64) -> Result<Self> {
        Self::with_rng(height, width, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Engine<R> {
    pub fn with_rng(height: usize, width: usize, rng: R) -> Result<Self> {
        Self::with_config(height, width, EngineConfig::default(), rng)
    }

    /// Create an engine and spawn the configured initial tiles.
    ///
    /// Fails with `InvalidDimensions` for a zero dimension, or `BoardFull`
    /// when the grid cannot hold every initial tile.
    pub fn with_config(height: usize, width: usize, config: EngineConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let board = Board::new(height, width)?;
        let mut engine = Self {
            board,
            table: TraversalTable::new(height, width),
            config,
            rng,
        };
        engine.spawn_initial()?;
        Ok(engine)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn height(&self) -> usize {
        self.board.height()
    }

    pub fn width(&self) -> usize {
        self.board.width()
    }

    /// (height, width)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.board.height(), self.board.width())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn get_tile(&self, row: usize, col: usize) -> Result<Tile> {
        self.board.get(Position::new(row, col))
    }

    /// Overwrite one cell; used to seed known positions
    pub fn set_tile(&mut self, row: usize, col: usize, value: Tile) -> Result<()> {
        self.board.set(Position::new(row, col), value)
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.board.empty_positions()
    }

    pub fn max_tile(&self) -> Tile {
        self.board.max_tile()
    }

    // ========================================================================
    // GAME FLOW
    // ========================================================================

    /// Clear the grid and spawn the initial tiles again
    pub fn reset(&mut self) -> Result<()> {
        self.board.clear();
        self.spawn_initial()?;
        tracing::debug!("Reset {}x{} grid: {}", self.height(), self.width(), self.board);
        Ok(())
    }

    /// Slide and merge every line toward `direction`.
    ///
    /// Returns whether any cell changed. A new tile is spawned only then.
    pub fn apply_move(&mut self, direction: Direction) -> Result<bool> {
        let moved = self.shift(direction)?;
        tracing::trace!("Move {}: moved={}", direction, moved);
        if moved {
            self.spawn_tile()?;
        }
        Ok(moved)
    }

    /// Whether `apply_move(direction)` would change the grid
    pub fn can_move(&self, direction: Direction) -> bool {
        self.table.lines(direction).iter().any(|coords| {
            self.read_line(coords).is_ok_and(|line| merge_line(&line) != line)
        })
    }

    /// Place a 2 or 4 on a uniformly chosen empty cell
    pub fn spawn_tile(&mut self) -> Result<(Position, Tile)> {
        let empty = self.board.empty_positions();
        let pos = *empty.choose(&mut self.rng).ok_or(EngineError::BoardFull)?;
        let value = if self.rng.gen_bool(self.config.four_probability) {
            4
        } else {
            2
        };
        self.board.set(pos, value)?;
        tracing::debug!("Spawned {} at ({}, {})", value, pos.row, pos.col);
        Ok((pos, value))
    }

    // ========================================================================
    // INTERNALS
    // ========================================================================

    fn spawn_initial(&mut self) -> Result<()> {
        for _ in 0..self.config.initial_tiles {
            self.spawn_tile()?;
        }
        Ok(())
    }

    /// Copy the values at `coords` into an independent line
    fn read_line(&self, coords: &[Position]) -> Result<Vec<Tile>> {
        coords.iter().map(|&pos| self.board.get(pos)).collect()
    }

    /// Merge all lines of a direction in place, reporting any change
    fn shift(&mut self, direction: Direction) -> Result<bool> {
        let mut moved = false;
        for coords in self.table.lines(direction) {
            let line = self.read_line(coords)?;
            let merged = merge_line(&line);
            for ((&pos, &old), &new) in coords.iter().zip(&line).zip(&merged) {
                if old != new {
                    moved = true;
                    self.board.set(pos, new)?;
                }
            }
        }
        Ok(moved)
    }
}

impl<R> fmt::Display for Engine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.board, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Engine with no initial tiles, seeded with the given rows
    fn seeded(rows: &[Vec<Tile>], seed: u64) -> Engine {
        let height = rows.len();
        let width = rows[0].len();
        let config = EngineConfig::default().with_initial_tiles(0);
        let mut engine =
            Engine::with_config(height, width, config, ChaCha8Rng::seed_from_u64(seed)).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                engine.set_tile(r, c, value).unwrap();
            }
        }
        engine
    }

    #[test]
    fn test_construction() {
        let engine = Engine::with_seed(4, 4, 1).unwrap();
        assert_eq!(engine.dimensions(), (4, 4));
        assert_eq!(engine.board().occupied(), 2);
        for &value in engine.board().rows().flatten() {
            assert!(matches!(value, 0 | 2 | 4));
        }
    }

    #[test]
    fn test_invalid_dimensions() {
        assert_eq!(
            Engine::with_seed(0, 4, 1).unwrap_err(),
            EngineError::InvalidDimensions {
                height: 0,
                width: 4
            }
        );
        assert!(Engine::with_seed(3, 0, 1).is_err());
    }

    #[test]
    fn test_single_cell_cannot_hold_two_tiles() {
        assert_eq!(Engine::with_seed(1, 1, 1).unwrap_err(), EngineError::BoardFull);
    }

    #[test]
    fn test_minimal_board() {
        let engine = Engine::with_seed(1, 2, 3).unwrap();
        assert_eq!(engine.board().occupied(), 2);
        assert!(engine.empty_positions().is_empty());
    }

    #[test]
    fn test_tile_access_out_of_range() {
        let mut engine = Engine::with_seed(2, 3, 1).unwrap();
        let before = engine.board().clone();
        assert!(matches!(
            engine.get_tile(2, 0),
            Err(EngineError::OutOfRange { row: 2, col: 0, .. })
        ));
        assert!(engine.set_tile(0, 3, 8).is_err());
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_move_left_merges_and_spawns() {
        let mut engine = seeded(&[vec![2, 2, 0, 4]], 5);
        assert!(engine.apply_move(Direction::Left).unwrap());
        assert_eq!(engine.get_tile(0, 0), Ok(4));
        assert_eq!(engine.get_tile(0, 1), Ok(4));
        assert_eq!(engine.board().occupied(), 3);
    }

    #[test]
    fn test_move_right_packs_toward_right_edge() {
        let mut engine = seeded(&[vec![2, 2, 2, 0]], 5);
        assert!(engine.apply_move(Direction::Right).unwrap());
        assert_eq!(engine.get_tile(0, 3), Ok(4));
        assert_eq!(engine.get_tile(0, 2), Ok(2));
        assert_eq!(engine.board().occupied(), 3);
    }

    #[test]
    fn test_move_up_and_down_on_columns() {
        let rows = vec![vec![0, 2], vec![2, 2], vec![2, 4]];

        let mut up = seeded(&rows, 9);
        assert!(up.apply_move(Direction::Up).unwrap());
        assert_eq!(up.get_tile(0, 0), Ok(4));
        assert_eq!(up.get_tile(0, 1), Ok(4));
        assert_eq!(up.get_tile(1, 1), Ok(4));

        let mut down = seeded(&rows, 9);
        assert!(down.apply_move(Direction::Down).unwrap());
        assert_eq!(down.get_tile(2, 0), Ok(4));
        assert_eq!(down.get_tile(2, 1), Ok(4));
        assert_eq!(down.get_tile(1, 1), Ok(4));
    }

    #[test]
    fn test_ineffective_move_leaves_board_untouched() {
        let mut engine = seeded(&[vec![2, 4], vec![8, 0]], 2);
        let before = engine.board().clone();
        assert!(!engine.can_move(Direction::Left));
        assert!(!engine.apply_move(Direction::Left).unwrap());
        assert!(!engine.apply_move(Direction::Up).unwrap());
        assert_eq!(engine.board(), &before);

        assert!(engine.can_move(Direction::Right));
        assert!(engine.can_move(Direction::Down));
    }

    #[test]
    fn test_can_move_has_no_side_effects() {
        let engine = seeded(&[vec![2, 2], vec![0, 2]], 2);
        let before = engine.board().clone();
        for dir in Direction::ALL {
            assert!(engine.can_move(dir));
        }
        assert_eq!(engine.board(), &before);
    }

    #[test]
    fn test_full_board_without_merges_is_stuck() {
        let mut engine = seeded(&[vec![2, 4], vec![4, 2]], 4);
        for dir in Direction::ALL {
            assert!(!engine.can_move(dir));
            assert_eq!(engine.apply_move(dir), Ok(false));
        }
        assert_eq!(engine.spawn_tile().unwrap_err(), EngineError::BoardFull);
    }

    #[test]
    fn test_reset_keeps_dimensions() {
        let mut engine = Engine::with_seed(2, 3, 4).unwrap();
        for (col, value) in [2, 4, 8].into_iter().enumerate() {
            engine.set_tile(1, col, value).unwrap();
        }
        engine.reset().unwrap();
        assert_eq!(engine.dimensions(), (2, 3));
        assert_eq!(engine.board().occupied(), 2);
    }

    #[test]
    fn test_spawn_value_frequency() {
        let mut engine = seeded(&[vec![0]], 42);
        let trials = 10_000;
        let mut fours = 0;
        for _ in 0..trials {
            let (pos, value) = engine.spawn_tile().unwrap();
            assert_eq!(pos, Position::new(0, 0));
            if value == 4 {
                fours += 1;
            } else {
                assert_eq!(value, 2);
            }
            engine.set_tile(0, 0, 0).unwrap();
        }
        let ratio = fours as f64 / trials as f64;
        assert!((0.08..0.12).contains(&ratio), "four ratio {}", ratio);
    }

    #[test]
    fn test_spawn_cell_uniform() {
        let mut engine = seeded(&[vec![0, 0, 0, 0]], 11);
        let mut hits = [0usize; 4];
        for _ in 0..8_000 {
            let (pos, _) = engine.spawn_tile().unwrap();
            hits[pos.col] += 1;
            engine.set_tile(pos.row, pos.col, 0).unwrap();
        }
        for count in hits {
            assert!((1_700..2_300).contains(&count), "cell hits {:?}", hits);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let script = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];
        let mut a = Engine::with_seed(4, 4, 77).unwrap();
        let mut b = Engine::with_seed(4, 4, 77).unwrap();
        for dir in script.iter().cycle().take(20) {
            assert_eq!(a.apply_move(*dir), b.apply_move(*dir));
        }
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_display_matches_board() {
        let engine = seeded(&[vec![0, 2], vec![4, 0]], 1);
        assert_eq!(engine.to_string(), "[[0, 2], [4, 0]]");
    }
}
