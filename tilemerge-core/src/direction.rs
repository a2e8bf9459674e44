//! Move directions and their traversal geometry
//!
//! Each direction walks its lines starting from the edge tiles slide
//! toward, so index 0 of every extracted line is that edge:
//!
//! | Direction | Offset  | Line starts                  |
//! |-----------|---------|------------------------------|
//! | Up        | (+1, 0) | row 0, every column          |
//! | Down      | (-1, 0) | row height-1, every column   |
//! | Left      | (0, +1) | column 0, every row          |
//! | Right     | (0, -1) | column width-1, every row    |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::Position;

/// Move direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) step taken along a line
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
            Direction::Left => (0, 1),
            Direction::Right => (0, -1),
        }
    }

    /// Number of cells in each line
    pub const fn line_len(self, height: usize, width: usize) -> usize {
        match self {
            Direction::Up | Direction::Down => height,
            Direction::Left | Direction::Right => width,
        }
    }

    /// First cell of every line, in order across the orthogonal axis
    pub fn line_starts(self, height: usize, width: usize) -> Vec<Position> {
        match self {
            Direction::Up => (0..width).map(|col| Position::new(0, col)).collect(),
            Direction::Down => (0..width)
                .map(|col| Position::new(height.saturating_sub(1), col))
                .collect(),
            Direction::Left => (0..height).map(|row| Position::new(row, 0)).collect(),
            Direction::Right => (0..height)
                .map(|row| Position::new(row, width.saturating_sub(1)))
                .collect(),
        }
    }

    /// Single-letter name used in move scripts
    pub const fn letter(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }

    /// Parse a compact move script such as `"LLUR"` or `"l, r, u"`
    pub fn parse_script(script: &str) -> Result<Vec<Direction>, ParseDirectionError> {
        script
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(|c| c.to_string().parse())
            .collect()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown direction: {0:?} (expected up/down/left/right or U/D/L/R)")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Direction::Up),
            "d" | "down" => Ok(Direction::Down),
            "l" | "left" => Ok(Direction::Left),
            "r" | "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Per-direction line coordinates for one grid size.
///
/// Built once when an engine is constructed; the grid never changes size.
#[derive(Clone, Debug)]
pub struct TraversalTable {
    lines: [Vec<Vec<Position>>; 4],
}

impl TraversalTable {
    pub fn new(height: usize, width: usize) -> Self {
        let lines: [Vec<Vec<Position>>; 4] = Direction::ALL.map(|dir| {
            let len = dir.line_len(height, width);
            dir.line_starts(height, width)
                .into_iter()
                .map(|start| {
                    // Starts sit on the edge the offset walks away from, so
                    // every step of a full line stays on the grid.
                    let line: Vec<Position> = (0..len)
                        .map_while(|step| start.offset(dir.offset(), step))
                        .collect();
                    debug_assert_eq!(
                        line.len(),
                        len,
                        "{} line from {:?} left the grid",
                        dir,
                        start
                    );
                    line
                })
                .collect()
        });
        Self { lines }
    }

    /// Coordinate lists for every line of a direction
    pub fn lines(&self, direction: Direction) -> &[Vec<Position>] {
        &self.lines[direction as usize]
    }
}
