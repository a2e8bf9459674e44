//! Rectangular tile grid with bounds-checked access

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Tile value (0 = empty cell)
pub type Tile = u64;

/// Grid coordinates, row 0 at the top
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step by a signed offset, `None` if the result would be negative
    pub fn offset(self, (dr, dc): (isize, isize), steps: usize) -> Option<Position> {
        let steps = isize::try_from(steps).ok()?;
        let row = self.row.checked_add_signed(dr.checked_mul(steps)?)?;
        let col = self.col.checked_add_signed(dc.checked_mul(steps)?)?;
        Some(Position::new(row, col))
    }
}

/// Fixed-size grid of tiles stored row-major
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<Tile>,
}

/// Unchecked serialized form, validated on the way into a `Board`
#[derive(Deserialize)]
struct RawBoard {
    height: usize,
    width: usize,
    cells: Vec<Tile>,
}

impl TryFrom<RawBoard> for Board {
    type Error = EngineError;

    fn try_from(raw: RawBoard) -> Result<Self> {
        let mut board = Board::new(raw.height, raw.width)?;
        if raw.cells.len() != board.cells.len() {
            return Err(EngineError::InvalidDimensions {
                height: raw.height,
                width: raw.width,
            });
        }
        board.cells = raw.cells;
        Ok(board)
    }
}

impl Board {
    /// Create an empty board
    pub fn new(height: usize, width: usize) -> Result<Self> {
        let cells = height
            .checked_mul(width)
            .filter(|&n| n > 0)
            .ok_or(EngineError::InvalidDimensions { height, width })?;
        Ok(Self {
            height,
            width,
            cells: vec![0; cells],
        })
    }

    /// Build a board from explicit rows (all rows must share one length)
    pub fn from_rows(rows: &[Vec<Tile>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut board = Self::new(height, width)?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(EngineError::InvalidDimensions {
                    height,
                    width: values.len(),
                });
            }
            let start = row * width;
            board.cells[start..start + width].copy_from_slice(values);
        }
        Ok(board)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Check if a position is on the board
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    fn index(&self, pos: Position) -> Result<usize> {
        if !self.contains(pos) {
            return Err(EngineError::OutOfRange {
                row: pos.row,
                col: pos.col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(pos.row * self.width + pos.col)
    }

    pub fn get(&self, pos: Position) -> Result<Tile> {
        self.index(pos).map(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Position, value: Tile) -> Result<()> {
        let i = self.index(pos)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Zero every cell
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Empty positions in row-major order
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 0)
            .map(|(i, _)| Position::new(i / self.width, i % self.width))
            .collect()
    }

    /// Number of non-empty cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    pub fn tile_sum(&self) -> Tile {
        self.cells.iter().sum()
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Copy out the grid as nested rows
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }
}

impl fmt::Display for Board {
    /// Nested-list form, e.g. `[[0, 2], [4, 0]]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[")?;
            for (c, value) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", value)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}
