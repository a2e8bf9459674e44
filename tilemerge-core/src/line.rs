//! Line merge algorithm
//!
//! A line is one row or column copied out of the grid, ordered so that
//! index 0 is the edge tiles slide toward. Merging is three passes:
//! compact, combine adjacent equal pairs, compact again.

use crate::board::Tile;

/// Merge a single line toward its front.
///
/// The input is never mutated; a new line of the same length is returned.
///
/// ```
/// use tilemerge_core::merge_line;
///
/// assert_eq!(merge_line(&[2, 0, 2, 4]), vec![4, 4, 0, 0]);
/// assert_eq!(merge_line(&[2, 2, 2, 2, 2]), vec![4, 4, 2, 0, 0]);
/// ```
pub fn merge_line(line: &[Tile]) -> Vec<Tile> {
    let mut merged = slide(line);
    combine(&mut merged);
    slide(&merged)
}

/// Pack non-zero tiles toward the front, zero-filling the tail
fn slide(line: &[Tile]) -> Vec<Tile> {
    let mut packed: Vec<Tile> = line.iter().copied().filter(|&v| v != 0).collect();
    packed.resize(line.len(), 0);
    packed
}

/// Combine adjacent equal pairs on an already packed line.
///
/// Each tile takes part in at most one merge; the scan stops at the first gap.
fn combine(line: &mut [Tile]) {
    let mut idx = 0;
    while idx < line.len() && line[idx] != 0 {
        if idx + 1 < line.len() && line[idx + 1] == line[idx] {
            line[idx] = line[idx].saturating_mul(2);
            line[idx + 1] = 0;
            idx += 2;
        } else {
            idx += 1;
        }
    }
}
