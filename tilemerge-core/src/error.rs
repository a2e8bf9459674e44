//! Engine error types

/// Errors reported by the rule engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid grid dimensions: {height}x{width} (both must be at least 1)")]
    InvalidDimensions { height: usize, width: usize },

    #[error("Position ({row}, {col}) is outside the {height}x{width} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("Cannot spawn a tile: board is full")]
    BoardFull,

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
