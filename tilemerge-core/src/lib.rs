//! tilemerge core - rule engine for the sliding-tile merge puzzle
//!
//! This crate provides:
//! - The line merge algorithm (slide, combine, slide)
//! - Direction geometry and per-grid traversal tables
//! - A bounds-checked rectangular tile grid
//! - The grid engine: moves, change detection and seeded tile spawning
//!
//! Rendering and input handling live outside this crate; callers drive an
//! [`Engine`] and read its grid back.

pub mod board;
pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod line;

// Re-exports for convenient access
pub use board::{Board, Position, Tile};
pub use config::EngineConfig;
pub use direction::{Direction, ParseDirectionError, TraversalTable};
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use line::merge_line;
