//! Procedural grid generation
//!
//! Carves mazes and rooms into a grid of cells with depth-first, Prim,
//! Kruskal and recursive-division generators, and evolves grids with
//! birth/survival cellular automata and majority-vote cave smoothing.

pub mod automaton;
pub mod config;
pub mod error;
pub mod generators;
pub mod grid;
pub mod pipeline;
pub mod utils;

pub use config::Settings;
pub use error::GridError;
pub use grid::{CellState, Grid};
pub use pipeline::{Pipeline, RunReport};

use anyhow::Result;

/// Main entry point: run the generation described by `settings`
pub fn generate(settings: Settings) -> Result<RunReport> {
    Pipeline::new(settings)?.run()
}
