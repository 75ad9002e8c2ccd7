//! Structural generators that carve or divide a grid in place

pub mod depth_first;
pub mod division;
pub mod kruskal;
pub mod prim;

pub use depth_first::DepthFirstCarver;
pub use division::RecursiveDivider;
pub use kruskal::KruskalCarver;
pub use prim::PrimCarver;

use crate::error::GridResult;
use crate::grid::{CellState, Grid, Neighborhood};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Generation algorithm selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    DepthFirst,
    Prim,
    Kruskal,
    RecursiveDivision,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::DepthFirst,
        Algorithm::Prim,
        Algorithm::Kruskal,
        Algorithm::RecursiveDivision,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::DepthFirst => "depth_first",
            Algorithm::Prim => "prim",
            Algorithm::Kruskal => "kruskal",
            Algorithm::RecursiveDivision => "recursive_division",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown algorithm '{}', expected one of: depth_first, prim, kruskal, recursive_division",
                    s
                )
            })
    }
}

/// Unified generator interface over the concrete carvers
#[derive(Debug, Clone, Copy)]
pub enum Carver {
    DepthFirst(DepthFirstCarver),
    Prim(PrimCarver),
    Kruskal(KruskalCarver),
    Division(RecursiveDivider),
}

impl Carver {
    /// Build the carver for an algorithm
    pub fn new(algorithm: Algorithm, neighborhood: Neighborhood, min_room_size: usize) -> Self {
        match algorithm {
            Algorithm::DepthFirst => Carver::DepthFirst(DepthFirstCarver::new(neighborhood)),
            Algorithm::Prim => Carver::Prim(PrimCarver::new(neighborhood)),
            Algorithm::Kruskal => Carver::Kruskal(KruskalCarver::new()),
            Algorithm::RecursiveDivision => Carver::Division(RecursiveDivider::new(min_room_size)),
        }
    }

    /// Carve `grid` in place
    pub fn generate<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> GridResult<()> {
        match self {
            Carver::DepthFirst(carver) => carver.generate(grid, rng),
            Carver::Prim(carver) => carver.generate(grid, rng),
            Carver::Kruskal(carver) => carver.generate(grid, rng),
            Carver::Division(divider) => divider.generate(grid, rng),
        }
    }

    /// Adjacency the carved structure is connected under
    pub fn neighborhood(&self) -> Neighborhood {
        match self {
            Carver::DepthFirst(carver) => carver.neighborhood,
            Carver::Prim(carver) => carver.neighborhood,
            Carver::Kruskal(_) => KruskalCarver::NEIGHBORHOOD,
            Carver::Division(_) => Neighborhood::VonNeumann,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Carver::DepthFirst(_) => Algorithm::DepthFirst,
            Carver::Prim(_) => Algorithm::Prim,
            Carver::Kruskal(_) => Algorithm::Kruskal,
            Carver::Division(_) => Algorithm::RecursiveDivision,
        }
    }
}

/// Number of connected `Floor` regions under `neighborhood`
pub fn floor_regions(grid: &Grid, neighborhood: Neighborhood) -> usize {
    let mut seen = HashSet::new();
    let mut regions = 0;

    for start in grid.coords() {
        if grid.get(start) != Some(CellState::Floor) || !seen.insert(start) {
            continue;
        }
        regions += 1;
        let mut stack = vec![start];
        while let Some(cell) = stack.pop() {
            for adjacent in grid.neighbors(cell, Some(CellState::Floor), neighborhood) {
                if seen.insert(adjacent) {
                    stack.push(adjacent);
                }
            }
        }
    }
    regions
}

/// Number of unordered adjacent `Floor`-`Floor` pairs under `neighborhood`
pub fn floor_adjacencies(grid: &Grid, neighborhood: Neighborhood) -> usize {
    let doubled: usize = grid
        .coords()
        .filter(|&cell| grid.get(cell) == Some(CellState::Floor))
        .map(|cell| grid.neighbors(cell, Some(CellState::Floor), neighborhood).len())
        .sum();
    doubled / 2
}
