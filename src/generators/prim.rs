//! Randomized Prim's frontier growth

use crate::error::GridResult;
use crate::grid::{CellState, Coord, Grid, Neighborhood};
use indexmap::IndexSet;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use tracing::debug;

/// Grows a connected structure from a random seed cell by committing
/// uniformly random frontier cells
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimCarver {
    pub neighborhood: Neighborhood,
}

impl PrimCarver {
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self { neighborhood }
    }

    pub fn generate<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> GridResult<()> {
        grid.fill(CellState::Wall);

        let mut out: HashSet<Coord> = grid.coords().collect();
        let all: Vec<Coord> = grid.coords().collect();
        let Some(&seed) = all.choose(rng) else {
            return Ok(());
        };

        // `in` cells are either carved or retired as walls; only the
        // frontier and `out` need tracking to decide what moves where.
        let mut committed = 1usize;
        let mut retired = 0usize;
        let mut frontier: IndexSet<Coord> = IndexSet::new();

        out.remove(&seed);
        grid.set(seed, CellState::Seed)?;
        for adjacent in grid.neighbors(seed, None, self.neighborhood) {
            out.remove(&adjacent);
            frontier.insert(adjacent);
        }

        while !frontier.is_empty() {
            let index = rng.gen_range(0..frontier.len());
            let Some(cell) = frontier.swap_remove_index(index) else {
                break;
            };
            grid.set(cell, CellState::Floor)?;
            committed += 1;

            for adjacent in grid.neighbors(cell, None, self.neighborhood) {
                if frontier.swap_remove(&adjacent) {
                    // Already bordering the structure through another cell
                    retired += 1;
                } else if out.remove(&adjacent) {
                    frontier.insert(adjacent);
                }
            }
        }

        grid.replace(CellState::Seed, CellState::Floor);
        debug!(?seed, committed, retired, "prim carving finished");
        Ok(())
    }
}
