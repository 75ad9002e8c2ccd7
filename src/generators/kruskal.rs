//! Kruskal's algorithm over cells, driven by a disjoint-set forest

use crate::error::GridResult;
use crate::grid::{CellState, Coord, DisjointSet, Grid, Neighborhood};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Carves a perfect maze by opening cells in random order whenever doing so
/// joins distinct regions without closing a loop.
///
/// Cells at even offsets on both axes are rooms and start open; cells at odd
/// offsets on both axes are pillars and stay closed. Every other cell sits
/// between two rooms and is a candidate passage. Adjacency is always von
/// Neumann.
#[derive(Debug, Clone, Copy, Default)]
pub struct KruskalCarver;

impl KruskalCarver {
    pub const NEIGHBORHOOD: Neighborhood = Neighborhood::VonNeumann;

    pub fn new() -> Self {
        Self
    }

    pub fn generate<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> GridResult<()> {
        grid.fill(CellState::Wall);

        let origin = (grid.min_x(), grid.min_y());
        let parity = |(x, y): Coord| ((x - origin.0) % 2 == 0, (y - origin.1) % 2 == 0);

        let mut order: Vec<Coord> = grid.coords().collect();
        order.shuffle(rng);
        let mut sets = DisjointSet::new(order.iter().copied());

        for &cell in &order {
            if parity(cell) == (true, true) {
                grid.set(cell, CellState::Floor)?;
            }
        }

        let mut opened = 0usize;
        let mut skipped = 0usize;
        for &cell in &order {
            match parity(cell) {
                (true, true) | (false, false) => continue,
                _ => {}
            }

            let floors = grid.neighbors(cell, Some(CellState::Floor), Self::NEIGHBORHOOD);
            let roots: Vec<Coord> = floors.iter().filter_map(|&floor| sets.find(floor)).collect();
            if roots.iter().unique().count() < floors.len() {
                skipped += 1;
                continue;
            }

            grid.set(cell, CellState::Floor)?;
            for &floor in &floors {
                sets.union(cell, floor);
            }
            opened += 1;
        }

        debug!(opened, skipped, "kruskal carving finished");
        Ok(())
    }
}
