//! Randomized depth-first carving (recursive backtracker)

use crate::error::GridResult;
use crate::grid::{CellState, Coord, Grid, Neighborhood};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Carves a perfect maze by walking from a random boundary cell and
/// backtracking when no carvable neighbor is left
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstCarver {
    pub neighborhood: Neighborhood,
}

impl DepthFirstCarver {
    pub fn new(neighborhood: Neighborhood) -> Self {
        Self { neighborhood }
    }

    /// Cell the carve begins from: a uniformly random boundary cell, or the
    /// first cell when the grid has no interior to bound
    pub fn start_cell<R: Rng + ?Sized>(&self, grid: &Grid, rng: &mut R) -> Option<Coord> {
        let edges = grid.edges(self.neighborhood);
        match edges.choose(rng) {
            Some(&start) => Some(start),
            None => grid.coords().next(),
        }
    }

    pub fn generate<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> GridResult<()> {
        grid.fill(CellState::Wall);

        let Some(start) = self.start_cell(grid, rng) else {
            return Ok(());
        };

        grid.set(start, CellState::Floor)?;
        let mut stack = vec![start];
        let mut carved = 1usize;

        while let Some(&top) = stack.last() {
            // A wall may only be opened if the top is its sole floor neighbor
            let candidates: Vec<_> = grid
                .neighbors(top, Some(CellState::Wall), self.neighborhood)
                .into_iter()
                .filter(|&wall| {
                    grid.neighbors(wall, Some(CellState::Floor), self.neighborhood).len() <= 1
                })
                .collect();

            match candidates.choose(rng) {
                Some(&next) => {
                    grid.set(next, CellState::Floor)?;
                    stack.push(next);
                    carved += 1;
                }
                None => {
                    stack.pop();
                }
            }
        }

        debug!(?start, carved, "depth-first carving finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{floor_adjacencies, floor_regions};
    use crate::utils::random::seeded_source;

    #[test]
    fn test_perfect_maze_for_many_seeds() {
        for neighborhood in [Neighborhood::Moore, Neighborhood::VonNeumann] {
            let carver = DepthFirstCarver::new(neighborhood);
            for seed in 0..25 {
                let mut grid = Grid::new(11, 7);
                carver.generate(&mut grid, &mut seeded_source(Some(seed))).unwrap();

                let floors = grid.count(CellState::Floor);
                assert!(floors > 1);
                assert_eq!(floor_regions(&grid, neighborhood), 1);
                assert_eq!(floors - floor_adjacencies(&grid, neighborhood), 1);
            }
        }
    }

    #[test]
    fn test_single_cell_grid() {
        let mut grid = Grid::new(1, 1);
        DepthFirstCarver::default().generate(&mut grid, &mut seeded_source(Some(3))).unwrap();
        assert_eq!(grid.count(CellState::Floor), 1);
    }

    #[test]
    fn test_starts_on_boundary() {
        for neighborhood in [Neighborhood::Moore, Neighborhood::VonNeumann] {
            let carver = DepthFirstCarver::new(neighborhood);
            let edges = Grid::new(9, 7).edges(neighborhood);
            for seed in 0..30 {
                let mut grid = Grid::new(9, 7);
                let mut rng = seeded_source(Some(seed));
                let start = carver.start_cell(&grid, &mut rng.clone()).unwrap();
                assert!(edges.contains(&start), "start {:?} is interior", start);

                carver.generate(&mut grid, &mut rng).unwrap();
                assert_eq!(grid.get(start), Some(CellState::Floor));
            }
        }
    }

    #[test]
    fn test_golden_pattern() {
        let mut grid = Grid::new(5, 5);
        DepthFirstCarver::new(Neighborhood::VonNeumann)
            .generate(&mut grid, &mut seeded_source(Some(42)))
            .unwrap();
        assert_eq!(grid.to_string(), "...#.\n.##..\n.###.\n..##.\n#....\n");
    }
}
