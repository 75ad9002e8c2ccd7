//! Majority-vote cave smoothing

use super::rule::EdgePolicy;
use super::stepper::{seed_random, StepReport};
use crate::grid::{CellState, Coord, Grid, Neighborhood};
use rand::Rng;
use tracing::debug;

/// Turns random noise into caves: each generation a cell becomes `Wall`
/// when walls hold a strict majority of the square of side `2 * radius + 1`
/// around it
#[derive(Debug, Clone, Copy)]
pub struct CaveSmoother {
    pub radius: usize,
    pub generations: usize,
    pub edge_policy: EdgePolicy,
    pub wall_probability: f64,
}

impl Default for CaveSmoother {
    fn default() -> Self {
        Self {
            radius: 1,
            generations: 3,
            edge_policy: EdgePolicy::Wall,
            wall_probability: 0.5,
        }
    }
}

impl CaveSmoother {
    pub fn seed<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        seed_random(grid, self.wall_probability, rng);
    }

    /// Cells in a full square window of `radius`, or `None` when the count
    /// does not fit in a `usize`
    pub fn window_size(radius: usize) -> Option<usize> {
        let side = radius.checked_mul(2)?.checked_add(1)?;
        side.checked_mul(side)
    }

    /// Saturates for oversized radii
    fn window(&self) -> usize {
        Self::window_size(self.radius).unwrap_or(usize::MAX)
    }

    fn next_state(&self, snapshot: &Grid, cell: Coord) -> CellState {
        let ball = snapshot.ball(cell, self.radius, Neighborhood::Moore);
        let mut walls = ball
            .iter()
            .filter(|&&member| snapshot.get(member) == Some(CellState::Wall))
            .count();
        if self.edge_policy == EdgePolicy::Wall {
            walls += self.window().saturating_sub(ball.len());
        }

        if walls > self.window() / 2 {
            CellState::Wall
        } else {
            CellState::Floor
        }
    }

    /// Smooth `grid` by one generation. Returns whether any cell changed.
    pub fn step(&self, grid: &mut Grid) -> bool {
        let snapshot = grid.clone();
        grid.update(|cell, _| self.next_state(&snapshot, cell));
        *grid != snapshot
    }

    pub fn run(&self, grid: &mut Grid) -> StepReport {
        self.run_with(grid, |_, _| {})
    }

    pub fn run_with<F>(&self, grid: &mut Grid, mut observe: F) -> StepReport
    where
        F: FnMut(usize, &Grid),
    {
        let mut report = StepReport {
            generations: 0,
            converged: false,
        };

        for generation in 1..=self.generations {
            let changed = self.step(grid);
            report.generations = generation;

            debug!(generation, walls = grid.count(CellState::Wall), "cave smoothing generation");
            observe(generation, grid);

            if !changed {
                report.converged = true;
                break;
            }
        }
        report
    }
}
