//! Synchronous cellular-automaton stepping

use super::rule::{AutomatonRule, EdgePolicy};
use crate::grid::{CellState, Coord, Grid, Neighborhood};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outcome of a stepping run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Generations applied, including the one that revealed a fixed point
    pub generations: usize,
    /// Whether stepping stopped on a fixed point before the budget ran out
    pub converged: bool,
}

/// Fill every cell randomly: `Wall` with probability `wall_probability`,
/// otherwise `Floor`
pub fn seed_random<R: Rng + ?Sized>(grid: &mut Grid, wall_probability: f64, rng: &mut R) {
    grid.update(|_, _| {
        if rng.gen::<f64>() < wall_probability {
            CellState::Wall
        } else {
            CellState::Floor
        }
    });
}

/// Applies one rule to a grid for a bounded number of generations
#[derive(Debug, Clone)]
pub struct AutomatonStepper {
    pub rule: AutomatonRule,
    pub edge_policy: EdgePolicy,
    pub generations: usize,
    pub wall_probability: f64,
}

impl AutomatonStepper {
    pub fn new(rule: AutomatonRule, edge_policy: EdgePolicy, generations: usize) -> Self {
        Self {
            rule,
            edge_policy,
            generations,
            wall_probability: 0.5,
        }
    }

    pub fn with_wall_probability(mut self, wall_probability: f64) -> Self {
        self.wall_probability = wall_probability;
        self
    }

    /// Randomize the grid before stepping
    pub fn seed<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        seed_random(grid, self.wall_probability, rng);
    }

    /// Wall neighbors of `cell` in `snapshot`, with off-grid slots added
    /// under the wall edge policy
    pub fn wall_count(&self, snapshot: &Grid, cell: Coord) -> u8 {
        let mut walls = snapshot
            .neighbors(cell, Some(CellState::Wall), Neighborhood::Moore)
            .len();
        if self.edge_policy == EdgePolicy::Wall {
            walls += snapshot.missing_neighbors(cell, Neighborhood::Moore);
        }
        walls as u8
    }

    /// Next state of a cell given its current state and wall-neighbor count
    pub fn next_state(&self, current: CellState, walls: u8) -> CellState {
        match current {
            CellState::Wall if self.rule.survives(walls) => CellState::Wall,
            CellState::Wall => CellState::Floor,
            _ if self.rule.births(walls) => CellState::Wall,
            _ => CellState::Floor,
        }
    }

    /// Advance `grid` by one synchronous generation. Returns whether any
    /// cell changed.
    pub fn step(&self, grid: &mut Grid) -> bool {
        let snapshot = grid.clone();
        grid.update(|cell, current| self.next_state(current, self.wall_count(&snapshot, cell)));
        *grid != snapshot
    }

    pub fn run(&self, grid: &mut Grid) -> StepReport {
        self.run_with(grid, |_, _| {})
    }

    /// Step until the budget runs out or a fixed point is reached, calling
    /// `observe` with the generation number (from 1) after each generation
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

            debug!(
                generation,
                walls = grid.count(CellState::Wall),
                floors = grid.count(CellState::Floor),
                "automaton generation"
            );
            observe(generation, grid);

            if !changed {
                report.converged = true;
                break;
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse_grid_from_string;
    use crate::utils::random::seeded_source;

    fn life() -> AutomatonStepper {
        AutomatonStepper::new(AutomatonRule::parse("23/3").unwrap(), EdgePolicy::Absent, 10)
    }

    #[test]
    fn test_blinker_oscillates() {
        let horizontal = parse_grid_from_string(".....\n.....\n.###.\n.....\n.....\n").unwrap();
        let vertical = parse_grid_from_string(".....\n..#..\n..#..\n..#..\n.....\n").unwrap();

        let mut grid = horizontal.clone();
        let mut stepper = life();
        stepper.generations = 1;
        let report = stepper.run(&mut grid);
        assert_eq!(grid, vertical);
        assert_eq!(report, StepReport { generations: 1, converged: false });

        stepper.run(&mut grid);
        assert_eq!(grid, horizontal);
    }

    #[test]
    fn test_still_life_converges() {
        let block = parse_grid_from_string("....\n.##.\n.##.\n....\n").unwrap();
        let mut grid = block.clone();
        let report = life().run(&mut grid);
        assert_eq!(grid, block);
        assert_eq!(report, StepReport { generations: 1, converged: true });
    }

    #[test]
    fn test_empty_rule_clears_grid() {
        let stepper = AutomatonStepper::new(AutomatonRule::parse("/").unwrap(), EdgePolicy::Wall, 1);
        for seed in 0..5 {
            let mut grid = Grid::new(8, 6);
            stepper.seed(&mut grid, &mut seeded_source(Some(seed)));
            stepper.run(&mut grid);
            assert_eq!(grid.count(CellState::Floor), grid.len());
        }
    }

    #[test]
    fn test_stops_early_at_fixed_point() {
        let stepper = AutomatonStepper::new(AutomatonRule::parse("/").unwrap(), EdgePolicy::Wall, 50);
        let mut grid = Grid::new(6, 6);
        let mut observed = Vec::new();
        let report = stepper.run_with(&mut grid, |generation, _| observed.push(generation));
        assert_eq!(report, StepReport { generations: 2, converged: true });
        assert_eq!(observed, vec![1, 2]);
    }

    #[test]
    fn test_edge_policy() {
        let birth_on_five = AutomatonRule::parse("/5").unwrap();
        let open = || parse_grid_from_string("...\n...\n...\n").unwrap();

        let mut walled = open();
        AutomatonStepper::new(birth_on_five.clone(), EdgePolicy::Wall, 1).run(&mut walled);
        assert_eq!(walled.to_string(), "#.#\n...\n#.#\n");

        let mut absent = open();
        let report = AutomatonStepper::new(birth_on_five, EdgePolicy::Absent, 3).run(&mut absent);
        assert_eq!(absent, open());
        assert!(report.converged);
    }

    #[test]
    fn test_step_covers_absorbed_domain() {
        let stepper = AutomatonStepper::new(AutomatonRule::parse("/0").unwrap(), EdgePolicy::Absent, 1);
        let mut grid = Grid::from_coords(vec![(0, 0), (1, 0), (0, 1)]);
        assert!(stepper.step(&mut grid));
        assert_eq!(grid.count(CellState::Wall), 3);
        assert_eq!(grid.len(), 3);
        assert!(!grid.contains((1, 1)));

        let mut open = Grid::from_coords(vec![(0, 0), (1, 0), (0, 1)]);
        let still = AutomatonStepper::new(AutomatonRule::parse("/").unwrap(), EdgePolicy::Wall, 1);
        assert!(!still.step(&mut open));
    }

    #[test]
    fn test_seed_probability_extremes() {
        let mut grid = Grid::new(5, 5);
        seed_random(&mut grid, 0.0, &mut seeded_source(Some(1)));
        assert_eq!(grid.count(CellState::Floor), 25);
        seed_random(&mut grid, 1.0, &mut seeded_source(Some(1)));
        assert_eq!(grid.count(CellState::Wall), 25);
    }
}
