//! Composition of generator, automaton and cave smoothing into one run

use super::RunReport;
use crate::automaton::{AutomatonRule, AutomatonStepper, CaveSmoother};
use crate::config::Settings;
use crate::generators::{floor_regions, Carver};
use crate::grid::{CellState, Grid, Neighborhood};
use crate::utils::random::seeded_source;
use anyhow::{Context, Result};
use rand::Rng;
use std::fmt;
use std::time::Instant;
use tracing::info;

/// Phase of a run that reported a generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Automaton,
    Caves,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Automaton => write!(f, "automaton"),
            Stage::Caves => write!(f, "caves"),
        }
    }
}

/// A validated, ready-to-run generation job
pub struct Pipeline {
    settings: Settings,
    carver: Option<Carver>,
    stepper: Option<AutomatonStepper>,
    smoother: Option<CaveSmoother>,
}

impl Pipeline {
    /// Validate settings and build the stages. A malformed rule fails here,
    /// before any grid exists.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate().context("Configuration validation failed")?;

        let carver = settings.generation.algorithm.map(|algorithm| {
            Carver::new(
                algorithm,
                settings.generation.neighborhood,
                settings.generation.min_room_size,
            )
        });

        let stepper = match &settings.automaton {
            Some(config) => {
                let rule = AutomatonRule::parse(&config.rule)?;
                Some(
                    AutomatonStepper::new(rule, config.edge_policy, config.generations)
                        .with_wall_probability(config.wall_probability),
                )
            }
            None => None,
        };

        let smoother = settings.caves.as_ref().map(|config| CaveSmoother {
            radius: config.radius,
            generations: config.generations,
            edge_policy: config.edge_policy,
            wall_probability: config.wall_probability,
        });

        Ok(Self {
            settings,
            carver,
            stepper,
            smoother,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run with the configured seed, or a fresh one when none is set
    pub fn run(&self) -> Result<RunReport> {
        self.run_with(|_, _, _| {})
    }

    /// Run, calling `observe` after every automaton or smoothing generation
    pub fn run_with<F>(&self, observe: F) -> Result<RunReport>
    where
        F: FnMut(Stage, usize, &Grid),
    {
        let seed = self.settings.random.seed.unwrap_or_else(rand::random);
        let mut rng = seeded_source(Some(seed));
        let mut report = self.run_with_source(&mut rng, observe)?;
        report.seed = seed;
        Ok(report)
    }

    /// Run against an explicit random source. The report's seed is left at 0.
    pub fn run_with_source<R, F>(&self, rng: &mut R, mut observe: F) -> Result<RunReport>
    where
        R: Rng + ?Sized,
        F: FnMut(Stage, usize, &Grid),
    {
        let start_time = Instant::now();
        let mut grid = Grid::new(self.settings.grid.width, self.settings.grid.height);
        info!(
            width = grid.width(),
            height = grid.height(),
            algorithm = ?self.carver.map(|carver| carver.algorithm()),
            "starting generation run"
        );

        if let Some(carver) = &self.carver {
            carver
                .generate(&mut grid, rng)
                .with_context(|| format!("{} generation failed", carver.algorithm()))?;
        }

        // Only randomize when nothing has built structure yet
        let mut structured = self.carver.is_some();

        let automaton = self.stepper.as_ref().map(|stepper| {
            if !structured {
                stepper.seed(&mut grid, &mut *rng);
                structured = true;
            }
            let steps = stepper.run_with(&mut grid, |generation, grid| {
                observe(Stage::Automaton, generation, grid)
            });
            info!(rule = %stepper.rule, generations = steps.generations, converged = steps.converged, "automaton finished");
            steps
        });

        let caves = self.smoother.as_ref().map(|smoother| {
            if !structured {
                smoother.seed(&mut grid, &mut *rng);
            }
            let steps = smoother.run_with(&mut grid, |generation, grid| {
                observe(Stage::Caves, generation, grid)
            });
            info!(generations = steps.generations, converged = steps.converged, "cave smoothing finished");
            steps
        });

        let neighborhood = self
            .carver
            .map_or(Neighborhood::Moore, |carver| carver.neighborhood());

        Ok(RunReport {
            algorithm: self.carver.map(|carver| carver.algorithm()),
            rule: self.stepper.as_ref().map(|stepper| stepper.rule.notation()),
            seed: 0,
            automaton,
            caves,
            floor_cells: grid.count(CellState::Floor),
            wall_cells: grid.count(CellState::Wall),
            floor_regions: floor_regions(&grid, neighborhood),
            elapsed: start_time.elapsed(),
            grid,
        })
    }
}
