//! Result of a generation run

use crate::automaton::StepReport;
use crate::generators::Algorithm;
use crate::grid::Grid;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Everything a run produced, ready to render or persist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Structural generator, if one ran
    pub algorithm: Option<Algorithm>,
    /// Automaton rule in canonical notation, if one ran
    pub rule: Option<String>,
    /// Seed of the random source; replaying it reproduces the grid
    pub seed: u64,
    pub automaton: Option<StepReport>,
    pub caves: Option<StepReport>,
    pub floor_cells: usize,
    pub wall_cells: usize,
    /// Connected floor regions under the generator's adjacency
    pub floor_regions: usize,
    #[serde(skip)]
    pub elapsed: Duration,
    pub grid: Grid,
}

impl RunReport {
    /// Fraction of cells that are open floor
    pub fn floor_density(&self) -> f64 {
        let total = self.floor_cells + self.wall_cells;
        if total == 0 {
            0.0
        } else {
            self.floor_cells as f64 / total as f64
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save the full report as JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json().context("Failed to serialize run report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run Summary:")?;
        writeln!(f, "  Grid: {}x{}", self.grid.width(), self.grid.height())?;
        writeln!(f, "  Seed: {}", self.seed)?;
        if let Some(algorithm) = self.algorithm {
            writeln!(f, "  Generator: {}", algorithm)?;
        }
        if let (Some(rule), Some(steps)) = (&self.rule, &self.automaton) {
            writeln!(
                f,
                "  Automaton: {} ({} generations{})",
                rule,
                steps.generations,
                if steps.converged { ", fixed point" } else { "" }
            )?;
        }
        if let Some(steps) = &self.caves {
            writeln!(
                f,
                "  Caves: {} generations{}",
                steps.generations,
                if steps.converged { ", fixed point" } else { "" }
            )?;
        }
        writeln!(
            f,
            "  Floor: {} cells ({:.1}%), {} region(s)",
            self.floor_cells,
            self.floor_density() * 100.0,
            self.floor_regions
        )?;
        write!(f, "  Time: {:.3}s", self.elapsed.as_secs_f64())
    }
}
