//! Configuration settings for grid generation runs

use crate::automaton::{AutomatonRule, CaveSmoother, EdgePolicy};
use crate::generators::Algorithm;
use crate::grid::Neighborhood;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub grid: GridConfig,
    pub generation: GenerationConfig,
    #[serde(default)]
    pub automaton: Option<AutomatonConfig>,
    #[serde(default)]
    pub caves: Option<CaveConfig>,
    #[serde(default)]
    pub random: RandomConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub algorithm: Option<Algorithm>,
    pub neighborhood: Neighborhood,
    pub min_room_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomatonConfig {
    /// Rule notation or preset name
    pub rule: String,
    pub generations: usize,
    pub wall_probability: f64,
    pub edge_policy: EdgePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaveConfig {
    pub radius: usize,
    pub generations: usize,
    pub wall_probability: f64,
    pub edge_policy: EdgePolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RandomConfig {
    /// Fixed seed for reproducible runs; drawn from entropy when absent
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub directory: Option<PathBuf>,
    pub show_generations: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid: GridConfig {
                width: 51,
                height: 21,
            },
            generation: GenerationConfig {
                algorithm: Some(Algorithm::DepthFirst),
                neighborhood: Neighborhood::VonNeumann,
                min_room_size: 2,
            },
            automaton: None,
            caves: None,
            random: RandomConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Text,
                directory: None,
                show_generations: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            anyhow::bail!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.width,
                self.grid.height
            );
        }

        if let Some(automaton) = &self.automaton {
            AutomatonRule::parse(&automaton.rule)
                .with_context(|| format!("Automaton rule {:?} is not usable", automaton.rule))?;
            if automaton.generations == 0 {
                anyhow::bail!("Number of automaton generations must be positive");
            }
            check_probability(automaton.wall_probability)?;
        }

        if let Some(caves) = &self.caves {
            if caves.radius == 0 {
                anyhow::bail!("Cave smoothing radius must be positive");
            }
            if CaveSmoother::window_size(caves.radius).is_none() {
                anyhow::bail!("Cave smoothing radius {} is too large", caves.radius);
            }
            if caves.generations == 0 {
                anyhow::bail!("Number of cave smoothing generations must be positive");
            }
            check_probability(caves.wall_probability)?;
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(width) = cli_overrides.width {
            self.grid.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.grid.height = height;
        }
        if let Some(algorithm) = cli_overrides.algorithm {
            self.generation.algorithm = Some(algorithm);
        }
        if cli_overrides.no_generator {
            self.generation.algorithm = None;
        }
        if let Some(ref rule) = cli_overrides.rule {
            let automaton = self.automaton.get_or_insert_with(AutomatonConfig::default);
            automaton.rule = rule.clone();
        }
        if let Some(generations) = cli_overrides.generations {
            if let Some(automaton) = self.automaton.as_mut() {
                automaton.generations = generations;
            }
        }
        if let Some(seed) = cli_overrides.seed {
            self.random.seed = Some(seed);
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.directory = Some(output_dir.clone());
        }
        if cli_overrides.show_generations {
            self.output.show_generations = true;
        }
    }
}

impl Default for AutomatonConfig {
    fn default() -> Self {
        Self {
            rule: "Game of Life".to_string(),
            generations: 10,
            wall_probability: 0.5,
            edge_policy: EdgePolicy::Wall,
        }
    }
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            generations: 8,
            wall_probability: 0.5,
            edge_policy: EdgePolicy::Absent,
        }
    }
}

fn check_probability(probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        anyhow::bail!("Wall probability must be within 0.0..=1.0, got {}", probability);
    }
    Ok(())
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub algorithm: Option<Algorithm>,
    pub no_generator: bool,
    pub rule: Option<String>,
    pub generations: Option<usize>,
    pub seed: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub show_generations: bool,
}
