//! Configuration management for generation runs

pub mod settings;

pub use settings::{
    AutomatonConfig, CaveConfig, CliOverrides, GenerationConfig, GridConfig, OutputConfig,
    OutputFormat, RandomConfig, Settings,
};
