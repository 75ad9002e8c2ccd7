//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::grid::{io, Grid};
use crate::pipeline::RunReport;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Renders grids for the console
pub struct GridFormatter;

impl GridFormatter {
    /// One line per row, `#` wall, `.` floor, `@` seed
    pub fn render(grid: &Grid) -> String {
        grid.to_string()
    }

    /// Rendered grid framed by column and row indices
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        output.push_str("    ");
        for x in grid.min_x()..=grid.max_x() {
            output.push_str(&format!("{}", x.rem_euclid(10)));
        }
        output.push('\n');

        for (row, line) in (grid.min_y()..=grid.max_y()).zip(grid.to_string().lines()) {
            output.push_str(&format!("{:3} {}\n", row, line));
        }

        output
    }

    /// Title line followed by the rendered grid
    pub fn format_generation(label: &str, generation: usize, grid: &Grid) -> String {
        format!("{} generation {}:\n{}", label, generation, Self::render(grid))
    }

    /// Save a run in the configured format and return the written path
    pub fn save_report<P: AsRef<Path>>(
        report: &RunReport,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let stem = match report.algorithm {
            Some(algorithm) => format!("{}_{}", algorithm, report.seed),
            None => format!("automaton_{}", report.seed),
        };

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.txt", stem));
                io::save_grid_to_file(&report.grid, &path)?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.json", stem));
                report.save_to_file(&path)?;
                path
            }
        };
        Ok(path)
    }
}

/// Console message styling. Plain text when `NO_COLOR` is set or the
/// terminal is dumb.
pub struct ColorOutput;

impl ColorOutput {
    pub fn success(text: &str) -> String {
        Tone::Success.paint(text)
    }

    pub fn error(text: &str) -> String {
        Tone::Error.paint(text)
    }

    pub fn warning(text: &str) -> String {
        Tone::Warning.paint(text)
    }

    pub fn info(text: &str) -> String {
        Tone::Info.paint(text)
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Error,
    Warning,
    Info,
}

impl Tone {
    /// ANSI foreground code
    fn ansi(self) -> u8 {
        match self {
            Tone::Error => 31,
            Tone::Success => 32,
            Tone::Warning => 33,
            Tone::Info => 34,
        }
    }

    fn paint(self, text: &str) -> String {
        let plain = std::env::var_os("NO_COLOR").is_some()
            || std::env::var("TERM").is_ok_and(|term| term == "dumb");
        if plain {
            text.to_string()
        } else {
            format!("\x1b[{}m{}\x1b[0m", self.ansi(), text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::generators::Algorithm;
    use crate::grid::CellState;
    use crate::pipeline::Pipeline;
    use tempfile::tempdir;

    #[test]
    fn test_render_symbols() {
        let mut grid = Grid::new(3, 2);
        grid.set((1, 0), CellState::Floor).unwrap();
        grid.set((2, 1), CellState::Seed).unwrap();
        assert_eq!(GridFormatter::render(&grid), "#.#\n##@\n");
    }

    #[test]
    fn test_grid_with_coords() {
        let grid = Grid::new(12, 2);
        let framed = GridFormatter::format_grid_with_coords(&grid);
        assert!(framed.starts_with("    012345678901\n"));
        assert!(framed.contains("  1 ############"));
    }

    #[test]
    fn test_save_report() {
        let temp_dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.generation.algorithm = Some(Algorithm::Kruskal);
        settings.random.seed = Some(5);
        let report = Pipeline::new(settings).unwrap().run().unwrap();

        let text = GridFormatter::save_report(&report, temp_dir.path(), OutputFormat::Text).unwrap();
        assert!(text.ends_with("kruskal_5.txt"));
        assert_eq!(io::load_grid_from_file(&text).unwrap(), report.grid);

        let json = GridFormatter::save_report(&report, temp_dir.path(), OutputFormat::Json).unwrap();
        let loaded = RunReport::from_json(&std::fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(loaded.grid, report.grid);
        assert_eq!(loaded.seed, 5);
    }

    #[test]
    fn test_tones_keep_text() {
        assert!(ColorOutput::error("failed").contains("failed"));
        assert!(ColorOutput::success("OK").contains("OK"));
        let painted = Tone::Warning.paint("careful");
        assert!(painted == "careful" || painted == "\x1b[33mcareful\x1b[0m");
    }
}
