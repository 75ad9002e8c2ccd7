//! File I/O operations for grids

use super::{CellState, Grid};
use anyhow::{Context, Result};
use std::path::Path;

/// Parse a grid from its rendered form.
/// Each line is one row; `#` wall, `.` floor, `@` seed, space for a slot
/// outside the grid's domain. Rows may differ in length only by trailing
/// out-of-domain slots.
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid text is empty or contains no rows");
    }

    let mut cells = Vec::new();
    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let state = CellState::from_symbol(ch).with_context(|| {
                format!(
                    "Invalid character '{}' at row {}, column {}. Only '#', '.', '@' and ' ' are allowed",
                    ch, row, col
                )
            })?;
            cells.push(((col as i32, row as i32), state));
        }
    }

    let mut grid = Grid::from_coords(cells.iter().map(|&(coord, _)| coord));
    for (coord, state) in cells {
        grid.set(coord, state)?;
    }
    Ok(grid)
}

/// Load a grid from a rendered text file
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Save a grid in rendered text form
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    write_with_parents(path.as_ref(), &grid.to_string())
}

/// Save a grid as JSON
pub fn save_grid_as_json<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(grid).context("Failed to serialize grid")?;
    write_with_parents(path.as_ref(), &content)
}

/// Load a grid from JSON
pub fn load_grid_from_json<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse grid JSON: {}", path.as_ref().display()))
}

fn write_with_parents(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.display()))
}
