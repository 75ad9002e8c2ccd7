//! Recursive spatial division into nested rooms

use crate::error::GridResult;
use crate::grid::{Axis, CellState, Grid, Neighborhood};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Splits the open grid with walls on odd lines until every area is small
/// enough, then opens one passage through each wall
#[derive(Debug, Clone, Copy)]
pub struct RecursiveDivider {
    /// Areas with both dimensions at or below this size are not split
    pub min_room_size: usize,
}

impl Default for RecursiveDivider {
    fn default() -> Self {
        Self { min_room_size: 2 }
    }
}

impl RecursiveDivider {
    pub fn new(min_room_size: usize) -> Self {
        Self { min_room_size }
    }

    pub fn generate<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) -> GridResult<()> {
        grid.fill(CellState::Floor);

        let mut areas = vec![Grid::from_coords(grid.coords())];
        let mut walls: Vec<Grid> = Vec::new();

        while let Some(area) = areas.pop() {
            let (width, height) = (area.width(), area.height());
            if width <= self.min_room_size && height <= self.min_room_size {
                continue;
            }

            let axis = if width > height {
                Axis::X
            } else if height > width {
                Axis::Y
            } else if rng.gen::<bool>() {
                Axis::X
            } else {
                Axis::Y
            };
            let span = match axis {
                Axis::X => width,
                Axis::Y => height,
            };
            // Too narrow for a wall with open cells on both sides
            if span < 3 {
                continue;
            }

            let parts = area.partition(axis, None, true, rng)?;
            for cell in parts.line.coords() {
                grid.set(cell, CellState::Wall)?;
            }
            debug!(%axis, line_cells = parts.line.len(), "placed dividing wall");
            walls.push(parts.line);
            areas.push(parts.before);
            areas.push(parts.after);
        }

        for wall in &walls {
            let cells: Vec<_> = wall.coords().collect();
            let thin: Vec<_> = cells
                .iter()
                .copied()
                .filter(|&cell| {
                    grid.neighbors(cell, Some(CellState::Wall), Neighborhood::VonNeumann).len() < 3
                })
                .collect();
            let candidates = if thin.is_empty() { &cells } else { &thin };
            if let Some(&door) = candidates.choose(rng) {
                grid.set(door, CellState::Floor)?;
            }
        }

        debug!(walls = walls.len(), "recursive division finished");
        Ok(())
    }
}
