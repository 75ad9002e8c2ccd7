//! Grid substrate shared by every generator

pub mod disjoint_set;
pub mod grid;
pub mod io;

pub use disjoint_set::DisjointSet;
pub use grid::{Axis, CellState, Coord, Grid, Neighborhood, Partition, MOORE_OFFSETS, VON_NEUMANN_OFFSETS};
pub use io::{load_grid_from_file, parse_grid_from_string, save_grid_to_file};
