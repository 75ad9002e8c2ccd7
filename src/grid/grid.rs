//! Grid representation and neighborhood queries

use crate::error::{GridError, GridResult};
use itertools::iproduct;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Cell coordinate `(x, y)`
pub type Coord = (i32, i32);

/// Moore offsets, clockwise starting from `(0, 1)`
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Von Neumann offsets, clockwise starting from `(0, 1)`
pub const VON_NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// State held by a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Wall,
    Floor,
    /// Starting cell of Prim's algorithm, reduced to `Floor` once carving ends
    Seed,
}

impl CellState {
    /// Symbol used by the text renderer
    pub fn symbol(self) -> char {
        match self {
            CellState::Wall => '#',
            CellState::Floor => '.',
            CellState::Seed => '@',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' => Some(CellState::Wall),
            '.' => Some(CellState::Floor),
            '@' => Some(CellState::Seed),
            _ => None,
        }
    }
}

/// Direction set used for adjacency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Neighborhood {
    /// 8 surrounding cells
    #[default]
    Moore,
    /// 4 orthogonal cells
    VonNeumann,
}

impl Neighborhood {
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Neighborhood::Moore => &MOORE_OFFSETS,
            Neighborhood::VonNeumann => &VON_NEUMANN_OFFSETS,
        }
    }

    /// Number of neighbor slots around a cell
    pub fn size(self) -> usize {
        self.offsets().len()
    }
}

/// Axis a partition line runs across.
///
/// `X` splits on a column (`x == line`), `Y` splits on a row (`y == line`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Result of splitting a grid along one line
#[derive(Debug, Clone)]
pub struct Partition {
    /// Cells strictly before the line
    pub before: Grid,
    /// Cells on the line
    pub line: Grid,
    /// Cells strictly after the line
    pub after: Grid,
}

/// A bounded 2D domain of cells.
///
/// Stored densely over the bounding box; slots outside the domain of an
/// absorbed (non-rectangular) grid hold `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct Grid {
    origin: Coord,
    width: usize,
    height: usize,
    cells: Vec<Option<CellState>>,
}

/// Unchecked wire form of a [`Grid`]
#[derive(Deserialize)]
struct GridData {
    origin: Coord,
    width: usize,
    height: usize,
    cells: Vec<Option<CellState>>,
}

impl TryFrom<GridData> for Grid {
    type Error = GridError;

    fn try_from(data: GridData) -> GridResult<Self> {
        if data.width.checked_mul(data.height) != Some(data.cells.len()) {
            return Err(GridError::MalformedGrid(format!(
                "{}x{} extents with {} cells",
                data.width,
                data.height,
                data.cells.len()
            )));
        }
        let fits = |low: i32, span: usize| {
            i32::try_from(span)
                .ok()
                .and_then(|span| low.checked_add(span))
                .is_some()
        };
        if !fits(data.origin.0, data.width) || !fits(data.origin.1, data.height) {
            return Err(GridError::MalformedGrid(format!(
                "extents {}x{} at {:?} overflow the coordinate range",
                data.width, data.height, data.origin
            )));
        }
        Ok(Self {
            origin: data.origin,
            width: data.width,
            height: data.height,
            cells: data.cells,
        })
    }
}

impl Grid {
    /// Create a `width` x `height` grid at the origin with every cell `Wall`
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            origin: (0, 0),
            width,
            height,
            cells: vec![Some(CellState::Wall); width * height],
        }
    }

    /// Absorb an arbitrary set of coordinates; every absorbed cell is `Floor`
    /// and the extents become the bounding box of the set.
    pub fn from_coords<I: IntoIterator<Item = Coord>>(coords: I) -> Self {
        let coords: Vec<Coord> = coords.into_iter().collect();
        if coords.is_empty() {
            return Self {
                origin: (0, 0),
                width: 0,
                height: 0,
                cells: Vec::new(),
            };
        }

        let min_x = coords.iter().map(|c| c.0).min().unwrap_or(0);
        let max_x = coords.iter().map(|c| c.0).max().unwrap_or(0);
        let min_y = coords.iter().map(|c| c.1).min().unwrap_or(0);
        let max_y = coords.iter().map(|c| c.1).max().unwrap_or(0);

        let mut grid = Self {
            origin: (min_x, min_y),
            width: (max_x - min_x + 1) as usize,
            height: (max_y - min_y + 1) as usize,
            cells: Vec::new(),
        };
        grid.cells = vec![None; grid.width * grid.height];
        for coord in coords {
            if let Some(idx) = grid.index(coord) {
                grid.cells[idx] = Some(CellState::Floor);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn min_x(&self) -> i32 {
        self.origin.0
    }

    pub fn min_y(&self) -> i32 {
        self.origin.1
    }

    pub fn max_x(&self) -> i32 {
        self.origin.0 + self.width as i32 - 1
    }

    pub fn max_y(&self) -> i32 {
        self.origin.1 + self.height as i32 - 1
    }

    /// Slot index for a coordinate inside the bounding box
    #[inline]
    fn index(&self, (x, y): Coord) -> Option<usize> {
        if x < self.min_x() || x > self.max_x() || y < self.min_y() || y > self.max_y() {
            return None;
        }
        let col = (x - self.origin.0) as usize;
        let row = (y - self.origin.1) as usize;
        Some(row * self.width + col)
    }

    /// Whether the coordinate belongs to the grid's domain
    pub fn contains(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    pub fn get(&self, coord: Coord) -> Option<CellState> {
        self.index(coord).and_then(|idx| self.cells[idx])
    }

    pub fn set(&mut self, coord: Coord, state: CellState) -> GridResult<()> {
        match self.index(coord) {
            Some(idx) if self.cells[idx].is_some() => {
                self.cells[idx] = Some(state);
                Ok(())
            }
            _ => Err(GridError::out_of_bounds(coord)),
        }
    }

    /// Set every in-domain cell to `state`
    pub fn fill(&mut self, state: CellState) {
        for cell in self.cells.iter_mut().flatten() {
            *cell = state;
        }
    }

    /// Replace every cell in `from` state with `to`
    pub fn replace(&mut self, from: CellState, to: CellState) {
        for cell in self.cells.iter_mut().flatten() {
            if *cell == from {
                *cell = to;
            }
        }
    }

    /// Rewrite every in-domain cell, row by row, with the state `f` returns
    /// for its coordinate and current state
    pub fn update<F>(&mut self, mut f: F)
    where
        F: FnMut(Coord, CellState) -> CellState,
    {
        let (origin, width) = (self.origin, self.width);
        for (idx, slot) in self.cells.iter_mut().enumerate() {
            if let Some(state) = slot {
                let coord = (origin.0 + (idx % width) as i32, origin.1 + (idx / width) as i32);
                *state = f(coord, *state);
            }
        }
    }

    /// All in-domain coordinates, row by row
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        iproduct!(self.min_y()..=self.max_y(), self.min_x()..=self.max_x())
            .map(|(y, x)| (x, y))
            .filter(move |&coord| self.contains(coord))
    }

    /// Number of cells in the domain
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(state)).count()
    }

    /// Cells adjacent to `coord` that exist in the grid and, when a filter is
    /// given, hold exactly that state. Returned in direction-table order.
    pub fn neighbors(
        &self,
        coord: Coord,
        filter: Option<CellState>,
        neighborhood: Neighborhood,
    ) -> Vec<Coord> {
        neighborhood
            .offsets()
            .iter()
            .map(|(dx, dy)| (coord.0 + dx, coord.1 + dy))
            .filter(|&adjacent| match (self.get(adjacent), filter) {
                (Some(_), None) => true,
                (Some(state), Some(wanted)) => state == wanted,
                (None, _) => false,
            })
            .collect()
    }

    /// Number of neighbor slots around `coord` that fall outside the grid
    pub fn missing_neighbors(&self, coord: Coord, neighborhood: Neighborhood) -> usize {
        neighborhood.size() - self.neighbors(coord, None, neighborhood).len()
    }

    /// Coordinates reachable from `coord` within `radius` neighbor hops,
    /// `coord` included
    pub fn ball(&self, coord: Coord, radius: usize, neighborhood: Neighborhood) -> BTreeSet<Coord> {
        let mut result = BTreeSet::new();
        if !self.contains(coord) {
            return result;
        }
        result.insert(coord);

        let mut frontier = vec![coord];
        for _ in 0..radius {
            let mut next = Vec::new();
            for &cell in &frontier {
                for adjacent in self.neighbors(cell, None, neighborhood) {
                    if result.insert(adjacent) {
                        next.push(adjacent);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }
        result
    }

    /// Boundary cells: those with fewer neighbors than the direction set size
    pub fn edges(&self, neighborhood: Neighborhood) -> Vec<Coord> {
        self.coords()
            .filter(|&coord| self.missing_neighbors(coord, neighborhood) > 0)
            .collect()
    }

    /// Split into the cells before, on and after one line across `axis`.
    ///
    /// Without an explicit line, one is drawn uniformly from the interior
    /// lines (the two extreme lines excluded); `odd_only` restricts the draw
    /// to odd offsets from the grid's origin.
    pub fn partition<R: Rng + ?Sized>(
        &self,
        axis: Axis,
        line: Option<i32>,
        odd_only: bool,
        rng: &mut R,
    ) -> GridResult<Partition> {
        let (low, span) = match axis {
            Axis::X => (self.min_x(), self.width),
            Axis::Y => (self.min_y(), self.height),
        };
        if span < 3 {
            return Err(GridError::InvalidPartition {
                axis,
                reason: format!("span of {} cells has no interior line", span),
            });
        }

        let line = match line {
            Some(line) => {
                let offset = line - low;
                if offset < 1 || offset > span as i32 - 2 {
                    return Err(GridError::InvalidPartition {
                        axis,
                        reason: format!("line {} is not interior to {}..={}", line, low, low + span as i32 - 1),
                    });
                }
                line
            }
            None if odd_only => low + 2 * rng.gen_range(0..(span - 1) / 2) as i32 + 1,
            None => low + rng.gen_range(0..span - 2) as i32 + 1,
        };

        let key = |(x, y): Coord| match axis {
            Axis::X => x,
            Axis::Y => y,
        };
        Ok(Partition {
            before: Grid::from_coords(self.coords().filter(|&c| key(c) < line)),
            line: Grid::from_coords(self.coords().filter(|&c| key(c) == line)),
            after: Grid::from_coords(self.coords().filter(|&c| key(c) > line)),
        })
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in self.min_y()..=self.max_y() {
            for x in self.min_x()..=self.max_x() {
                let symbol = self.get((x, y)).map_or(' ', CellState::symbol);
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::seeded_source;
    use proptest::prelude::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.count(CellState::Wall), 12);
        assert_eq!((grid.max_x(), grid.max_y()), (3, 2));
    }

    #[test]
    fn test_from_coords_recomputes_extents() {
        let grid = Grid::from_coords(vec![(2, 5), (4, 5), (3, 7)]);
        assert_eq!((grid.min_x(), grid.max_x()), (2, 4));
        assert_eq!((grid.min_y(), grid.max_y()), (5, 7));
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.count(CellState::Floor), 3);
        // inside the bounding box but never absorbed
        assert!(!grid.contains((3, 5)));
        assert_eq!(grid.to_string(), ". .\n   \n . \n");
    }

    #[test]
    fn test_set_out_of_domain() {
        let mut grid = Grid::new(2, 2);
        assert!(grid.set((1, 1), CellState::Floor).is_ok());
        assert_eq!(grid.get((1, 1)), Some(CellState::Floor));
        assert_eq!(
            grid.set((2, 0), CellState::Floor),
            Err(GridError::OutOfBounds { x: 2, y: 0 })
        );
    }

    #[test]
    fn test_update_skips_holes() {
        let mut grid = Grid::from_coords(vec![(4, 2), (5, 2), (4, 3)]);
        let mut visited = Vec::new();
        grid.update(|coord, state| {
            visited.push(coord);
            assert_eq!(state, CellState::Floor);
            CellState::Wall
        });
        assert_eq!(visited, vec![(4, 2), (5, 2), (4, 3)]);
        assert_eq!(grid.to_string(), "##\n# \n");
    }

    #[test]
    fn test_json_checks_cell_count() {
        let grid = Grid::from_coords(vec![(1, 1), (2, 1), (1, 3)]);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);

        let short = r#"{"origin":[0,0],"width":5,"height":5,"cells":[]}"#;
        let err = serde_json::from_str::<Grid>(short).unwrap_err();
        assert!(err.to_string().contains("malformed grid"));

        let wide = r#"{"origin":[2147483647,0],"width":2,"height":1,"cells":["wall","wall"]}"#;
        assert!(serde_json::from_str::<Grid>(wide).is_err());
    }

    #[test]
    fn test_neighbors_exclude_off_grid() {
        let mut grid = Grid::new(3, 3);
        assert_eq!(grid.neighbors((1, 1), None, Neighborhood::Moore).len(), 8);
        assert_eq!(grid.neighbors((0, 0), None, Neighborhood::Moore).len(), 3);
        assert_eq!(grid.neighbors((0, 0), None, Neighborhood::VonNeumann), vec![(0, 1), (1, 0)]);

        grid.set((1, 0), CellState::Floor).unwrap();
        assert_eq!(grid.neighbors((0, 0), Some(CellState::Floor), Neighborhood::Moore), vec![(1, 0)]);
        assert_eq!(grid.missing_neighbors((0, 0), Neighborhood::Moore), 5);
    }

    #[test]
    fn test_edges() {
        let grid = Grid::new(4, 4);
        let edges = grid.edges(Neighborhood::Moore);
        assert_eq!(edges.len(), 12);
        assert!(!edges.contains(&(1, 1)));
        assert!(!edges.contains(&(2, 2)));
    }

    #[test]
    fn test_ball() {
        let grid = Grid::new(7, 7);
        let center = (3, 3);
        assert_eq!(grid.ball(center, 0, Neighborhood::Moore), BTreeSet::from([center]));
        assert_eq!(grid.ball(center, 1, Neighborhood::Moore).len(), 9);
        assert_eq!(grid.ball(center, 2, Neighborhood::Moore).len(), 25);
        assert_eq!(grid.ball(center, 1, Neighborhood::VonNeumann).len(), 5);
        assert_eq!(grid.ball((0, 0), 1, Neighborhood::Moore).len(), 4);
        assert!(grid.ball((10, 10), 3, Neighborhood::Moore).is_empty());
    }

    #[test]
    fn test_partition_explicit_line() {
        let grid = Grid::new(5, 3);
        let mut rng = seeded_source(Some(0));
        let parts = grid.partition(Axis::X, Some(2), false, &mut rng).unwrap();
        assert_eq!(parts.before.len(), 6);
        assert_eq!(parts.line.len(), 3);
        assert_eq!(parts.after.len(), 6);
        assert_eq!((parts.line.min_x(), parts.line.max_x()), (2, 2));
        assert_eq!((parts.after.min_x(), parts.after.max_x()), (3, 4));
    }

    #[test]
    fn test_partition_rejects_narrow_span() {
        let grid = Grid::new(2, 9);
        let mut rng = seeded_source(Some(0));
        assert!(matches!(
            grid.partition(Axis::X, None, false, &mut rng),
            Err(GridError::InvalidPartition { axis: Axis::X, .. })
        ));
        assert!(grid.partition(Axis::Y, None, false, &mut rng).is_ok());
        // extreme rows are never valid lines
        assert!(grid.partition(Axis::Y, Some(0), false, &mut rng).is_err());
        assert!(grid.partition(Axis::Y, Some(8), false, &mut rng).is_err());
    }

    #[test]
    fn test_partition_odd_only() {
        let grid = Grid::from_coords(iproduct!(3..12, 0..2).map(|(x, y)| (x, y)));
        let mut rng = seeded_source(Some(5));
        for _ in 0..50 {
            let parts = grid.partition(Axis::X, None, true, &mut rng).unwrap();
            let offset = parts.line.min_x() - grid.min_x();
            assert_eq!(offset % 2, 1);
            assert!(offset >= 1 && offset <= grid.width() as i32 - 2);
            assert_eq!(parts.before.len() + parts.line.len() + parts.after.len(), grid.len());
        }
    }

    proptest! {
        #[test]
        fn ball_grows_with_radius(
            width in 1usize..12,
            height in 1usize..12,
            x in 0i32..12,
            y in 0i32..12,
            radius in 0usize..6,
        ) {
            let grid = Grid::new(width, height);
            let coord = (x % width as i32, y % height as i32);
            let smaller = grid.ball(coord, radius, Neighborhood::Moore);
            let larger = grid.ball(coord, radius + 1, Neighborhood::Moore);
            prop_assert!(smaller.is_subset(&larger));
            prop_assert!(smaller.contains(&coord));
        }
    }
}
