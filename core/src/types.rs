use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Side length of the square board, also used for row and column positions.
pub type Dim = u8;

/// Row-major linear index of a cell, `row * dimension + col`.
pub type CellIndex = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional position `(row, col)`.
pub type Coord2 = (Dim, Dim);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn square(dimension: Dim) -> CellCount {
    let dimension = dimension as CellCount;
    dimension.saturating_mul(dimension)
}

/// Geometry of a square board shared by the layout, the board state and the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    dimension: Dim,
}

impl Grid {
    pub const fn new(dimension: Dim) -> Self {
        Self { dimension }
    }

    pub const fn dimension(self) -> Dim {
        self.dimension
    }

    pub const fn total_cells(self) -> CellCount {
        square(self.dimension)
    }

    pub const fn shape(self) -> [usize; 2] {
        [self.dimension as usize, self.dimension as usize]
    }

    pub const fn contains(self, index: CellIndex) -> bool {
        index < self.total_cells()
    }

    pub fn validate_index(self, index: CellIndex) -> Result<CellIndex> {
        if self.contains(index) {
            Ok(index)
        } else {
            Err(GameError::InvalidCell)
        }
    }

    /// Converts an in-range index to `(row, col)`.
    pub fn coords_of(self, index: CellIndex) -> Coord2 {
        let dimension = CellCount::from(self.dimension);
        ((index / dimension) as Dim, (index % dimension) as Dim)
    }

    pub fn index_of(self, (row, col): Coord2) -> CellIndex {
        CellIndex::from(row) * CellIndex::from(self.dimension) + CellIndex::from(col)
    }

    /// Converts 1-based `(x, y)` player coordinates, where `x` is the column and `y` the row.
    pub fn index_at(self, x: i64, y: i64) -> Result<CellIndex> {
        let in_range = |value: i64| value >= 1 && value <= i64::from(self.dimension);
        if !in_range(x) || !in_range(y) {
            return Err(GameError::InvalidCell);
        }
        Ok(self.index_of(((y - 1) as Dim, (x - 1) as Dim)))
    }

    pub fn iter_cells(self) -> impl Iterator<Item = CellIndex> {
        0..self.total_cells()
    }

    pub fn iter_neighbors(self, index: CellIndex) -> NeighborIter {
        NeighborIter::new(self, self.coords_of(index))
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains inside the board.
fn apply_delta(coords: Coord2, delta: (i8, i8), dimension: Dim) -> Option<Coord2> {
    let (row, col) = coords;
    let (d_row, d_col) = delta;

    let next_row = row.checked_add_signed(d_row)?;
    if next_row >= dimension {
        return None;
    }

    let next_col = col.checked_add_signed(d_col)?;
    if next_col >= dimension {
        return None;
    }

    Some((next_row, next_col))
}

/// Iterates the up-to-8 neighbors of a cell, never wrapping across rows.
#[derive(Debug)]
pub struct NeighborIter {
    grid: Grid,
    center: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(grid: Grid, center: Coord2) -> Self {
        Self {
            grid,
            center,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(
                self.center,
                DISPLACEMENTS[self.index as usize],
                self.grid.dimension,
            );
            self.index += 1;

            if let Some(coords) = next_item {
                return Some(self.grid.index_of(coords));
            }
        }
    }
}
