use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod board;
mod engine;
mod error;
mod generator;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub dimension: Dim,
    pub mines: CellCount,
}

impl GameConfig {
    pub const DEFAULT_DIMENSION: Dim = 9;
    pub const DEFAULT_MINES: CellCount = 10;

    pub const fn new(dimension: Dim, mines: CellCount) -> Self {
        Self { dimension, mines }
    }

    pub const fn grid(&self) -> Grid {
        Grid::new(self.dimension)
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.dimension)
    }

    /// A board needs at least one cell and at least one cell without a mine.
    pub fn validate(self) -> Result<Self> {
        if self.dimension == 0 || self.mines >= self.total_cells() {
            Err(GameError::InvalidConfiguration {
                dimension: self.dimension,
                mines: self.mines,
            })
        } else {
            Ok(self)
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION, Self::DEFAULT_MINES)
    }
}

/// Where the mines are and how many of them touch each cell, fixed for the whole game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    grid: Grid,
    mine_mask: Array2<bool>,
    adjacent_mines: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Places `config.mines` mines uniformly at random.
    pub fn new(config: GameConfig) -> Result<Self> {
        RandomLayoutGenerator::new(rand::random()).generate(config)
    }

    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let invalid = GameError::InvalidConfiguration {
            dimension: Dim::try_from(rows).unwrap_or(Dim::MAX),
            mines: CellCount::try_from(mine_count).unwrap_or(CellCount::MAX),
        };

        if rows != cols {
            return Err(invalid);
        }
        let dimension = Dim::try_from(rows).map_err(|_| invalid)?;
        let mine_count = CellCount::try_from(mine_count).map_err(|_| invalid)?;
        let config = GameConfig::new(dimension, mine_count).validate()?;

        Ok(Self::from_validated_mask(config.grid(), mine_mask, mine_count))
    }

    /// Builds a layout with mines at exactly the given indices; repeated indices count once.
    pub fn from_mine_indices(dimension: Dim, mine_indices: &[CellIndex]) -> Result<Self> {
        let grid = Grid::new(dimension);
        let mut mine_mask: Array2<bool> = Array2::default(grid.shape());

        for &index in mine_indices {
            let index = grid.validate_index(index)?;
            mine_mask[grid.coords_of(index).to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    /// Computes every adjacency count once; the mask must already fit `grid`.
    pub(crate) fn from_validated_mask(
        grid: Grid,
        mine_mask: Array2<bool>,
        mine_count: CellCount,
    ) -> Self {
        let adjacent_mines = Array2::from_shape_fn(grid.shape(), |(row, col)| {
            let index = grid.index_of((row as Dim, col as Dim));
            grid.iter_neighbors(index)
                .filter(|&pos| mine_mask[grid.coords_of(pos).to_nd_index()])
                .count() as u8
        });

        Self {
            grid,
            mine_mask,
            adjacent_mines,
            mine_count,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(self.grid.dimension(), self.mine_count)
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn dimension(&self) -> Dim {
        self.grid.dimension()
    }

    pub fn total_cells(&self) -> CellCount {
        self.grid.total_cells()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the grid, use [`Grid::validate_index`] first for untrusted input.
    pub fn contains_mine(&self, index: CellIndex) -> bool {
        self[index]
    }

    /// Number of mines around `index`, only meaningful for cells without a mine.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the grid.
    pub fn adjacent_mine_count(&self, index: CellIndex) -> u8 {
        self.adjacent_mines[self.grid.coords_of(index).to_nd_index()]
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.grid.iter_cells().filter(|&index| self[index])
    }

    pub fn iter_neighbors(&self, index: CellIndex) -> NeighborIter {
        self.grid.iter_neighbors(index)
    }
}

/// Panics on an index outside the grid, like slice indexing.
impl Index<CellIndex> for MineLayout {
    type Output = bool;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.mine_mask[self.grid.coords_of(index).to_nd_index()]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Result of revealing one cell, listing every index whose visibility changed.
#[derive(Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Opened(Vec<CellIndex>),
    HitMine(Vec<CellIndex>),
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub fn changed(&self) -> &[CellIndex] {
        match self {
            Self::NoChange => &[],
            Self::Opened(changed) | Self::HitMine(changed) => changed.as_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_boards_without_safe_cells() {
        assert!(GameConfig::new(3, 8).validate().is_ok());
        assert_eq!(
            GameConfig::new(3, 9).validate(),
            Err(GameError::InvalidConfiguration {
                dimension: 3,
                mines: 9
            })
        );
        assert!(GameConfig::new(0, 0).validate().is_err());
        assert!(GameConfig::new(1, 0).validate().is_ok());
    }

    #[test]
    fn adjacency_counts_match_literal_neighbor_count() {
        let mines = [0, 6, 7, 13, 24];
        let layout = MineLayout::from_mine_indices(5, &mines).unwrap();
        let grid = layout.grid();

        for index in grid.iter_cells() {
            if mines.contains(&index) {
                assert!(layout.contains_mine(index));
                continue;
            }
            let (row, col) = grid.coords_of(index);
            let mut expected = 0;
            for r in row.saturating_sub(1)..=(row + 1).min(4) {
                for c in col.saturating_sub(1)..=(col + 1).min(4) {
                    if (r, c) != (row, col) && mines.contains(&grid.index_of((r, c))) {
                        expected += 1;
                    }
                }
            }
            assert_eq!(layout.adjacent_mine_count(index), expected, "cell {index}");
        }
    }

    #[test]
    fn corner_mine_does_not_leak_across_rows() {
        let layout = MineLayout::from_mine_indices(3, &[2]).unwrap();

        assert_eq!(layout.adjacent_mine_count(1), 1);
        assert_eq!(layout.adjacent_mine_count(4), 1);
        assert_eq!(layout.adjacent_mine_count(5), 1);
        // first column of the next row is not a neighbor of the last column
        assert_eq!(layout.adjacent_mine_count(3), 0);
    }

    #[test]
    fn explicit_layout_validates_indices_and_count() {
        assert_eq!(
            MineLayout::from_mine_indices(2, &[4]),
            Err(GameError::InvalidCell)
        );
        assert!(MineLayout::from_mine_indices(2, &[0, 1, 2, 3]).is_err());

        let layout = MineLayout::from_mine_indices(2, &[1, 1]).unwrap();
        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.safe_cell_count(), 3);
    }

    #[test]
    #[should_panic]
    fn mine_lookup_outside_grid_panics() {
        let layout = MineLayout::from_mine_indices(3, &[0]).unwrap();

        layout.contains_mine(9);
    }

    #[test]
    fn mask_must_be_square() {
        let mask = Array2::from_elem([2, 3], false);

        assert!(matches!(
            MineLayout::from_mine_mask(mask),
            Err(GameError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn random_layout_places_requested_mines() {
        let layout = MineLayout::new(GameConfig::new(9, 10)).unwrap();

        assert_eq!(layout.mine_count(), 10);
        assert_eq!(layout.iter_mines().count(), 10);
    }

    #[test]
    fn reveal_outcome_lists_changed_cells() {
        assert!(RevealOutcome::NoChange.changed().is_empty());
        assert!(!RevealOutcome::NoChange.has_update());
        assert_eq!(RevealOutcome::Opened(vec![1, 2]).changed(), &[1, 2]);
    }
}
