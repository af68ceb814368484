use std::collections::VecDeque;
use std::num::Saturating;

use hashbrown::HashSet;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Per-cell visibility of one game, mutated by moves and read by renderers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    grid: Grid,
    cells: Array2<EngineCell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
}

impl BoardState {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            cells: Array2::default(grid.shape()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn cell_at(&self, index: CellIndex) -> Result<EngineCell> {
        let index = self.grid.validate_index(index)?;
        Ok(self.cell(index))
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn hidden_count(&self) -> CellCount {
        self.grid.total_cells() - self.revealed_count.0 - self.flagged_count.0
    }

    /// Every cell in row-major index order.
    pub fn iter_cells(&self) -> impl Iterator<Item = EngineCell> + '_ {
        self.cells.iter().copied()
    }

    pub fn iter_flagged(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.grid
            .iter_cells()
            .filter(|&index| self.cell(index) == EngineCell::Flagged)
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<MarkOutcome> {
        use EngineCell::*;
        use MarkOutcome::*;

        let index = self.grid.validate_index(index)?;

        Ok(match self.cell(index) {
            Hidden => {
                self.set_cell(index, Flagged);
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.set_cell(index, Hidden);
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) | Mine => NoChange,
        })
    }

    /// Reveals `index`, flooding outwards through cells without adjacent mines.
    ///
    /// Flagged and already revealed cells are left untouched. Revealing a mine exposes every
    /// mine on the board.
    pub fn reveal(&mut self, layout: &MineLayout, index: CellIndex) -> Result<RevealOutcome> {
        let index = self.grid.validate_index(index)?;

        if self.cell(index) != EngineCell::Hidden {
            return Ok(RevealOutcome::NoChange);
        }

        if layout.contains_mine(index) {
            log::debug!("Mine hit at {}", index);
            return Ok(RevealOutcome::HitMine(self.expose_mines(layout)));
        }

        Ok(RevealOutcome::Opened(self.flood_fill(layout, index)))
    }

    /// Turns every mine into [`EngineCell::Mine`], flagged ones included, returning the changed cells.
    pub fn expose_mines(&mut self, layout: &MineLayout) -> Vec<CellIndex> {
        let mut exposed = Vec::with_capacity(usize::from(layout.mine_count()));

        for index in layout.iter_mines() {
            match self.cell(index) {
                EngineCell::Hidden => {}
                EngineCell::Flagged => self.flagged_count -= 1,
                EngineCell::Revealed(_) | EngineCell::Mine => continue,
            }
            self.set_cell(index, EngineCell::Mine);
            self.revealed_count += 1;
            exposed.push(index);
        }

        exposed
    }

    fn flood_fill(&mut self, layout: &MineLayout, start: CellIndex) -> Vec<CellIndex> {
        let mut opened = Vec::new();
        let mut visited: HashSet<CellIndex> = HashSet::from_iter([start]);
        let mut to_visit = VecDeque::from([start]);

        while let Some(visit_index) = to_visit.pop_front() {
            // skip flagged or already opened cells
            if self.cell(visit_index) != EngineCell::Hidden {
                log::trace!("Skipping cell {}", visit_index);
                continue;
            }

            let count = layout.adjacent_mine_count(visit_index);
            self.set_cell(visit_index, EngineCell::Revealed(count));
            self.revealed_count += 1;
            opened.push(visit_index);
            log::trace!("Opened cell {}, mine count: {}", visit_index, count);

            // only zero cells keep the fill going
            if count == 0 {
                for neighbor in self.grid.iter_neighbors(visit_index) {
                    if self.cell(neighbor) == EngineCell::Hidden && visited.insert(neighbor) {
                        to_visit.push_back(neighbor);
                    }
                }
            }
        }

        log::debug!("Reveal at {} opened {} cells", start, opened.len());
        opened
    }

    fn cell(&self, index: CellIndex) -> EngineCell {
        self.cells[self.grid.coords_of(index).to_nd_index()]
    }

    fn set_cell(&mut self, index: CellIndex, cell: EngineCell) {
        self.cells[self.grid.coords_of(index).to_nd_index()] = cell;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(dimension: Dim, mines: &[CellIndex]) -> MineLayout {
        MineLayout::from_mine_indices(dimension, mines).unwrap()
    }

    #[test]
    fn reveal_numbered_cell_does_not_propagate() {
        let layout = layout(3, &[0]);
        let mut board = BoardState::new(layout.grid());

        let outcome = board.reveal(&layout, 1).unwrap();

        assert_eq!(outcome, RevealOutcome::Opened(vec![1]));
        assert_eq!(board.cell_at(1), Ok(EngineCell::Revealed(1)));
        assert_eq!(board.revealed_count(), 1);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // 0 0 0 0 0
        // 0 0 0 0 0
        // 1 1 0 0 0
        // * 2 1 1 0
        // 1 2 * 1 0
        let layout = layout(5, &[15, 22]);
        let mut board = BoardState::new(layout.grid());

        let outcome = board.reveal(&layout, 4).unwrap();
        let RevealOutcome::Opened(opened) = outcome else {
            panic!("expected opened cells");
        };

        let mut sorted = opened.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), opened.len(), "no cell opened twice");

        for index in layout.grid().iter_cells() {
            let cell = board.cell_at(index).unwrap();
            if layout.contains_mine(index) {
                assert_eq!(cell, EngineCell::Hidden);
            }
            if let EngineCell::Revealed(_) = cell {
                assert!(opened.contains(&index));
            }
        }

        // zero region and its border
        for index in [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 13, 14, 19, 24] {
            assert!(board.cell_at(index).unwrap().is_revealed(), "cell {index}");
        }
        assert_eq!(board.cell_at(10), Ok(EngineCell::Revealed(1)));
        // behind the numbered border
        assert_eq!(board.cell_at(20), Ok(EngineCell::Hidden));
        assert_eq!(board.cell_at(21), Ok(EngineCell::Hidden));
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let layout = layout(3, &[8]);
        let mut board = BoardState::new(layout.grid());
        board.toggle_flag(1).unwrap();

        let outcome = board.reveal(&layout, 0).unwrap();

        assert!(!outcome.changed().contains(&1));
        assert_eq!(board.cell_at(1), Ok(EngineCell::Flagged));
        assert_eq!(board.cell_at(6), Ok(EngineCell::Revealed(0)));
        // only reachable through the flag
        assert_eq!(board.cell_at(2), Ok(EngineCell::Hidden));
        assert_eq!(board.flagged_count(), 1);
    }

    #[test]
    fn second_reveal_changes_nothing() {
        let layout = layout(4, &[15]);
        let mut board = BoardState::new(layout.grid());

        board.reveal(&layout, 0).unwrap();
        let snapshot = board.clone();

        assert_eq!(board.reveal(&layout, 0).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.reveal(&layout, 5).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board, snapshot);
    }

    #[test]
    fn revealing_flagged_cell_is_ignored() {
        let layout = layout(3, &[4]);
        let mut board = BoardState::new(layout.grid());
        board.toggle_flag(4).unwrap();

        assert_eq!(board.reveal(&layout, 4).unwrap(), RevealOutcome::NoChange);
        assert_eq!(board.cell_at(4), Ok(EngineCell::Flagged));
    }

    #[test]
    fn hitting_mine_exposes_all_mines() {
        let layout = layout(3, &[0, 4, 8]);
        let mut board = BoardState::new(layout.grid());
        board.toggle_flag(8).unwrap();

        let outcome = board.reveal(&layout, 4).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine(vec![0, 4, 8]));
        for index in [0, 4, 8] {
            assert_eq!(board.cell_at(index), Ok(EngineCell::Mine));
        }
        assert_eq!(board.flagged_count(), 0);
        assert_eq!(board.hidden_count(), 6);
    }

    #[test]
    fn flag_toggle_round_trips() {
        let layout = layout(2, &[0]);
        let mut board = BoardState::new(layout.grid());
        let before = board.clone();

        assert_eq!(board.toggle_flag(3), Ok(MarkOutcome::Changed));
        assert_eq!(board.cell_at(3), Ok(EngineCell::Flagged));
        assert_eq!(board.toggle_flag(3), Ok(MarkOutcome::Changed));
        assert_eq!(board, before);
    }

    #[test]
    fn flagging_revealed_cell_is_a_no_op() {
        let layout = layout(2, &[0]);
        let mut board = BoardState::new(layout.grid());
        board.reveal(&layout, 3).unwrap();

        assert_eq!(board.toggle_flag(3), Ok(MarkOutcome::NoChange));
        assert_eq!(board.cell_at(3), Ok(EngineCell::Revealed(1)));
        assert_eq!(board.flagged_count(), 0);
    }

    #[test]
    fn out_of_range_index_is_rejected_without_mutation() {
        let layout = layout(3, &[0]);
        let mut board = BoardState::new(layout.grid());
        let before = board.clone();

        assert_eq!(board.reveal(&layout, 9), Err(GameError::InvalidCell));
        assert_eq!(board.toggle_flag(9), Err(GameError::InvalidCell));
        assert_eq!(board.cell_at(9), Err(GameError::InvalidCell));
        assert_eq!(board, before);
    }

    #[test]
    fn counters_track_visibility() {
        let layout = layout(3, &[4]);
        let mut board = BoardState::new(layout.grid());

        board.toggle_flag(0).unwrap();
        board.reveal(&layout, 8).unwrap();

        assert_eq!(board.flagged_count(), 1);
        assert_eq!(board.revealed_count(), 1);
        assert_eq!(board.hidden_count(), 7);
        assert_eq!(board.iter_flagged().collect::<Vec<_>>(), vec![0]);
        assert_eq!(board.iter_cells().nth(8), Some(EngineCell::Revealed(1)));
    }
}
