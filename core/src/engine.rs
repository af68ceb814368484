use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::InProgress => None,
            Self::Won => Some("Congratulations! You found all the mines!"),
            Self::Lost => Some("You stepped on a mine and failed!"),
        }
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::InProgress
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Reveal,
    ToggleFlag,
}

/// What a single move did to the board.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveResult {
    pub kind: MoveKind,
    /// Every cell whose display state changed, for incremental rendering.
    pub changed: Vec<CellIndex>,
    pub status: GameStatus,
}

impl MoveResult {
    pub fn has_update(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// One game from placement to win or loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEngine {
    mine_layout: MineLayout,
    board: BoardState,
    status: GameStatus,
}

impl GameEngine {
    /// Starts a game on a `dimension`x`dimension` board with randomly placed mines.
    pub fn new(dimension: Dim, mines: CellCount) -> Result<Self> {
        Ok(Self::from_layout(MineLayout::new(GameConfig::new(
            dimension, mines,
        ))?))
    }

    /// Same as [`GameEngine::new`] with a fixed placement seed.
    pub fn with_seed(dimension: Dim, mines: CellCount, seed: u64) -> Result<Self> {
        Ok(Self::from_layout(
            RandomLayoutGenerator::new(seed).generate(GameConfig::new(dimension, mines))?,
        ))
    }

    pub fn from_layout(mine_layout: MineLayout) -> Self {
        let board = BoardState::new(mine_layout.grid());
        Self {
            mine_layout,
            board,
            status: Default::default(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn message(&self) -> Option<&'static str> {
        self.status.message()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn grid(&self) -> Grid {
        self.mine_layout.grid()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn mines_left(&self) -> isize {
        (self.mine_layout.mine_count() as isize) - (self.board.flagged_count() as isize)
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn cell_display_state(&self, index: CellIndex) -> Result<DisplayCell> {
        self.board.cell_at(index).map(DisplayCell::from)
    }

    /// Display state of every cell in row-major index order.
    pub fn display_cells(&self) -> impl Iterator<Item = DisplayCell> + '_ {
        self.board.iter_cells().map(DisplayCell::from)
    }

    pub fn reveal(&mut self, index: CellIndex) -> Result<MoveResult> {
        self.apply_move(index, MoveKind::Reveal)
    }

    pub fn toggle_flag(&mut self, index: CellIndex) -> Result<MoveResult> {
        self.apply_move(index, MoveKind::ToggleFlag)
    }

    /// Applies one move and re-evaluates the game status.
    ///
    /// Out-of-range cells fail with [`GameError::InvalidCell`] and any move after the game ended
    /// fails with [`GameError::GameAlreadyOver`]; neither touches the board.
    pub fn apply_move(&mut self, index: CellIndex, kind: MoveKind) -> Result<MoveResult> {
        let index = self.grid().validate_index(index)?;
        self.check_in_progress()?;

        let changed = match kind {
            MoveKind::Reveal => match self.board.reveal(&self.mine_layout, index)? {
                RevealOutcome::HitMine(exposed) => {
                    self.end_game(GameStatus::Lost);
                    return Ok(self.move_result(kind, exposed));
                }
                RevealOutcome::Opened(opened) => opened,
                RevealOutcome::NoChange => Vec::new(),
            },
            MoveKind::ToggleFlag => match self.board.toggle_flag(index)? {
                MarkOutcome::Changed => vec![index],
                MarkOutcome::NoChange => Vec::new(),
            },
        };

        if self.all_mines_flagged() || self.only_mines_hidden() {
            self.end_game(GameStatus::Won);
        }

        Ok(self.move_result(kind, changed))
    }

    /// Exactly the mined cells carry flags, and nothing else does.
    pub fn all_mines_flagged(&self) -> bool {
        self.board.flagged_count() == self.mine_layout.mine_count()
            && self
                .board
                .iter_flagged()
                .all(|index| self.mine_layout.contains_mine(index))
    }

    /// No flags are placed and the only cells still hidden are the mines.
    pub fn only_mines_hidden(&self) -> bool {
        self.board.flagged_count() == 0
            && self.board.hidden_count() == self.mine_layout.mine_count()
    }

    fn move_result(&self, kind: MoveKind, changed: Vec<CellIndex>) -> MoveResult {
        MoveResult {
            kind,
            changed,
            status: self.status,
        }
    }

    fn end_game(&mut self, status: GameStatus) {
        if self.status.is_finished() {
            return;
        }

        log::debug!("Game ended: {:?}", status);
        self.status = status;
    }

    fn check_in_progress(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::GameAlreadyOver)
        } else {
            Ok(())
        }
    }
}
