use serde::{Deserialize, Serialize};

/// Canonical player-visible state stored by the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineCell {
    Hidden,
    Flagged,
    Revealed(u8),
    /// A mine exposed after the game was lost.
    Mine,
}

impl EngineCell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_revealed(self) -> bool {
        !self.is_unrevealed()
    }
}

impl Default for EngineCell {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What a renderer should draw for a cell, without committing to any glyphs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCell {
    Hidden,
    Flagged,
    Mine,
    Empty,
    Count(u8),
}

impl From<EngineCell> for DisplayCell {
    fn from(cell: EngineCell) -> Self {
        match cell {
            EngineCell::Hidden => Self::Hidden,
            EngineCell::Flagged => Self::Flagged,
            EngineCell::Revealed(0) => Self::Empty,
            EngineCell::Revealed(count) => Self::Count(count),
            EngineCell::Mine => Self::Mine,
        }
    }
}
