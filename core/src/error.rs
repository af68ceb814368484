use thiserror::Error;

use crate::{CellCount, Dim};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {mines} mines do not fit a {dimension}x{dimension} board")]
    InvalidConfiguration { dimension: Dim, mines: CellCount },
    #[error("Invalid cell")]
    InvalidCell,
    #[error("Game already ended, no new moves are accepted")]
    GameAlreadyOver,
}

pub type Result<T> = core::result::Result<T, GameError>;
