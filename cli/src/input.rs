use std::str::FromStr;

use sweeper_core::{CellCount, MoveKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Expected `x y free|mine`, got {0} word(s)")]
    WrongArity(usize),
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error("Unknown action `{0}`, use `free` or `mine`")]
    UnknownAction(String),
}

/// One player move as typed: 1-based column `x`, 1-based row `y` and the action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub x: i64,
    pub y: i64,
    pub kind: MoveKind,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let [x, y, action] = words[..] else {
            return Err(CommandError::WrongArity(words.len()));
        };

        let kind = match action.to_ascii_lowercase().as_str() {
            "free" => MoveKind::Reveal,
            "mine" => MoveKind::ToggleFlag,
            _ => return Err(CommandError::UnknownAction(action.to_owned())),
        };

        Ok(Self {
            x: parse_number(x)?,
            y: parse_number(y)?,
            kind,
        })
    }
}

pub fn parse_mine_count(line: &str) -> Result<CellCount, CommandError> {
    parse_number(line.trim())
}

fn parse_number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse()
        .map_err(|_| CommandError::NotANumber(word.to_owned()))
}
