use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use sweeper_core::{CellCount, Dim, GameConfig, GameEngine, GameStatus};

use crate::input::{Command, parse_mine_count};
use crate::render::render_board;

const MINES_PROMPT: &str = "How many mines do you want on the field? ";
const MOVE_PROMPT: &str = "Set/delete mine marks (x and y coordinates): ";

/// Reads one line, `None` once the input is exhausted.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    Ok((read > 0).then_some(line))
}

/// Prompts until the player enters a mine count that fits the board.
///
/// Fails up front when no mine count could fit, so the prompt cannot loop forever.
pub fn ask_mine_count<R: BufRead, W: Write>(
    dimension: Dim,
    input: &mut R,
    out: &mut W,
) -> Result<Option<CellCount>> {
    GameConfig::new(dimension, 0)
        .validate()
        .with_context(|| format!("Board size {dimension} has no cells"))?;

    loop {
        write!(out, "{MINES_PROMPT}")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };

        match parse_mine_count(&line) {
            Ok(mines) => match GameConfig::new(dimension, mines).validate() {
                Ok(config) => return Ok(Some(config.mines)),
                Err(err) => writeln!(out, "{err}")?,
            },
            Err(err) => writeln!(out, "{err}")?,
        }
    }
}

/// Plays moves read from `input` until the game ends or the input runs out.
pub fn play<R: BufRead, W: Write>(
    engine: &mut GameEngine,
    input: &mut R,
    out: &mut W,
) -> Result<GameStatus> {
    render_board(engine, out)?;

    while !engine.is_finished() {
        write!(out, "{MOVE_PROMPT}")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            log::info!("Input closed before the game ended");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };

        let moved = engine
            .grid()
            .index_at(command.x, command.y)
            .and_then(|index| engine.apply_move(index, command.kind));
        match moved {
            Ok(result) => log::debug!(
                "{:?} at ({}, {}) changed {} cells",
                result.kind,
                command.x,
                command.y,
                result.changed.len()
            ),
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        }

        render_board(engine, out)?;
    }

    if let Some(message) = engine.message() {
        writeln!(out, "{message}")?;
    }
    Ok(engine.status())
}
