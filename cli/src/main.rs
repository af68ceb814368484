use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sweeper_core::{CellCount, Dim, GameConfig, GameEngine};

mod input;
mod render;
mod session;

/// Minesweeper on a square board, played from the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Side length of the board
    #[arg(
        short,
        long,
        default_value_t = GameConfig::DEFAULT_DIMENSION,
        value_parser = clap::value_parser!(Dim).range(1..)
    )]
    size: Dim,

    /// Number of mines, asked for interactively when omitted
    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Seed for mine placement, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();

    let mines = match cli.mines {
        Some(mines) => mines,
        None => match session::ask_mine_count(cli.size, &mut input, &mut out)? {
            Some(mines) => mines,
            None => return Ok(()),
        },
    };

    let seed = cli.seed.unwrap_or_else(rand::random);
    log::info!("Starting {}x{} game with {} mines, seed {}", cli.size, cli.size, mines, seed);

    let mut engine =
        GameEngine::with_seed(cli.size, mines, seed).context("Cannot start the game")?;
    let status = session::play(&mut engine, &mut input, &mut out)?;
    log::info!("Game finished with status {:?}", status);

    Ok(())
}
