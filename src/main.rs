// Copyright (c) Addison Crump, 2025, licensed under the EUPL-1.2-or-later.

//! Terminal front end: `sink-slider ROWS COLUMNS GUI_MODE`, with placements and then moves on
//! stdin. Exits with status 1 on bad arguments, malformed placements or exhausted input.

use std::convert::Infallible;
use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use sink_slider::game::GameLoop;
use sink_slider::setup::BoardBuilder;
use sink_slider::Dimensions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Lay out a board from placement commands on stdin, then play moves read from stdin.
#[derive(Parser, Debug)]
#[command(name = "sink-slider", version, about)]
struct Cli {
    /// Number of rows on the board
    #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    rows: usize,

    /// Number of columns on the board
    #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    columns: usize,

    /// GUI mode flag; any non-zero value asks for the GUI, which is not available
    #[arg(allow_negative_numbers = true)]
    gui_mode: i64,

    /// Log more (-v for debug, -vv for trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<Infallible> {
    if cli.gui_mode != 0 {
        warn!(gui_mode = cli.gui_mode, "gui mode is not available, using the terminal");
    }
    let dim = Dimensions::try_from((cli.rows, cli.columns))?;
    info!(rows = cli.rows, columns = cli.columns, "reading placements");

    let mut input = io::stdin().lock();
    let board = BoardBuilder::new(dim).build(&mut input)?;
    let mut game = GameLoop::new(board, input, io::stdout().lock());
    Ok(game.run()?)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(never) => match never {},
        Err(err) => {
            println!("ERROR: {err}");
            ExitCode::FAILURE
        }
    }
}
