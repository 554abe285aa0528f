#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use klotski::config::{Memoization, SolverConfig, DEFAULT_CONFIG_PATH};
use klotski::render::{render_board, render_moves, Highlight};
use klotski::{Board, PuzzleDefinition, Solver};

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[derive(Parser, Debug)]
#[command(name = "klotski", about = "Sliding block puzzle solver")]
struct Args {
    /// Puzzle definition (JSON). The built-in 4x5 puzzle is used when omitted.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Solver configuration (TOML). Falls back to `klotski.toml` if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seconds between replayed moves.
    #[arg(long)]
    step: Option<f64>,

    /// Seed for a reproducible search.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    memo: Option<MemoArg>,

    /// Only print the move list, not every intermediate board.
    #[arg(long)]
    no_replay: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum MemoArg {
    Path,
    Exhaustive,
}

impl From<MemoArg> for Memoization {
    fn from(arg: MemoArg) -> Self {
        match arg {
            MemoArg::Path => Self::Path,
            MemoArg::Exhaustive => Self::PathAndExhausted,
        }
    }
}

fn load_config(args: &Args) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => {
            SolverConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => SolverConfig::load_or_default(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("failed to load config {DEFAULT_CONFIG_PATH}"))?,
    };

    if let Some(seed) = args.seed {
        config.search.random_seed = Some(seed);
    }
    if let Some(memo) = args.memo {
        config.search.memoization = memo.into();
    }
    if let Some(step) = args.step {
        config.display.step_seconds = step;
    }
    if args.no_replay {
        config.display.replay = false;
    }
    config.display.step_delay().context("invalid replay pacing")?;
    Ok(config)
}

fn load_board(args: &Args) -> Result<Board> {
    let definition = match &args.json {
        Some(path) => PuzzleDefinition::from_json_file(path)
            .with_context(|| format!("failed to read puzzle {}", path.display()))?,
        None => PuzzleDefinition::classic(),
    };
    definition.build().context("invalid puzzle definition")
}

fn main() -> Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let board = load_board(&args)?;

    println!("Game start");
    println!("{}", render_board(&board, None)?);

    let mut solver = Solver::from_config(board.clone(), &config.search);
    let outcome = solver.solve();

    println!(
        "Board {}solved in {:.3} seconds ({} moves).",
        if outcome.is_solved() { "" } else { "not " },
        outcome.elapsed.as_secs_f64(),
        outcome.moves.len(),
    );
    if !outcome.is_solved() {
        return Ok(());
    }

    if config.display.replay {
        let delay = config.display.step_delay()?;
        let mut replay = board;
        for (index, mv) in outcome.moves.iter().enumerate() {
            replay
                .apply_move(mv.piece, mv.direction)
                .with_context(|| format!("move {} of the solution is illegal", index + 1))?;
            std::thread::sleep(delay);
            println!("--> {} {mv}", index + 1);
            println!("{}", render_board(&replay, Some(Highlight { last_move: *mv }))?);
        }
    }

    println!("{}", render_moves(&outcome.moves)?);
    Ok(())
}
