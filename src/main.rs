//! Command line front end for the liquid sort engine.
//!
//! Puzzles are plain text, one container per line, bottom slot first:
//! `ABA.` is a four-slot container holding A, B, A with one free slot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use liquid_sort::{
    GameConfig, GameState, SolveResult, Solver, apply_pour, deal::deal_seeded, enumerate_moves,
    evaluate, logging,
};

const DEFAULT_CONFIG: &str = "liquid_sort.toml";

#[derive(Parser)]
#[command(name = "liquid_sort", version, about = "Liquid sort puzzle engine")]
struct Cli {
    /// Game configuration (TOML). Defaults apply when the file is missing.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Deal a new shuffled puzzle and print it.
    Deal {
        /// Overrides the configured seed.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List every legal pour.
    Moves { file: PathBuf },
    /// Print whether the puzzle is playing, won or stuck.
    Evaluate { file: PathBuf },
    /// Pour from one container into another and print the result.
    Pour {
        file: PathBuf,
        from: usize,
        to: usize,
        /// Write the new position back to the file.
        #[arg(short, long)]
        write: bool,
    },
    /// Search for a winning sequence of pours.
    Solve {
        file: PathBuf,
        /// Overrides the configured state budget.
        #[arg(long)]
        max_states: Option<usize>,
    },
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = GameConfig::load_or_default(&cli.config)
        .with_context(|| format!("load config {}", cli.config.display()))?;
    match cli.command {
        Command::Deal { seed } => cmd_deal(config, seed),
        Command::Moves { file } => cmd_moves(&file),
        Command::Evaluate { file } => cmd_evaluate(&file),
        Command::Pour {
            file,
            from,
            to,
            write,
        } => cmd_pour(&file, from, to, write),
        Command::Solve { file, max_states } => {
            cmd_solve(&file, max_states.unwrap_or(config.solver_max_states))
        }
    }
}

fn read_state(path: &Path) -> Result<GameState> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    GameState::new_from_repr(&raw).with_context(|| format!("parse {}", path.display()))
}

fn cmd_deal(mut config: GameConfig, seed: Option<u64>) -> Result<()> {
    if seed.is_some() {
        config.seed = seed;
    }
    eprintln!("{}", config.difficulty_text());
    println!("{}", deal_seeded(&config));
    Ok(())
}

fn cmd_moves(path: &Path) -> Result<()> {
    let state = read_state(path)?;
    for m in enumerate_moves(&state.containers) {
        println!("{m}");
    }
    Ok(())
}

fn cmd_evaluate(path: &Path) -> Result<()> {
    let state = read_state(path)?;
    println!("{}", evaluate(&state.containers));
    Ok(())
}

fn cmd_pour(path: &Path, from: usize, to: usize, write: bool) -> Result<()> {
    let mut state = read_state(path)?;
    let result = apply_pour(&mut state.containers, from, to)?;
    if !result.success {
        println!("cannot pour {from} -> {to}");
        return Ok(());
    }
    println!("{state}");
    println!("moved {}, {}", result.moved, evaluate(&state.containers));
    if write {
        fs::write(path, format!("{state}\n"))
            .with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}

fn cmd_solve(path: &Path, max_states: usize) -> Result<()> {
    let state = read_state(path)?;
    match Solver::new(state, max_states).solve() {
        SolveResult::Solved(moves) => {
            println!("solvable in {} moves", moves.len());
            for m in moves {
                println!("{m}");
            }
        }
        SolveResult::Unsolvable => println!("unsolvable"),
        SolveResult::Inconclusive => println!("inconclusive after {max_states} states"),
    }
    Ok(())
}
