//! Abalone CLI - Command-line interface
//!
//! Commands:
//! - play: Engine vs engine, one game
//! - match: Many games between two engine settings
//! - moves: List legal moves in a position
//! - eval: Static evaluation of a position

mod inspect_cmd;
mod match_cmd;
mod play_cmd;

use std::path::Path;

use abalone_core::{EngineConfig, GameState, Position};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "abalone")]
#[command(about = "Abalone rules engine and alpha-beta opponent")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single engine vs engine game
    Play(play_cmd::PlayArgs),
    /// Play a match between two search depths
    Match(match_cmd::MatchArgs),
    /// List legal moves for the side to move
    Moves(inspect_cmd::MovesArgs),
    /// Evaluate a position
    Eval(inspect_cmd::EvalArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Moves(args) => inspect_cmd::run_moves(args),
        Commands::Eval(args) => inspect_cmd::run_eval(args),
    }
}

/// Starting position from a JSON file, or the opening layout
pub(crate) fn load_state(path: Option<&Path>) -> Result<GameState> {
    let Some(path) = path else {
        return Ok(GameState::initial());
    };
    let position = Position::load(path)
        .with_context(|| format!("Failed to load position: {}", path.display()))?;
    GameState::from_position(&position)
        .with_context(|| format!("Invalid position in {}", path.display()))
}

/// Engine settings from a JSON file, or the defaults
pub(crate) fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}
