//! Play command - one engine vs engine game, printed ply by ply

use std::path::PathBuf;

use abalone_core::{play_between, AlphaBetaAI, GameResult, GameState, Move, Player};
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct PlayArgs {
    /// Engine config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Starting position JSON file (default: opening layout)
    #[arg(long, value_name = "FILE")]
    pub position: Option<PathBuf>,

    /// Search depth for both sides (overrides the config)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Search depth for White
    #[arg(long)]
    pub white_depth: Option<u32>,

    /// Search depth for Black
    #[arg(long)]
    pub black_depth: Option<u32>,

    /// Stop after this many plies
    #[arg(long, default_value = "200")]
    pub max_plies: usize,

    /// Print a JSON record instead of boards
    #[arg(long)]
    pub json: bool,
}

/// A finished game
#[derive(Clone, Debug)]
struct GameRecord {
    result: GameResult,
    final_state: GameState,
    moves: Vec<Move>,
}

pub fn run(args: PlayArgs) -> Result<()> {
    let mut config = crate::load_config(args.config.as_deref())?;
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    let initial = crate::load_state(args.position.as_deref())?;

    let mut white = AlphaBetaAI::from_config(&config);
    let mut black = AlphaBetaAI::from_config(&config);
    white.depth = args.white_depth.unwrap_or(config.depth);
    black.depth = args.black_depth.unwrap_or(config.depth);

    tracing::info!(
        "Starting game: White depth={} vs Black depth={}, max plies={}",
        white.depth,
        black.depth,
        args.max_plies
    );

    let record = play_game(initial, &white, &black, args.max_plies, !args.json);

    if args.json {
        print_json_record(&record);
    } else {
        println!("\nResult: {:?} after {} plies", record.result, record.moves.len());
    }

    Ok(())
}

/// Alternate the two engines until the game ends or the ply limit
fn play_game(
    initial: GameState,
    white: &AlphaBetaAI,
    black: &AlphaBetaAI,
    max_plies: usize,
    verbose: bool,
) -> GameRecord {
    if verbose {
        println!("{initial}\n");
    }

    let mut ply = 0;
    let (final_state, moves) = play_between(initial, white, black, max_plies, |report| {
        ply += 1;
        if verbose {
            println!(
                "{}. {} {} (value {:.1}, {} nodes, pushed {}, ejected {})",
                ply,
                report.before.side_to_move(),
                report.mv,
                report.search.value,
                report.search.nodes,
                report.outcome.pushed,
                report.outcome.ejected
            );
            println!("{}\n", report.outcome.next);
        }
    });

    GameRecord {
        result: final_state.result(),
        final_state,
        moves,
    }
}

fn print_json_record(record: &GameRecord) {
    #[derive(serde::Serialize)]
    struct JsonRecord {
        result: String,
        plies: usize,
        captured_by_white: u8,
        captured_by_black: u8,
        moves: Vec<String>,
        final_position: abalone_core::Position,
    }

    let output = JsonRecord {
        result: format!("{:?}", record.result),
        plies: record.moves.len(),
        captured_by_white: record.final_state.captured(Player::White),
        captured_by_black: record.final_state.captured(Player::Black),
        moves: record.moves.iter().map(|m| m.to_string()).collect(),
        final_position: record.final_state.to_position(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::Heuristics;

    #[test]
    fn test_play_game_respects_ply_limit() {
        let ai = AlphaBetaAI::new(1, Heuristics::default());
        let record = play_game(GameState::initial(), &ai, &ai, 6, false);
        assert_eq!(record.moves.len(), 6);
        assert_eq!(record.result, GameResult::Ongoing);
        assert_eq!(record.final_state.side_to_move(), Player::White);
    }

    #[test]
    fn test_play_game_stops_when_decided() {
        let won = GameState::initial().with_captured(6, 0);
        let ai = AlphaBetaAI::new(1, Heuristics::default());
        let record = play_game(won, &ai, &ai, 10, false);
        assert!(record.moves.is_empty());
        assert_eq!(record.result, GameResult::WhiteWins);
    }
}
