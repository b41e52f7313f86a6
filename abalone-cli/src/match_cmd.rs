//! Match command - play games between two engine settings
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use abalone_core::{legal_moves, play_between, AlphaBetaAI, GameResult, GameState, Heuristics, Player};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Search depth of engine A (White in odd games)
    #[arg(long, default_value = "2")]
    pub depth_a: u32,

    /// Search depth of engine B (Black in odd games)
    #[arg(long, default_value = "1")]
    pub depth_b: u32,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Random plies played before the engines take over
    #[arg(long, default_value = "2")]
    pub opening_plies: usize,

    /// Maximum plies per game
    #[arg(long, default_value = "200")]
    pub max_plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Which engine won a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
enum Winner {
    EngineA,
    EngineB,
    Draw,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    a_plays_white: bool,
    winner: Winner,
    plies: usize,
    captured_by_white: u8,
    captured_by_black: u8,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    a_wins: usize,
    b_wins: usize,
    draws: usize,
    avg_plies: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting match: depth {} vs depth {} ({} games, {} random opening plies)",
        args.depth_a,
        args.depth_b,
        args.games,
        args.opening_plies
    );

    let seed = seed.unwrap_or_else(rand::random);
    let results = play_match(&args, seed);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match, in parallel
fn play_match(args: &MatchArgs, seed: u64) -> MatchResults {
    let engine_a = AlphaBetaAI::new(args.depth_a, Heuristics::default());
    let engine_b = AlphaBetaAI::new(args.depth_b, Heuristics::default());

    let games: Vec<GameRecord> = (0..args.games)
        .into_par_iter()
        .map(|game_num| {
            let mut rng = create_rng(seed, game_num as u64);
            // Alternate colors for fairness
            let a_plays_white = game_num % 2 == 0;
            let record = play_single_game(
                &engine_a,
                &engine_b,
                a_plays_white,
                game_num + 1,
                args,
                &mut rng,
            );
            tracing::info!(
                "Game {}: {:?} ({} plies, W {} - {} B)",
                record.game_number,
                record.winner,
                record.plies,
                record.captured_by_white,
                record.captured_by_black
            );
            record
        })
        .collect();

    compute_match_statistics(games)
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results, args);
    } else {
        print_text_results(results, args);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play a single game: random opening plies, then the engines alternate
fn play_single_game(
    engine_a: &AlphaBetaAI,
    engine_b: &AlphaBetaAI,
    a_plays_white: bool,
    game_number: usize,
    args: &MatchArgs,
    rng: &mut ChaCha8Rng,
) -> GameRecord {
    let mut state = GameState::initial();
    let mut plies = 0;

    while plies < args.opening_plies.min(args.max_plies) {
        let moves = legal_moves(&state);
        let Some(mv) = moves.choose(rng) else {
            break;
        };
        match state.apply(mv) {
            Ok(outcome) => state = outcome.next,
            Err(_) => break,
        }
        plies += 1;
    }

    let (white, black) = if a_plays_white {
        (engine_a, engine_b)
    } else {
        (engine_b, engine_a)
    };
    let (state, moves) = play_between(state, white, black, args.max_plies - plies, |_| {});
    let plies = plies + moves.len();

    GameRecord {
        game_number,
        a_plays_white,
        winner: winner_of(&state, a_plays_white),
        plies,
        captured_by_white: state.captured(Player::White),
        captured_by_black: state.captured(Player::Black),
    }
}

/// Map a final position to the winning engine. A side left without moves
/// loses, matching how the search scores it.
fn winner_of(state: &GameState, a_plays_white: bool) -> Winner {
    let white_won = match state.result() {
        GameResult::WhiteWins => Some(true),
        GameResult::BlackWins => Some(false),
        GameResult::Inconsistent => None,
        GameResult::Ongoing if legal_moves(state).is_empty() => {
            Some(state.side_to_move() == Player::Black)
        }
        GameResult::Ongoing => None,
    };
    match white_won {
        Some(white_won) if white_won == a_plays_white => Winner::EngineA,
        Some(_) => Winner::EngineB,
        None => Winner::Draw,
    }
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let count = |w: Winner| games.iter().filter(|g| g.winner == w).count();
    let a_wins = count(Winner::EngineA);
    let b_wins = count(Winner::EngineB);
    let draws = count(Winner::Draw);

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    MatchResults {
        games,
        a_wins,
        b_wins,
        draws,
        avg_plies,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Per-game RNG derived from the match seed
fn create_rng(seed: u64, game: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(game);
    rng
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults, args: &MatchArgs) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        a_plays_white: bool,
        winner: Winner,
        plies: usize,
        captured_by_white: u8,
        captured_by_black: u8,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        depth_a: u32,
        depth_b: u32,
        total_games: usize,
        a_wins: usize,
        b_wins: usize,
        draws: usize,
        avg_plies: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        depth_a: args.depth_a,
        depth_b: args.depth_b,
        total_games: results.games.len(),
        a_wins: results.a_wins,
        b_wins: results.b_wins,
        draws: results.draws,
        avg_plies: results.avg_plies,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                a_plays_white: g.a_plays_white,
                winner: g.winner,
                plies: g.plies,
                captured_by_white: g.captured_by_white,
                captured_by_black: g.captured_by_black,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults, args: &MatchArgs) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "Engine A (depth {}) wins: {} ({:.1}%)",
        args.depth_a,
        results.a_wins,
        percent(results.a_wins, total)
    );
    println!(
        "Engine B (depth {}) wins: {} ({:.1}%)",
        args.depth_b,
        results.b_wins,
        percent(results.b_wins, total)
    );
    println!("Draws: {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg plies: {:.1}", results.avg_plies);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} plies (A as {}, W {} - {} B)",
            game.game_number,
            game.winner,
            game.plies,
            if game.a_plays_white { "White" } else { "Black" },
            game.captured_by_white,
            game.captured_by_black
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use abalone_core::Hex;

    fn record(game_number: usize, winner: Winner, plies: usize) -> GameRecord {
        GameRecord {
            game_number,
            a_plays_white: game_number % 2 == 1,
            winner,
            plies,
            captured_by_white: 0,
            captured_by_black: 0,
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.a_wins, 0);
        assert_eq!(results.b_wins, 0);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_plies, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, Winner::EngineA, 10),
            record(2, Winner::EngineB, 20),
            record(3, Winner::EngineA, 30),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.a_wins, 2);
        assert_eq!(results.b_wins, 1);
        assert_eq!(results.draws, 0);
        assert_eq!(results.avg_plies, 20.0);
    }

    #[test]
    fn test_winner_of() {
        let white_won = GameState::initial().with_captured(6, 2);
        assert_eq!(winner_of(&white_won, true), Winner::EngineA);
        assert_eq!(winner_of(&white_won, false), Winner::EngineB);
        assert_eq!(winner_of(&GameState::initial(), true), Winner::Draw);

        // White to move with no legal move loses
        let stuck = GameState::from_pieces(
            &[Hex::new(4, -4)],
            &[Hex::new(3, -4), Hex::new(4, -3), Hex::new(3, -3)],
            Player::White,
        )
        .unwrap();
        assert_eq!(winner_of(&stuck, false), Winner::EngineA);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(42, 3);
        let mut rng2 = create_rng(42, 3);
        let mut rng3 = create_rng(42, 4);

        use rand::Rng;
        let a = rng1.gen::<u64>();
        assert_eq!(a, rng2.gen::<u64>());
        assert_ne!(a, rng3.gen::<u64>());
    }

    #[test]
    fn test_single_game_is_reproducible() {
        let args = MatchArgs {
            depth_a: 1,
            depth_b: 1,
            games: 1,
            opening_plies: 4,
            max_plies: 12,
            json: false,
        };
        let ai = AlphaBetaAI::new(1, Heuristics::default());
        let first = play_single_game(&ai, &ai, true, 1, &args, &mut create_rng(9, 0));
        let second = play_single_game(&ai, &ai, true, 1, &args, &mut create_rng(9, 0));
        assert_eq!(first.plies, 12);
        assert_eq!(first.plies, second.plies);
        assert_eq!(first.winner, second.winner);
        assert_eq!(first.captured_by_white, second.captured_by_white);
    }
}
