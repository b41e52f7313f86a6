//! Integration tests for the Abalone engine
//!
//! Tests the full stack: rules, search, controller, and file round trips

use abalone_core::{
    choose_move, evaluate, legal_children, AiSide, AlphaBetaAI, Direction, EngineConfig,
    GameController, GameError, GameResult, GameState, Heuristics, Hex, Move, MoveError, Player, Position,
    SearchLimits, CELL_COUNT, PIECES_PER_SIDE, WIN_VALUE,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn h(q: i8, r: i8) -> Hex {
    Hex::new(q, r)
}

/// White is one capture from winning with a push available on the east edge
fn near_win() -> GameState {
    GameState::from_pieces(
        &[h(1, 0), h(2, 0), h(3, 0), h(-3, 1)],
        &[h(4, 0), h(-2, 4), h(0, 3)],
        Player::White,
    )
    .unwrap()
    .with_captured(5, 1)
}

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("abalone_{}_{}", std::process::id(), name))
}

// ============================================================================
// RULES
// ============================================================================

#[test]
fn test_opening_position() {
    let state = GameState::initial();
    assert_eq!(CELL_COUNT, 61);
    assert_eq!(state.piece_count(Player::White), PIECES_PER_SIDE);
    assert_eq!(state.piece_count(Player::Black), PIECES_PER_SIDE);
    assert_eq!(state.side_to_move(), Player::White);
    assert_eq!(state.result(), GameResult::Ongoing);
    assert!(!state.legal_moves().is_empty());
}

#[test]
fn test_random_games_conserve_pieces() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for _ in 0..5 {
        let mut state = GameState::initial();
        for _ in 0..80 {
            if state.result() != GameResult::Ongoing {
                break;
            }
            let children = legal_children(&state);
            let Some((mv, outcome)) = children.choose(&mut rng) else {
                break;
            };
            let mover = state.side_to_move();
            let next = outcome.next;

            assert_eq!(state.apply(mv).unwrap().next, next);
            assert_eq!(next.side_to_move(), mover.opponent());
            for player in [Player::White, Player::Black] {
                let on_board = next.piece_count(player);
                let lost = next.captured(player.opponent()) as usize;
                assert_eq!(on_board + lost, PIECES_PER_SIDE);
            }
            assert_eq!(
                next.captured(mover),
                state.captured(mover) + outcome.ejected
            );
            state = next;
        }
    }
}

#[test]
fn test_sumito_scenarios() {
    // a gap in front of the line makes it a plain slide
    let state = GameState::from_pieces(
        &[h(-1, 0), h(0, 0), h(1, 0)],
        &[h(3, 0), h(4, 0)],
        Player::White,
    )
    .unwrap();
    let line = Move::new(&[h(-1, 0), h(0, 0), h(1, 0)], Direction::E).unwrap();
    let slide = state.apply(&line).unwrap();
    assert_eq!(slide.pushed, 0);
    assert_eq!(slide.next.get(h(2, 0)), Some(Player::White));

    // 3 push 2 toward the edge ejects the front opponent
    let state = GameState::from_pieces(
        &[h(0, 0), h(1, 0), h(2, 0)],
        &[h(3, 0), h(4, 0)],
        Player::White,
    )
    .unwrap();
    let push = state
        .apply(&Move::single(h(0, 0), Direction::E))
        .unwrap();
    assert_eq!(push.pushed, 2);
    assert_eq!(push.ejected, 1);
    assert_eq!(push.next.get(h(4, 0)), Some(Player::Black));
    assert_eq!(push.next.captured(Player::White), 1);

    // equal numbers never push
    let state = GameState::from_pieces(
        &[h(0, 0), h(1, 0)],
        &[h(2, 0), h(3, 0)],
        Player::White,
    )
    .unwrap();
    let err = state
        .apply(&Move::new(&[h(0, 0), h(1, 0)], Direction::E).unwrap())
        .unwrap_err();
    assert_eq!(err, MoveError::NotEnoughToPush);
}

// ============================================================================
// SEARCH
// ============================================================================

#[test]
fn test_search_finds_winning_push() {
    let state = near_win();
    let result = choose_move(&state, 2);
    assert_eq!(result.value, WIN_VALUE);
    let next = state.apply(&result.best_move.unwrap()).unwrap().next;
    assert_eq!(next.result(), GameResult::WhiteWins);
}

#[test]
fn test_search_respects_time_limit() {
    let ai = AlphaBetaAI::new(6, Heuristics::default()).with_limits(SearchLimits {
        max_nodes: None,
        time_limit: Some(Duration::from_millis(50)),
    });
    let start = Instant::now();
    let result = ai.search(&GameState::initial());
    assert!(result.aborted);
    assert!(result.best_move.is_some());
    // one leaf batch may overrun the budget, but not by seconds
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_evaluation_is_antisymmetric() {
    let heuristics = Heuristics::default();
    let state = near_win();
    let white = evaluate(&state, Player::White, &heuristics);
    let black = evaluate(&state, Player::Black, &heuristics);
    assert_eq!(white, -black);
    assert!(white > 0.0);
}

#[test]
fn test_ai_vs_ai_game() {
    let ai = AlphaBetaAI::new(1, Heuristics::default());
    let (final_state, history) = ai.play_game(GameState::initial(), 20);
    assert_eq!(history.len(), 20);

    let mut replay = GameState::initial();
    for mv in &history {
        replay = replay.apply(mv).unwrap().next;
    }
    assert_eq!(replay, final_state);
}

// ============================================================================
// CONTROLLER AND FILES
// ============================================================================

#[test]
fn test_controller_human_vs_ai() {
    let config = EngineConfig {
        depth: 1,
        ai_side: AiSide::Black,
        ..EngineConfig::default()
    };
    let mut controller = GameController::new(&config);

    for _ in 0..3 {
        assert!(!controller.ai_to_move());
        let mv = choose_move(controller.state(), 1).best_move.unwrap();
        let report = controller.play(&mv.selection, mv.direction).unwrap();
        assert_eq!(report.mover, Player::White);

        let reply = controller.ai_move().expect("engine replies");
        assert_eq!(reply.mover, Player::Black);
        assert_eq!(reply.before, report.after);
    }
    assert_eq!(controller.state().side_to_move(), Player::White);
}

#[test]
fn test_controller_finishes_game() {
    let mut controller = GameController::from_state(near_win(), &EngineConfig::default());
    let report = controller
        .play(&[h(1, 0), h(2, 0), h(3, 0)], Direction::E)
        .unwrap();
    assert_eq!(report.ejected, 1);
    assert_eq!(controller.result(), GameResult::WhiteWins);
    assert_eq!(controller.status_line(), "White wins, captures W 6 - 1 B");
    assert!(controller.legal_directions(&[h(2, 0)]).is_empty());
}

#[test]
fn test_config_round_trip() {
    let path = temp_path("config.json");
    let config = EngineConfig {
        depth: 3,
        max_nodes: Some(10_000),
        time_limit_ms: Some(250),
        parallel: true,
        ai_side: AiSide::Both,
        ..EngineConfig::default()
    };
    config.save(&path).unwrap();
    let loaded = EngineConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, config);
    let ai = AlphaBetaAI::from_config(&loaded);
    assert_eq!(ai.depth, 3);
    assert_eq!(ai.limits.time_limit, Some(Duration::from_millis(250)));
    assert!(ai.parallel);
}

#[test]
fn test_position_round_trip() {
    let path = temp_path("position.json");
    let (_, outcome) = &legal_children(&near_win())[0];
    let state = outcome.next;
    assert_eq!(state.captured(Player::White), 5);

    state.to_position().save(&path).unwrap();
    let loaded = Position::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(GameState::from_position(&loaded).unwrap(), state);
}

#[test]
fn test_bad_position_rejected() {
    let position = Position {
        white: vec![h(0, 0), h(5, 0)],
        black: vec![],
        side_to_move: Player::White,
        captured_by_white: 0,
        captured_by_black: 0,
    };
    assert!(GameState::from_position(&position).is_err());

    let overlap = Position {
        white: vec![h(0, 0)],
        black: vec![h(0, 0)],
        ..position
    };
    assert!(GameState::from_position(&overlap).is_err());

    let too_many_captures = Position {
        white: vec![h(2, 0), h(3, 0)],
        black: vec![h(4, 0)],
        captured_by_white: 255,
        ..overlap.clone()
    };
    assert_eq!(
        GameState::from_position(&too_many_captures).unwrap_err(),
        GameError::InconsistentCaptures {
            player: Player::Black,
            on_board: 1,
            lost: 255,
        }
    );

    // fourteen black pieces on the board leave none to have been ejected
    let mut full_side = GameState::initial().to_position();
    full_side.captured_by_white = 1;
    assert!(GameState::from_position(&full_side).is_err());

    let white: Vec<Hex> = abalone_core::CELLS[..PIECES_PER_SIDE + 1].to_vec();
    let crowded = Position {
        white,
        black: vec![],
        ..overlap
    };
    assert!(matches!(
        GameState::from_position(&crowded),
        Err(GameError::InconsistentCaptures { player: Player::White, .. })
    ));
}

#[test]
fn test_loaded_position_with_many_captures_plays_on() {
    // Black has lost thirteen pieces; its last one sits on the edge
    let position = Position {
        white: vec![h(2, 0), h(3, 0)],
        black: vec![h(4, 0)],
        side_to_move: Player::White,
        captured_by_white: 13,
        captured_by_black: 0,
    };
    let state = GameState::from_position(&position).unwrap();
    assert_eq!(state.result(), GameResult::WhiteWins);

    // rules still resolve the ejection even though the game is decided
    let push = state
        .apply(&Move::new(&[h(2, 0), h(3, 0)], Direction::E).unwrap())
        .unwrap();
    assert_eq!(push.ejected, 1);
    assert_eq!(push.next.captured(Player::White), 14);
    assert_eq!(push.next.piece_count(Player::Black), 0);

    // every candidate move resolves without overflowing the counters
    assert!(!legal_children(&state).is_empty());
}
