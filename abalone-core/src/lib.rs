//! Abalone Core - Rules engine and AI
//!
//! This crate provides the core game logic for hexagonal Abalone:
//! - Board geometry (hex grid with axial coordinates)
//! - Game state snapshots and position files
//! - Move validation and inline push resolution
//! - Position evaluation
//! - CPU-based negamax alpha-beta AI
//! - A game controller for front ends

pub mod board;
pub mod game;
pub mod moves;
pub mod eval;
pub mod ai;
pub mod config;
pub mod controller;

// Re-exports for convenient access
pub use board::{all_cells, in_board, Direction, Hex, BOARD_RADIUS, CELLS, CELL_COUNT};
pub use game::{GameError, GameResult, GameState, Player, Position, PIECES_PER_SIDE, WIN_CAPTURES};
pub use moves::{
    apply_move, expand_selection, is_legal_move, legal_children, legal_moves, line_of, resolve, Move,
    MoveError, MoveOutcome, MovingLine, Selection,
};
pub use eval::{eval_terms, evaluate, EvalTerms, Heuristics, WIN_VALUE};
pub use ai::{choose_move, play_between, AlphaBetaAI, PlyReport, SearchLimits, SearchResult, NO_MOVES_VALUE};
pub use config::{AiSide, EngineConfig};
pub use controller::{ControllerError, GameController, MoveReport};
