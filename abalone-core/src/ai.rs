//! CPU-based Alpha-Beta AI

use crate::config::EngineConfig;
use crate::eval::{evaluate, Heuristics, WIN_VALUE};
use crate::game::{GameResult, GameState, Player};
use crate::moves::{legal_children, Move, MoveOutcome};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Score for the side to move when it has no legal move at all
pub const NO_MOVES_VALUE: f32 = -50000.0;

/// Search depth used when none is given
pub const DEFAULT_DEPTH: u32 = 2;

// ============================================================================
// LIMITS AND RESULTS
// ============================================================================

/// Budget checked between sibling moves; the search keeps its best-so-far
/// answer when it runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// Outcome of a search from the root position
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Score from the root side to move's point of view
    pub value: f32,
    pub best_move: Option<Move>,
    pub nodes: u64,
    /// True if a limit cut the search short
    pub aborted: bool,
}

// ============================================================================
// ALPHA-BETA AI
// ============================================================================

/// Alpha-Beta AI player
#[derive(Clone, Debug)]
pub struct AlphaBetaAI {
    pub depth: u32,
    pub heuristics: Heuristics,
    pub limits: SearchLimits,
    /// Search root moves on the rayon pool
    pub parallel: bool,
}

impl AlphaBetaAI {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self {
            depth,
            heuristics,
            limits: SearchLimits::unlimited(),
            parallel: false,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            depth: config.depth,
            heuristics: config.heuristics.clone(),
            limits: config.limits(),
            parallel: config.parallel,
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Search the position for the side to move; depth 0 is treated as 1
    pub fn search(&self, state: &GameState) -> SearchResult {
        let depth = self.depth.max(1);
        let result = if self.parallel {
            self.search_parallel(state, depth)
        } else {
            let counters = Counters::default();
            let search = Search::new(&self.heuristics, self.limits, &counters);
            let (value, best_move) =
                search.negamax(state, depth, f32::NEG_INFINITY, f32::INFINITY, state.side_to_move());
            search.finish(value, best_move)
        };

        tracing::debug!(
            depth,
            nodes = result.nodes,
            value = result.value,
            aborted = result.aborted,
            best = %result.best_move.as_ref().map_or_else(|| "none".to_string(), |m| m.to_string()),
            "search finished"
        );

        result
    }

    /// Get best move for current position
    pub fn best_move(&self, state: &GameState) -> Option<Move> {
        self.search(state).best_move
    }

    /// Play against itself until someone wins, a side is stuck, or
    /// `max_plies` is reached
    pub fn play_game(&self, initial: GameState, max_plies: usize) -> (GameState, Vec<Move>) {
        play_between(initial, self, self, max_plies, |_| {})
    }

    /// Evaluate a position for `perspective`
    pub fn evaluate(&self, state: &GameState, perspective: Player) -> f32 {
        evaluate(state, perspective, &self.heuristics)
    }

    /// Each root child is searched on its own copy with a full window.
    /// Ties go to the earliest move, as in the sequential search.
    fn search_parallel(&self, state: &GameState, depth: u32) -> SearchResult {
        let me = state.side_to_move();
        let counters = Counters::default();
        let root = Search::new(&self.heuristics, self.limits, &counters);
        counters.nodes.fetch_add(1, Ordering::Relaxed);

        if let Some(value) = terminal_value(state, me) {
            return root.finish(value, None);
        }
        let children = legal_children(state);
        if children.is_empty() {
            return root.finish(NO_MOVES_VALUE, None);
        }

        let scores: Vec<f32> = children
            .par_iter()
            .map(|(_, outcome)| {
                let (value, _) = root.negamax(
                    &outcome.next,
                    depth - 1,
                    f32::NEG_INFINITY,
                    f32::INFINITY,
                    me.opponent(),
                );
                -value
            })
            .collect();

        let mut best = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > scores[best] {
                best = i;
            }
        }
        let best_move = children.into_iter().nth(best).map(|(mv, _)| mv);
        root.finish(scores[best], best_move)
    }
}

impl Default for AlphaBetaAI {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH, Heuristics::default())
    }
}

/// One ply of an engine game, handed to the `play_between` callback
pub struct PlyReport<'a> {
    pub before: &'a GameState,
    pub mv: &'a Move,
    pub search: &'a SearchResult,
    pub outcome: &'a MoveOutcome,
}

/// Let `white` and `black` alternate from `initial` until someone wins, the
/// side to move is stuck, or `max_plies` moves were made. `on_ply` sees
/// every applied move.
pub fn play_between(
    initial: GameState,
    white: &AlphaBetaAI,
    black: &AlphaBetaAI,
    max_plies: usize,
    mut on_ply: impl FnMut(PlyReport<'_>),
) -> (GameState, Vec<Move>) {
    let mut state = initial;
    let mut history = Vec::new();

    while state.result() == GameResult::Ongoing && history.len() < max_plies {
        let engine = match state.side_to_move() {
            Player::White => white,
            Player::Black => black,
        };
        let search = engine.search(&state);
        let Some(mv) = search.best_move.clone() else {
            tracing::debug!("{} has no legal moves", state.side_to_move());
            break;
        };
        let outcome = match state.apply(&mv) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(%mv, %err, "search returned an illegal move");
                break;
            }
        };
        on_ply(PlyReport {
            before: &state,
            mv: &mv,
            search: &search,
            outcome: &outcome,
        });
        history.push(mv);
        state = outcome.next;
    }

    (state, history)
}

/// Search `state` to `depth` plies with default heuristics and no limits.
/// A depth of 0 is searched as 1, so a move comes back whenever one exists.
pub fn choose_move(state: &GameState, depth: u32) -> SearchResult {
    AlphaBetaAI::new(depth, Heuristics::default()).search(state)
}

// ============================================================================
// NEGAMAX WITH ALPHA-BETA
// ============================================================================

/// Node count and abort flag, shared by every worker of one search
#[derive(Default)]
struct Counters {
    nodes: AtomicU64,
    aborted: AtomicBool,
}

struct Search<'a> {
    heuristics: &'a Heuristics,
    limits: SearchLimits,
    started: Instant,
    counters: &'a Counters,
}

impl<'a> Search<'a> {
    fn new(heuristics: &'a Heuristics, limits: SearchLimits, counters: &'a Counters) -> Self {
        Self {
            heuristics,
            limits,
            started: Instant::now(),
            counters,
        }
    }

    fn finish(&self, value: f32, best_move: Option<Move>) -> SearchResult {
        SearchResult {
            value,
            best_move,
            nodes: self.counters.nodes.load(Ordering::Relaxed),
            aborted: self.counters.aborted.load(Ordering::Relaxed),
        }
    }

    fn out_of_budget(&self) -> bool {
        if self.counters.aborted.load(Ordering::Relaxed) {
            return true;
        }
        let nodes = self.counters.nodes.load(Ordering::Relaxed);
        let exhausted = self.limits.max_nodes.is_some_and(|max| nodes >= max)
            || self.limits.time_limit.is_some_and(|t| self.started.elapsed() >= t);
        if exhausted {
            tracing::trace!(nodes, "search budget exhausted");
            self.counters.aborted.store(true, Ordering::Relaxed);
        }
        exhausted
    }

    /// Returns the score for `perspective`, the side to move in `state`, and
    /// the move that achieves it.
    fn negamax(
        &self,
        state: &GameState,
        depth: u32,
        mut alpha: f32,
        beta: f32,
        perspective: Player,
    ) -> (f32, Option<Move>) {
        debug_assert_eq!(perspective, state.side_to_move());
        self.counters.nodes.fetch_add(1, Ordering::Relaxed);

        if let Some(value) = terminal_value(state, perspective) {
            return (value, None);
        }

        if depth == 0 {
            return (evaluate(state, perspective, self.heuristics), None);
        }

        let children = legal_children(state);
        if children.is_empty() {
            return (NO_MOVES_VALUE, None);
        }

        let mut best_value = f32::NEG_INFINITY;
        let mut best_move = None;

        for (i, (mv, outcome)) in children.into_iter().enumerate() {
            if i > 0 && self.out_of_budget() {
                break;
            }

            let (child_value, _) =
                self.negamax(&outcome.next, depth - 1, -beta, -alpha, perspective.opponent());
            let value = -child_value;

            if value > best_value || best_move.is_none() {
                best_value = value;
                best_move = Some(mv);
            }
            alpha = alpha.max(value);

            if alpha >= beta {
                break;
            }
        }

        (best_value, best_move)
    }
}

fn terminal_value(state: &GameState, perspective: Player) -> Option<f32> {
    state
        .winner()
        .map(|winner| if winner == perspective { WIN_VALUE } else { -WIN_VALUE })
}

// ============================================================================
// TESTS
// ============================================================================
