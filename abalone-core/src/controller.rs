//! Game session controller
//!
//! Owns the current position for a front end: applies the player's moves,
//! reports what changed so the caller can animate it, and makes the engine
//! move when it is the engine's turn.

use crate::ai::AlphaBetaAI;
use crate::board::{Direction, Hex};
use crate::config::{AiSide, EngineConfig};
use crate::game::{GameResult, GameState, Player};
use crate::moves::{is_legal_move, Move, MoveError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("the game is already decided")]
    GameOver,
    #[error(transparent)]
    Illegal(#[from] MoveError),
}

/// Everything a front end needs to show an applied move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveReport {
    pub mv: Move,
    pub mover: Player,
    /// Cells that travelled, rear to front
    pub moved: Vec<Hex>,
    pub before: GameState,
    pub after: GameState,
    pub pushed: u8,
    pub ejected: u8,
}

pub struct GameController {
    state: GameState,
    ai_side: AiSide,
    ai: AlphaBetaAI,
}

impl GameController {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: GameState::initial(),
            ai_side: config.ai_side,
            ai: AlphaBetaAI::from_config(config),
        }
    }

    /// Continue from an arbitrary position
    pub fn from_state(state: GameState, config: &EngineConfig) -> Self {
        Self {
            state,
            ..Self::new(config)
        }
    }

    pub fn reset(&mut self) {
        self.state = GameState::initial();
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn result(&self) -> GameResult {
        self.state.result()
    }

    pub fn ai_side(&self) -> AiSide {
        self.ai_side
    }

    pub fn set_ai_side(&mut self, side: AiSide) {
        self.ai_side = side;
    }

    /// One-line summary for a status bar
    pub fn status_line(&self) -> String {
        let white = self.state.captured(Player::White);
        let black = self.state.captured(Player::Black);
        match self.state.result() {
            GameResult::WhiteWins => format!("White wins, captures W {white} - {black} B"),
            GameResult::BlackWins => format!("Black wins, captures W {white} - {black} B"),
            GameResult::Inconsistent => format!("Inconsistent position, captures W {white} - {black} B"),
            GameResult::Ongoing => format!(
                "{} to move, captures W {white} - {black} B",
                self.state.side_to_move()
            ),
        }
    }

    /// Directions in which `selection` may legally move right now
    pub fn legal_directions(&self, selection: &[Hex]) -> Vec<Direction> {
        if self.state.result() != GameResult::Ongoing {
            return Vec::new();
        }
        Direction::ALL
            .into_iter()
            .filter(|&d| is_legal_move(&self.state, selection, d).is_ok())
            .collect()
    }

    /// Apply a move for the side to move
    pub fn play(&mut self, selection: &[Hex], direction: Direction) -> Result<MoveReport, ControllerError> {
        let mv = Move::new(selection, direction)?;
        self.apply(mv)
    }

    /// True if the engine should make the next move
    pub fn ai_to_move(&self) -> bool {
        self.state.result() == GameResult::Ongoing && self.ai_side.plays(self.state.side_to_move())
    }

    /// Let the engine move if it is its turn
    pub fn ai_move(&mut self) -> Option<MoveReport> {
        if !self.ai_to_move() {
            return None;
        }
        let mv = self.ai.best_move(&self.state)?;
        match self.apply(mv) {
            Ok(report) => Some(report),
            Err(err) => {
                tracing::warn!(%err, "engine move rejected");
                None
            }
        }
    }

    fn apply(&mut self, mv: Move) -> Result<MoveReport, ControllerError> {
        if self.state.result() != GameResult::Ongoing {
            return Err(ControllerError::GameOver);
        }
        let before = self.state;
        let outcome = before.apply(&mv)?;
        self.state = outcome.next;

        tracing::debug!(%mv, pushed = outcome.pushed, ejected = outcome.ejected, "move applied");

        Ok(MoveReport {
            mv,
            mover: before.side_to_move(),
            moved: outcome.moved.cells.to_vec(),
            before,
            after: outcome.next,
            pushed: outcome.pushed,
            ejected: outcome.ejected,
        })
    }
}
