//! Game state and move generation

use crate::board::{Hex, BOARD_RADIUS, CELLS, CELL_COUNT};
use crate::moves::{self, Move, MoveError, MoveOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Pieces each side starts with in the classic layout
pub const PIECES_PER_SIDE: usize = 14;

/// Ejected opponent pieces needed to win
pub const WIN_CAPTURES: u8 = 6;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Player color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::White => 'W',
            Player::Black => 'B',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => f.write_str("White"),
            Player::Black => f.write_str("Black"),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    /// Both sides past the capture threshold; unreachable through legal play
    Inconsistent,
}

/// Structural errors when building or editing a position
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("cell {0} is off the board")]
    OffBoard(Hex),
    #[error("cell {0} is listed more than once")]
    Overlap(Hex),
    #[error("{player} has {on_board} pieces on the board and {lost} ejected, more than {max}", max = PIECES_PER_SIDE)]
    InconsistentCaptures {
        player: Player,
        on_board: usize,
        lost: u8,
    },
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state snapshot.
///
/// A flat array indexed by [`Hex::index`], so copying a state is a plain
/// memcpy and every derived position is independent of its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    cells: [Option<Player>; CELL_COUNT],
    side_to_move: Player,
    /// Opponent pieces ejected by each player, indexed by `Player as usize`
    captured: [u8; 2],
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// An empty board with White to move
    pub fn empty() -> Self {
        Self {
            cells: [None; CELL_COUNT],
            side_to_move: Player::White,
            captured: [0, 0],
        }
    }

    /// Classic opening layout.
    ///
    /// White fills the two rows nearest r = -R plus the three central cells
    /// of the third row; Black mirrors it from r = +R.
    pub fn initial() -> Self {
        let mut state = Self::empty();
        let radius = BOARD_RADIUS;
        for hex in CELLS {
            let occupant = if hex.r == -radius || hex.r == -radius + 1 {
                Some(Player::White)
            } else if hex.r == -radius + 2 && (0..=2).contains(&hex.q) {
                Some(Player::White)
            } else if hex.r == radius || hex.r == radius - 1 {
                Some(Player::Black)
            } else if hex.r == radius - 2 && (-2..=0).contains(&hex.q) {
                Some(Player::Black)
            } else {
                None
            };
            state.put(hex, occupant);
        }
        state
    }

    /// Create a position from piece placements
    pub fn from_pieces(white: &[Hex], black: &[Hex], side_to_move: Player) -> Result<Self, GameError> {
        let mut state = Self::empty();
        state.side_to_move = side_to_move;
        for (pieces, owner) in [(white, Player::White), (black, Player::Black)] {
            for &hex in pieces {
                if state.get(hex).is_some() {
                    return Err(GameError::Overlap(hex));
                }
                state.set(hex, Some(owner))?;
            }
        }
        Ok(state)
    }

    /// Same position with the given capture counts
    pub fn with_captured(mut self, by_white: u8, by_black: u8) -> Self {
        self.captured = [by_white, by_black];
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn radius(&self) -> i8 {
        BOARD_RADIUS
    }

    pub fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    pub fn set_side_to_move(&mut self, player: Player) {
        self.side_to_move = player;
    }

    /// Opponent pieces ejected by `player`
    pub fn captured(&self, player: Player) -> u8 {
        self.captured[player as usize]
    }

    /// Occupant of a cell; off-board cells are always empty
    #[inline]
    pub fn get(&self, hex: Hex) -> Option<Player> {
        hex.index().and_then(|i| self.cells[i])
    }

    /// Write a cell of this snapshot
    pub fn set(&mut self, hex: Hex, occupant: Option<Player>) -> Result<(), GameError> {
        let i = hex.index().ok_or(GameError::OffBoard(hex))?;
        self.cells[i] = occupant;
        Ok(())
    }

    /// Write a cell already known to be on the board
    #[inline]
    pub(crate) fn put(&mut self, hex: Hex, occupant: Option<Player>) {
        debug_assert!(hex.is_valid(), "write to off-board cell {hex}");
        if let Some(i) = hex.index() {
            self.cells[i] = occupant;
        }
    }

    pub(crate) fn add_captures(&mut self, player: Player, count: u8) {
        let captured = &mut self.captured[player as usize];
        *captured = captured.saturating_add(count);
    }

    pub(crate) fn pass_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// Iterate pieces on board in cell order
    pub fn pieces(&self) -> impl Iterator<Item = (Hex, Player)> + '_ {
        CELLS
            .iter()
            .zip(self.cells.iter())
            .filter_map(|(&hex, &cell)| cell.map(|p| (hex, p)))
    }

    /// Pieces `player` still has on the board
    pub fn piece_count(&self, player: Player) -> usize {
        self.cells.iter().filter(|&&c| c == Some(player)).count()
    }

    // ========================================================================
    // RESULT
    // ========================================================================

    /// Game result from the capture counts alone
    pub fn result(&self) -> GameResult {
        let white = self.captured(Player::White) >= WIN_CAPTURES;
        let black = self.captured(Player::Black) >= WIN_CAPTURES;
        match (white, black) {
            (false, false) => GameResult::Ongoing,
            (true, false) => GameResult::WhiteWins,
            (false, true) => GameResult::BlackWins,
            (true, true) => GameResult::Inconsistent,
        }
    }

    /// The winner, if exactly one player reached the capture threshold
    pub fn winner(&self) -> Option<Player> {
        match self.result() {
            GameResult::WhiteWins => Some(Player::White),
            GameResult::BlackWins => Some(Player::Black),
            GameResult::Ongoing | GameResult::Inconsistent => None,
        }
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// Validate and resolve a move without touching `self`
    pub fn apply(&self, mv: &Move) -> Result<MoveOutcome, MoveError> {
        moves::apply_move(self, &mv.selection, mv.direction)
    }

    /// All legal moves for the side to move
    pub fn legal_moves(&self) -> Vec<Move> {
        moves::legal_moves(self)
    }

    // ========================================================================
    // SNAPSHOTS
    // ========================================================================

    pub fn to_position(&self) -> Position {
        let mut position = Position {
            white: Vec::new(),
            black: Vec::new(),
            side_to_move: self.side_to_move,
            captured_by_white: self.captured(Player::White),
            captured_by_black: self.captured(Player::Black),
        };
        for (hex, owner) in self.pieces() {
            match owner {
                Player::White => position.white.push(hex),
                Player::Black => position.black.push(hex),
            }
        }
        position
    }

    /// Rebuild a state from a snapshot. Each color's pieces on the board
    /// plus those ejected by the opponent may not exceed the starting count.
    pub fn from_position(position: &Position) -> Result<Self, GameError> {
        let state = Self::from_pieces(&position.white, &position.black, position.side_to_move)?
            .with_captured(position.captured_by_white, position.captured_by_black);
        for player in [Player::White, Player::Black] {
            let on_board = state.piece_count(player);
            let lost = state.captured(player.opponent());
            if on_board + lost as usize > PIECES_PER_SIDE {
                return Err(GameError::InconsistentCaptures {
                    player,
                    on_board,
                    lost,
                });
            }
        }
        Ok(state)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Text diagram, one board row per line, top row is r = -R
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let radius = BOARD_RADIUS;
        for r in -radius..=radius {
            let q_min = (-radius).max(-radius - r);
            let q_max = radius.min(radius - r);
            write!(f, "{:indent$}", "", indent = r.unsigned_abs() as usize)?;
            for q in q_min..=q_max {
                let c = self.get(Hex::new(q, r)).map_or('.', Player::symbol);
                if q > q_min {
                    f.write_str(" ")?;
                }
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{} to move, captures W {} - {} B",
            self.side_to_move,
            self.captured(Player::White),
            self.captured(Player::Black)
        )
    }
}

/// Serializable position snapshot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub white: Vec<Hex>,
    pub black: Vec<Hex>,
    pub side_to_move: Player,
    #[serde(default)]
    pub captured_by_white: u8,
    #[serde(default)]
    pub captured_by_black: u8,
}

impl Position {
    /// Load from JSON file
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save to JSON file
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
