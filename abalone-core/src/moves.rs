//! Move validation and resolution
//!
//! Resolving a move happens in two stages:
//!
//! 1. [`expand_selection`] checks ownership and line shape, then turns the
//!    player's selection into the full line that will travel. A single piece
//!    grows forward into up to three friendly pieces, and a selected pair
//!    picks up a friendly piece sitting directly in front of or behind it.
//! 2. [`resolve`] pushes that line one step and produces the next state.
//!
//! Only inline moves exist: a line travels along its own axis.

use crate::board::{Direction, Hex, CELLS};
use crate::game::{GameState, Player};
use arrayvec::ArrayVec;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest line that may move or be pushed
pub const MAX_LINE: usize = 3;

/// Cells chosen by the acting player
pub type Selection = ArrayVec<Hex, MAX_LINE>;

// ============================================================================
// TYPES
// ============================================================================

/// Why a move was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("select a piece")]
    EmptySelection,
    #[error("not your pieces")]
    NotYourPieces,
    #[error("not a contiguous line")]
    NotContiguous,
    #[error("only inline moves are legal")]
    NotInline,
    #[error("off the board")]
    OffBoard,
    #[error("cannot push your own pieces")]
    OwnPieces,
    #[error("not enough pieces to push")]
    NotEnoughToPush,
    #[error("opponent is backed")]
    OpponentBacked,
}

/// A selection and the direction it travels
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub selection: Selection,
    pub direction: Direction,
}

impl Move {
    /// Move seeded from a single piece
    pub fn single(hex: Hex, direction: Direction) -> Self {
        let mut selection = Selection::new();
        selection.push(hex);
        Self { selection, direction }
    }

    /// Move from an arbitrary selection; more than three cells is never a line
    pub fn new(cells: &[Hex], direction: Direction) -> Result<Self, MoveError> {
        let selection = Selection::try_from(cells).map_err(|_| MoveError::NotContiguous)?;
        Ok(Self { selection, direction })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hex) in self.selection.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{hex}")?;
        }
        write!(f, " {}", self.direction)
    }
}

/// A straight gap-free run of cells, ordered back to front along `axis`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub cells: ArrayVec<Hex, MAX_LINE>,
    /// None for a single cell, which has no orientation of its own
    pub axis: Option<Direction>,
}

/// Pieces about to travel, ordered rear to front along `direction`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovingLine {
    pub cells: ArrayVec<Hex, MAX_LINE>,
    pub direction: Direction,
}

impl MovingLine {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn front(&self) -> Hex {
        self.cells[self.cells.len() - 1]
    }

    fn back(&self) -> Hex {
        self.cells[0]
    }
}

/// A successfully resolved move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub next: GameState,
    /// The line that actually travelled, after expansion
    pub moved: MovingLine,
    /// Opponent pieces displaced, including ejected ones
    pub pushed: u8,
    /// Opponent pieces pushed off the board
    pub ejected: u8,
}

// ============================================================================
// LINE DETECTION
// ============================================================================

/// Check that 1-3 cells form a contiguous straight line and order them.
pub fn line_of(selection: &[Hex]) -> Result<Line, MoveError> {
    match selection.len() {
        0 => return Err(MoveError::EmptySelection),
        1 => {
            return Ok(Line {
                cells: selection.iter().copied().collect(),
                axis: None,
            })
        }
        n if n > MAX_LINE => return Err(MoveError::NotContiguous),
        _ => {}
    }

    let set: FxHashSet<Hex> = selection.iter().copied().collect();
    if set.len() != selection.len() {
        return Err(MoveError::NotContiguous);
    }

    for axis in Direction::ALL {
        for &back in selection {
            let mut cells = ArrayVec::new();
            let mut cursor = back;
            while cells.len() < selection.len() && set.contains(&cursor) {
                cells.push(cursor);
                cursor = cursor.neighbor(axis);
            }
            if cells.len() == selection.len() {
                return Ok(Line { cells, axis: Some(axis) });
            }
        }
    }

    Err(MoveError::NotContiguous)
}

// ============================================================================
// SELECTION EXPANSION
// ============================================================================

/// Turn a player's selection into the line that will travel in `direction`.
pub fn expand_selection(
    state: &GameState,
    selection: &[Hex],
    direction: Direction,
) -> Result<MovingLine, MoveError> {
    if selection.is_empty() {
        return Err(MoveError::EmptySelection);
    }
    let me = state.side_to_move();
    if selection.iter().any(|&hex| state.get(hex) != Some(me)) {
        return Err(MoveError::NotYourPieces);
    }

    let line = line_of(selection)?;
    let mut moving = MovingLine {
        cells: line.cells,
        direction,
    };

    match line.axis {
        None => {
            let mut cursor = moving.back().neighbor(direction);
            while moving.len() < MAX_LINE && state.get(cursor) == Some(me) {
                moving.cells.push(cursor);
                cursor = cursor.neighbor(direction);
            }
        }
        Some(axis) => {
            if !direction.is_colinear(axis) {
                return Err(MoveError::NotInline);
            }
            if direction != axis {
                moving.cells.reverse();
            }
            if moving.len() == 2 {
                let ahead = moving.front().neighbor(direction);
                let behind = moving.back().neighbor(direction.opposite());
                if state.get(ahead) == Some(me) {
                    moving.cells.push(ahead);
                } else if state.get(behind) == Some(me) {
                    moving.cells.insert(0, behind);
                }
            }
        }
    }

    Ok(moving)
}

// ============================================================================
// RESOLUTION
// ============================================================================

/// Move `line` one step along its direction, pushing opponents if it can.
pub fn resolve(state: &GameState, line: MovingLine) -> Result<MoveOutcome, MoveError> {
    let me = state.side_to_move();
    let opponent = me.opponent();
    let d = line.direction;
    let next_front = line.front().neighbor(d);

    if !next_front.is_valid() {
        return Err(MoveError::OffBoard);
    }

    let mut next = *state;
    let mut pushed = 0;
    let mut ejected = 0;

    match state.get(next_front) {
        Some(owner) if owner == me => return Err(MoveError::OwnPieces),
        None => {}
        Some(_) => {
            // Runs of four or more exist on the board; the scan only needs to
            // get as far as proving the push too heavy.
            let mut run: ArrayVec<Hex, MAX_LINE> = ArrayVec::new();
            let mut scan = next_front;
            while state.get(scan) == Some(opponent) {
                if run.len() + 1 >= line.len() {
                    return Err(MoveError::NotEnoughToPush);
                }
                run.push(scan);
                scan = scan.neighbor(d);
            }

            if scan.is_valid() && state.get(scan).is_some() {
                return Err(MoveError::OpponentBacked);
            }

            for &from in run.iter().rev() {
                let to = from.neighbor(d);
                if to.is_valid() {
                    next.put(to, Some(opponent));
                } else {
                    ejected += 1;
                }
                next.put(from, None);
            }
            pushed = run.len() as u8;
            next.add_captures(me, ejected);
        }
    }

    for &from in line.cells.iter().rev() {
        next.put(from.neighbor(d), Some(me));
        next.put(from, None);
    }
    next.pass_turn();

    Ok(MoveOutcome {
        next,
        moved: line,
        pushed,
        ejected,
    })
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Validate and resolve a move. `state` is never modified.
pub fn apply_move(
    state: &GameState,
    selection: &[Hex],
    direction: Direction,
) -> Result<MoveOutcome, MoveError> {
    let line = expand_selection(state, selection, direction)?;
    resolve(state, line)
}

/// Check a move without keeping the resulting state
pub fn is_legal_move(state: &GameState, selection: &[Hex], direction: Direction) -> Result<(), MoveError> {
    apply_move(state, selection, direction).map(|_| ())
}

/// Every legal move seeded from a single piece of the side to move, paired
/// with its resolved outcome.
///
/// Larger lines are reached through single-piece expansion, so a piece only
/// seeds the line that starts at it and extends forward.
pub fn legal_children(state: &GameState) -> Vec<(Move, MoveOutcome)> {
    let me = state.side_to_move();
    let mut children = Vec::new();
    for hex in CELLS {
        if state.get(hex) != Some(me) {
            continue;
        }
        for direction in Direction::ALL {
            if let Ok(outcome) = apply_move(state, &[hex], direction) {
                children.push((Move::single(hex, direction), outcome));
            }
        }
    }
    children
}

/// All legal moves for the side to move
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    legal_children(state).into_iter().map(|(mv, _)| mv).collect()
}

/// Pieces on the board plus pieces ejected, both colors
pub fn material_total(state: &GameState) -> usize {
    [Player::White, Player::Black]
        .into_iter()
        .map(|p| state.piece_count(p) + state.captured(p) as usize)
        .sum()
}

// ============================================================================
// TESTS
// ============================================================================
