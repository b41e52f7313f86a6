//! Hex board geometry with axial coordinates
//!
//! The board is a regular hexagon of radius [`BOARD_RADIUS`]. Every on-board
//! cell also has a dense index in `0..CELL_COUNT`, precomputed at compile
//! time, so board storage can be a flat array instead of a map.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 4;

/// Number of cells on a board of [`BOARD_RADIUS`]: 3R² + 3R + 1
pub const CELL_COUNT: usize = cell_count(BOARD_RADIUS);

/// Side length of the square (q, r) grid the index table covers
const GRID: usize = (2 * BOARD_RADIUS as usize) + 1;

/// Marker for grid slots that are off the hexagon
const NO_CELL: u8 = u8::MAX;

/// All on-board cells, ordered by q then r
pub const CELLS: [Hex; CELL_COUNT] = build_cells();

/// (q, r) grid slot -> dense cell index
const CELL_INDEX: [u8; GRID * GRID] = build_index();

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Check if this hex is on the board
    pub const fn is_valid(&self) -> bool {
        in_board(self.q, self.r, BOARD_RADIUS)
    }

    /// Dense index of this cell, or None if it is off the board
    #[inline]
    pub fn index(&self) -> Option<usize> {
        if !self.is_valid() {
            return None;
        }
        let slot = grid_slot(self.q, self.r);
        match CELL_INDEX[slot] {
            NO_CELL => None,
            i => Some(i as usize),
        }
    }

    /// Cube-coordinate ring the hex sits on: max(|q|, |r|, |q+r|)
    pub fn ring(&self) -> i8 {
        let s = self.q as i32 + self.r as i32;
        (self.q as i32).abs().max((self.r as i32).abs()).max(s.abs()) as i8
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i8 {
        let s = self.q as i32 + self.r as i32;
        (((self.q as i32).abs() + (self.r as i32).abs() + s.abs()) / 2) as i8
    }

    /// Steps from this hex to the outer ring of a board of `radius`
    pub fn distance_to_edge(&self, radius: i8) -> i8 {
        radius - self.ring()
    }

    /// Get neighbor in direction
    #[inline]
    pub fn neighbor(&self, direction: Direction) -> Hex {
        let (dq, dr) = direction.delta();
        Hex::new(self.q.saturating_add(dq), self.r.saturating_add(dr))
    }

    /// Unit direction from `self` to `other` if they are adjacent
    pub fn direction_to(&self, other: Hex) -> Option<Direction> {
        let delta = other - *self;
        Direction::ALL
            .into_iter()
            .find(|d| d.delta() == (delta.q, delta.r))
    }
}

impl Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex::new(self.q.saturating_add(other.q), self.r.saturating_add(other.r))
    }
}

impl Sub for Hex {
    type Output = Hex;

    fn sub(self, other: Hex) -> Hex {
        Hex::new(self.q.saturating_sub(other.q), self.r.saturating_sub(other.r))
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.q, self.r)
    }
}

/// The six unit directions, in rotation order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    E,
    NE,
    NW,
    W,
    SW,
    SE,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::E,
        Direction::NE,
        Direction::NW,
        Direction::W,
        Direction::SW,
        Direction::SE,
    ];

    /// Axial offset (dq, dr)
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::E => (1, 0),
            Direction::NE => (1, -1),
            Direction::NW => (0, -1),
            Direction::W => (-1, 0),
            Direction::SW => (-1, 1),
            Direction::SE => (0, 1),
        }
    }

    /// Same direction rotated by 180 degrees
    pub const fn opposite(self) -> Direction {
        Direction::ALL[(self as usize + 3) % 6]
    }

    /// True if `other` is this direction or its opposite
    pub fn is_colinear(self, other: Direction) -> bool {
        self == other || self == other.opposite()
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::E => "E",
            Direction::NE => "NE",
            Direction::NW => "NW",
            Direction::W => "W",
            Direction::SW => "SW",
            Direction::SE => "SE",
        }
    }

    /// Parse a direction name ("E", "ne", ...)
    pub fn from_name(name: &str) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Is (q, r) on a hexagonal board of `radius`?
pub const fn in_board(q: i8, r: i8, radius: i8) -> bool {
    let (q, r, radius) = (q as i32, r as i32, radius as i32);
    q.abs() <= radius && r.abs() <= radius && (q + r).abs() <= radius
}

/// Every cell of a board of `radius`, ordered by q then r
pub fn all_cells(radius: i8) -> Vec<Hex> {
    let mut cells = Vec::with_capacity(cell_count(radius));
    for q in -radius..=radius {
        for r in -radius..=radius {
            if in_board(q, r, radius) {
                cells.push(Hex::new(q, r));
            }
        }
    }
    cells
}

/// 3R² + 3R + 1
pub const fn cell_count(radius: i8) -> usize {
    let r = radius as usize;
    3 * r * r + 3 * r + 1
}

const fn grid_slot(q: i8, r: i8) -> usize {
    (q + BOARD_RADIUS) as usize * GRID + (r + BOARD_RADIUS) as usize
}

const fn build_cells() -> [Hex; CELL_COUNT] {
    let mut cells = [Hex::new(0, 0); CELL_COUNT];
    let mut n = 0;
    let mut q = -BOARD_RADIUS;
    while q <= BOARD_RADIUS {
        let mut r = -BOARD_RADIUS;
        while r <= BOARD_RADIUS {
            if in_board(q, r, BOARD_RADIUS) {
                cells[n] = Hex::new(q, r);
                n += 1;
            }
            r += 1;
        }
        q += 1;
    }
    cells
}

const fn build_index() -> [u8; GRID * GRID] {
    let mut index = [NO_CELL; GRID * GRID];
    let mut n = 0;
    while n < CELL_COUNT {
        let hex = CELLS[n];
        index[grid_slot(hex.q, hex.r)] = n as u8;
        n += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_validity() {
        assert!(Hex::new(0, 0).is_valid());
        assert!(Hex::new(4, 0).is_valid());
        assert!(Hex::new(0, 4).is_valid());
        assert!(Hex::new(-4, 0).is_valid());
        assert!(!Hex::new(5, 0).is_valid());
        assert!(!Hex::new(3, 3).is_valid()); // q + r = 6 > 4
    }

    #[test]
    fn test_all_cells_bounds() {
        for radius in 1..=6 {
            let cells = all_cells(radius);
            assert_eq!(cells.len(), 3 * (radius as usize).pow(2) + 3 * radius as usize + 1);
            assert!(cells.iter().all(|h| in_board(h.q, h.r, radius)));
        }
        assert_eq!(all_cells(BOARD_RADIUS), CELLS.to_vec());
        assert_eq!(CELL_COUNT, 61);
    }

    #[test]
    fn test_index_is_bijection() {
        for (i, hex) in CELLS.iter().enumerate() {
            assert_eq!(hex.index(), Some(i));
        }
        assert_eq!(Hex::new(5, 0).index(), None);
        assert_eq!(Hex::new(2, 3).index(), None);
        assert_eq!(Hex::new(i8::MAX, i8::MIN).index(), None);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Hex::new(0, 0).distance_to_center(), 0);
        assert_eq!(Hex::new(1, 0).distance_to_center(), 1);
        assert_eq!(Hex::new(2, 2).distance_to_center(), 4);
        assert_eq!(Hex::new(0, -4).distance_to_edge(BOARD_RADIUS), 0);
        assert_eq!(Hex::new(1, 1).distance_to_edge(BOARD_RADIUS), 2);
    }

    #[test]
    fn test_directions() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let (dq, dr) = d.delta();
            let (oq, or) = d.opposite().delta();
            assert_eq!((dq + oq, dr + or), (0, 0));
            assert_eq!(Hex::new(0, 0).direction_to(Hex::new(dq, dr)), Some(d));
        }
        assert_eq!(Direction::E.opposite(), Direction::W);
        assert_eq!(Direction::SE.opposite(), Direction::NW);
        assert_eq!(Hex::new(0, 0).direction_to(Hex::new(2, 0)), None);
        assert_eq!(Hex::new(0, 0).direction_to(Hex::new(1, 1)), None);
        assert_eq!(Direction::from_name("sw"), Some(Direction::SW));
    }

    #[test]
    fn test_vector_ops() {
        let a = Hex::new(1, -2);
        let b = Hex::new(-3, 1);
        assert_eq!(a + b, Hex::new(-2, -1));
        assert_eq!(a - b, Hex::new(4, -3));
        assert_eq!(a.neighbor(Direction::SE), Hex::new(1, -1));
    }
}
