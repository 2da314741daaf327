//! Grid coordinates and the four cardinal directions.
//!
//! Coordinates are 0-indexed (row, col) pairs: row grows downward,
//! col grows rightward. Directions double as offsets and as stable bit
//! indices for the per-piece joined-edge mask.

use std::fmt;
use std::ops::{Add, AddAssign, Sub};

/// A cell address on the board.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
}

impl Coordinate {
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl Add for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn add(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.row + rhs.row, self.col + rhs.col)
    }
}

impl AddAssign for Coordinate {
    #[inline]
    fn add_assign(&mut self, rhs: Coordinate) {
        self.row += rhs.row;
        self.col += rhs.col;
    }
}

impl Sub for Coordinate {
    type Output = Coordinate;

    #[inline]
    fn sub(self, rhs: Coordinate) -> Coordinate {
        Coordinate::new(self.row - rhs.row, self.col - rhs.col)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal neighbor directions.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the fixed order used for mask bits.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The coordinate offset for stepping one cell in this direction.
    ///
    /// Up is row - 1 and down is row + 1, matching the downward-growing
    /// row axis.
    #[inline]
    pub const fn offset(self) -> Coordinate {
        match self {
            Direction::Up => Coordinate::new(-1, 0),
            Direction::Down => Coordinate::new(1, 0),
            Direction::Left => Coordinate::new(0, -1),
            Direction::Right => Coordinate::new(0, 1),
        }
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Stable bit index (0..4) for `JoinedMask`.
    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}
