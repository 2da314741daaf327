//! Puzzle piece model and the joined-edge mask.
//!
//! A piece knows the cell it belongs in when the puzzle is solved and the
//! cell it presently occupies. The current cell is written only by the
//! board's commit paths; presentation code never mutates it.

use std::fmt;

use crate::coord::{Coordinate, Direction};

/// Stable identity of a piece: an index into the board's piece table.
///
/// Pieces are created once at board initialization and never destroyed,
/// so the index is valid for the lifetime of the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct PieceId(pub(crate) u32);

impl PieceId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece#{}", self.0)
    }
}

/// A single tile of the puzzle image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    solved: Coordinate,
    pub(crate) current: Coordinate,
}

impl Piece {
    pub(crate) fn new(solved: Coordinate) -> Self {
        Self {
            solved,
            current: solved,
        }
    }

    /// The cell this piece belongs in when the puzzle is complete.
    #[inline]
    pub fn solved(&self) -> Coordinate {
        self.solved
    }

    /// The cell this piece presently occupies.
    #[inline]
    pub fn current(&self) -> Coordinate {
        self.current
    }

    /// Whether the piece sits at its solved cell.
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.current == self.solved
    }
}

/// Per-piece 4-bit mask of correctly joined edges.
///
/// Bit layout follows `Direction::bit`. Presentation uses the mask to
/// suppress shared borders and square off corners on joined edges; the
/// mask is a pure function of current board state and is recomputed
/// after every committed move.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct JoinedMask(u8);

impl JoinedMask {
    pub const EMPTY: JoinedMask = JoinedMask(0);

    #[inline]
    pub fn set(&mut self, dir: Direction) {
        self.0 |= 1 << dir.bit();
    }

    #[inline]
    pub fn is_joined(self, dir: Direction) -> bool {
        self.0 & (1 << dir.bit()) != 0
    }

    /// Raw 4-bit value, for callers that ship the mask across a boundary.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// True when no edge is correctly joined.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for JoinedMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut joined = f.debug_list();
        for dir in Direction::ALL {
            if self.is_joined(dir) {
                joined.entry(&dir);
            }
        }
        joined.finish()
    }
}
