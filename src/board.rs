//! Board state: the single source of truth for cell occupancy.
//!
//! The board owns every piece and the rows×cols slot table mapping cells to
//! piece ids. Occupancy invariants:
//! - every occupied cell's piece reports that cell as its current coordinate
//! - no piece id appears in two slots
//! - the piece set is fixed at construction
//!
//! Piece coordinates are a projection of the slot table and are rewritten
//! only inside the board's own commit paths.

use rand::Rng;

use crate::coord::{Coordinate, Direction};
use crate::piece::{JoinedMask, Piece, PieceId};

/// A rows×cols sliding-jigsaw board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    /// Cell -> occupying piece, row-major.
    slots: Vec<Option<PieceId>>,
    /// All pieces, indexed by `PieceId`.
    pieces: Vec<Piece>,
}

impl Board {
    /// Builds a board with one piece per cell, every piece at its solved cell.
    ///
    /// Callers normally follow up with [`Board::shuffle`] before first render.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(rows > 0 && cols > 0, "board must have at least one cell");

        let mut slots = Vec::with_capacity(rows * cols);
        let mut pieces = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                let id = PieceId(pieces.len() as u32);
                pieces.push(Piece::new(Coordinate::new(row as i32, col as i32)));
                slots.push(Some(id));
            }
        }

        Self {
            rows,
            cols,
            slots,
            pieces,
        }
    }

    /// Randomizes the layout with `rows * cols` independent transpositions.
    ///
    /// Each step draws two random cells and swaps their occupants. This is
    /// the crude shuffle the game shipped with, not a uniform permutation:
    /// it can (rarely) leave the board solved or leave spans untouched.
    pub fn shuffle(&mut self, rng: &mut impl Rng) {
        for from in 0..self.slots.len() {
            let row = rng.random_range(0..self.rows);
            let col = rng.random_range(0..self.cols);
            let to = row * self.cols + col;
            self.slots.swap(from, to);
        }

        // rewrite the coordinate projection from the reshuffled table
        for idx in 0..self.slots.len() {
            if let Some(id) = self.slots[idx] {
                self.pieces[id.index()].current = self.coordinate_of(idx);
            }
        }
        self.debug_validate();
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of pieces owned by the board (fixed at construction).
    #[inline]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.row >= 0
            && (coord.row as usize) < self.rows
            && coord.col >= 0
            && (coord.col as usize) < self.cols
    }

    #[inline]
    fn slot_index(&self, coord: Coordinate) -> usize {
        debug_assert!(self.in_bounds(coord));
        coord.row as usize * self.cols + coord.col as usize
    }

    #[inline]
    fn coordinate_of(&self, slot_index: usize) -> Coordinate {
        Coordinate::new((slot_index / self.cols) as i32, (slot_index % self.cols) as i32)
    }

    /// The piece occupying `coord`, or `None` for empty or out-of-bounds cells.
    #[inline]
    pub fn piece_at(&self, coord: Coordinate) -> Option<PieceId> {
        if !self.in_bounds(coord) {
            return None;
        }
        self.slots[self.slot_index(coord)]
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// All piece ids in creation (solved row-major) order.
    pub fn piece_ids(&self) -> impl Iterator<Item = PieceId> + '_ {
        (0..self.pieces.len() as u32).map(PieceId)
    }

    /// Whether the neighbor one step in `dir` is correctly joined to the
    /// piece at `coord`: the neighbor exists and its solved cell is exactly
    /// one step in `dir` from this piece's solved cell.
    ///
    /// Out-of-bounds neighbors and empty cells count as not joined. The
    /// relation is symmetric: if A is joined to B rightward, B is joined to
    /// A leftward.
    pub fn correctly_adjacent(&self, coord: Coordinate, dir: Direction) -> bool {
        let Some(piece) = self.piece_at(coord) else {
            return false;
        };
        let Some(neighbor) = self.piece_at(coord + dir.offset()) else {
            return false;
        };
        self.piece(neighbor).solved() == self.piece(piece).solved() + dir.offset()
    }

    /// The 4-bit joined-edge mask for the piece at `coord`.
    ///
    /// Empty cells report an empty mask. Pure function of board state;
    /// recomputing for unaffected cells is harmless.
    pub fn joined_mask(&self, coord: Coordinate) -> JoinedMask {
        let mut mask = JoinedMask::EMPTY;
        if self.piece_at(coord).is_none() {
            return mask;
        }
        for dir in Direction::ALL {
            if self.correctly_adjacent(coord, dir) {
                mask.set(dir);
            }
        }
        mask
    }

    /// Joined masks for the whole board, one entry per occupied cell.
    pub fn joined_masks(&self) -> Vec<(PieceId, JoinedMask)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                slot.map(|id| (id, self.joined_mask(self.coordinate_of(idx))))
            })
            .collect()
    }

    /// True iff every cell is occupied by its solved piece.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().enumerate().all(|(idx, slot)| match slot {
            Some(id) => self.pieces[id.index()].solved() == self.coordinate_of(idx),
            None => false,
        })
    }

    /// Atomically applies a validated set of relocations.
    ///
    /// Builds a fresh slot table, clears every moved piece's old cell, places
    /// each piece at its new cell, then swaps the table in and rewrites the
    /// coordinate projection. The resolver has already checked bounds and
    /// injectivity; this step cannot fail partway.
    pub(crate) fn apply_relocations(&mut self, relocations: &[(PieceId, Coordinate)]) {
        let mut new_slots = self.slots.clone();

        for &(id, _) in relocations {
            let old = self.pieces[id.index()].current;
            let idx = self.slot_index(old);
            if new_slots[idx] == Some(id) {
                new_slots[idx] = None;
            }
        }
        for &(id, to) in relocations {
            let idx = self.slot_index(to);
            debug_assert!(new_slots[idx].is_none(), "relocation target {to} still occupied");
            new_slots[idx] = Some(id);
        }

        self.slots = new_slots;
        for &(id, to) in relocations {
            self.pieces[id.index()].current = to;
        }
        self.debug_validate();
    }

    /// Asserts the occupancy bijection in debug builds.
    ///
    /// An aliasing or desync violation is a programming defect, not a
    /// runtime condition; it panics rather than being silently corrected.
    pub(crate) fn debug_validate(&self) {
        if cfg!(debug_assertions) {
            let mut seen = vec![false; self.pieces.len()];
            for (idx, slot) in self.slots.iter().enumerate() {
                if let Some(id) = slot {
                    assert!(
                        !seen[id.index()],
                        "occupancy aliasing: {id} appears in two cells"
                    );
                    seen[id.index()] = true;
                    assert_eq!(
                        self.pieces[id.index()].current,
                        self.coordinate_of(idx),
                        "occupancy desync: {id} disagrees with its cell"
                    );
                }
            }
        }
    }

    /// Formats the board as one character per cell, row-major.
    ///
    /// Each occupied cell shows the solved index of its piece: digits, then
    /// uppercase letters for indices >= 10, '?' beyond 36. Empty cells show
    /// as '.'. A solved board therefore reads 0, 1, 2, ... in order.
    pub fn format(&self) -> String {
        let mut output = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.slots[row * self.cols + col];
                let display_char = match cell {
                    None => '.',
                    Some(id) => {
                        let solved = self.pieces[id.index()].solved();
                        let n = solved.row as usize * self.cols + solved.col as usize;
                        if n < 10 {
                            char::from(b'0' + n as u8)
                        } else if n < 36 {
                            char::from(b'A' + (n - 10) as u8)
                        } else {
                            '?'
                        }
                    }
                };
                output.push(display_char);
            }
            output.push('\n');
        }
        output
    }
}
