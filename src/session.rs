//! Gesture-driven play session.
//!
//! The session serializes the three gesture callbacks the platform delivers:
//! gesture-start snapshots the cluster and its coordinates, gesture-move is
//! presentation-only feedback and never reaches the board, and gesture-end
//! runs the move resolver exactly once. Only one drag may be active at a
//! time.
//!
//! Side effects (audio, animation triggers, progress saves) go through the
//! injected [`Effects`] trait; the engine itself never touches them.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::board::Board;
use crate::cluster::build_cluster;
use crate::coord::Coordinate;
use crate::levels;
use crate::piece::PieceId;
use crate::resolver::{move_cluster, CommittedMove, MoveRejected};

/// Receiver for gameplay side effects.
///
/// Implementations live outside the engine (console output, audio, tween
/// kickoff, progress persistence). Default methods do nothing so callers
/// implement only what they need.
pub trait Effects {
    fn move_committed(&mut self, _mv: &CommittedMove) {}
    fn move_rejected(&mut self, _rejection: &MoveRejected) {}
    fn level_completed(&mut self, _level: u32) {}
}

/// An [`Effects`] sink that ignores everything. Handy in tests.
pub struct NoEffects;

impl Effects for NoEffects {}

/// Why a gesture was refused before it reached the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GestureError {
    /// A drag is already active; a new gesture-start is not accepted until
    /// the previous gesture commits or cancels.
    #[error("a drag is already in progress")]
    DragInProgress,
    /// gesture-end or cancel arrived without a preceding gesture-start.
    #[error("no drag is in progress")]
    NoActiveDrag,
    /// gesture-start hit a cell with no piece in it.
    #[error("no piece at {0}")]
    EmptyCell(Coordinate),
    /// The resolver discarded the move.
    #[error(transparent)]
    Rejected(#[from] MoveRejected),
}

/// Snapshots the current coordinate of every cluster member.
///
/// Taken once at gesture-start; the resolver works from this snapshot so a
/// commit is insensitive to anything presentation does during the drag.
pub fn snapshot_coords(board: &Board, cluster: &[PieceId]) -> FxHashMap<PieceId, Coordinate> {
    cluster
        .iter()
        .map(|&id| (id, board.piece(id).current()))
        .collect()
}

struct DragState {
    cluster: Vec<PieceId>,
    start_coords: FxHashMap<PieceId, Coordinate>,
    anchor: PieceId,
}

/// One level's worth of play: a shuffled board plus gesture state.
///
/// The board and its pieces live exactly as long as the session; restarting
/// a level means building a new session.
pub struct Session {
    board: Board,
    level: u32,
    drag: Option<DragState>,
    completed: bool,
}

impl Session {
    /// Builds the board for `level` and shuffles it with the given seed.
    ///
    /// The same (level, seed) pair always produces the same starting layout.
    pub fn new(level: u32, seed: u64) -> Self {
        let (rows, cols) = levels::dimensions(level);
        let mut board = Board::new(rows, cols);
        let mut rng = SmallRng::seed_from_u64(seed);
        board.shuffle(&mut rng);

        Self {
            board,
            level,
            drag: None,
            completed: false,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Whether the completion event has fired for this session.
    #[inline]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// gesture-start: picks up the cluster under `cell`.
    ///
    /// Returns the cluster so presentation can raise it above the board.
    pub fn begin_drag(&mut self, cell: Coordinate) -> Result<&[PieceId], GestureError> {
        if self.drag.is_some() {
            return Err(GestureError::DragInProgress);
        }
        let anchor = self
            .board
            .piece_at(cell)
            .ok_or(GestureError::EmptyCell(cell))?;

        let cluster = build_cluster(&self.board, anchor);
        let start_coords = snapshot_coords(&self.board, &cluster);
        self.drag = Some(DragState {
            cluster,
            start_coords,
            anchor,
        });

        Ok(&self.drag.as_ref().unwrap().cluster)
    }

    /// Abandons the active drag; presentation snaps visuals back itself.
    pub fn cancel_drag(&mut self) -> Result<(), GestureError> {
        self.drag.take().map(|_| ()).ok_or(GestureError::NoActiveDrag)
    }

    /// gesture-end: drops the dragged cluster with its anchor on `target`.
    ///
    /// The drag ends whether or not the move commits; a rejected move means
    /// the caller restores visuals to their pre-drag positions. The first
    /// move that solves the board fires `level_completed` exactly once.
    pub fn end_drag(
        &mut self,
        target: Coordinate,
        effects: &mut dyn Effects,
    ) -> Result<CommittedMove, GestureError> {
        let drag = self.drag.take().ok_or(GestureError::NoActiveDrag)?;

        match move_cluster(
            &mut self.board,
            &drag.cluster,
            &drag.start_coords,
            drag.anchor,
            target,
        ) {
            Ok(mv) => {
                effects.move_committed(&mv);
                if mv.completed && !self.completed {
                    self.completed = true;
                    effects.level_completed(self.level);
                }
                Ok(mv)
            }
            Err(rejection) => {
                effects.move_rejected(&rejection);
                Err(rejection.into())
            }
        }
    }
}
