//! Move resolution: validate-then-commit cluster relocation.
//!
//! A drag gesture asks for a whole cluster to translate by the delta between
//! the anchor piece's start cell and the drop cell. The resolver validates
//! bounds, bumps any non-cluster occupants of the target cells into the
//! cells the cluster vacates, and commits everything in one atomic step.
//! Any rejection leaves the board bit-for-bit unchanged.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::board::Board;
use crate::coord::Coordinate;
use crate::piece::{JoinedMask, PieceId};

/// Why a requested move was discarded.
///
/// These are rejections, not faults: the board is always left in a valid
/// state and the user simply re-attempts a different gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    /// The translation would carry a cluster member off the board.
    #[error("{piece} would land out of bounds at {target}")]
    OutOfBounds { piece: PieceId, target: Coordinate },
    /// More occupants were bumped than the cluster freed cells for.
    #[error("not enough freed cells: {displaced} displaced, {freed} freed")]
    InsufficientSpace { displaced: usize, freed: usize },
    /// Two pieces resolved to the same destination cell. Should be
    /// unreachable given the earlier checks; guards algorithm changes.
    #[error("two pieces resolved to the same cell {cell}")]
    DestinationConflict { cell: Coordinate },
    /// A cluster member (or the anchor) was missing from the start-coordinate
    /// snapshot. Caller contract violation.
    #[error("{piece} has no entry in the drag start snapshot")]
    MissingCoordinate { piece: PieceId },
}

/// The outcome of a successfully committed move.
#[derive(Clone, Debug)]
pub struct CommittedMove {
    /// Final cell of every piece that moved: cluster members first (in
    /// cluster order), then displaced pieces.
    pub relocations: Vec<(PieceId, Coordinate)>,
    /// Non-cluster pieces that were bumped into freed cells.
    pub displaced: Vec<PieceId>,
    /// Joined-edge masks for the whole board after the commit, for
    /// presentation to refresh borders and corners.
    pub joined: Vec<(PieceId, JoinedMask)>,
    /// Whether the board is solved after this move.
    pub completed: bool,
}

/// Attempts to relocate `cluster` so that `anchor` lands on `target_anchor`.
///
/// `start_coords` is the coordinate snapshot taken at gesture-start; it must
/// contain every cluster member. Displacement is deterministic: displaced
/// pieces keep the order in which their cells are first hit while walking
/// the cluster in input order, and freed cells are assigned in row-major
/// order.
pub fn move_cluster(
    board: &mut Board,
    cluster: &[PieceId],
    start_coords: &FxHashMap<PieceId, Coordinate>,
    anchor: PieceId,
    target_anchor: Coordinate,
) -> Result<CommittedMove, MoveRejected> {
    let start_anchor = *start_coords
        .get(&anchor)
        .ok_or(MoveRejected::MissingCoordinate { piece: anchor })?;
    let delta = target_anchor - start_anchor;

    let cluster_set: FxHashSet<PieceId> = cluster.iter().copied().collect();

    // target cell per cluster member, with bounds check
    let mut targets = Vec::with_capacity(cluster.len());
    for &piece in cluster {
        let from = *start_coords
            .get(&piece)
            .ok_or(MoveRejected::MissingCoordinate { piece })?;
        let to = from + delta;
        if !board.in_bounds(to) {
            return Err(MoveRejected::OutOfBounds { piece, target: to });
        }
        targets.push((piece, to));
    }

    // occupants the cluster lands on, in first-encounter order
    let mut displaced: Vec<PieceId> = Vec::new();
    for &(_, to) in &targets {
        if let Some(occupant) = board.piece_at(to) {
            if !cluster_set.contains(&occupant) && !displaced.contains(&occupant) {
                displaced.push(occupant);
            }
        }
    }

    // cells the cluster vacates and does not reclaim, row-major
    let target_cells: FxHashSet<Coordinate> = targets.iter().map(|&(_, to)| to).collect();
    let mut freed: Vec<Coordinate> = cluster
        .iter()
        .map(|piece| start_coords[piece])
        .filter(|cell| !target_cells.contains(cell))
        .collect();
    freed.sort_unstable();
    freed.dedup();

    if displaced.len() > freed.len() {
        return Err(MoveRejected::InsufficientSpace {
            displaced: displaced.len(),
            freed: freed.len(),
        });
    }

    // complete target map: cluster to targets, displaced into freed cells
    let mut relocations = targets;
    relocations.extend(displaced.iter().copied().zip(freed.into_iter()));

    let mut used_cells: FxHashSet<Coordinate> = FxHashSet::default();
    for &(_, to) in &relocations {
        if !used_cells.insert(to) {
            return Err(MoveRejected::DestinationConflict { cell: to });
        }
    }

    // validation done; nothing below can fail
    board.apply_relocations(&relocations);

    Ok(CommittedMove {
        relocations,
        displaced,
        joined: board.joined_masks(),
        completed: board.is_complete(),
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::cluster::build_cluster;
    use crate::coord::Direction;
    use crate::session::snapshot_coords;

    use super::*;

    fn piece_at(board: &Board, row: i32, col: i32) -> PieceId {
        board.piece_at(Coordinate::new(row, col)).expect("empty cell")
    }

    /// A 3x3 board with the two top-left pieces swapped. Dragging the
    /// misplaced piece home displaces the other into the freed cell and
    /// solves the board.
    #[test]
    fn test_swapped_pair_resolves_to_complete() {
        let mut board = Board::new(3, 3);

        // create the swap: drag the (0,0) piece onto (0,1)
        let a = piece_at(&board, 0, 0);
        let coords = snapshot_coords(&board, &[a]);
        let mv = move_cluster(&mut board, &[a], &coords, a, Coordinate::new(0, 1)).unwrap();
        assert_eq!(mv.displaced.len(), 1);
        assert!(!mv.completed);

        // now undo it through the same path: cluster is just the misplaced
        // piece sitting at (0,1), dropped onto (0,0)
        let misplaced = piece_at(&board, 0, 1);
        let cluster = build_cluster(&board, misplaced);
        assert_eq!(cluster, vec![misplaced]);

        let coords = snapshot_coords(&board, &cluster);
        let mv =
            move_cluster(&mut board, &cluster, &coords, misplaced, Coordinate::new(0, 0)).unwrap();

        assert_eq!(mv.displaced.len(), 1);
        assert!(mv.completed);
        assert!(board.is_complete());

        // every interior edge is joined again
        for (_, mask) in &mv.joined {
            assert!(!mask.is_empty());
        }
    }

    #[test]
    fn test_out_of_bounds_leaves_board_untouched() {
        let mut board = Board::new(3, 3);
        let a = piece_at(&board, 0, 0);
        let coords = snapshot_coords(&board, &[a]);
        move_cluster(&mut board, &[a], &coords, a, Coordinate::new(0, 1)).unwrap();

        // the seven still-solved pieces form one L-shaped cluster that
        // cannot translate anywhere without leaving the board
        let seed = piece_at(&board, 2, 2);
        let cluster = build_cluster(&board, seed);
        assert_eq!(cluster.len(), 7);

        let before = board.clone();
        let coords = snapshot_coords(&board, &cluster);
        let result = move_cluster(&mut board, &cluster, &coords, seed, Coordinate::new(1, 2));
        assert!(matches!(result, Err(MoveRejected::OutOfBounds { .. })));
        assert_eq!(board, before, "rejected move must not touch the board");
    }

    #[test]
    fn test_missing_snapshot_entry_is_rejected() {
        let mut board = Board::new(2, 2);
        let a = piece_at(&board, 0, 0);
        let b = piece_at(&board, 0, 1);

        // snapshot covers only the anchor
        let coords = snapshot_coords(&board, &[a]);
        let before = board.clone();
        let result = move_cluster(&mut board, &[a, b], &coords, a, Coordinate::new(1, 0));
        assert!(matches!(result, Err(MoveRejected::MissingCoordinate { piece }) if piece == b));
        assert_eq!(board, before);
    }

    #[test]
    fn test_stale_snapshot_can_run_out_of_freed_cells() {
        let mut board = Board::new(1, 3);
        let a = piece_at(&board, 0, 0);

        // a stale snapshot claiming the piece already sits on the occupied
        // target leaves the occupant nowhere to go
        let mut coords = FxHashMap::default();
        coords.insert(a, Coordinate::new(0, 2));

        let before = board.clone();
        let result = move_cluster(&mut board, &[a], &coords, a, Coordinate::new(0, 2));
        assert!(matches!(
            result,
            Err(MoveRejected::InsufficientSpace { displaced: 1, freed: 0 })
        ));
        assert_eq!(board, before);
    }

    #[test]
    fn test_duplicate_snapshot_cells_hit_conflict_guard() {
        let mut board = Board::new(2, 2);
        let a = piece_at(&board, 0, 0);
        let b = piece_at(&board, 0, 1);

        // both pieces claim the same start cell, so both resolve to the
        // same target; the defensive injectivity check catches it
        let mut coords = FxHashMap::default();
        coords.insert(a, Coordinate::new(0, 0));
        coords.insert(b, Coordinate::new(0, 0));

        let before = board.clone();
        let result = move_cluster(&mut board, &[a, b], &coords, a, Coordinate::new(1, 0));
        assert!(matches!(result, Err(MoveRejected::DestinationConflict { .. })));
        assert_eq!(board, before);
    }

    #[test]
    fn test_drop_in_place_is_a_no_op_commit() {
        let mut board = Board::new(3, 3);
        let a = piece_at(&board, 1, 1);
        let cluster = build_cluster(&board, a);
        assert_eq!(cluster.len(), 9);

        let before = board.clone();
        let coords = snapshot_coords(&board, &cluster);
        let mv = move_cluster(&mut board, &cluster, &coords, a, Coordinate::new(1, 1)).unwrap();
        assert!(mv.displaced.is_empty());
        assert!(mv.completed);
        assert_eq!(board, before);
    }

    #[test]
    fn test_displaced_assignment_is_deterministic() {
        // 1x4 with the first two pieces swapped: [1, 0, 2, 3]
        let build = || {
            let mut board = Board::new(1, 4);
            let a = piece_at(&board, 0, 0);
            let coords = snapshot_coords(&board, &[a]);
            move_cluster(&mut board, &[a], &coords, a, Coordinate::new(0, 1)).unwrap();
            board
        };

        let run = || {
            let mut board = build();
            // the joined pair [2, 3] slides left by two, bumping both
            // misplaced pieces into the freed cells
            let seed = piece_at(&board, 0, 2);
            let cluster = build_cluster(&board, seed);
            assert_eq!(cluster.len(), 2);
            let coords = snapshot_coords(&board, &cluster);
            move_cluster(&mut board, &cluster, &coords, seed, Coordinate::new(0, 0)).unwrap();
            board.format()
        };

        let first = run();
        assert_eq!(first, run(), "same inputs must produce the same layout");
        // displaced pieces fill freed cells in row-major order
        assert_eq!(first.trim_end(), "2310");
    }

    #[test]
    fn test_random_drag_soak_keeps_invariants() {
        let mut rng = SmallRng::seed_from_u64(0xD1CE);

        for _ in 0..50 {
            let rows = rng.random_range(2..=4);
            let cols = rng.random_range(2..=4);
            let mut board = Board::new(rows, cols);
            board.shuffle(&mut rng);

            for _ in 0..40 {
                let seed_cell = Coordinate::new(
                    rng.random_range(0..rows as i32),
                    rng.random_range(0..cols as i32),
                );
                let seed = board.piece_at(seed_cell).unwrap();
                let cluster = build_cluster(&board, seed);
                let coords = snapshot_coords(&board, &cluster);
                let target = Coordinate::new(
                    rng.random_range(-1..=rows as i32),
                    rng.random_range(-1..=cols as i32),
                );

                let before = board.clone();
                match move_cluster(&mut board, &cluster, &coords, seed, target) {
                    Ok(mv) => {
                        // every occupied cell agrees with its piece
                        for row in 0..rows as i32 {
                            for col in 0..cols as i32 {
                                let cell = Coordinate::new(row, col);
                                let id = board.piece_at(cell).unwrap();
                                assert_eq!(board.piece(id).current(), cell);
                            }
                        }
                        assert_eq!(mv.completed, board.is_complete());
                    }
                    Err(_) => assert_eq!(board, before),
                }
            }
        }
    }

    #[test]
    fn test_committed_masks_match_board_state() {
        let mut board = Board::new(3, 3);
        let mut rng = SmallRng::seed_from_u64(7);
        board.shuffle(&mut rng);

        let seed = board.piece_at(Coordinate::new(0, 0)).unwrap();
        let cluster = build_cluster(&board, seed);
        let coords = snapshot_coords(&board, &cluster);
        if let Ok(mv) = move_cluster(&mut board, &cluster, &coords, seed, Coordinate::new(1, 1)) {
            for &(id, mask) in &mv.joined {
                let cell = board.piece(id).current();
                assert_eq!(mask, board.joined_mask(cell));
                for dir in Direction::ALL {
                    assert_eq!(mask.is_joined(dir), board.correctly_adjacent(cell, dir));
                }
            }
        }
    }
}
