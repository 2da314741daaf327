//! Cluster detection: the maximal group of correctly joined pieces.
//!
//! A cluster is derived on demand from current board state and never stored.
//! Breadth-first traversal from a seed piece follows edges where the
//! neighbor's solved cell matches the expected solved-layout offset.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::coord::Direction;
use crate::piece::PieceId;

/// Collects the cluster containing `seed`.
///
/// The result always contains at least the seed and is returned in BFS
/// discovery order, which is deterministic for a given board state.
/// Out-of-bounds neighbors and empty cells are simply not edges.
pub fn build_cluster(board: &Board, seed: PieceId) -> Vec<PieceId> {
    let mut cluster = Vec::new();
    let mut visited: FxHashSet<PieceId> = FxHashSet::default();
    let mut queue = VecDeque::new();

    visited.insert(seed);
    queue.push_back(seed);

    while let Some(id) = queue.pop_front() {
        cluster.push(id);

        let coord = board.piece(id).current();
        for dir in Direction::ALL {
            if !board.correctly_adjacent(coord, dir) {
                continue;
            }
            // correctly_adjacent already proved the neighbor exists
            let neighbor = board
                .piece_at(coord + dir.offset())
                .expect("joined edge without a neighbor");
            if visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }

    cluster
}
