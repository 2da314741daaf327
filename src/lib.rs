//! Sliding-Jigsaw Puzzle Engine
//!
//! A source image is cut into a rows×cols grid of pieces, the pieces start
//! shuffled, and the player drags groups of already-correctly-assembled
//! pieces around the board to reassemble the image. This crate provides the
//! grid consistency and cluster-movement engine: cluster detection over the
//! solved-position adjacency relation, validate-then-commit multi-piece
//! relocation with occupant displacement, completion detection, and the
//! gesture session that serializes drags. Rendering, animation, and input
//! capture stay outside; they talk to the engine through coordinates,
//! joined-edge masks, and the [`session::Effects`] trait.

pub mod board;
pub mod cluster;
pub mod coord;
pub mod geometry;
pub mod levels;
pub mod persistence;
pub mod piece;
pub mod resolver;
pub mod session;

pub use board::Board;
pub use coord::{Coordinate, Direction};
pub use piece::{JoinedMask, Piece, PieceId};
pub use resolver::{move_cluster, CommittedMove, MoveRejected};
pub use session::{Effects, GestureError, NoEffects, Session};
