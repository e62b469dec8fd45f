//! Board representation, Zobrist hashing, and the Pattern Catalog for a
//! Gomoku (five-in-a-row) engine. No search logic lives here — see
//! `gomoku-engine` for evaluation, threat detection, and the decision core
//! built on top of this crate.

mod board;
mod error;
mod patterns;
mod player;

pub use board::{
    Board, LineWindow, Move, DEFAULT_BOARD_SIZE, DEFAULT_MOVE_RADIUS, DIRECTIONS, EVAL_DIRTY_RADIUS,
    WIN_LENGTH,
};
pub use error::BoardError;
pub use patterns::{catalog_for, PatternSet};
pub use player::Player;
