//! Opening Book (spec.md §4.9): a pre-computed table of center-relative
//! stone patterns mapped to a response, consulted while the board still has
//! few enough stones on it.
//!
//! Grounded on two sources: `shakmat-engine`'s `polyglot::OpeningBook` for the
//! "hash the position, look up a move" shape (its `FxHashMap<u64, ...>`
//! keying is replaced here with a symmetry-normalized stone set, since this
//! book is hand-built rather than loaded from a binary corpus), and the
//! original system's `game/opening_book.py`, whose seed patterns and
//! 8-element dihedral symmetry group this module reproduces in Rust.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use gomoku_core::{Board, Move, Player};

/// A stone relative to the board's center, labelled `1` for the side to
/// move and `2` for its opponent — this is what makes one seed pattern
/// reusable regardless of which literal player is on move.
type Offset = (i32, i32, u8);
type Key = BTreeSet<Offset>;

type Transform = fn(i32, i32) -> (i32, i32);

const TRANSFORMS: [Transform; 8] = [
    |x, y| (x, y),
    |x, y| (y, -x),
    |x, y| (-x, -y),
    |x, y| (-y, x),
    |x, y| (-x, y),
    |x, y| (x, -y),
    |x, y| (y, x),
    |x, y| (-y, -x),
];

static BOOK: Lazy<FxHashMap<Key, (i32, i32)>> = Lazy::new(build_book);

/// Looks up `board`'s current position (from `to_move`'s perspective). Only
/// ever called while the stone count is at or under
/// [`crate::config::EngineConfig::opening_book_max_moves`] (spec.md §4.11
/// step 2).
pub fn lookup(board: &Board, to_move: Player) -> Option<Move> {
    let (cx, cy) = center(board);
    let key: Key = board_offsets(board, to_move, cx, cy);

    let (dx, dy) = *BOOK.get(&key)?;
    let (mx, my) = (cx + dx, cy + dy);
    if mx < 0 || my < 0 {
        return None;
    }
    let (mx, my) = (mx as u16, my as u16);
    if !board.in_bounds(mx, my) || board.get(mx, my).is_some() {
        return None;
    }
    Some((mx, my))
}

fn center(board: &Board) -> (i32, i32) {
    let (cx, cy) = board.center();
    (cx as i32, cy as i32)
}

fn board_offsets(board: &Board, to_move: Player, cx: i32, cy: i32) -> Key {
    let mut offsets = BTreeSet::new();
    for y in 0..board.height() {
        for x in 0..board.width() {
            if let Some(player) = board.get(x, y) {
                let label = if player == to_move { 1 } else { 2 };
                offsets.insert((x as i32 - cx, y as i32 - cy, label));
            }
        }
    }
    offsets
}

fn build_book() -> FxHashMap<Key, (i32, i32)> {
    let mut book = FxHashMap::default();

    // Empty board: take the center.
    add_with_symmetry(&mut book, &[], (0, 0));

    // Opponent took the center: reply on a diagonal.
    add_with_symmetry(&mut book, &[(0, 0, 2)], (1, 1));

    let axes: [(i32, i32); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

    // We hold the center, opponent adjacent: extend the opposite way.
    for &(dx, dy) in &axes {
        add_with_symmetry(&mut book, &[(0, 0, 1), (dx, dy, 2)], (-dx, -dy));
    }

    // We hold the center, opponent further out: extend toward them.
    for dist in [2, 3] {
        for &(dx, dy) in &axes {
            add_with_symmetry(&mut book, &[(0, 0, 1), (dx * dist, dy * dist, 2)], (dx, dy));
        }
    }

    // We already have two in a row: extend the line, or extend the other way.
    for &(dx, dy) in &axes {
        add_with_symmetry(&mut book, &[(0, 0, 1), (dx, dy, 1), (-dx, -dy, 2)], (2 * dx, 2 * dy));
        add_with_symmetry(&mut book, &[(0, 0, 1), (dx, dy, 1), (2 * dx, 2 * dy, 2)], (-dx, -dy));
    }

    // Opponent is building a line two away: wedge between it and us.
    for &(dx, dy) in &axes {
        add_with_symmetry(&mut book, &[(0, 0, 1), (2 * dx, 2 * dy, 2), (3 * dx, 3 * dy, 2)], (dx, dy));
    }

    // Knight's-move replies to an off-axis opponent stone.
    add_with_symmetry(&mut book, &[(0, 0, 1), (2, 1, 2)], (1, 1));
    add_with_symmetry(&mut book, &[(0, 0, 1), (1, 2, 2)], (1, 1));

    book
}

fn add_with_symmetry(book: &mut FxHashMap<Key, (i32, i32)>, stones: &[Offset], response: (i32, i32)) {
    for transform in TRANSFORMS {
        let key: Key = stones.iter().map(|&(x, y, p)| {
            let (tx, ty) = transform(x, y);
            (tx, ty, p)
        }).collect();
        book.insert(key, transform(response.0, response.1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_opens_at_the_center() {
        let board = Board::new(15, 15).unwrap();
        let mv = lookup(&board, Player::One).unwrap();
        assert_eq!(mv, (7, 7));
    }

    #[test]
    fn reply_is_symmetric_regardless_of_who_is_to_move() {
        let mut board = Board::new(15, 15).unwrap();
        board.place_stone(7, 7, Player::Two).unwrap();
        let mv = lookup(&board, Player::One).unwrap();
        assert_eq!(mv, (8, 8));
    }

    #[test]
    fn rotated_position_yields_rotated_response() {
        let mut a = Board::new(15, 15).unwrap();
        a.place_stone(7, 7, Player::One).unwrap();
        a.place_stone(8, 7, Player::Two).unwrap();
        let reply_a = lookup(&a, Player::One).unwrap();

        let mut b = Board::new(15, 15).unwrap();
        b.place_stone(7, 7, Player::One).unwrap();
        b.place_stone(7, 8, Player::Two).unwrap();
        let reply_b = lookup(&b, Player::One).unwrap();

        assert_eq!(reply_a, (6, 7));
        assert_eq!(reply_b, (7, 6));
    }

    #[test]
    fn no_entry_once_the_position_drifts_from_the_book() {
        let mut board = Board::new(15, 15).unwrap();
        board.place_stone(2, 2, Player::One).unwrap();
        board.place_stone(12, 12, Player::Two).unwrap();
        assert_eq!(lookup(&board, Player::One), None);
    }
}
