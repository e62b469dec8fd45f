use gomoku_core::{Board, Player};

#[test]
fn same_size_boards_hash_identically_for_identical_histories() {
    let mut a = Board::new(9, 9).unwrap();
    let mut b = Board::new(9, 9).unwrap();

    a.place_stone(4, 4, Player::One).unwrap();
    a.place_stone(5, 5, Player::Two).unwrap();
    b.place_stone(4, 4, Player::One).unwrap();
    b.place_stone(5, 5, Player::Two).unwrap();

    assert_eq!(a.zobrist_key(), b.zobrist_key());
}

#[test]
fn hash_is_order_independent_for_disjoint_moves() {
    let mut a = Board::new(9, 9).unwrap();
    let mut b = Board::new(9, 9).unwrap();

    a.place_stone(1, 1, Player::One).unwrap();
    a.place_stone(2, 2, Player::Two).unwrap();
    b.place_stone(2, 2, Player::Two).unwrap();
    b.place_stone(1, 1, Player::One).unwrap();

    assert_eq!(a.zobrist_key(), b.zobrist_key());
}

#[test]
fn different_board_sizes_use_different_tables() {
    let mut a = Board::new(9, 9).unwrap();
    let mut b = Board::new(13, 13).unwrap();

    a.place_stone(4, 4, Player::One).unwrap();
    b.place_stone(4, 4, Player::One).unwrap();

    assert_ne!(a.zobrist_key(), b.zobrist_key());
}

#[test]
fn empty_board_hash_is_zero() {
    let board = Board::new(9, 9).unwrap();
    assert_eq!(board.zobrist_key(), 0);
}

#[test]
fn same_cell_different_player_hashes_differently() {
    let mut a = Board::new(9, 9).unwrap();
    let mut b = Board::new(9, 9).unwrap();
    a.place_stone(4, 4, Player::One).unwrap();
    b.place_stone(4, 4, Player::Two).unwrap();
    assert_ne!(a.zobrist_key(), b.zobrist_key());
}
