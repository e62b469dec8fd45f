//! Whole-board scenarios from spec.md §8's "Concrete scenarios" and
//! "Boundary behaviors" lists, run through the public `Engine` entry point
//! rather than the individual cascade-step helpers those are already
//! covered by in `orchestrator.rs`'s inline tests.

use std::time::Duration;

use gomoku_core::{Board, Player};
use gomoku_engine::{Engine, EngineConfig};

fn fast_engine() -> Engine {
    Engine::new(EngineConfig {
        response_deadline: Duration::from_millis(80),
        safety_margin: Duration::from_millis(15),
        pondering_enabled: false,
        ..EngineConfig::default()
    })
}

#[test]
fn empty_board_opens_at_the_center() {
    let mut engine = fast_engine();
    let mut board = Board::new(20, 20).unwrap();
    let mv = engine.get_best_move(&mut board, Player::One);
    assert_eq!(mv, (10, 10));
}

#[test]
fn an_immediate_win_is_taken() {
    let mut engine = fast_engine();
    let mut board = Board::new(20, 20).unwrap();
    for x in 10..14 {
        board.place_stone(x, 10, Player::One).unwrap();
    }
    let mv = engine.get_best_move(&mut board, Player::One);
    assert!(mv == (9, 10) || mv == (14, 10));
}

#[test]
fn an_opponent_four_with_one_open_end_is_blocked() {
    let mut engine = fast_engine();
    let mut board = Board::new(20, 20).unwrap();
    for x in 10..14 {
        board.place_stone(x, 10, Player::Two).unwrap();
    }
    let mv = engine.get_best_move(&mut board, Player::One);
    assert!(mv == (9, 10) || mv == (14, 10));
}

#[test]
fn an_opponent_split_four_gap_is_filled() {
    let mut engine = fast_engine();
    let mut board = Board::new(20, 20).unwrap();
    for &x in &[10, 11, 13, 14] {
        board.place_stone(x, 10, Player::Two).unwrap();
    }
    let mv = engine.get_best_move(&mut board, Player::One);
    assert_eq!(mv, (12, 10));
}

#[test]
fn our_own_four_preempts_blocking_the_opponents_open_three() {
    let mut engine = fast_engine();
    let mut board = Board::new(20, 20).unwrap();

    for &x in &[8, 9, 10] {
        board.place_stone(x, 14, Player::Two).unwrap();
    }
    for &x in &[5, 6, 7, 8] {
        board.place_stone(x, 5, Player::One).unwrap();
    }
    board.place_stone(9, 5, Player::Two).unwrap();

    let mv = engine.get_best_move(&mut board, Player::One);
    assert_eq!(mv, (4, 5));
}

#[test]
fn an_opponent_split_three_gap_is_filled_vertically() {
    let mut engine = fast_engine();
    let mut board = Board::new(20, 20).unwrap();
    board.place_stone(12, 10, Player::Two).unwrap();
    board.place_stone(12, 11, Player::Two).unwrap();
    board.place_stone(12, 13, Player::Two).unwrap();

    let mv = engine.get_best_move(&mut board, Player::One);
    assert_eq!(mv, (12, 12));
}

#[test]
fn one_opponent_stone_at_center_gets_a_diagonal_adjacent_reply() {
    let mut engine = fast_engine();
    let mut board = Board::new(15, 15).unwrap();
    let (cx, cy) = board.center();
    board.place_stone(cx, cy, Player::Two).unwrap();

    let mv = engine.get_best_move(&mut board, Player::One);
    let (dx, dy) = (mv.0 as i32 - cx as i32, mv.1 as i32 - cy as i32);
    assert_eq!(dx.abs(), 1);
    assert_eq!(dy.abs(), 1);
}

#[test]
fn an_opponent_open_three_is_blocked_on_one_of_its_two_ends() {
    let mut engine = fast_engine();
    let mut board = Board::new(20, 20).unwrap();
    for x in 10..13 {
        board.place_stone(x, 8, Player::Two).unwrap();
    }
    let mv = engine.get_best_move(&mut board, Player::One);
    assert!(mv == (9, 8) || mv == (13, 8));
}

#[test]
fn the_returned_move_is_always_legal() {
    let mut engine = fast_engine();
    let mut board = Board::new(9, 9).unwrap();
    for y in 0..9 {
        for x in 0..9 {
            if (x + y) % 2 == 0 && !(x == 4 && y == 4) {
                board.place_stone(x, y, Player::One).unwrap();
            } else if !(x == 4 && y == 4) {
                board.place_stone(x, y, Player::Two).unwrap();
            }
        }
    }
    let mv = engine.get_best_move(&mut board, Player::One);
    assert!(board.is_empty(mv.0, mv.1));
}
