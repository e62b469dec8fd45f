//! Threat-Space Search (VCT — Victory by Continuous Threats): a DFS that
//! tries to prove a forced win through an uninterrupted chain of threats
//! (spec.md §4.7).

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use gomoku_core::{Board, Move, Player};

use crate::config::{VCT_DEPTH_BOUNDS, VCT_MAX_ATTACKER_MOVES, VCT_MAX_DEFENDER_MOVES};
use crate::evaluator::is_winning_move;
use crate::move_heuristic::score_move;
use crate::threats::{counter::count_threats, scan_board_threats};

/// Iterative deepening over `VCT_DEPTH_BOUNDS` (spec.md §4.7): tries each
/// depth bound in turn, returning the first attacker move proven to force
/// a win, or `None` if no bound proves one before `stop` is set.
pub fn find_forced_win(board: &mut Board, attacker: Player, stop: &AtomicBool) -> Option<Move> {
    for &bound in &VCT_DEPTH_BOUNDS {
        if stop.load(Ordering::Relaxed) {
            return None;
        }
        if let Some(mv) = prove_win(board, attacker, bound, stop) {
            return Some(mv);
        }
    }
    None
}

fn prove_win(board: &mut Board, attacker: Player, depth_remaining: u8, stop: &AtomicBool) -> Option<Move> {
    if stop.load(Ordering::Relaxed) || depth_remaining == 0 {
        return None;
    }

    if let Some(mv) = board.get_valid_moves().into_iter().find(|&m| is_winning_move(board, m, attacker)) {
        return Some(mv);
    }

    for mv in attacker_threat_moves(board, attacker) {
        let (x, y) = mv;
        board.place_stone(x, y, attacker).expect("candidate move must be legal");
        let forced = defender_must_lose(board, attacker, depth_remaining - 1, stop);
        board.undo_stone(x, y, attacker).expect("place/undo must be paired");

        if forced {
            return Some(mv);
        }
    }

    None
}

/// `true` iff every legal defender response still leaves the attacker with
/// a forced win (spec.md §4.7's defender-node terminal conditions).
fn defender_must_lose(board: &mut Board, attacker: Player, depth_remaining: u8, stop: &AtomicBool) -> bool {
    if stop.load(Ordering::Relaxed) {
        return false;
    }

    let defender = attacker.opponent();
    let winning_replies: Vec<Move> =
        board.get_valid_moves().into_iter().filter(|&m| is_winning_move(board, m, attacker)).collect();

    if winning_replies.len() >= 2 {
        return true;
    }

    let defenses = defender_candidate_moves(board, attacker, winning_replies.first().copied());
    if defenses.is_empty() {
        return true;
    }

    for dm in defenses {
        let (x, y) = dm;
        board.place_stone(x, y, defender).expect("candidate move must be legal");
        let attacker_still_wins = prove_win(board, attacker, depth_remaining, stop).is_some();
        board.undo_stone(x, y, defender).expect("place/undo must be paired");

        if !attacker_still_wins {
            return false;
        }
    }

    true
}

/// Up to [`VCT_MAX_ATTACKER_MOVES`] moves that create a four or an open
/// three for `attacker`, ranked by the move heuristic.
fn attacker_threat_moves(board: &mut Board, attacker: Player) -> Vec<Move> {
    let defender_threats = scan_board_threats(board, attacker.opponent());
    let candidates = board.get_valid_moves();

    let mut scored: Vec<(i64, Move)> = candidates
        .into_iter()
        .filter(|&m| creates_a_threat(board, m, attacker))
        .map(|m| (score_move(board, &defender_threats, m, attacker), m))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(VCT_MAX_ATTACKER_MOVES);
    scored.into_iter().map(|(_, m)| m).collect()
}

fn creates_a_threat(board: &mut Board, m: Move, player: Player) -> bool {
    let (x, y) = m;
    board.place_stone(x, y, player).expect("candidate move must be legal");
    let counts = count_threats(board, x, y, player);
    board.undo_stone(x, y, player).expect("place/undo must be paired");
    counts.open_fours + counts.closed_fours > 0 || counts.open_threes > 0
}

/// Up to [`VCT_MAX_DEFENDER_MOVES`] candidate defenses: the forced block of
/// a lone winning reply (if any), every cell that neutralizes one of the
/// attacker's current threats, and every move that creates a counter-four.
fn defender_candidate_moves(board: &mut Board, attacker: Player, forced_block: Option<Move>) -> Vec<Move> {
    let defender = attacker.opponent();
    let report = scan_board_threats(board, attacker);
    let mut moves = HashSet::new();

    if let Some(block) = forced_block {
        moves.insert(block);
    }
    for record in report.fours.iter().chain(report.open_threes.iter()).chain(report.split_threes.iter()) {
        if let Some(gap) = record.gap {
            moves.insert(gap);
        }
        moves.extend(record.blocks.iter().copied());
    }
    for m in board.get_valid_moves() {
        if creates_a_threat(board, m, defender) {
            moves.insert(m);
        }
    }

    let mut ranked: Vec<(i64, Move)> =
        moves.into_iter().map(|m| (score_move(board, &report, m, defender), m)).collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.truncate(VCT_MAX_DEFENDER_MOVES);
    ranked.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn finds_an_immediate_win_at_depth_one() {
        let mut board = Board::new(12, 12).unwrap();
        for x in 2..6 {
            board.place_stone(x, 5, Player::One).unwrap();
        }
        let stop = AtomicBool::new(false);
        let mv = find_forced_win(&mut board, Player::One, &stop);
        assert!(mv == Some((6, 5)) || mv == Some((1, 5)));
    }

    #[test]
    fn no_forced_win_on_an_empty_board() {
        let mut board = Board::new(12, 12).unwrap();
        let stop = AtomicBool::new(false);
        assert_eq!(find_forced_win(&mut board, Player::One, &stop), None);
    }
}
