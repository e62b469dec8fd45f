use gomoku_core::{Board, Move, Player};

use crate::evaluator::{evaluate_hypothetical, is_winning_move};
use crate::threats::{counter::count_threats, ThreatReport};

const UNIT: i64 = 1_000_000_000;

/// The strictly ordered rank ladder from spec.md §4.6, highest first. Rank
/// 6' ("blocks a win, but the opponent still has another winning reply") is
/// its own tier, ranked below a clean block but above every other block —
/// "half as good" in the spec's prose, not a literal arithmetic halving.
///
/// Spec.md's ranks 10 ("blocks pre-open-four") and 12 ("blocks open-three")
/// both name the exact same `.PPP.` shape (the glossary calls pre-open-four
/// an informal synonym for open three); they are collapsed into one tier
/// here since nothing in spec.md distinguishes their on-board effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i64)]
pub enum MoveTag {
    Positional = 0,
    OpenThreePositional = 1,
    SplitThree = 2,
    BlockBuildingTwo = 3,
    BlockSplitThree = 4,
    BlockOpenThree = 5,
    BlockOpenFour = 6,
    BlockFourThree = 7,
    BlockDoubleFour = 8,
    BlockWinStillLosing = 9,
    BlockWin = 10,
    Fork = 11,
    OpenFour = 12,
    FourThree = 13,
    DoubleFour = 14,
    Win = 15,
}

/// Positional score used as the rank-16 fallback and as the tiebreaker
/// within every other tier, capped so it can never cross a tier boundary.
const OPEN_THREE_THRESHOLD: i64 = 5_000;

/// Scores candidate move `m` for `player`, combining the rank ladder tier
/// with a positional tiebreaker (spec.md §4.6). `opponent_threats` is the
/// Global Threat Scanner's report against `player`'s opponent, computed
/// once per decision and shared across every candidate.
pub fn score_move(board: &mut Board, opponent_threats: &ThreatReport, m: Move, player: Player) -> i64 {
    let (x, y) = m;
    let opponent = player.opponent();

    if is_winning_move(board, m, player) {
        return tier_score(MoveTag::Win, 0);
    }

    board.place_stone(x, y, player).expect("candidate move must be legal");
    let own = count_threats(board, x, y, player);
    board.undo_stone(x, y, player).expect("place/undo must be paired");

    let own_fours = own.open_fours + own.closed_fours;
    let positional = evaluate_hypothetical(board, x, y, player);

    if own_fours >= 2 {
        return tier_score(MoveTag::DoubleFour, positional);
    }
    if own_fours >= 1 && own.open_threes >= 1 {
        return tier_score(MoveTag::FourThree, positional);
    }
    if own.open_fours >= 1 {
        return tier_score(MoveTag::OpenFour, positional);
    }
    if own.open_threes >= 2 {
        return tier_score(MoveTag::Fork, positional);
    }

    if is_winning_move(board, m, opponent) {
        board.place_stone(x, y, player).expect("candidate move must be legal");
        let still_losing = opponent_has_a_win(board, opponent);
        board.undo_stone(x, y, player).expect("place/undo must be paired");

        return if still_losing {
            tier_score(MoveTag::BlockWinStillLosing, positional)
        } else {
            tier_score(MoveTag::BlockWin, positional)
        };
    }

    if opponent_threats.any_four_blocked_by(m) {
        let tag = if opponent_threats.fours.len() >= 2 {
            MoveTag::BlockDoubleFour
        } else if !opponent_threats.open_threes.is_empty() {
            MoveTag::BlockFourThree
        } else {
            MoveTag::BlockOpenFour
        };
        return tier_score(tag, positional);
    }
    if opponent_threats.any_open_three_blocked_by(m) {
        return tier_score(MoveTag::BlockOpenThree, positional);
    }
    if opponent_threats.any_split_three_blocked_by(m) {
        return tier_score(MoveTag::BlockSplitThree, positional);
    }
    if opponent_threats.any_building_two_blocked_by(m) {
        return tier_score(MoveTag::BlockBuildingTwo, positional);
    }

    if own.split_threes >= 1 {
        return tier_score(MoveTag::SplitThree, positional);
    }
    if positional >= OPEN_THREE_THRESHOLD {
        return tier_score(MoveTag::OpenThreePositional, positional);
    }

    tier_score(MoveTag::Positional, positional)
}

fn tier_score(tag: MoveTag, positional: i64) -> i64 {
    (tag as i64) * UNIT + positional.clamp(0, UNIT - 1)
}

/// Recovers the `MoveTag` tier (as its raw `i64`) from a score produced by
/// [`score_move`], for callers that only need to threshold on severity
/// (quiescence's tactical floor, the orchestrator's offensive check).
pub fn tier(score: i64) -> i64 {
    score / UNIT
}

/// Whether `player` has any immediately winning move left, used to decide
/// between `BlockWin` and `BlockWinStillLosing` (spec.md §4.6 rank 6/6').
fn opponent_has_a_win(board: &mut Board, player: Player) -> bool {
    board
        .get_valid_moves()
        .into_iter()
        .any(|m| is_winning_move(board, m, player))
}

/// Orders candidates by [`score_move`], descending (best move first).
pub fn order_moves(board: &mut Board, opponent_threats: &ThreatReport, moves: &[Move], player: Player) -> Vec<Move> {
    let mut scored: Vec<(i64, Move)> = moves
        .iter()
        .map(|&m| (score_move(board, opponent_threats, m, player), m))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, m)| m).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threats::scan_board_threats;
    use gomoku_core::Board;

    #[test]
    fn winning_move_outranks_everything() {
        let mut board = Board::new(12, 12).unwrap();
        for x in 2..6 {
            board.place_stone(x, 5, Player::One).unwrap();
        }
        let report = scan_board_threats(&board, Player::Two);
        let win_score = score_move(&mut board, &report, (6, 5), Player::One);
        let other_score = score_move(&mut board, &report, (0, 0), Player::One);
        assert!(win_score > other_score);
        assert!(win_score >= tier_score(MoveTag::Win, 0));
    }

    #[test]
    fn blocking_an_opponent_four_outranks_a_quiet_move() {
        let mut board = Board::new(12, 12).unwrap();
        for x in 2..6 {
            board.place_stone(x, 5, Player::Two).unwrap();
        }
        let report = scan_board_threats(&board, Player::Two);
        let block_score = score_move(&mut board, &report, (6, 5), Player::One);
        let quiet_score = score_move(&mut board, &report, (0, 0), Player::One);
        assert!(block_score > quiet_score);
    }
}
