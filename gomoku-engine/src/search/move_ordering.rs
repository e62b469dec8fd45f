use gomoku_core::{Move, Player};

use super::history::HistoryTable;
use super::killers::KillerTable;

pub type MoveScore = i64;

const TT_MOVE: MoveScore = MoveScore::MAX;
const PRIMARY_KILLER: MoveScore = MoveScore::MAX - 1;
const SECONDARY_KILLER: MoveScore = MoveScore::MAX - 2;

/// Orders `moves` for negamax: TT best move first, then killers for this
/// depth, then descending history score (spec.md §4.8).
pub fn order_moves(
    moves: Vec<Move>,
    tt_move: Option<Move>,
    depth: u8,
    killers: &KillerTable,
    history: &HistoryTable,
    player: Player,
) -> Vec<Move> {
    let killer_slots = killers.at(depth);
    let mut rated: Vec<(MoveScore, Move)> = moves
        .into_iter()
        .map(|mv| {
            let score = if tt_move == Some(mv) {
                TT_MOVE
            } else if killer_slots[0] == Some(mv) {
                PRIMARY_KILLER
            } else if killer_slots[1] == Some(mv) {
                SECONDARY_KILLER
            } else {
                history.get_value(player, mv)
            };
            (score, mv)
        })
        .collect();
    rated.sort_by(|a, b| b.0.cmp(&a.0));
    rated.into_iter().map(|(_, mv)| mv).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tt_move_always_sorts_first() {
        let killers = KillerTable::new(4);
        let history = HistoryTable::new();
        let moves = vec![(0, 0), (1, 1), (2, 2)];
        let ordered = order_moves(moves, Some((2, 2)), 1, &killers, &history, Player::One);
        assert_eq!(ordered[0], (2, 2));
    }

    #[test]
    fn killer_sorts_before_unrated_history() {
        let mut killers = KillerTable::new(4);
        killers.record(2, (1, 1));
        let history = HistoryTable::new();
        let moves = vec![(0, 0), (1, 1)];
        let ordered = order_moves(moves, None, 2, &killers, &history, Player::One);
        assert_eq!(ordered[0], (1, 1));
    }
}
