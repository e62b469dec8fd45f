use gomoku_core::{Move, Player};
use rustc_hash::FxHashMap;

use crate::config::{HISTORY_DECAY_FACTOR, HISTORY_MAX_VALUE};

/// Per-player move -> accumulated beta-cutoff bonus (spec.md §3's History
/// Table). A `HashMap` stands in for the teacher's fixed `[[[_; 64]; 64]; 2]`
/// array, since board size here is a runtime parameter rather than a fixed
/// 8x8 grid.
#[derive(Default)]
pub struct HistoryTable {
    data: FxHashMap<(Player, Move), i64>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_value(&self, player: Player, mv: Move) -> i64 {
        *self.data.get(&(player, mv)).unwrap_or(&0)
    }

    /// Adds `depth^2` on a beta cutoff, capped at `HISTORY_MAX_VALUE`
    /// (spec.md §4.8).
    pub fn add_bonus(&mut self, player: Player, mv: Move, bonus: i64) {
        let entry = self.data.entry((player, mv)).or_insert(0);
        *entry = (*entry + bonus).min(HISTORY_MAX_VALUE);
    }

    /// Decays every entry by `HISTORY_DECAY_FACTOR` (spec.md §4.8: "decayed
    /// by a constant factor at the start of each new decision").
    pub fn decay(&mut self) {
        for value in self.data.values_mut() {
            *value = (*value as f64 * HISTORY_DECAY_FACTOR) as i64;
        }
        self.data.retain(|_, v| *v != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_move_has_zero_history() {
        let table = HistoryTable::new();
        assert_eq!(table.get_value(Player::One, (0, 0)), 0);
    }

    #[test]
    fn bonus_accumulates_and_caps() {
        let mut table = HistoryTable::new();
        table.add_bonus(Player::One, (1, 1), HISTORY_MAX_VALUE);
        table.add_bonus(Player::One, (1, 1), HISTORY_MAX_VALUE);
        assert_eq!(table.get_value(Player::One, (1, 1)), HISTORY_MAX_VALUE);
    }

    #[test]
    fn decay_shrinks_values_towards_zero() {
        let mut table = HistoryTable::new();
        table.add_bonus(Player::One, (2, 2), 1000);
        table.decay();
        assert_eq!(table.get_value(Player::One, (2, 2)), 900);
    }
}
