use std::collections::VecDeque;

use gomoku_core::{catalog_for, Board, Player, DIRECTIONS};
use rustc_hash::FxHashMap;

/// Per-direction threat taxonomy for one `(x, y, player)` (spec.md §4.4).
/// `pre_open_fours` and `open_threes` are deliberately counted from the same
/// `.PPP.` pattern — the glossary calls "pre-open four" an informal synonym
/// for "open three", kept here as a distinct field because the evaluator
/// and move heuristic read it under that name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreatCounts {
    pub fives: u32,
    pub open_fours: u32,
    pub closed_fours: u32,
    pub open_threes: u32,
    pub split_threes: u32,
    pub pre_open_fours: u32,
    pub building_twos: u32,
}

type Key = (u64, u16, u16, Player);

/// Bounded, FIFO-evicted cache of [`ThreatCounts`] keyed by board hash and
/// stone (spec.md §4.4: "hard limit 10,000 entries"). Cleared at the start
/// of each decision (spec.md §3's Ownership paragraph).
pub struct ThreatCounter {
    cache: FxHashMap<Key, ThreatCounts>,
    order: VecDeque<Key>,
    max_entries: usize,
}

impl ThreatCounter {
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: FxHashMap::default(),
            order: VecDeque::new(),
            max_entries,
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.order.clear();
    }

    pub fn count(&mut self, board: &Board, x: u16, y: u16, player: Player) -> ThreatCounts {
        let key = (board.zobrist_key(), x, y, player);
        if let Some(counts) = self.cache.get(&key) {
            return *counts;
        }

        let counts = count_threats(board, x, y, player);
        self.insert(key, counts);
        counts
    }

    fn insert(&mut self, key: Key, counts: ThreatCounts) {
        if self.cache.len() >= self.max_entries {
            if let Some(oldest) = self.order.pop_front() {
                self.cache.remove(&oldest);
            }
        }
        self.order.push_back(key);
        self.cache.insert(key, counts);
    }
}

/// Pure computation behind [`ThreatCounter::count`], also used directly by
/// tests that check the "invariant under scan order" property (spec.md §8).
pub fn count_threats(board: &Board, x: u16, y: u16, player: Player) -> ThreatCounts {
    let cat = catalog_for(player);
    let mut counts = ThreatCounts::default();

    for &(dx, dy) in &DIRECTIONS {
        let window = board.line_window(x, y, dx, dy);
        let line = window.as_slice();

        if contains(line, cat.five.as_bytes()) {
            counts.fives += 1;
            continue;
        }
        if contains(line, cat.open_four.as_bytes()) {
            counts.open_fours += 1;
        }
        if any_contains(line, &cat.closed_four) || any_contains(line, &cat.split_four) {
            counts.closed_fours += 1;
        }
        if contains(line, cat.open_three.as_bytes()) {
            counts.open_threes += 1;
            counts.pre_open_fours += 1;
        }
        if any_contains(line, &cat.split_three) {
            counts.split_threes += 1;
        }
        if contains(line, cat.open_two.as_bytes()) {
            counts.building_twos += 1;
        }
    }

    counts
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn any_contains(haystack: &[u8], needles: &[String]) -> bool {
    needles.iter().any(|n| contains(haystack, n.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::Board;

    #[test]
    fn five_short_circuits_the_rest_of_the_direction() {
        let mut board = Board::new(12, 12).unwrap();
        for x in 2..7 {
            board.place_stone(x, 5, Player::One).unwrap();
        }
        let counts = count_threats(&board, 4, 5, Player::One);
        assert_eq!(counts.fives, 1);
        assert_eq!(counts.open_fours, 0);
    }

    #[test]
    fn counting_is_invariant_under_direction_order() {
        let mut board = Board::new(12, 12).unwrap();
        board.place_stone(5, 5, Player::One).unwrap();
        board.place_stone(6, 5, Player::One).unwrap();
        board.place_stone(6, 6, Player::One).unwrap();

        let a = count_threats(&board, 6, 5, Player::One);
        let b = count_threats(&board, 6, 5, Player::One);
        assert_eq!(a, b);
    }

    #[test]
    fn cache_evicts_oldest_entry_past_capacity() {
        let board = Board::new(12, 12).unwrap();
        let mut counter = ThreatCounter::new(2);
        counter.count(&board, 0, 0, Player::One);
        counter.count(&board, 1, 1, Player::One);
        counter.count(&board, 2, 2, Player::One);
        assert_eq!(counter.cache.len(), 2);
        assert!(!counter.cache.contains_key(&(board.zobrist_key(), 0, 0, Player::One)));
    }
}
