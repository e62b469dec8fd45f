use std::collections::HashMap;

use gomoku_core::{catalog_for, Board, LineWindow, Move, Player, DIRECTIONS};

const FIVE: i64 = 1_000_000;
const OPEN_FOUR: i64 = 100_000;
const CLOSED_FOUR: i64 = 10_000;
const SPLIT_FOUR: i64 = 15_000;
const OPEN_THREE: i64 = 5_000;
const CLOSED_THREE: i64 = 1_000;
const SPLIT_THREE: i64 = 3_000;
const BROKEN_OPEN_THREE: i64 = 4_000;
const OPEN_TWO: i64 = 300;
const CLOSED_TWO: i64 = 50;

/// Scores one line window for `player`, summing every matched pattern
/// category (spec.md §4.3). Categories are independent and additive; within
/// a category, any matching variant counts once.
pub fn evaluate_line(window: &LineWindow, player: Player) -> i64 {
    let cat = catalog_for(player);
    let line = window.as_slice();
    let mut score = 0;

    if contains(line, cat.five.as_bytes()) {
        return FIVE;
    }
    if contains(line, cat.open_four.as_bytes()) {
        score += OPEN_FOUR;
    }
    if any_contains(line, &cat.closed_four) {
        score += CLOSED_FOUR;
    }
    if any_contains(line, &cat.split_four) {
        score += SPLIT_FOUR;
    }
    if contains(line, cat.open_three.as_bytes()) {
        score += OPEN_THREE;
    }
    if any_contains(line, &cat.closed_three) {
        score += CLOSED_THREE;
    }
    if any_contains(line, &cat.split_three) {
        score += SPLIT_THREE;
    }
    if any_contains(line, &cat.broken_open_three) {
        score += BROKEN_OPEN_THREE;
    }
    if contains(line, cat.open_two.as_bytes()) {
        score += OPEN_TWO;
    }
    if any_contains(line, &cat.closed_two) {
        score += CLOSED_TWO;
    }

    score
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn any_contains(haystack: &[u8], needles: &[String]) -> bool {
    needles.iter().any(|n| contains(haystack, n.as_bytes()))
}

/// Score of a single occupied cell: the sum of `evaluate_line` over all
/// four directions through it (spec.md §4.3).
pub fn evaluate_cell(board: &Board, x: u16, y: u16, player: Player) -> i64 {
    DIRECTIONS
        .iter()
        .map(|&(dx, dy)| evaluate_line(&board.line_window(x, y, dx, dy), player))
        .sum()
}

/// Hypothetical score of placing `player` at an empty `(x, y)`, without
/// mutating the board for longer than the probe (spec.md §4.6's "paired
/// place/undo" discipline for move-heuristic probes).
pub fn evaluate_hypothetical(board: &mut Board, x: u16, y: u16, player: Player) -> i64 {
    board.place_stone(x, y, player).expect("probed cell must be empty and in bounds");
    let score = evaluate_cell(board, x, y, player);
    board.undo_stone(x, y, player).expect("place/undo must be paired");
    score
}

/// Incremental evaluation cache and running per-player totals (spec.md §3,
/// §4.3). Lives outside `Board` since it depends on the Pattern Catalog.
/// `sync` drains `Board::take_dirty` and recomputes exactly the dirtied
/// cells, subtracting each cell's previously cached score before adding the
/// freshly computed one.
#[derive(Default)]
pub struct Evaluator {
    cache: HashMap<(u16, u16, Player), i64>,
    totals: [i64; 2],
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self, player: Player) -> i64 {
        self.totals[player.to_index()]
    }

    /// `ATTACK * total(player) - DEFENSE * total(opponent)` (spec.md §4.3).
    pub fn score(&self, player: Player, attack: f64, defense: f64) -> i64 {
        let own = self.total(player) as f64 * attack;
        let opp = self.total(player.opponent()) as f64 * defense;
        (own - opp) as i64
    }

    /// Recomputes the cache entries for every cell `Board` reports dirty
    /// since the last call, keeping `totals` consistent (spec.md invariant:
    /// "only dirty cells are recomputed").
    pub fn sync(&mut self, board: &mut Board) {
        let dirty = board.take_dirty();
        for (x, y) in dirty {
            self.recompute_cell(board, x, y);
        }
    }

    fn recompute_cell(&mut self, board: &Board, x: u16, y: u16) {
        for player in [Player::One, Player::Two] {
            if let Some(old) = self.cache.remove(&(x, y, player)) {
                self.totals[player.to_index()] -= old;
            }
        }

        if let Some(occupant) = board.get(x, y) {
            let score = evaluate_cell(board, x, y, occupant);
            self.cache.insert((x, y, occupant), score);
            self.totals[occupant.to_index()] += score;
        }
    }

    /// Full non-incremental rescan, used to check the incremental cache
    /// against ground truth (spec.md §8's invariant) and to seed a fresh
    /// engine instance.
    pub fn rescan(&mut self, board: &Board) {
        self.cache.clear();
        self.totals = [0, 0];
        for y in 0..board.height() {
            for x in 0..board.width() {
                if let Some(occupant) = board.get(x, y) {
                    let score = evaluate_cell(board, x, y, occupant);
                    self.cache.insert((x, y, occupant), score);
                    self.totals[occupant.to_index()] += score;
                }
            }
        }
    }
}

/// `true` iff placing `player` at `m` would immediately win (spec.md §4.6
/// rank 1). A thin place/check/undo wrapper around `Board::check_win`.
pub fn is_winning_move(board: &mut Board, m: Move, player: Player) -> bool {
    let (x, y) = m;
    board.place_stone(x, y, player).expect("probed cell must be empty and in bounds");
    let wins = board.check_win(x, y, player);
    board.undo_stone(x, y, player).expect("place/undo must be paired");
    wins
}

#[cfg(test)]
mod tests {
    use super::*;
    use gomoku_core::Board;

    #[test]
    fn five_window_scores_as_five() {
        let window: LineWindow = *b".11111..#";
        assert_eq!(evaluate_line(&window, Player::One), FIVE);
    }

    #[test]
    fn open_four_outscores_closed_four() {
        let open: LineWindow = *b"..1111...";
        let closed_four: LineWindow = *b"21111....";
        assert!(evaluate_line(&open, Player::One) > evaluate_line(&closed_four, Player::One));
    }

    #[test]
    fn sync_matches_rescan_after_several_moves() {
        let mut board = Board::new(12, 12).unwrap();
        board.place_stone(5, 5, Player::One).unwrap();
        board.place_stone(6, 5, Player::Two).unwrap();
        board.place_stone(5, 6, Player::One).unwrap();

        let mut incremental = Evaluator::new();
        incremental.sync(&mut board);

        let mut full = Evaluator::new();
        full.rescan(&board);

        assert_eq!(incremental.total(Player::One), full.total(Player::One));
        assert_eq!(incremental.total(Player::Two), full.total(Player::Two));
    }

    #[test]
    fn place_undo_round_trip_leaves_totals_unchanged() {
        let mut board = Board::new(12, 12).unwrap();
        let mut evaluator = Evaluator::new();
        evaluator.sync(&mut board);
        let before = (evaluator.total(Player::One), evaluator.total(Player::Two));

        board.place_stone(4, 4, Player::One).unwrap();
        evaluator.sync(&mut board);
        board.undo_stone(4, 4, Player::One).unwrap();
        evaluator.sync(&mut board);

        assert_eq!((evaluator.total(Player::One), evaluator.total(Player::Two)), before);
    }
}
