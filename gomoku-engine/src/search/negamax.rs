use std::sync::atomic::{AtomicBool, Ordering};

use gomoku_core::{Board, Move, Player};

use crate::config::{
    EngineConfig, ASPIRATION_DELTA, ASPIRATION_MIN_DEPTH, LMR_FULL_MOVES, LMR_MIN_DEPTH, LMR_REDUCTION,
};
use crate::evaluator::Evaluator;
use crate::threats::{scan_board_threats, ThreatCounter};
use crate::transposition::{Entry, Flag, TranspositionTable};

use super::history::HistoryTable;
use super::killers::KillerTable;
use super::move_ordering::order_moves as order_for_search;
use super::pv_line::PvLine;

const WIN_SCORE: i64 = 10_000_000;
const MATE_MARGIN: i64 = 1_000_000;

/// Bundles every piece of mutable state one decision's search shares across
/// recursive calls — the engine-owned caches (spec.md §3's Ownership
/// paragraph) plus the single board mutated in place via place/undo (spec.md
/// §9: "the engine performs deep search via place/undo ... rather than
/// cloning").
pub struct Search<'a> {
    pub board: &'a mut Board,
    pub evaluator: &'a mut Evaluator,
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub threat_counter: &'a mut ThreatCounter,
    pub config: &'a EngineConfig,
    pub stop: &'a AtomicBool,
    pub age: u32,
    pub nodes: u64,
}

pub struct SearchResult {
    pub score: i64,
    pub best_move: Option<Move>,
    pub depth_reached: u8,
    pub nodes: u64,
}

impl<'a> Search<'a> {
    fn is_stopped(&self) -> bool {
        self.nodes & 0xFFF == 0 && self.stop.load(Ordering::Relaxed)
    }

    fn do_move(&mut self, m: Move, player: Player) {
        let (x, y) = m;
        self.board.place_stone(x, y, player).expect("candidate move must be legal");
        self.evaluator.sync(self.board);
    }

    fn undo_move(&mut self, m: Move, player: Player) {
        let (x, y) = m;
        self.board.undo_stone(x, y, player).expect("place/undo must be paired");
        self.evaluator.sync(self.board);
    }

    /// Iterative deepening driver with aspiration windows (spec.md §4.8,
    /// §4.11 step 9): depths `1..=max_depth`, stopping early on the
    /// cooperative stop flag.
    pub fn search_iterative(&mut self, side: Player, max_depth: u8) -> SearchResult {
        let mut best_move = None;
        let mut score = 0;
        let mut depth_reached = 0;
        let mut alpha = -WIN_SCORE * 2;
        let mut beta = WIN_SCORE * 2;

        let mut depth = 1;
        while depth <= max_depth {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }

            let mut pv = PvLine::new();
            let mut window = (alpha, beta);
            if depth >= ASPIRATION_MIN_DEPTH {
                window = (score - ASPIRATION_DELTA, score + ASPIRATION_DELTA);
            }

            let mut result = self.negamax(depth, 0, window.0, window.1, side, &mut pv);
            if result <= window.0 || result >= window.1 {
                // Aspiration window missed; re-search with the full window.
                pv.clear();
                result = self.negamax(depth, 0, -WIN_SCORE * 2, WIN_SCORE * 2, side, &mut pv);
            }

            if self.stop.load(Ordering::Relaxed) {
                break;
            }

            score = result;
            alpha = score;
            beta = score;
            if let Some(mv) = pv.first() {
                best_move = Some(mv);
            }
            depth_reached = depth;

            log::debug!(
                "negamax depth {depth} score {score} nodes {} best {:?}",
                self.nodes,
                best_move
            );

            if score.abs() >= WIN_SCORE - MATE_MARGIN {
                break;
            }
            depth += 1;
        }

        SearchResult { score, best_move, depth_reached, nodes: self.nodes }
    }

    fn negamax(&mut self, depth: u8, ply: u8, mut alpha: i64, mut beta: i64, side: Player, pv: &mut PvLine) -> i64 {
        self.nodes += 1;
        pv.clear();

        if self.is_stopped() {
            return 0;
        }

        let hash = self.board.zobrist_key();
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(hash) {
            tt_move = entry.best_move;
            if entry.age == self.age && entry.depth >= depth {
                match entry.flag {
                    Flag::Exact => return entry.value,
                    Flag::Lower => alpha = alpha.max(entry.value),
                    Flag::Upper => beta = beta.min(entry.value),
                }
                if alpha >= beta {
                    return entry.value;
                }
            }
        }

        if depth == 0 {
            return super::quiescence::quiescence(self.board, self.evaluator, self.config, side, alpha, beta, 0);
        }

        let candidates = self.board.get_valid_moves();
        if candidates.is_empty() {
            return self.evaluator.score(side, self.config.attack_multiplier, self.config.defense_multiplier);
        }

        let opponent_threats = scan_board_threats(self.board, side.opponent());
        let ordered = order_for_search(candidates, tt_move, ply, self.killers, self.history, side);

        let original_alpha = alpha;
        let mut best_score = -WIN_SCORE * 2;
        let mut best_move = None;
        let mut child_pv = PvLine::new();

        for (index, mv) in ordered.into_iter().enumerate() {
            if crate::evaluator::is_winning_move(self.board, mv, side) {
                self.do_move(mv, side);
                let score = WIN_SCORE - ply as i64;
                self.undo_move(mv, side);
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                    pv.update_line(mv, &mut PvLine::new());
                }
                if score > alpha {
                    alpha = score;
                }
                break;
            }

            self.do_move(mv, side);
            let tactical = self.threat_counter.count(self.board, mv.0, mv.1, side);
            let is_tactical_move = tactical.open_fours + tactical.closed_fours > 0 || tactical.open_threes > 0;

            let mut score;
            let full_window = index == 0;
            let mut reduced_depth = depth - 1;

            let do_lmr = !full_window
                && depth >= LMR_MIN_DEPTH
                && index >= LMR_FULL_MOVES
                && !is_tactical_move
                && !adjacent_to_many_opponents(self.board, mv, side.opponent());

            if do_lmr {
                reduced_depth = depth.saturating_sub(1 + LMR_REDUCTION);
            }

            if full_window {
                score = -self.negamax(reduced_depth, ply + 1, -beta, -alpha, side.opponent(), &mut child_pv);
            } else {
                score = -self.negamax(reduced_depth, ply + 1, -alpha - 1, -alpha, side.opponent(), &mut child_pv);
                if score > alpha {
                    // Reduced and/or null-window search beat alpha; verify
                    // at full depth and full window (spec.md §4.8's PVS and
                    // LMR re-search rules).
                    score = -self.negamax(depth - 1, ply + 1, -beta, -alpha, side.opponent(), &mut child_pv);
                }
            }

            self.undo_move(mv, side);

            if self.is_stopped() {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
                pv.update_line(mv, &mut child_pv);
            }

            if score > alpha {
                alpha = score;
            }

            if alpha >= beta {
                self.killers.record(ply, mv);
                self.history.add_bonus(side, mv, (depth as i64) * (depth as i64));
                break;
            }
        }

        let flag = if best_score <= original_alpha {
            Flag::Upper
        } else if best_score >= beta {
            Flag::Lower
        } else {
            Flag::Exact
        };

        self.tt.store(
            hash,
            Entry { value: best_score, depth, flag, age: self.age, best_move },
        );

        best_score
    }
}

fn adjacent_to_many_opponents(board: &Board, m: Move, opponent: Player) -> bool {
    let (x, y) = m;
    let mut count = 0;
    for dy in -1..=1i32 {
        for dx in -1..=1i32 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if nx >= 0 && ny >= 0 && board.in_bounds(nx as u16, ny as u16) && board.get(nx as u16, ny as u16) == Some(opponent) {
                count += 1;
            }
        }
    }
    count >= 3
}
