//! Decision Orchestrator (spec.md §4.11): the engine's public entry point,
//! running the priority cascade — opening book, critical check, global
//! threat scan, offensive override, forced blocks, early-game preference,
//! time banking, and the iterative-deepening fallback.
//!
//! Grounded on `ShakmatEngine::find_best_move` (`engine.rs`) for the overall
//! "book lookup, else search" shape, generalized to the much longer cascade
//! spec.md names, and on `parallel_search.rs`'s watchdog/stop-flag pattern
//! for time control.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use gomoku_core::{Board, Move, Player};

use crate::config::{EngineConfig, CRITICAL_CHECK_CANDIDATES, EARLY_GAME_MOVES, TIME_BANK_SPLIT, TT_WARMUP_CANDIDATES};
use crate::evaluator::{is_winning_move, Evaluator};
use crate::move_heuristic::{order_moves, score_move, tier, MoveTag};
use crate::opening_book;
use crate::pondering::PonderState;
use crate::search::{HistoryTable, KillerTable, Search};
use crate::threats::{scan_board_threats, PatternTag, ThreatCounter};
use crate::transposition::TranspositionTable;
use crate::vct;

/// Which cascade step produced the returned move (spec.md §11's
/// "which cascade step produced the move" logging requirement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Pondered,
    OpeningBook,
    CriticalCheck,
    GlobalScanBlock,
    Offensive,
    ForcedBlock,
    EarlyGame,
    CounterAttackVct,
    IterativeDeepening,
    Fallback,
}

pub struct Decision {
    pub best_move: Move,
    pub source: DecisionSource,
    pub is_critical: bool,
    pub depth_reached: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

/// The long-lived engine instance: owns the caches that persist across
/// decisions (spec.md §3's Ownership paragraph) plus the optional pondering
/// handle.
pub struct Engine {
    config: EngineConfig,
    tt: TranspositionTable,
    history: HistoryTable,
    killers: KillerTable,
    threat_counter: ThreatCounter,
    evaluator: Evaluator,
    age: u32,
    ponder: Option<PonderState>,
    /// A cached reply from a finished pondering worker, set by
    /// [`Engine::notify_opponent_move`] and consumed by the next
    /// [`Engine::decide`] call (spec.md §4.11's Pondering paragraph).
    pending_ponder_hit: Option<Move>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tt: TranspositionTable::new(config.tt_max_size),
            history: HistoryTable::new(),
            killers: KillerTable::new(config.max_depth as usize),
            threat_counter: ThreatCounter::new(config.threat_cache_max_size),
            evaluator: Evaluator::new(),
            age: 0,
            ponder: None,
            pending_ponder_hit: None,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// `get_best_move(board, player)` from spec.md §4.11.
    pub fn get_best_move(&mut self, board: &mut Board, player: Player) -> Move {
        self.decide(board, player).best_move
    }

    /// Tells the engine the opponent has just played `opponent_move`. If a
    /// pondering worker already searched this exact reply, its cached
    /// answer is stashed for the next `decide` call to short-circuit on
    /// (spec.md §4.11's Pondering paragraph); any still-running workers are
    /// cancelled either way, since their predictions are now stale.
    pub fn notify_opponent_move(&mut self, opponent_move: Move) {
        if let Some(p) = self.ponder.take() {
            self.pending_ponder_hit = p.lookup(opponent_move);
            p.cancel();
        }
    }

    pub fn decide(&mut self, board: &mut Board, player: Player) -> Decision {
        let start = Instant::now();
        let deadline = start + self.config.response_deadline;

        // Pondering short-circuit: a worker already searched this exact
        // position. Skip the cascade entirely, but still spend the
        // remaining budget warming the TT so response latency doesn't leak
        // whether pondering hit (spec.md §4.11: "still sleeps until the
        // response deadline to preserve engine-tempo statistics").
        if let Some(mv) = self.pending_ponder_hit.take() {
            self.age += 1;
            self.history.decay();
            self.threat_counter.clear();
            self.evaluator.rescan(board);

            let now = Instant::now();
            if now < deadline {
                self.tt_warm(board, player, deadline - now);
            }
            return self.finish(board, player, mv, DecisionSource::Pondered, false, 0, 0, start);
        }

        // Step 1: decision bookkeeping.
        self.age += 1;
        self.history.decay();
        self.threat_counter.clear();
        self.evaluator.rescan(board);

        let mut is_critical = false;
        let mut decided: Option<(Move, DecisionSource)> = None;

        // Step 2: opening book.
        if board.move_count() <= self.config.opening_book_max_moves {
            if let Some(mv) = opening_book::lookup(board, player) {
                log::debug!("opening book hit: {:?}", mv);
                decided = Some((mv, DecisionSource::OpeningBook));
            }
        }

        // Step 3: critical check.
        if decided.is_none() {
            if let Some(mv) = critical_check(board, player) {
                is_critical = true;
                log::debug!("critical check hit: {:?}", mv);
                decided = Some((mv, DecisionSource::CriticalCheck));
            }
        }

        // Step 4: global scan for opponent solid/split fours.
        if decided.is_none() {
            if let Some(mv) = global_scan_block(board, player) {
                log::debug!("global scan forced block: {:?}", mv);
                decided = Some((mv, DecisionSource::GlobalScanBlock));
            }
        }

        // Step 5: offensive override (preempts a mere open-three block).
        if decided.is_none() {
            if let Some(mv) = offensive_check(board, player) {
                log::debug!("offensive check overrides defense: {:?}", mv);
                decided = Some((mv, DecisionSource::Offensive));
            }
        }

        // Step 6: forced block of open/split threes.
        if decided.is_none() {
            if let Some(mv) = forced_block_threes(board, player) {
                log::debug!("forced block of a three: {:?}", mv);
                decided = Some((mv, DecisionSource::ForcedBlock));
            }
        }

        // Step 7: early-game preference.
        if decided.is_none() && board.move_count() <= EARLY_GAME_MOVES {
            if let Some(mv) = early_game_move(board, player) {
                log::debug!("early-game preference: {:?}", mv);
                decided = Some((mv, DecisionSource::EarlyGame));
            }
        }

        if let Some((mut mv, mut source)) = decided {
            // Step 8: time banking.
            if let Some(substitute) = self.time_bank(board, player, is_critical, deadline) {
                mv = substitute;
                source = DecisionSource::CounterAttackVct;
            }
            self.finish(board, player, mv, source, is_critical, 0, 0, start)
        } else {
            // Step 9: iterative-deepening negamax, with step 10's fallback.
            let stop = Arc::new(AtomicBool::new(false));
            spawn_watchdog(deadline, self.config.safety_margin, Arc::clone(&stop));

            let result = {
                let mut search = Search {
                    board,
                    evaluator: &mut self.evaluator,
                    tt: &mut self.tt,
                    killers: &mut self.killers,
                    history: &mut self.history,
                    threat_counter: &mut self.threat_counter,
                    config: &self.config,
                    stop: &stop,
                    age: self.age,
                    nodes: 0,
                };
                search.search_iterative(player, self.config.max_depth)
            };
            stop.store(true, Ordering::Relaxed);

            let (mv, source) = match result.best_move {
                Some(mv) => (mv, DecisionSource::IterativeDeepening),
                None => (fallback_move(board), DecisionSource::Fallback),
            };
            self.finish(board, player, mv, source, false, result.depth_reached, result.nodes, start)
        }
    }

    fn finish(
        &mut self,
        board: &Board,
        player: Player,
        mv: Move,
        source: DecisionSource,
        is_critical: bool,
        depth_reached: u8,
        nodes: u64,
        start: Instant,
    ) -> Decision {
        let elapsed = start.elapsed();
        log::debug!(
            "decision {:?} via {:?} (critical={is_critical}) depth={depth_reached} nodes={nodes} in {:?}",
            mv,
            source,
            elapsed
        );
        self.start_pondering(board, player, mv);
        Decision { best_move: mv, source, is_critical, depth_reached, nodes, elapsed }
    }

    /// Step 8: spends the remaining budget on TT warming, an optional VCT
    /// counter-attack probe, and a safety margin. Returns `Some` only when
    /// the counter-attack search found a win that differs from the move
    /// already decided.
    fn time_bank(&mut self, board: &mut Board, player: Player, was_critical: bool, deadline: Instant) -> Option<Move> {
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        let budget = deadline - now;
        let (warm_frac, counter_frac, _margin_frac) = TIME_BANK_SPLIT;
        let warm_budget = budget.mul_f64(warm_frac);
        let counter_budget = budget.mul_f64(counter_frac);

        self.tt_warm(board, player, warm_budget);

        if !was_critical {
            let stop = Arc::new(AtomicBool::new(false));
            let vct_deadline = Instant::now() + counter_budget;
            spawn_watchdog(vct_deadline, Duration::from_millis(0), Arc::clone(&stop));
            return vct::find_forced_win(board, player, &stop);
        }

        None
    }

    /// TT warming: searches the top predicted opponent responses to
    /// progressively deeper depths, storing entries for later reuse
    /// (spec.md §4.11 step 8).
    fn tt_warm(&mut self, board: &mut Board, player: Player, budget: Duration) {
        if budget.is_zero() {
            return;
        }
        let deadline = Instant::now() + budget;
        let stop = Arc::new(AtomicBool::new(false));
        spawn_watchdog(deadline, Duration::from_millis(0), Arc::clone(&stop));

        let opponent = player.opponent();
        let replies = predicted_opponent_moves(board, opponent, TT_WARMUP_CANDIDATES);

        'outer: for depth in 1..=self.config.tt_warmup_depth {
            for &reply in &replies {
                if stop.load(Ordering::Relaxed) || Instant::now() >= deadline {
                    break 'outer;
                }
                if board.place_stone(reply.0, reply.1, opponent).is_err() {
                    continue;
                }
                self.evaluator.sync(board);

                let mut search = Search {
                    board,
                    evaluator: &mut self.evaluator,
                    tt: &mut self.tt,
                    killers: &mut self.killers,
                    history: &mut self.history,
                    threat_counter: &mut self.threat_counter,
                    config: &self.config,
                    stop: &stop,
                    age: self.age,
                    nodes: 0,
                };
                search.search_iterative(player, depth);

                board.undo_stone(reply.0, reply.1, opponent).expect("place/undo must be paired");
                self.evaluator.sync(board);
            }
        }
    }

    fn start_pondering(&mut self, board: &Board, player: Player, our_move: Move) {
        if !self.config.pondering_enabled {
            return;
        }
        let mut after_our_move = board.copy();
        if after_our_move.place_stone(our_move.0, our_move.1, player).is_err() {
            return;
        }
        let predicted = predicted_opponent_moves(&after_our_move, player.opponent(), self.config.ponder_breadth);
        self.ponder = Some(PonderState::start(&after_our_move, player, &self.config, predicted));
    }
}

/// Up to `n` candidate moves for `side`, ranked by the move heuristic —
/// shared by TT warming, pondering, and predicting opponent replies.
fn predicted_opponent_moves(board: &Board, side: Player, n: usize) -> Vec<Move> {
    let mut scratch = board.copy();
    let opponent_threats = scan_board_threats(&scratch, side.opponent());
    let candidates = scratch.get_valid_moves();
    let mut ordered = order_moves(&mut scratch, &opponent_threats, &candidates, side);
    ordered.truncate(n);
    ordered
}

fn spawn_watchdog(deadline: Instant, safety_margin: Duration, stop: Arc<AtomicBool>) {
    thread::spawn(move || {
        let wake_at = deadline.checked_sub(safety_margin).unwrap_or(deadline);
        let now = Instant::now();
        if wake_at > now {
            thread::sleep(wake_at - now);
        }
        stop.store(true, Ordering::Relaxed);
    });
}

/// Step 3: scans up to [`CRITICAL_CHECK_CANDIDATES`] moves for an immediate
/// win (for us, then for the opponent).
fn critical_check(board: &mut Board, player: Player) -> Option<Move> {
    let candidates: Vec<Move> = board.get_valid_moves().into_iter().take(CRITICAL_CHECK_CANDIDATES).collect();
    if let Some(mv) = candidates.iter().copied().find(|&m| is_winning_move(board, m, player)) {
        return Some(mv);
    }
    candidates.into_iter().find(|&m| is_winning_move(board, m, player.opponent()))
}

/// Step 4: blocks an opponent solid four (preferring the wall-forming end)
/// or fills an opponent split four's gap.
fn global_scan_block(board: &Board, player: Player) -> Option<Move> {
    let report = scan_board_threats(board, player.opponent());

    if let Some(record) = report.fours.iter().find(|r| r.pattern == PatternTag::SolidFour) {
        let playable: Vec<Move> = record.blocks.iter().copied().filter(|&(x, y)| board.get(x, y).is_none()).collect();
        if let Some(&wall) = playable.iter().find(|&&(x, y)| adjacent_to_own_stone(board, x, y, player)) {
            return Some(wall);
        }
        // Either both ends are open (unstoppable — block one end anyway) or
        // only one playable end exists; either way, take the first.
        return playable.first().copied();
    }

    report.fours.iter().find(|r| r.pattern == PatternTag::SplitFour).and_then(|r| r.gap)
}

/// Step 5: our best self-threat; returned only if it is at least an
/// open-four-or-better (spec.md: "win > fork > four > open-three >
/// building-two. If its rank is at least four, take it immediately").
fn offensive_check(board: &mut Board, player: Player) -> Option<Move> {
    let opponent_threats = scan_board_threats(board, player.opponent());
    let candidates = board.get_valid_moves();

    let (best_score, best_move) = candidates
        .into_iter()
        .map(|m| (score_move(board, &opponent_threats, m, player), m))
        .max_by_key(|&(score, _)| score)?;

    (tier(best_score) >= MoveTag::OpenFour as i64).then_some(best_move)
}

/// Step 6: forced block of an opponent open three (closest to our own
/// stones) or fill of a split three's gap.
fn forced_block_threes(board: &Board, player: Player) -> Option<Move> {
    let report = scan_board_threats(board, player.opponent());

    if let Some(record) = report.open_threes.first() {
        let mut blocks = record.blocks.clone();
        blocks.sort_by_key(|&(x, y)| distance_to_nearest_own_stone(board, x, y, player));
        if let Some(block) = blocks.into_iter().next() {
            return Some(block);
        }
    }

    report.split_threes.first().and_then(|r| r.gap)
}

/// Step 7: an empty cell adjacent to our own stone, closest to an opponent
/// stone.
fn early_game_move(board: &Board, player: Player) -> Option<Move> {
    let mut candidates: Vec<Move> = board
        .get_valid_moves()
        .into_iter()
        .filter(|&(x, y)| adjacent_to_own_stone(board, x, y, player))
        .collect();
    candidates.sort_by_key(|&(x, y)| distance_to_nearest_own_stone(board, x, y, player.opponent()));
    candidates.into_iter().next()
}

/// Step 10: the fallback that must never be skipped.
fn fallback_move(board: &Board) -> Move {
    board.get_valid_moves().into_iter().next().unwrap_or_else(|| board.center())
}

fn adjacent_to_own_stone(board: &Board, x: u16, y: u16, player: Player) -> bool {
    for dy in -1..=1i32 {
        for dx in -1..=1i32 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (nx, ny) = (x as i32 + dx, y as i32 + dy);
            if nx >= 0 && ny >= 0 && board.in_bounds(nx as u16, ny as u16) && board.get(nx as u16, ny as u16) == Some(player) {
                return true;
            }
        }
    }
    false
}

fn distance_to_nearest_own_stone(board: &Board, x: u16, y: u16, player: Player) -> i32 {
    let mut best = i32::MAX;
    for y2 in 0..board.height() {
        for x2 in 0..board.width() {
            if board.get(x2, y2) == Some(player) {
                let d = (x as i32 - x2 as i32).abs().max((y as i32 - y2 as i32).abs());
                if d < best {
                    best = d;
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_check_takes_an_immediate_win() {
        let mut board = Board::new(15, 15).unwrap();
        for x in 3..7 {
            board.place_stone(x, 5, Player::One).unwrap();
        }
        let mv = critical_check(&mut board, Player::One).unwrap();
        assert!(mv == (2, 5) || mv == (7, 5));
    }

    #[test]
    fn critical_check_blocks_the_opponents_immediate_win() {
        let mut board = Board::new(15, 15).unwrap();
        for x in 3..7 {
            board.place_stone(x, 5, Player::Two).unwrap();
        }
        let mv = critical_check(&mut board, Player::One).unwrap();
        assert!(mv == (2, 5) || mv == (7, 5));
    }

    #[test]
    fn global_scan_blocks_a_solid_four_preferring_a_wall() {
        let mut board = Board::new(15, 15).unwrap();
        board.place_stone(1, 5, Player::One).unwrap();
        for x in 3..7 {
            board.place_stone(x, 5, Player::Two).unwrap();
        }
        let mv = global_scan_block(&board, Player::One).unwrap();
        assert_eq!(mv, (2, 5));
    }

    #[test]
    fn offensive_check_requires_at_least_an_open_four() {
        let mut board = Board::new(15, 15).unwrap();
        board.place_stone(5, 5, Player::One).unwrap();
        board.place_stone(6, 5, Player::One).unwrap();
        assert!(offensive_check(&mut board, Player::One).is_none());
    }

    #[test]
    fn engine_always_returns_a_move_on_an_empty_board() {
        let mut engine = Engine::new(EngineConfig {
            pondering_enabled: false,
            response_deadline: std::time::Duration::from_millis(50),
            safety_margin: std::time::Duration::from_millis(10),
            ..EngineConfig::default()
        });
        let mut board = Board::new(15, 15).unwrap();
        let mv = engine.get_best_move(&mut board, Player::One);
        assert_eq!(mv, (7, 7));
    }

    #[test]
    fn a_pondered_reply_short_circuits_the_cascade() {
        let mut engine = Engine::new(EngineConfig {
            pondering_enabled: true,
            response_deadline: std::time::Duration::from_millis(60),
            safety_margin: std::time::Duration::from_millis(10),
            max_depth: 4,
            ..EngineConfig::default()
        });
        let mut board = Board::new(15, 15).unwrap();
        board.place_stone(7, 7, Player::Two).unwrap();

        let our_move = engine.get_best_move(&mut board, Player::One);
        board.place_stone(our_move.0, our_move.1, Player::One).unwrap();

        // The same prediction `start_pondering` made internally, from the
        // same board state, so it names a worker that is actually running.
        let opponent_reply = predicted_opponent_moves(&board, Player::Two, 1)[0];

        // Best-effort wait for the (depth-2) worker to finish.
        std::thread::sleep(std::time::Duration::from_millis(500));

        board.place_stone(opponent_reply.0, opponent_reply.1, Player::Two).unwrap();
        engine.notify_opponent_move(opponent_reply);

        let decision = engine.decide(&mut board, Player::One);
        assert_eq!(decision.source, DecisionSource::Pondered);
    }
}
