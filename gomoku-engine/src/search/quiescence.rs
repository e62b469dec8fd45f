use gomoku_core::{Board, Player};

use crate::config::{EngineConfig, QUIESCENCE_DELTA, QUIESCENCE_MAX_DEPTH, QUIESCENCE_MAX_MOVES};
use crate::evaluator::Evaluator;
use crate::move_heuristic::{score_move, tier, MoveTag};
use crate::threats::scan_board_threats;

/// Tactical tier floor: a candidate only enters quiescence search if its
/// move-heuristic tier (spec.md §4.6) is at least this severe — it creates
/// or blocks a four or an open three (spec.md §4.8's quiescence move
/// filter).
const TACTICAL_FLOOR: i64 = MoveTag::BlockOpenThree as i64;

/// Extends search at a horizon node by exploring only tactical moves, up to
/// [`QUIESCENCE_MAX_DEPTH`] plies and [`QUIESCENCE_MAX_MOVES`] per ply
/// (spec.md §4.8).
pub fn quiescence(
    board: &mut Board,
    evaluator: &mut Evaluator,
    config: &EngineConfig,
    side: Player,
    mut alpha: i64,
    beta: i64,
    qdepth: u8,
) -> i64 {
    let stand_pat = evaluator.score(side, config.attack_multiplier, config.defense_multiplier);

    if stand_pat >= beta {
        return beta;
    }
    if stand_pat + QUIESCENCE_DELTA < alpha {
        return alpha;
    }
    if stand_pat > alpha {
        alpha = stand_pat;
    }
    if qdepth >= QUIESCENCE_MAX_DEPTH {
        return alpha;
    }

    let opponent_threats = scan_board_threats(board, side.opponent());
    let candidates = board.get_valid_moves();
    let mut rated: Vec<(i64, (u16, u16))> = candidates
        .into_iter()
        .map(|m| (score_move(board, &opponent_threats, m, side), m))
        .filter(|&(score, _)| tier(score) >= TACTICAL_FLOOR)
        .collect();
    rated.sort_by(|a, b| b.0.cmp(&a.0));
    rated.truncate(QUIESCENCE_MAX_MOVES);

    for (_, mv) in rated {
        let (x, y) = mv;
        board.place_stone(x, y, side).expect("candidate move must be legal");
        evaluator.sync(board);

        let score = -quiescence(board, evaluator, config, side.opponent(), -beta, -alpha, qdepth + 1);

        board.undo_stone(x, y, side).expect("place/undo must be paired");
        evaluator.sync(board);

        if score >= beta {
            return beta;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}
