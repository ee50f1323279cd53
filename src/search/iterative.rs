//! Root search and the iterative-deepening dispatcher.
//!
//! One search request fans out into independent tasks, one per depth
//! 1..=[`MAX_SEARCH_DEPTH`]. All of them run the same root search
//! over the same shared transposition table — Lazy SMP. Shallow tasks
//! finish first and seed the table with bounds and best moves that
//! deeper tasks pick up through move ordering and window tightening;
//! workers never coordinate beyond that.
//!
//! Each completed depth overwrites the root entry with an exact,
//! deeper result. When the budget lapses, unfinished tasks abort
//! without writing, so the entry the facade finally reads always
//! belongs to the deepest iteration that ran to completion.

use crate::board::{GameState, Move};
use crate::constants::MAX_SEARCH_DEPTH;
use crate::move_gen::make_move;
use crate::search::negamax::negamax;
use crate::search::ordering::ordered_legal_moves;
use crate::threadpool::ThreadPool;
use crate::tt::{Bound, TranspositionTable, TtEntry};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Runs one full-width search of `depth` plies from the root and, if
/// it completes in time, records the best move as an exact entry for
/// the root hash.
///
/// `moves` is the shared root move list, captures first. The current
/// table best move, if any, is searched before it; everything else
/// follows in the shared order.
pub fn root_search(
    state: &GameState,
    tt: &TranspositionTable,
    moves: &[Move],
    depth: u8,
    started_at: Instant,
    budget: Duration,
) {
    let mut alpha = i32::MIN + 1;
    let beta = i32::MAX;

    // Earlier iterations (or a sibling worker) may already know the
    // best reply; searching it first maximizes cutoffs everywhere
    // below.
    let pv_move = tt
        .get(state.hash)
        .filter(|entry| entry.depth != 0)
        .and_then(|entry| entry.best_move);

    let mut best: Option<(Move, i32)> = None;

    let ordered = pv_move
        .into_iter()
        .chain(moves.iter().copied().filter(|&mv| Some(mv) != pv_move));

    for mv in ordered {
        let mut child = state.clone();
        make_move(&mut child, mv, true);

        let Some(child_value) =
            negamax(&child, tt, -beta, -alpha, depth - 1, started_at, budget)
        else {
            // Out of time: leave the previous depth's entry in place.
            return;
        };
        let value = -child_value;

        if best.map_or(true, |(_, best_value)| value > best_value) {
            best = Some((mv, value));
            if value > alpha {
                alpha = value;
            }
        }
    }

    if let Some((best_move, value)) = best {
        tt.put(TtEntry {
            hash: state.hash,
            best_move: Some(best_move),
            depth,
            value,
            bound: Bound::Exact,
        });
        tracing::debug!(depth, value, best = %best_move, "completed root search");
    }
}

/// Enqueues one [`root_search`] task per depth on the pool.
///
/// Workers share a single snapshot of the root position and its
/// ordered move list; the last task to finish drops them. The call
/// returns as soon as everything is queued — on a real pool the
/// search proceeds in the background, on an inline pool it has
/// already finished.
pub fn dispatch_search(
    state: &GameState,
    tt: &Arc<TranspositionTable>,
    pool: &ThreadPool,
    started_at: Instant,
    budget: Duration,
) {
    let root = Arc::new(state.clone());
    let moves = Arc::new(ordered_legal_moves(state, state.player_to_move(), tt));

    tracing::debug!(
        hash = state.hash,
        legal_moves = moves.len(),
        "dispatching iterative deepening"
    );

    for depth in 1..=MAX_SEARCH_DEPTH {
        let root = Arc::clone(&root);
        let moves = Arc::clone(&moves);
        let tt = Arc::clone(tt);
        pool.enqueue(move || root_search(&root, &tt, &moves, depth, started_at, budget));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPos;
    use crate::fen;

    const MATE_FEN: &str = "6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 0";
    const LONG: Duration = Duration::from_secs(600);

    fn ordered(state: &GameState, tt: &TranspositionTable) -> Vec<Move> {
        ordered_legal_moves(state, state.player_to_move(), tt)
    }

    #[test]
    fn root_search_records_the_mating_move() {
        let state = fen::parse(MATE_FEN).unwrap();
        let tt = TranspositionTable::with_slots(1 << 14);
        let moves = ordered(&state, &tt);
        root_search(&state, &tt, &moves, 2, Instant::now(), LONG);

        let entry = tt.get(state.hash).expect("entry for the root");
        assert_eq!(entry.depth, 2);
        assert_eq!(entry.bound, Bound::Exact);
        assert_eq!(
            entry.best_move,
            Some(Move::new(BoardPos::new(0, 7), BoardPos::new(0, 0)))
        );
        assert_eq!(entry.value, crate::constants::MATE_VALUE);
    }

    #[test]
    fn timed_out_root_search_keeps_the_previous_entry() {
        let state = fen::parse(MATE_FEN).unwrap();
        let tt = TranspositionTable::with_slots(1 << 14);
        let moves = ordered(&state, &tt);

        root_search(&state, &tt, &moves, 2, Instant::now(), LONG);
        let before = tt.get(state.hash).unwrap();

        // A depth-4 attempt with an already-exhausted budget must not
        // disturb the depth-2 result.
        root_search(
            &state,
            &tt,
            &moves,
            4,
            Instant::now() - Duration::from_secs(5),
            Duration::from_secs(1),
        );
        assert_eq!(tt.get(state.hash).unwrap(), before);
    }

    #[test]
    fn deeper_iterations_replace_shallower_root_entries() {
        let state = GameState::new_initial();
        let tt = TranspositionTable::with_slots(1 << 14);
        let moves = ordered(&state, &tt);

        root_search(&state, &tt, &moves, 1, Instant::now(), LONG);
        assert_eq!(tt.get(state.hash).unwrap().depth, 1);

        root_search(&state, &tt, &moves, 3, Instant::now(), LONG);
        let entry = tt.get(state.hash).unwrap();
        assert_eq!(entry.depth, 3);
        assert!(entry.best_move.is_some());
    }

    #[test]
    fn dispatch_on_an_inline_pool_completes_synchronously() {
        let state = fen::parse(MATE_FEN).unwrap();
        let tt = Arc::new(TranspositionTable::with_slots(1 << 14));
        let pool = ThreadPool::inline();

        tt.set_protected(state.hash);
        dispatch_search(
            &state,
            &tt,
            &pool,
            Instant::now(),
            Duration::from_millis(250),
        );

        let entry = tt.get(state.hash).expect("search ran inline");
        assert_eq!(
            entry.best_move,
            Some(Move::new(BoardPos::new(0, 7), BoardPos::new(0, 0)))
        );
        assert!(entry.depth >= 2);
    }
}
