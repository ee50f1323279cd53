//! The alpha-beta negamax core.
//!
//! Scores are always from the perspective of the side to move; a
//! parent negates its child's score. Alpha is the best score the
//! moving side has proven, beta the ceiling the opponent will allow —
//! once alpha meets beta the remaining siblings cannot matter and the
//! node cuts off.
//!
//! Every node first consults the shared transposition table, both to
//! reuse finished work and to tighten the window with stored bounds.
//! Every node also watches the wall clock: when the budget lapses the
//! search unwinds by returning `None` all the way up, leaving the
//! deepest *completed* iteration's results in the table.

use crate::board::{GameState, Player};
use crate::constants::MATE_VALUE;
use crate::evaluation::position_value;
use crate::move_gen::{is_checkmated, is_stalemate, make_move};
use crate::search::ordering::ordered_legal_moves;
use crate::tt::{Bound, TranspositionTable, TtEntry};
use std::time::{Duration, Instant};

/// Evaluates `state` to `depth` plies within the `(alpha, beta)`
/// window, from the side to move's perspective.
///
/// Returns `None` when the time budget ran out mid-search; the
/// partial result is discarded by every caller up the chain.
pub fn negamax(
    state: &GameState,
    tt: &TranspositionTable,
    mut alpha: i32,
    mut beta: i32,
    depth: u8,
    started_at: Instant,
    budget: Duration,
) -> Option<i32> {
    let player = state.player_to_move();

    // The window as given, before table bounds tighten it; the bound
    // kind of this node's own result is judged against it.
    let alpha_start = alpha;

    // A stored result from an equal or deeper search settles or at
    // least narrows this node.
    let stored = tt.get(state.hash);
    if let Some(entry) = stored {
        if entry.depth != 0 && entry.depth >= depth {
            match entry.bound {
                Bound::Exact => return Some(entry.value),
                Bound::Lower => alpha = alpha.max(entry.value),
                Bound::Upper => beta = beta.min(entry.value),
            }
            if alpha >= beta {
                return Some(entry.value);
            }
        }
    }

    // Terminal positions score absolutely.
    if is_checkmated(state, player) {
        return Some(-MATE_VALUE);
    }
    if is_checkmated(state, player.opponent()) {
        return Some(MATE_VALUE);
    }
    if is_stalemate(state) {
        return Some(0);
    }

    if depth == 0 {
        let sign = if player == Player::White { 1 } else { -1 };
        return Some(position_value(state) * sign);
    }

    if started_at.elapsed() >= budget {
        return None;
    }

    // Carry forward any known best move so it survives into the new
    // entry even if this node fails low.
    let mut best_move = stored.and_then(|entry| entry.best_move);
    let mut best_value = i32::MIN;

    for mv in ordered_legal_moves(state, player, tt) {
        let mut child = state.clone();
        make_move(&mut child, mv, true);

        let value = -negamax(&child, tt, -beta, -alpha, depth - 1, started_at, budget)?;

        if value > best_value {
            best_value = value;
            best_move = Some(mv);
            if value > alpha {
                alpha = value;
            }
        }

        if alpha >= beta {
            break;
        }
    }

    // Checkmate and stalemate were handled above, so at least one
    // move was scored.
    debug_assert!(best_value != i32::MIN);

    let bound = if best_value <= alpha_start {
        Bound::Upper
    } else if best_value >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };

    tt.put(TtEntry {
        hash: state.hash,
        best_move,
        depth,
        value: best_value,
        bound,
    });

    Some(best_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardPos, Piece, PieceKind};
    use crate::fen;
    use crate::hash::hash_state;
    use crate::test_support::random_playout;
    use proptest::prelude::ProptestConfig;
    use test_strategy::proptest;

    const WINDOW: (i32, i32) = (-2 * MATE_VALUE, 2 * MATE_VALUE);

    fn search(state: &GameState, depth: u8) -> i32 {
        let tt = TranspositionTable::with_slots(1 << 14);
        negamax(
            state,
            &tt,
            WINDOW.0,
            WINDOW.1,
            depth,
            Instant::now(),
            Duration::from_secs(600),
        )
        .expect("budget cannot lapse in tests")
    }

    #[test]
    fn checkmate_scores_minus_mate_for_the_mated_side() {
        let state =
            fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 0").unwrap();
        assert_eq!(search(&state, 3), -MATE_VALUE);
    }

    #[test]
    fn stalemate_scores_zero() {
        let state = fen::parse("7k/5Q2/6K1/8/8/8/8/8 b - - 0 0").unwrap();
        assert_eq!(search(&state, 3), 0);
    }

    #[test]
    fn depth_zero_returns_the_signed_static_value() {
        // A queen-up position for white, black to move: the score is
        // negative from black's perspective.
        let state = fen::parse("4k3/8/8/8/3Q4/8/8/4K3 b - - 0 0").unwrap();
        let value = search(&state, 0);
        assert_eq!(value, -position_value(&state));
        assert!(value < 0);
    }

    #[test]
    fn finds_mate_in_one() {
        let state = fen::parse("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 0").unwrap();
        assert_eq!(search(&state, 2), MATE_VALUE);
    }

    #[test]
    fn timeout_returns_none() {
        let state = GameState::new_initial();
        let tt = TranspositionTable::with_slots(1 << 10);
        let result = negamax(
            &state,
            &tt,
            WINDOW.0,
            WINDOW.1,
            4,
            Instant::now() - Duration::from_secs(10),
            Duration::from_secs(1),
        );
        assert_eq!(result, None);
    }

    #[test]
    fn records_an_exact_entry_with_the_best_move() {
        let state = fen::parse("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 0").unwrap();
        let tt = TranspositionTable::with_slots(1 << 14);
        negamax(
            &state,
            &tt,
            WINDOW.0,
            WINDOW.1,
            2,
            Instant::now(),
            Duration::from_secs(600),
        )
        .unwrap();

        let entry = tt.get(state.hash).expect("root entry recorded");
        assert_eq!(entry.depth, 2);
        assert_eq!(entry.value, MATE_VALUE);
        assert_eq!(
            entry.best_move,
            Some(crate::board::Move::new(BoardPos::new(0, 7), BoardPos::new(0, 0)))
        );
    }

    /// Mirrors the board vertically and swaps the colors of every
    /// piece and all side-dependent state. The resulting position is
    /// the same game from the other side's point of view.
    fn color_flip(state: &GameState) -> GameState {
        let mut out = GameState::cleared();
        out.white_to_move = !state.white_to_move;
        out.ply = state.ply;

        for file in 0..8i8 {
            for rank in 0..8i8 {
                let Some(piece) = state.piece_at(BoardPos::new(file, rank)) else {
                    continue;
                };
                let flipped = Piece::new(piece.kind, piece.player.opponent());
                let pos = BoardPos::new(file, 7 - rank);
                out.set_piece(pos, Some(flipped));
                assert!(out.push_piece_list(flipped.player, pos));
                if flipped.kind == PieceKind::King {
                    out.set_king(flipped.player, pos);
                }
            }
        }

        for (a, b) in [(Player::White, Player::Black), (Player::Black, Player::White)] {
            out.set_castle_kingside(a, state.can_castle_kingside(b));
            out.set_castle_queenside(a, state.can_castle_queenside(b));
            out.set_enpassant_target(a, state.enpassant_target(b));
            out.set_in_check(a, state.is_in_check(b));
        }

        out.hash = hash_state(&out);
        out
    }

    #[proptest(ProptestConfig { cases: 8, ..ProptestConfig::default() })]
    fn search_is_color_symmetric(seed: u64, #[strategy(0usize..16)] plies: usize) {
        let state = random_playout(seed, plies);
        let flipped = color_flip(&state);
        assert_eq!(search(&state, 2), search(&flipped, 2));
    }
}
