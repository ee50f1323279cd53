//! Move ordering for alpha-beta pruning.
//!
//! Alpha-beta prunes most when the best move comes first. Exhaustive
//! scoring is not worth its cost here; three buckets are: the
//! transposition table's best move for the position (the principal
//! variation found by an earlier, shallower search), then captures,
//! then everything else.

use crate::board::{GameState, Move, PieceKind, Player};
use crate::move_gen::legal_destinations;
use crate::tt::TranspositionTable;

/// All legal moves for `player`, best-first: the TT move, then
/// captures in generation order, then quiet moves in generation
/// order. The TT move appears exactly once.
pub fn ordered_legal_moves(
    state: &GameState,
    player: Player,
    tt: &TranspositionTable,
) -> Vec<Move> {
    // A stored best move from an earlier search of this position is
    // the strongest ordering signal available.
    let pv_move = tt
        .get(state.hash)
        .filter(|entry| entry.depth != 0)
        .and_then(|entry| entry.best_move);

    let mut captures = Vec::new();
    let mut quiets = Vec::new();

    for &from in state.piece_list(player) {
        if from.is_null() {
            continue;
        }
        let moving = state.piece_at(from);

        for to in legal_destinations(state, from) {
            let mv = Move { from, to };
            if pv_move == Some(mv) {
                continue;
            }

            // A capture either lands on an enemy piece or is a pawn
            // leaving its file (which covers en passant).
            let takes_piece = state
                .piece_at(to)
                .is_some_and(|target| target.player != player);
            let diagonal_pawn = moving.map(|p| p.kind) == Some(PieceKind::Pawn)
                && from.file != to.file;

            if takes_piece || diagonal_pawn {
                captures.push(mv);
            } else {
                quiets.push(mv);
            }
        }
    }

    let mut ordered = Vec::with_capacity(captures.len() + quiets.len() + 1);
    ordered.extend(pv_move);
    ordered.append(&mut captures);
    ordered.append(&mut quiets);
    ordered
}
