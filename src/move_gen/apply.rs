//! The state mutator: applying a move and maintaining every cache.
//!
//! [`make_move`] trusts its input — callers validate with
//! [`is_move_legal`](crate::move_gen::is_move_legal) first. Beyond
//! moving the piece it handles all the rule bookkeeping: en-passant
//! targets and captures, castling rights and the rook's companion
//! move, queen promotion, piece lists, check flags, the ply counter,
//! the side swap and the hash.

use crate::board::{BoardPos, GameState, Move, Piece, PieceKind, Player};
use crate::hash::hash_state;
use crate::move_gen::attack::is_square_attacked;
use crate::move_gen::{KING_START, ROOK_START_KINGSIDE, ROOK_START_QUEENSIDE};

/// Applies `mv` to `state`.
///
/// With `compute_hash` the Zobrist hash is rebuilt for the new
/// position; without it the hash is set to 0, marking a scratch state
/// that must not be used for table lookups. Search uses the cheap
/// variant for the king-safety probe inside the legality check.
pub fn make_move(state: &mut GameState, mv: Move, compute_hash: bool) {
    // Callers validate first; an empty source square is a no-op.
    let Some(from_piece) = state.piece_at(mv.from) else {
        return;
    };
    let to_piece = state.piece_at(mv.to);
    let mover = from_piece.player;
    let opponent = mover.opponent();

    if from_piece.kind == PieceKind::Pawn {
        if (mv.from.rank - mv.to.rank).abs() == 2 {
            // Double push: the opponent may answer en passant on this
            // file for one ply.
            state.set_enpassant_target(opponent, Some(mv.from.file));
        } else if mv.from.file != mv.to.file && to_piece.is_none() {
            // En passant: the captured pawn stands beside the mover,
            // not on the destination square.
            let captured = BoardPos::new(mv.to.file, mv.from.rank);
            state.set_piece(captured, None);
            state.relocate_piece(opponent, captured, BoardPos::NULL);
        }
    }

    // Castling rights expire when a rook leaves its corner...
    if from_piece.kind == PieceKind::Rook {
        if mv.from == ROOK_START_QUEENSIDE[mover.index()] {
            state.set_castle_queenside(mover, false);
        } else if mv.from == ROOK_START_KINGSIDE[mover.index()] {
            state.set_castle_kingside(mover, false);
        }
    }

    // ...or is captured in it.
    if let Some(victim) = to_piece {
        if victim.kind == PieceKind::Rook {
            if mv.to == ROOK_START_QUEENSIDE[victim.player.index()] {
                state.set_castle_queenside(victim.player, false);
            } else if mv.to == ROOK_START_KINGSIDE[victim.player.index()] {
                state.set_castle_kingside(victim.player, false);
            }
        }
    }

    if from_piece.kind == PieceKind::King {
        state.set_castle_queenside(mover, false);
        state.set_castle_kingside(mover, false);

        // A two-file king move from the start square is castling; the
        // rook comes along.
        if mv.from == KING_START[mover.index()] {
            if mv.to.file == 2 {
                let rook_from = BoardPos::new(0, mv.from.rank);
                let rook_to = BoardPos::new(3, mv.from.rank);
                state.set_piece(rook_to, state.piece_at(rook_from));
                state.set_piece(rook_from, None);
                state.relocate_piece(mover, rook_from, rook_to);
            } else if mv.to.file == 6 {
                let rook_from = BoardPos::new(7, mv.from.rank);
                let rook_to = BoardPos::new(5, mv.from.rank);
                state.set_piece(rook_from, None);
                state.set_piece(rook_to, Some(Piece::new(PieceKind::Rook, mover)));
                state.relocate_piece(mover, rook_from, rook_to);
            }
        }

        state.set_king(mover, mv.to);
    }

    // Piece lists: the mover relocates, a victim vanishes.
    state.relocate_piece(mover, mv.from, mv.to);
    if let Some(victim) = to_piece {
        state.relocate_piece(victim.player, mv.to, BoardPos::NULL);
    }

    // The mover's own capture window closes with this move.
    state.set_enpassant_target(mover, None);

    // A pawn arriving on the last rank becomes a queen, always.
    let placed = if from_piece.kind == PieceKind::Pawn && (mv.to.rank == 0 || mv.to.rank == 7) {
        Piece::new(PieceKind::Queen, mover)
    } else {
        from_piece
    };

    state.set_piece(mv.to, Some(placed));
    state.set_piece(mv.from, None);

    let black_in_check = is_square_attacked(state, state.king(Player::Black), Player::White);
    let white_in_check = is_square_attacked(state, state.king(Player::White), Player::Black);
    state.set_in_check(Player::Black, black_in_check);
    state.set_in_check(Player::White, white_in_check);

    state.ply += 1;
    state.white_to_move = !state.white_to_move;

    state.hash = if compute_hash { hash_state(state) } else { 0 };
}
