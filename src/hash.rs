//! Zobrist position hashing, compatible with the Polyglot book format.
//!
//! Every position maps to a 64-bit fingerprint by XOR-ing one fixed
//! random number per feature: piece-on-square, castling right,
//! en-passant possibility and side to move. The numbers are the
//! Polyglot standard set ([`numbers`]), which makes the hashes equal
//! to the keys precomputed in Polyglot opening books — the whole
//! point of hashing the position rather than the move history.
//!
//! The hash is recomputed from scratch after every move. An
//! incremental XOR update would be cheaper but the full rebuild is
//! simple to keep correct, and the table below makes it a single pass
//! over at most 32 pieces.

mod numbers;

use crate::board::{GameState, Piece, PieceKind, Player};
use numbers::RANDOM64;

const CASTLE_OFFSET: usize = 768;
const ENPASSANT_OFFSET: usize = 772;
const TURN_OFFSET: usize = 780;

/// Index of the piece-square number for `piece` in Polyglot order.
///
/// Polyglot interleaves colors (black pawn 0, white pawn 1, black
/// knight 2, ...) and counts rows from white's side of the board, so
/// engine ranks are mirrored.
#[inline]
fn piece_square_index(piece: Piece, file: i8, rank: i8) -> usize {
    let base = match piece.kind {
        PieceKind::Pawn => 0,
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
    };
    let kind = 2 * base + (piece.player == Player::White) as usize;
    let row = 7 - rank as usize;
    64 * kind + 8 * row + file as usize
}

/// Computes the Zobrist hash of `state`.
///
/// The en-passant number is only included when a pawn of the side to
/// move actually stands ready to capture, per the book format; a
/// double push nobody can answer does not change the hash.
pub fn hash_state(state: &GameState) -> u64 {
    let mut hash = 0u64;

    for file in 0..8i8 {
        for rank in 0..8i8 {
            if let Some(piece) = state.piece_at((file, rank).into()) {
                hash ^= RANDOM64[piece_square_index(piece, file, rank)];
            }
        }
    }

    if state.can_castle_kingside(Player::White) {
        hash ^= RANDOM64[CASTLE_OFFSET];
    }
    if state.can_castle_queenside(Player::White) {
        hash ^= RANDOM64[CASTLE_OFFSET + 1];
    }
    if state.can_castle_kingside(Player::Black) {
        hash ^= RANDOM64[CASTLE_OFFSET + 2];
    }
    if state.can_castle_queenside(Player::Black) {
        hash ^= RANDOM64[CASTLE_OFFSET + 3];
    }

    let side = state.player_to_move();
    if let Some(file) = state.enpassant_target(side) {
        if capturing_pawn_ready(state, side, file) {
            hash ^= RANDOM64[ENPASSANT_OFFSET + file as usize];
        }
    }

    if state.white_to_move {
        hash ^= RANDOM64[TURN_OFFSET];
    }

    hash
}

/// Whether `side` has a pawn adjacent to the double-pushed pawn on
/// `file`, i.e. whether the en-passant capture is actually available.
fn capturing_pawn_ready(state: &GameState, side: Player, file: i8) -> bool {
    // The pushed enemy pawn stands beside the capturer: engine rank 4
    // when white just double-pushed, rank 3 when black did.
    let rank = match side {
        Player::White => 3,
        Player::Black => 4,
    };
    [file - 1, file + 1].into_iter().any(|f| {
        (0..8).contains(&f)
            && state.piece_at((f, rank).into())
                == Some(Piece::new(PieceKind::Pawn, side))
    })
}
