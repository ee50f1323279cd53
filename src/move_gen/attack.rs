//! Reverse-enumeration attack detection.
//!
//! Instead of generating the opponent's moves and looking for one that
//! lands on the square, rays are cast outward from the square itself:
//! the first piece met on each compass ray decides whether the ray
//! carries an attack, and the knight and pawn squares are checked
//! directly. This makes the check a bounded scan independent of how
//! many moves the opponent has.

use crate::board::{BoardPos, GameState, Piece, PieceKind, Player};
use crate::move_gen::{KNIGHT_JUMPS, ROYAL_DIRECTIONS};

/// Whether any piece of `attacker` could capture on `pos`.
///
/// The occupant of `pos` (if any) is irrelevant: the answer is the
/// same for an empty square, a defended friendly piece or an attacked
/// enemy piece. Pawn forward pushes do not count — a pawn only ever
/// captures diagonally.
pub fn is_square_attacked(state: &GameState, pos: BoardPos, attacker: Player) -> bool {
    debug_assert!(!pos.is_null());

    // Sliders and the adjacent king: walk each compass ray until the
    // first piece. Straight rays carry rook and queen attacks,
    // diagonal rays bishop and queen; a king counts only on the first
    // step.
    for dir in ROYAL_DIRECTIONS {
        let diagonal = dir.file != 0 && dir.rank != 0;
        let mut distance = 1;
        let mut square = pos.offset(dir);
        while !square.is_null() {
            if let Some(piece) = state.piece_at(square) {
                let reaches = match piece.kind {
                    PieceKind::Queen => true,
                    PieceKind::King => distance == 1,
                    PieceKind::Bishop => diagonal,
                    PieceKind::Rook => !diagonal,
                    _ => false,
                };
                if reaches && piece.player == attacker {
                    return true;
                }
                break;
            }
            distance += 1;
            square = square.offset(dir);
        }
    }

    // Pawns: a white pawn attacks from one rank below the target in
    // engine coordinates (it moves toward rank 0), a black pawn from
    // one rank above.
    let pawn_rank_offset = match attacker {
        Player::White => 1,
        Player::Black => -1,
    };
    for file_offset in [-1, 1] {
        let square = pos.offset(BoardPos::new(file_offset, pawn_rank_offset));
        if !square.is_null()
            && state.piece_at(square) == Some(Piece::new(PieceKind::Pawn, attacker))
        {
            return true;
        }
    }

    // Knights.
    for jump in KNIGHT_JUMPS {
        let square = pos.offset(jump);
        if !square.is_null()
            && state.piece_at(square) == Some(Piece::new(PieceKind::Knight, attacker))
        {
            return true;
        }
    }

    false
}
