//! Move validation: shape checks and the full legality predicate.
//!
//! [`is_move_possible`] answers whether a move fits the moving piece's
//! pattern and is not blocked; [`is_move_legal`] layers the game rules
//! on top (turn order, pawn special cases, castling rights) and
//! finally verifies the mover's king survives by applying the move to
//! a scratch copy. Neither function ever mutates the caller's state,
//! which lets move generation call them freely mid-iteration.

use crate::board::{BoardPos, GameState, Move, PieceKind, Player};
use crate::move_gen::apply::make_move;
use crate::move_gen::attack::is_square_attacked;
use crate::move_gen::KING_START;

/// Whether `mv` follows the movement pattern of the piece on its
/// source square, with nothing in the way.
///
/// Castling corridors are validated here as well: every square from
/// the king's start through the corridor must be empty (the king's own
/// square excepted) and unattacked — except file 1, which may be
/// attacked during queenside castling since the king never crosses it.
/// Rights, turn order and king safety are [`is_move_legal`]'s job.
pub fn is_move_possible(state: &GameState, mv: Move) -> bool {
    if mv.from.is_null() || mv.to.is_null() {
        return false;
    }
    let Some(from_piece) = state.piece_at(mv.from) else {
        return false;
    };

    // Own pieces block their own side.
    if let Some(to_piece) = state.piece_at(mv.to) {
        if to_piece.player == from_piece.player {
            return false;
        }
    }

    let file_diff = (mv.from.file - mv.to.file).abs();
    let rank_diff = (mv.from.rank - mv.to.rank).abs();

    match from_piece.kind {
        PieceKind::King => {
            if file_diff <= 1 && rank_diff <= 1 {
                return true;
            }

            // A two-file slide along the home rank from the start
            // square is a castling attempt.
            let is_castle = mv.from.rank == mv.to.rank
                && (mv.to.file == 6 || mv.to.file == 2)
                && mv.from == KING_START[from_piece.player.index()];
            if !is_castle {
                return false;
            }

            let direction: i8 = if mv.to.file == 6 { 1 } else { -1 };
            let last_file = if mv.to.file == 6 { 6 } else { 1 };
            let opponent = from_piece.player.opponent();

            let mut file = mv.from.file;
            loop {
                let square = BoardPos::new(file, mv.from.rank);
                if file != 4 && state.piece_at(square).is_some() {
                    return false;
                }
                if file != 1 && is_square_attacked(state, square, opponent) {
                    return false;
                }
                if file == last_file {
                    return true;
                }
                file += direction;
            }
        }

        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
            if mv.from.file == mv.to.file {
                // Vertical: not for bishops.
                if from_piece.kind == PieceKind::Bishop {
                    return false;
                }
                let lo = mv.from.rank.min(mv.to.rank);
                let hi = mv.from.rank.max(mv.to.rank);
                ((lo + 1)..hi)
                    .all(|rank| state.piece_at(BoardPos::new(mv.from.file, rank)).is_none())
            } else if mv.from.rank == mv.to.rank {
                // Horizontal: not for bishops.
                if from_piece.kind == PieceKind::Bishop {
                    return false;
                }
                let lo = mv.from.file.min(mv.to.file);
                let hi = mv.from.file.max(mv.to.file);
                ((lo + 1)..hi)
                    .all(|file| state.piece_at(BoardPos::new(file, mv.from.rank)).is_none())
            } else if file_diff == rank_diff {
                // Diagonal: not for rooks.
                if from_piece.kind == PieceKind::Rook {
                    return false;
                }
                let file_step: i8 = if mv.from.file > mv.to.file { -1 } else { 1 };
                let rank_step: i8 = if mv.from.rank > mv.to.rank { -1 } else { 1 };
                let mut file = mv.from.file + file_step;
                let mut rank = mv.from.rank + rank_step;
                while file != mv.to.file {
                    if state.piece_at(BoardPos::new(file, rank)).is_some() {
                        return false;
                    }
                    file += file_step;
                    rank += rank_step;
                }
                true
            } else {
                false
            }
        }

        PieceKind::Knight => {
            (file_diff == 2 && rank_diff == 1) || (file_diff == 1 && rank_diff == 2)
        }

        PieceKind::Pawn => {
            // One step toward the opponent, straight or diagonal, or a
            // straight double step. Occupancy rules (captures must hit
            // a piece, pushes must not) are legality concerns.
            let direction: i8 = match from_piece.player {
                Player::Black => 1,
                Player::White => -1,
            };
            let advance = mv.to.rank - mv.from.rank;
            (advance == direction && file_diff <= 1)
                || (advance == 2 * direction && file_diff == 0)
        }
    }
}

/// Whether the position is consistent after a move: the player who
/// just moved must not have left their own king attacked.
fn is_state_legal(state: &GameState) -> bool {
    let last_mover = state.player_to_move().opponent();
    !state.is_in_check(last_mover)
}

/// Full legality check for `mv` in `state`.
///
/// Composes the pattern check with the game rules: kings cannot be
/// captured, only the side to move may move, pawn pushes and en
/// passant have their occupancy and bookkeeping conditions, castling
/// needs its availability flag, and the mover's king must survive the
/// move (verified on a scratch copy).
pub fn is_move_legal(state: &GameState, mv: Move) -> bool {
    if !is_move_possible(state, mv) {
        return false;
    }

    // is_move_possible established the source piece exists.
    let Some(from_piece) = state.piece_at(mv.from) else {
        return false;
    };
    let to_piece = state.piece_at(mv.to);

    if to_piece.map(|p| p.kind) == Some(PieceKind::King) {
        return false;
    }

    if from_piece.player != state.player_to_move() {
        return false;
    }

    match from_piece.kind {
        PieceKind::Pawn => {
            if mv.from.file != mv.to.file {
                // Diagonal onto an empty square is only ever en
                // passant: the target file must be live and the pawn
                // on its capturing rank.
                if to_piece.is_none() {
                    let capture_rank = match from_piece.player {
                        Player::White => 3,
                        Player::Black => 4,
                    };
                    if mv.from.rank != capture_rank
                        || state.enpassant_target(from_piece.player) != Some(mv.to.file)
                    {
                        return false;
                    }
                }
            } else if (mv.from.rank - mv.to.rank).abs() == 2 {
                // Double push: only from the starting rank, through
                // and onto empty squares.
                let start_rank = match from_piece.player {
                    Player::White => 6,
                    Player::Black => 1,
                };
                if mv.from.rank != start_rank {
                    return false;
                }
                let between = BoardPos::new(mv.from.file, (mv.from.rank + mv.to.rank) / 2);
                if state.piece_at(between).is_some() || to_piece.is_some() {
                    return false;
                }
            } else if to_piece.is_some() {
                // Straight pushes never capture.
                return false;
            }
        }

        PieceKind::King if (mv.from.file - mv.to.file).abs() == 2 => {
            let allowed = if mv.to.file == 2 {
                state.can_castle_queenside(from_piece.player)
            } else {
                state.can_castle_kingside(from_piece.player)
            };
            if !allowed {
                return false;
            }
        }

        _ => {}
    }

    // Apply the move to a scratch copy (no hash needed) and make sure
    // the mover's king is not left attacked.
    let mut scratch = state.clone();
    make_move(&mut scratch, mv, false);
    is_state_legal(&scratch)
}
