//! Static position evaluation.
//!
//! A deliberately small hand-tuned evaluator: material dominates, with
//! nudges for king safety, castling potential, the check status and
//! central presence. Scores are centipawns from white's perspective —
//! positive favors white. The evaluator assumes the game is not over;
//! checkmate and stalemate are scored by the search before it ever
//! asks for a static value.

use crate::board::{BoardPos, GameState, PieceKind, Player};
use crate::constants::*;
use crate::move_gen::ROYAL_DIRECTIONS;

fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => KING_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Pawn => PAWN_VALUE,
    }
}

/// Evaluates `state` from white's perspective.
pub fn position_value(state: &GameState) -> i32 {
    let mut value = 0;

    // Being in check is precarious even when no material hangs.
    if state.is_in_check(Player::White) {
        value -= CHECK_PENALTY;
    } else if state.is_in_check(Player::Black) {
        value += CHECK_PENALTY;
    }

    // Material, via the piece lists.
    for &pos in state.piece_list(Player::White) {
        if !pos.is_null() {
            if let Some(piece) = state.piece_at(pos) {
                value += piece_value(piece.kind);
            }
        }
    }
    for &pos in state.piece_list(Player::Black) {
        if !pos.is_null() {
            if let Some(piece) = state.piece_at(pos) {
                value -= piece_value(piece.kind);
            }
        }
    }

    // A retained castling right is worth a token amount: it keeps the
    // option of tucking the king away.
    value += state.can_castle_queenside(Player::White) as i32
        + state.can_castle_kingside(Player::White) as i32;
    value -= state.can_castle_queenside(Player::Black) as i32
        + state.can_castle_kingside(Player::Black) as i32;

    // King shelter: friendly pieces on adjacent squares.
    for dir in ROYAL_DIRECTIONS {
        let near_white = state.king(Player::White).offset(dir);
        if !near_white.is_null() {
            if let Some(piece) = state.piece_at(near_white) {
                if piece.player == Player::White {
                    value += KING_SHELTER_BONUS;
                }
            }
        }

        let near_black = state.king(Player::Black).offset(dir);
        if !near_black.is_null() {
            if let Some(piece) = state.piece_at(near_black) {
                if piece.player == Player::Black {
                    value -= KING_SHELTER_BONUS;
                }
            }
        }
    }

    // Central presence: the 4x4 middle of the board, with the four
    // innermost squares weighted higher than the surrounding ring.
    for file in 2..=5i8 {
        for rank in 2..=5i8 {
            let Some(piece) = state.piece_at(BoardPos::new(file, rank)) else {
                continue;
            };
            let ring = file == 2 || file == 5 || rank == 2 || rank == 5;
            let bonus = if ring { CENTER_RING_BONUS } else { CENTER_INNER_BONUS };
            value += match piece.player {
                Player::White => bonus,
                Player::Black => -bonus,
            };
        }
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GameState, Move};
    use crate::fen;
    use crate::move_gen::make_move;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(position_value(&GameState::new_initial()), 0);
    }

    #[test]
    fn material_up_scores_positive() {
        // White has an extra queen's worth after capturing on d5.
        let mut state = GameState::new_initial();
        for (from, to) in [
            ((4, 6), (4, 4)), // e4
            ((3, 1), (3, 3)), // d5
            ((4, 4), (3, 3)), // exd5
        ] {
            make_move(&mut state, Move::new(from.into(), to.into()), true);
        }
        let value = position_value(&state);
        assert!(
            (PAWN_VALUE - 20..=PAWN_VALUE + 20).contains(&value),
            "value {value} should be about one pawn"
        );
    }

    #[test]
    fn check_is_penalized() {
        // The fool's-mate final position: white is mated, black has a
        // queen deep in white's camp.
        let mated =
            fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 0").unwrap();
        let quiet =
            fen::parse("rnb1kbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 0").unwrap();
        // Same board minus the queen: removing her check and presence
        // must swing the score toward white by more than her material.
        assert!(position_value(&mated) < position_value(&quiet) - QUEEN_VALUE + 50);
    }

    #[test]
    fn central_occupation_is_rewarded() {
        let center = fen::parse("4k3/8/8/8/4P3/8/8/4K3 w - - 0 0").unwrap();
        let edge = fen::parse("4k3/8/8/8/8/8/8/P3K3 w - - 0 0").unwrap();
        assert!(position_value(&center) > position_value(&edge));
    }

    #[test]
    fn castling_rights_are_worth_a_token_amount() {
        let both = fen::parse("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 0").unwrap();
        let none = fen::parse("4k3/8/8/8/8/8/8/R3K2R w - - 0 0").unwrap();
        assert_eq!(position_value(&both) - position_value(&none), 2);
    }
}
