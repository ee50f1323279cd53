//! FEN parsing and serialization.
//!
//! The boundary format between the engine and the outside world.
//! Engine ranks are top-origin while FEN ranks are bottom-origin, but
//! FEN *strings* happen to list ranks from black's side first, so the
//! placement section maps straight onto engine rank 0..=7 in order.
//!
//! Only the first four FEN fields carry state the engine tracks. The
//! halfmove clock and fullmove number are accepted and ignored on
//! parse, and serialized as `0 0`.

use crate::board::{BoardPos, GameState, Piece, PieceKind, Player};
use crate::error::FenError;
use crate::hash::hash_state;
use crate::move_gen::is_square_attacked;
use std::fmt::Write;

fn parse_piece(c: char) -> Option<Piece> {
    let player = if c.is_ascii_lowercase() {
        Player::Black
    } else {
        Player::White
    };
    let kind = match c.to_ascii_uppercase() {
        'P' => PieceKind::Pawn,
        'N' => PieceKind::Knight,
        'B' => PieceKind::Bishop,
        'R' => PieceKind::Rook,
        'Q' => PieceKind::Queen,
        'K' => PieceKind::King,
        _ => return None,
    };
    Some(Piece::new(kind, player))
}

fn piece_char(piece: Piece) -> char {
    let c = match piece.kind {
        PieceKind::King => 'K',
        PieceKind::Queen => 'Q',
        PieceKind::Rook => 'R',
        PieceKind::Bishop => 'B',
        PieceKind::Knight => 'N',
        PieceKind::Pawn => 'P',
    };
    match piece.player {
        Player::White => c,
        Player::Black => c.to_ascii_lowercase(),
    }
}

/// Parses a FEN string into a [`GameState`].
///
/// On success the state carries recomputed check flags and hash; the
/// ply counter starts at 0 because FEN does not carry it in a form
/// the engine uses. Errors leave nothing half-built — the caller's
/// state is only replaced on `Ok`.
pub fn parse(fen: &str) -> Result<GameState, FenError> {
    let mut state = GameState::cleared();
    let mut chars = fen.chars();

    // Piece placement: files left to right, ranks from black's home
    // row, which is engine rank 0.
    let mut file: i8 = 0;
    let mut rank: i8 = 0;
    loop {
        let c = chars.next().ok_or(FenError::UnexpectedEnd)?;

        if let Some(piece) = parse_piece(c) {
            if file == 8 {
                return Err(FenError::InvalidPlacement(c));
            }
            let pos = BoardPos::new(file, rank);
            state.set_piece(pos, Some(piece));
            file += 1;

            if piece.kind == PieceKind::King {
                if !state.king(piece.player).is_null() {
                    return Err(FenError::DuplicateKing(piece.player));
                }
                state.set_king(piece.player, pos);
            }

            if !state.push_piece_list(piece.player, pos) {
                return Err(FenError::TooManyPieces(piece.player));
            }
        } else if c == '/' {
            rank += 1;
            file = 0;
            if rank == 8 {
                return Err(FenError::InvalidPlacement(c));
            }
        } else if c == ' ' {
            break;
        } else if let Some(run) = c.to_digit(10) {
            file += run as i8;
            if file > 8 {
                return Err(FenError::InvalidPlacement(c));
            }
        } else {
            return Err(FenError::InvalidPlacement(c));
        }
    }

    if file != 8 || rank != 7 {
        return Err(FenError::IncompleteBoard);
    }

    // Side to move.
    state.white_to_move = match chars.next() {
        Some('w') => true,
        Some('b') => false,
        Some(_) => return Err(FenError::InvalidSideToMove),
        None => return Err(FenError::UnexpectedEnd),
    };
    if chars.next() != Some(' ') {
        return Err(FenError::MissingSeparator);
    }

    // Castling availability: '-' or any prefix-ordered subset of KQkq.
    state.set_castle_kingside(Player::White, false);
    state.set_castle_queenside(Player::White, false);
    state.set_castle_kingside(Player::Black, false);
    state.set_castle_queenside(Player::Black, false);

    let mut next = chars.next().ok_or(FenError::UnexpectedEnd)?;
    if next == '-' {
        next = chars.next().ok_or(FenError::UnexpectedEnd)?;
    } else {
        for (c, player, kingside) in [
            ('K', Player::White, true),
            ('Q', Player::White, false),
            ('k', Player::Black, true),
            ('q', Player::Black, false),
        ] {
            if next == c {
                if kingside {
                    state.set_castle_kingside(player, true);
                } else {
                    state.set_castle_queenside(player, true);
                }
                next = chars.next().ok_or(FenError::UnexpectedEnd)?;
            }
        }
    }
    if next != ' ' {
        return Err(FenError::MissingSeparator);
    }

    // En passant target square. The rank digit tells whose capture it
    // is: a pawn stopped on rank 3 was white's double push, so black
    // holds the capture; rank 6 the reverse.
    next = chars.next().ok_or(FenError::UnexpectedEnd)?;
    if next == '-' {
        // No target.
    } else {
        let file = (next as i32) - ('a' as i32);
        if !(0..8).contains(&file) {
            return Err(FenError::InvalidEnPassant);
        }
        match chars.next() {
            Some('3') => state.set_enpassant_target(Player::Black, Some(file as i8)),
            Some('6') => state.set_enpassant_target(Player::White, Some(file as i8)),
            Some(_) => return Err(FenError::InvalidEnPassant),
            None => return Err(FenError::UnexpectedEnd),
        }
    }
    if chars.next() != Some(' ') {
        return Err(FenError::MissingSeparator);
    }

    // The halfmove clock and fullmove number follow; the engine does
    // not track them, so the remainder is accepted unread.

    for player in [Player::White, Player::Black] {
        if state.king(player).is_null() {
            return Err(FenError::MissingKing(player));
        }
    }

    let white_in_check = is_square_attacked(&state, state.king(Player::White), Player::Black);
    let black_in_check = is_square_attacked(&state, state.king(Player::Black), Player::White);
    state.set_in_check(Player::White, white_in_check);
    state.set_in_check(Player::Black, black_in_check);

    state.hash = hash_state(&state);
    Ok(state)
}

/// Serializes a [`GameState`] to FEN.
///
/// The halfmove clock and fullmove number are emitted as `0 0`; the
/// en-passant square is the one available to the side to move, which
/// is the only one FEN can express.
pub fn serialize(state: &GameState) -> String {
    let mut fen = String::with_capacity(90);

    for rank in 0..8i8 {
        let mut empty_run = 0;
        for file in 0..8i8 {
            match state.piece_at(BoardPos::new(file, rank)) {
                Some(piece) => {
                    if empty_run > 0 {
                        let _ = write!(fen, "{empty_run}");
                        empty_run = 0;
                    }
                    fen.push(piece_char(piece));
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            let _ = write!(fen, "{empty_run}");
        }
        fen.push(if rank == 7 { ' ' } else { '/' });
    }

    fen.push(if state.white_to_move { 'w' } else { 'b' });
    fen.push(' ');

    let rights = [
        (state.can_castle_kingside(Player::White), 'K'),
        (state.can_castle_queenside(Player::White), 'Q'),
        (state.can_castle_kingside(Player::Black), 'k'),
        (state.can_castle_queenside(Player::Black), 'q'),
    ];
    if rights.iter().any(|&(available, _)| available) {
        for (available, c) in rights {
            if available {
                fen.push(c);
            }
        }
    } else {
        fen.push('-');
    }
    fen.push(' ');

    let side = state.player_to_move();
    match state.enpassant_target(side) {
        Some(file) => {
            fen.push((b'a' + file as u8) as char);
            fen.push(if state.white_to_move { '6' } else { '3' });
        }
        None => fen.push('-'),
    }

    fen.push_str(" 0 0");
    fen
}
