//! Move patterns, legality and state mutation.
//!
//! The rules are split by concern: [`attack`] answers "is this square
//! attacked", [`legality`] validates single moves, [`apply`] performs
//! them. This module holds the shared direction tables, per-piece
//! destination generation and the game-over predicates built on top.
//!
//! Generation works forward from the piece lists: each piece walks its
//! movement patterns and keeps the destinations that pass the full
//! legality check. Attack detection works in reverse, casting rays
//! outward from the square in question. Both directions share the
//! tables below.

mod apply;
mod attack;
mod legality;

pub use apply::make_move;
pub use attack::is_square_attacked;
pub use legality::{is_move_legal, is_move_possible};

use crate::board::{BoardPos, GameState, PieceKind, Player};
use crate::constants::PIECE_MOVES_MAX;
use arrayvec::ArrayVec;

/// Unit steps in every compass direction; the movement pattern of the
/// king and, repeated, the queen.
pub(crate) const ROYAL_DIRECTIONS: [BoardPos; 8] = [
    BoardPos { file: 0, rank: 1 },
    BoardPos { file: 1, rank: 1 },
    BoardPos { file: 1, rank: 0 },
    BoardPos { file: 0, rank: -1 },
    BoardPos { file: -1, rank: -1 },
    BoardPos { file: -1, rank: 0 },
    BoardPos { file: -1, rank: 1 },
    BoardPos { file: 1, rank: -1 },
];

pub(crate) const ROOK_DIRECTIONS: [BoardPos; 4] = [
    BoardPos { file: 0, rank: 1 },
    BoardPos { file: 0, rank: -1 },
    BoardPos { file: -1, rank: 0 },
    BoardPos { file: 1, rank: 0 },
];

pub(crate) const BISHOP_DIRECTIONS: [BoardPos; 4] = [
    BoardPos { file: 1, rank: 1 },
    BoardPos { file: -1, rank: -1 },
    BoardPos { file: 1, rank: -1 },
    BoardPos { file: -1, rank: 1 },
];

pub(crate) const KNIGHT_JUMPS: [BoardPos; 8] = [
    BoardPos { file: 2, rank: 1 },
    BoardPos { file: 2, rank: -1 },
    BoardPos { file: -2, rank: 1 },
    BoardPos { file: -2, rank: -1 },
    BoardPos { file: 1, rank: 2 },
    BoardPos { file: -1, rank: 2 },
    BoardPos { file: 1, rank: -2 },
    BoardPos { file: -1, rank: -2 },
];

/// White pawn steps: the two captures, the push and the double push.
/// Black negates them.
pub(crate) const PAWN_STEPS: [BoardPos; 4] = [
    BoardPos { file: 1, rank: -1 },
    BoardPos { file: -1, rank: -1 },
    BoardPos { file: 0, rank: -1 },
    BoardPos { file: 0, rank: -2 },
];

/// Starting squares of the rooks and kings, used for castling
/// bookkeeping. Indexed by [`Player::index`].
pub(crate) const ROOK_START_QUEENSIDE: [BoardPos; 2] =
    [BoardPos { file: 0, rank: 7 }, BoardPos { file: 0, rank: 0 }];
pub(crate) const ROOK_START_KINGSIDE: [BoardPos; 2] =
    [BoardPos { file: 7, rank: 7 }, BoardPos { file: 7, rank: 0 }];
pub(crate) const KING_START: [BoardPos; 2] =
    [BoardPos { file: 4, rank: 7 }, BoardPos { file: 4, rank: 0 }];

/// Every legal destination for the piece standing on `from`.
///
/// An empty result for an empty square. A single piece never has more
/// than [`PIECE_MOVES_MAX`] destinations, so the buffer lives on the
/// stack.
pub fn legal_destinations(
    state: &GameState,
    from: BoardPos,
) -> ArrayVec<BoardPos, PIECE_MOVES_MAX> {
    let mut dest = ArrayVec::new();
    let Some(piece) = state.piece_at(from) else {
        return dest;
    };

    let mut try_push = |to: BoardPos, dest: &mut ArrayVec<BoardPos, PIECE_MOVES_MAX>| {
        if !to.is_null() && is_move_legal(state, crate::board::Move { from, to }) {
            dest.push(to);
        }
    };

    match piece.kind {
        PieceKind::King => {
            for dir in ROYAL_DIRECTIONS {
                try_push(from.offset(dir), &mut dest);
            }
            // Castling only ever starts from the king's home square.
            if from == KING_START[piece.player.index()] {
                for dir in [BoardPos::new(2, 0), BoardPos::new(-2, 0)] {
                    try_push(from.offset(dir), &mut dest);
                }
            }
        }
        PieceKind::Queen => walk_rays(from, &ROYAL_DIRECTIONS, &mut try_push, &mut dest),
        PieceKind::Rook => walk_rays(from, &ROOK_DIRECTIONS, &mut try_push, &mut dest),
        PieceKind::Bishop => walk_rays(from, &BISHOP_DIRECTIONS, &mut try_push, &mut dest),
        PieceKind::Knight => {
            for dir in KNIGHT_JUMPS {
                try_push(from.offset(dir), &mut dest);
            }
        }
        PieceKind::Pawn => {
            for mut dir in PAWN_STEPS {
                if piece.player == Player::Black {
                    dir.file = -dir.file;
                    dir.rank = -dir.rank;
                }
                try_push(from.offset(dir), &mut dest);
            }
        }
    }

    dest
}

/// Walks each ray square by square, offering every square on it to the
/// legality check; blocked continuations fail that check.
fn walk_rays(
    from: BoardPos,
    directions: &[BoardPos],
    try_push: &mut impl FnMut(BoardPos, &mut ArrayVec<BoardPos, PIECE_MOVES_MAX>),
    dest: &mut ArrayVec<BoardPos, PIECE_MOVES_MAX>,
) {
    for &dir in directions {
        let mut to = from.offset(dir);
        while !to.is_null() {
            try_push(to, dest);
            to = to.offset(dir);
        }
    }
}

/// Whether `player` has at least one legal move.
pub fn player_has_legal_move(state: &GameState, player: Player) -> bool {
    state
        .piece_list(player)
        .iter()
        .filter(|pos| !pos.is_null())
        .any(|&pos| !legal_destinations(state, pos).is_empty())
}

/// Whether `player` is checkmated: in check with no legal reply.
pub fn is_checkmated(state: &GameState, player: Player) -> bool {
    state.is_in_check(player) && !player_has_legal_move(state, player)
}

/// Whether the game is drawn by stalemate: the side to move is not in
/// check but has no legal move.
pub fn is_stalemate(state: &GameState) -> bool {
    let to_move = state.player_to_move();
    !state.is_in_check(to_move) && !player_has_legal_move(state, to_move)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Move, Piece};
    use crate::fen;
    use crate::test_support::{all_legal_moves, random_playout};
    use proptest::prelude::ProptestConfig;
    use test_strategy::proptest;

    #[test]
    fn twenty_legal_moves_in_the_initial_position() {
        let state = GameState::new_initial();
        assert_eq!(all_legal_moves(&state).len(), 20);
    }

    #[test]
    fn initial_position_is_not_over() {
        let state = GameState::new_initial();
        assert!(!is_checkmated(&state, Player::White));
        assert!(!is_checkmated(&state, Player::Black));
        assert!(!is_stalemate(&state));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut state = GameState::new_initial();
        for (from, to) in [
            ((5, 6), (5, 5)), // f3
            ((4, 1), (4, 3)), // e5
            ((6, 6), (6, 4)), // g4
            ((3, 0), (7, 4)), // Qh4#
        ] {
            let mv = Move::new(from.into(), to.into());
            assert!(is_move_legal(&state, mv), "{mv}");
            make_move(&mut state, mv, true);
        }
        assert!(state.is_in_check(Player::White));
        assert!(is_checkmated(&state, Player::White));
        assert!(!is_stalemate(&state));
    }

    #[test]
    fn bare_kings_corner_stalemate() {
        // Black to move, king cornered by king and queen: stalemate.
        let state = fen::parse("7k/5Q2/6K1/8/8/8/8/8 b - - 0 0").unwrap();
        assert!(!state.is_in_check(Player::Black));
        assert!(is_stalemate(&state));
        assert!(!is_checkmated(&state, Player::Black));
    }

    #[proptest(ProptestConfig { cases: 24, ..ProptestConfig::default() })]
    fn check_flags_agree_with_attack_detection(
        seed: u64,
        #[strategy(0usize..60)] plies: usize,
    ) {
        let state = random_playout(seed, plies);
        for player in [Player::White, Player::Black] {
            assert_eq!(
                state.is_in_check(player),
                is_square_attacked(&state, state.king(player), player.opponent())
            );
        }
    }

    #[proptest(ProptestConfig { cases: 24, ..ProptestConfig::default() })]
    fn piece_lists_mirror_the_grid_after_playouts(
        seed: u64,
        #[strategy(0usize..60)] plies: usize,
    ) {
        let state = random_playout(seed, plies);
        for player in [Player::White, Player::Black] {
            // Every list entry points at a piece of that color.
            let mut listed: Vec<_> = state
                .piece_list(player)
                .iter()
                .copied()
                .filter(|p| !p.is_null())
                .collect();
            listed.sort_by_key(|p| (p.file, p.rank));
            listed.dedup();

            // Every occupied square of that color appears in the list.
            let mut occupied = Vec::new();
            for file in 0..8i8 {
                for rank in 0..8i8 {
                    let pos = BoardPos::new(file, rank);
                    if let Some(Piece { player: p, .. }) = state.piece_at(pos) {
                        if p == player {
                            occupied.push(pos);
                        }
                    }
                }
            }
            occupied.sort_by_key(|p| (p.file, p.rank));
            assert_eq!(listed, occupied);
        }
    }

    #[proptest(ProptestConfig { cases: 16, ..ProptestConfig::default() })]
    fn exactly_one_king_per_side_after_playouts(
        seed: u64,
        #[strategy(0usize..80)] plies: usize,
    ) {
        let state = random_playout(seed, plies);
        for player in [Player::White, Player::Black] {
            let mut kings = 0;
            for file in 0..8i8 {
                for rank in 0..8i8 {
                    if state.piece_at(BoardPos::new(file, rank))
                        == Some(Piece::new(PieceKind::King, player))
                    {
                        kings += 1;
                        assert_eq!(state.king(player), BoardPos::new(file, rank));
                    }
                }
            }
            assert_eq!(kings, 1);
        }
    }
}
