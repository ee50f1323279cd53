//! Board model: squares, pieces, moves and the full game state.
//!
//! Coordinates are engine-oriented: `rank 0` is the top row of the
//! board as white sees it (black's home rank) and `rank 7` the bottom
//! (white's home rank). Files run 0..=7 left to right, so `(0, 7)` is
//! white's queenside rook square a1. Algebraic notation and bottom-
//! origin ranks exist only at the FEN and book boundaries.
//!
//! The state keeps several caches alongside the grid — per-player
//! piece lists, king squares and in-check flags — so that move
//! generation can iterate 16 entries instead of 64 squares and check
//! detection is a field read. [`make_move`](crate::move_gen::make_move)
//! maintains all of them.

use std::fmt::{self, Display, Formatter};

/// One side of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    /// Stable index for per-player arrays (white 0, black 1).
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// The kind of a piece, without its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    pub kind: PieceKind,
    pub player: Player,
}

impl Piece {
    #[inline]
    pub fn new(kind: PieceKind, player: Player) -> Piece {
        Piece { kind, player }
    }
}

/// A square, or a direction when used as an offset.
///
/// Both components are signed so a `BoardPos` can also describe a
/// movement delta such as `(-1, 0)`. Squares outside the board are
/// collapsed to the single [`NULL`](BoardPos::NULL) sentinel by
/// [`offset`](BoardPos::offset).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardPos {
    pub file: i8,
    pub rank: i8,
}

impl BoardPos {
    /// The "no square" sentinel.
    pub const NULL: BoardPos = BoardPos { file: 0xf, rank: 0xf };

    #[inline]
    pub fn new(file: i8, rank: i8) -> BoardPos {
        BoardPos { file, rank }
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self == BoardPos::NULL
    }

    /// Adds a delta, saturating to [`NULL`](BoardPos::NULL) when the
    /// result leaves the board.
    #[inline]
    pub fn offset(self, delta: BoardPos) -> BoardPos {
        let file = self.file + delta.file;
        let rank = self.rank + delta.rank;
        if !(0..8).contains(&file) || !(0..8).contains(&rank) {
            BoardPos::NULL
        } else {
            BoardPos { file, rank }
        }
    }
}

impl From<(i8, i8)> for BoardPos {
    #[inline]
    fn from((file, rank): (i8, i8)) -> BoardPos {
        BoardPos { file, rank }
    }
}

impl Display for BoardPos {
    /// Algebraic notation; engine ranks are top-origin, so rank 7
    /// prints as `1`.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("--");
        }
        write!(
            f,
            "{}{}",
            (b'a' + self.file as u8) as char,
            (b'0' + (8 - self.rank) as u8) as char
        )
    }
}

/// A half-move: source and destination squares.
///
/// Castling is encoded as the king moving two files; en passant as a
/// pawn moving diagonally onto an empty square. Promotion carries no
/// field because a pawn reaching the last rank always becomes a queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: BoardPos,
    pub to: BoardPos,
}

impl Move {
    #[inline]
    pub fn new(from: BoardPos, to: BoardPos) -> Move {
        Move { from, to }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Number of piece-list slots per player.
pub(crate) const PIECE_LIST_LEN: usize = 16;

/// Complete game state: the grid plus every derived cache the engine
/// relies on during search.
#[derive(Debug, Clone)]
pub struct GameState {
    /// File-major grid: `board[file][rank]`.
    board: [[Option<Piece>; 8]; 8],
    /// True when white is to move.
    pub white_to_move: bool,
    /// En-passant capture file available to each player, if any.
    enpassant_target: [Option<i8>; 2],
    /// Queenside (a-file rook) castling availability per player.
    castle_queenside: [bool; 2],
    /// Kingside (h-file rook) castling availability per player.
    castle_kingside: [bool; 2],
    /// Cached king squares per player.
    kings: [BoardPos; 2],
    /// Cached check status per player.
    in_check: [bool; 2],
    /// Half-moves played since the start of the game.
    pub ply: u32,
    /// Squares occupied by each player's pieces; null slots are vacant.
    piece_lists: [[BoardPos; PIECE_LIST_LEN]; 2],
    /// Zobrist hash of the position, or 0 for scratch states.
    pub hash: u64,
}

/// Back-rank piece order shared by both sides.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl PartialEq for GameState {
    /// Position equality. Piece lists compare as multisets: the slot
    /// order is an artifact of the moves (or the FEN scan) that built
    /// the state, not part of the position.
    fn eq(&self, other: &GameState) -> bool {
        let sorted = |list: &[BoardPos; PIECE_LIST_LEN]| {
            let mut entries: Vec<_> = list.iter().copied().filter(|p| !p.is_null()).collect();
            entries.sort_by_key(|p| (p.file, p.rank));
            entries
        };

        self.board == other.board
            && self.white_to_move == other.white_to_move
            && self.enpassant_target == other.enpassant_target
            && self.castle_queenside == other.castle_queenside
            && self.castle_kingside == other.castle_kingside
            && self.kings == other.kings
            && self.in_check == other.in_check
            && self.ply == other.ply
            && self.hash == other.hash
            && sorted(&self.piece_lists[0]) == sorted(&other.piece_lists[0])
            && sorted(&self.piece_lists[1]) == sorted(&other.piece_lists[1])
    }
}

impl Eq for GameState {}

impl GameState {
    /// An empty board with full castling rights and white to move.
    /// Kings are null until pieces are placed; used by the FEN parser.
    pub(crate) fn cleared() -> GameState {
        GameState {
            board: [[None; 8]; 8],
            white_to_move: true,
            enpassant_target: [None; 2],
            castle_queenside: [true; 2],
            castle_kingside: [true; 2],
            kings: [BoardPos::NULL; 2],
            in_check: [false; 2],
            ply: 0,
            piece_lists: [[BoardPos::NULL; PIECE_LIST_LEN]; 2],
            hash: 0,
        }
    }

    /// The standard starting position.
    pub fn new_initial() -> GameState {
        let mut state = GameState::cleared();

        for file in 0..8i8 {
            state.set_piece(
                BoardPos::new(file, 1),
                Some(Piece::new(PieceKind::Pawn, Player::Black)),
            );
            state.set_piece(
                BoardPos::new(file, 6),
                Some(Piece::new(PieceKind::Pawn, Player::White)),
            );
            state.set_piece(
                BoardPos::new(file, 0),
                Some(Piece::new(BACK_RANK[file as usize], Player::Black)),
            );
            state.set_piece(
                BoardPos::new(file, 7),
                Some(Piece::new(BACK_RANK[file as usize], Player::White)),
            );

            // Majors fill slots 0..8, pawns 8..16; pawns are likelier
            // to leave the board first, which keeps early piece-list
            // scans dense.
            let f = file as usize;
            state.piece_lists[Player::White.index()][f] = BoardPos::new(file, 7);
            state.piece_lists[Player::White.index()][f + 8] = BoardPos::new(file, 6);
            state.piece_lists[Player::Black.index()][f] = BoardPos::new(file, 0);
            state.piece_lists[Player::Black.index()][f + 8] = BoardPos::new(file, 1);
        }

        state.kings = [BoardPos::new(4, 7), BoardPos::new(4, 0)];
        state.hash = crate::hash::hash_state(&state);
        state
    }

    /// The player whose turn it is.
    #[inline]
    pub fn player_to_move(&self) -> Player {
        if self.white_to_move {
            Player::White
        } else {
            Player::Black
        }
    }

    /// The piece on `pos`, if any. `pos` must be a real square.
    #[inline]
    pub fn piece_at(&self, pos: BoardPos) -> Option<Piece> {
        debug_assert!(!pos.is_null());
        self.board[pos.file as usize][pos.rank as usize]
    }

    /// Puts `piece` on `pos`, replacing whatever was there. Does not
    /// touch the piece lists or any other cache.
    #[inline]
    pub fn set_piece(&mut self, pos: BoardPos, piece: Option<Piece>) {
        debug_assert!(!pos.is_null());
        self.board[pos.file as usize][pos.rank as usize] = piece;
    }

    /// Cached king square for `player`.
    #[inline]
    pub fn king(&self, player: Player) -> BoardPos {
        self.kings[player.index()]
    }

    #[inline]
    pub(crate) fn set_king(&mut self, player: Player, pos: BoardPos) {
        self.kings[player.index()] = pos;
    }

    /// Whether `player`'s king is currently in check.
    #[inline]
    pub fn is_in_check(&self, player: Player) -> bool {
        self.in_check[player.index()]
    }

    #[inline]
    pub(crate) fn set_in_check(&mut self, player: Player, in_check: bool) {
        self.in_check[player.index()] = in_check;
    }

    /// File onto which `player` may capture en passant, if the
    /// opponent just double-pushed a pawn.
    #[inline]
    pub fn enpassant_target(&self, player: Player) -> Option<i8> {
        self.enpassant_target[player.index()]
    }

    #[inline]
    pub(crate) fn set_enpassant_target(&mut self, player: Player, file: Option<i8>) {
        self.enpassant_target[player.index()] = file;
    }

    /// Whether `player` may still castle with the a-file rook.
    #[inline]
    pub fn can_castle_queenside(&self, player: Player) -> bool {
        self.castle_queenside[player.index()]
    }

    /// Whether `player` may still castle with the h-file rook.
    #[inline]
    pub fn can_castle_kingside(&self, player: Player) -> bool {
        self.castle_kingside[player.index()]
    }

    #[inline]
    pub(crate) fn set_castle_queenside(&mut self, player: Player, allowed: bool) {
        self.castle_queenside[player.index()] = allowed;
    }

    #[inline]
    pub(crate) fn set_castle_kingside(&mut self, player: Player, allowed: bool) {
        self.castle_kingside[player.index()] = allowed;
    }

    /// The squares `player`'s pieces stand on; null slots are vacant.
    #[inline]
    pub fn piece_list(&self, player: Player) -> &[BoardPos; PIECE_LIST_LEN] {
        &self.piece_lists[player.index()]
    }

    /// Rewrites `from` to `to` in `player`'s piece list. Passing
    /// [`BoardPos::NULL`] as `to` records a capture.
    pub(crate) fn relocate_piece(&mut self, player: Player, from: BoardPos, to: BoardPos) {
        for slot in self.piece_lists[player.index()].iter_mut() {
            if *slot == from {
                *slot = to;
            }
        }
    }

    /// Appends a square to `player`'s piece list; used while building
    /// a position from FEN. Fails when all 16 slots are taken.
    pub(crate) fn push_piece_list(&mut self, player: Player, pos: BoardPos) -> bool {
        for slot in self.piece_lists[player.index()].iter_mut() {
            if slot.is_null() {
                *slot = pos;
                return true;
            }
        }
        false
    }
}
