//! Error types for engine operations.

use crate::board::BoardPos;
use thiserror::Error;

/// Errors surfaced by the [`Engine`](crate::Engine) facade.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A submitted move failed the legality check.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: BoardPos, to: BoardPos },

    /// A FEN string could not be parsed. The engine position is left
    /// untouched when this is returned.
    #[error("invalid FEN: {0}")]
    InvalidFen(#[from] FenError),

    /// The opening book could not be loaded. Fatal at startup: the
    /// engine refuses to construct without its book.
    #[error("opening book: {0}")]
    Book(#[from] BookError),
}

/// The reason a FEN string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("invalid character {0:?} in piece placement")]
    InvalidPlacement(char),

    #[error("piece placement does not cover the board")]
    IncompleteBoard,

    #[error("side to move must be 'w' or 'b'")]
    InvalidSideToMove,

    #[error("invalid en passant target square")]
    InvalidEnPassant,

    #[error("expected field separator")]
    MissingSeparator,

    #[error("{0:?} has no king")]
    MissingKing(crate::board::Player),

    #[error("{0:?} has more than one king")]
    DuplicateKing(crate::board::Player),

    #[error("{0:?} has more than 16 pieces")]
    TooManyPieces(crate::board::Player),
}

/// The reason the opening book failed to load.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("failed to read book file: {0}")]
    Io(#[from] std::io::Error),

    #[error("book contains no records")]
    Empty,

    #[error("book records are not sorted by hash")]
    Unsorted,
}
