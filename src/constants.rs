//! Engine-wide tuning constants.
//!
//! Evaluation weights follow the classic centipawn scheme; search and
//! table sizes bound the resources a single engine instance may use.

use std::time::Duration;

/// Piece values in centipawns, used by the static evaluator.
///
/// The king's value dwarfs everything else so that no exchange
/// sequence can ever look profitable against losing the king.
pub const KING_VALUE: i32 = 20_000;
pub const QUEEN_VALUE: i32 = 900;
pub const ROOK_VALUE: i32 = 500;
pub const BISHOP_VALUE: i32 = 330;
pub const KNIGHT_VALUE: i32 = 320;
pub const PAWN_VALUE: i32 = 100;

/// Evaluation malus for the side whose king is in check.
pub const CHECK_PENALTY: i32 = 30;

/// Evaluation bonus per friendly piece adjacent to the own king.
pub const KING_SHELTER_BONUS: i32 = 10;

/// Evaluation bonus for occupying one of the four innermost squares.
pub const CENTER_INNER_BONUS: i32 = 5;

/// Evaluation bonus for occupying the ring around the inner center.
pub const CENTER_RING_BONUS: i32 = 2;

/// Score returned when the side to move has been checkmated. The
/// opponent being mated scores the negation. All legitimate search
/// scores lie strictly inside `-MATE_VALUE..=MATE_VALUE`, so negating
/// them can never overflow.
pub const MATE_VALUE: i32 = 1_000_000;

/// The deepest iteration the iterative-deepening driver will enqueue.
pub const MAX_SEARCH_DEPTH: u8 = 30;

/// Wall-clock budget for one engine move, unless overridden in
/// [`EngineConfig`](crate::EngineConfig).
pub const DEFAULT_SEARCH_BUDGET: Duration = Duration::from_secs(2);

/// Number of slots in the transposition table. Power of two so the
/// hash can be masked instead of divided.
pub const TT_SIZE: usize = 1 << 20;

/// Transposition-table depth sentinel marking an opening-book move.
/// No search ever reaches this depth, so the facade can distinguish a
/// book answer from an in-progress search.
pub const BOOK_ENTRY_DEPTH: u8 = u8::MAX;

/// Book lookups only happen this early in the game (in plies).
pub const BOOK_PLY_LIMIT: u32 = 5;

/// Upper bound on legal destinations for a single piece (a queen in
/// the open reaches 27 squares).
pub const PIECE_MOVES_MAX: usize = 27;

/// Capacity of the worker pool's task queue. Enqueueing onto a full
/// queue runs the task inline on the caller instead of blocking.
pub const TASK_QUEUE_CAPACITY: usize = 256;

/// Environment variable overriding the detected worker count.
pub const NPROC_ENV_VAR: &str = "CHESS_NPROC";
