//! Asynchronous move generation and game-over queries.

use crate::api::Engine;
use crate::board::{Move, Player};
use crate::constants::{BOOK_ENTRY_DEPTH, BOOK_PLY_LIMIT};
use crate::move_gen;
use crate::search;
use crate::tt::{Bound, TtEntry};
use rand::seq::SliceRandom;
use std::time::Instant;

/// Outcome of the game as it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw,
}

impl Engine {
    /// Starts computing a move for the side to move and returns
    /// immediately (with a threaded pool). The result is delivered
    /// through [`poll_engine_move`](Engine::poll_engine_move).
    ///
    /// Early in the game the opening book is consulted first; a
    /// usable book move skips the search entirely by writing the
    /// answer straight into the transposition table with a sentinel
    /// depth.
    pub fn request_engine_move(&mut self) {
        let started_at = Instant::now();
        self.search_started = Some(started_at);

        // Nothing may evict the slot the answer will be read from.
        self.tt.set_protected(self.state.hash);

        if self.state.ply <= BOOK_PLY_LIMIT {
            if let Some(mv) = self.pick_book_move() {
                tracing::info!(%mv, "playing from the opening book");
                self.tt.put(TtEntry {
                    hash: self.state.hash,
                    best_move: Some(mv),
                    depth: BOOK_ENTRY_DEPTH,
                    value: 0,
                    bound: Bound::Exact,
                });
                return;
            }
        }

        search::dispatch_search(
            &self.state,
            &self.tt,
            &self.pool,
            started_at,
            self.config.search_budget,
        );
    }

    /// A legal book move for the current position, if the book knows
    /// one. The draw is uniform among the recorded responses; the
    /// legality check guards against a hash collision pointing at a
    /// different position's moves.
    fn pick_book_move(&mut self) -> Option<Move> {
        let moves = self.book.lookup_position(&self.state)?;
        let mv = *moves.choose(&mut self.rng)?;
        if move_gen::is_move_legal(&self.state, mv) {
            Some(mv)
        } else {
            tracing::warn!(%mv, "book move illegal here; hash collision, searching instead");
            None
        }
    }

    /// Collects the engine's move once it is ready, applies it to the
    /// position and returns it.
    ///
    /// `None` means "still thinking" — or that no search is in
    /// flight, or that the game is already over. The move is ready
    /// when the opening book answered, or when the time budget has
    /// lapsed, at which point the deepest completed iteration owns
    /// the table entry.
    pub fn poll_engine_move(&mut self) -> Option<Move> {
        let started_at = self.search_started?;
        let entry = self.tt.get(self.state.hash)?;

        let book_answer = entry.depth == BOOK_ENTRY_DEPTH;
        let budget_spent = started_at.elapsed() >= self.config.search_budget;
        if !book_answer && !budget_spent {
            return None;
        }

        // The search is over either way.
        self.search_started = None;

        // No best move after a full budget means there was nothing to
        // play — the game ended before the request.
        let mv = entry.best_move?;

        tracing::info!(%mv, depth = entry.depth, value = entry.value, "engine move ready");
        move_gen::make_move(&mut self.state, mv, true);
        Some(mv)
    }

    /// The game's outcome in the current position.
    pub fn game_result(&self) -> GameResult {
        if move_gen::is_checkmated(&self.state, Player::White) {
            GameResult::BlackWins
        } else if move_gen::is_checkmated(&self.state, Player::Black) {
            GameResult::WhiteWins
        } else if move_gen::is_stalemate(&self.state) {
            GameResult::Draw
        } else {
            GameResult::Ongoing
        }
    }
}
