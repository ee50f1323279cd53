//! The engine facade.
//!
//! [`Engine`] owns everything a game session needs: the current
//! position, the transposition table the workers share, the opening
//! book, the worker pool and the book RNG. Consumers drive it with a
//! small synchronous API; only the search itself is asynchronous, in
//! the request/poll style a frame-driven frontend wants:
//!
//! - [`Engine::request_engine_move`] starts thinking and returns;
//! - [`Engine::poll_engine_move`] is called once per frame until the
//!   move is ready, at which point it is applied and returned.

mod game;
mod moves;
mod state;

pub use state::GameResult;

use crate::board::GameState;
use crate::book::OpeningBook;
use crate::config::EngineConfig;
use crate::threadpool::ThreadPool;
use crate::tt::TranspositionTable;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;

/// A complete engine instance. See the [module docs](self).
pub struct Engine {
    state: GameState,
    tt: Arc<TranspositionTable>,
    book: OpeningBook,
    pool: ThreadPool,
    rng: StdRng,
    config: EngineConfig,
    /// Set while a search is in flight; cleared when polled out.
    search_started: Option<Instant>,
}
