//! Engine lifecycle: construction, new games, FEN in and out.

use crate::api::Engine;
use crate::board::GameState;
use crate::book::OpeningBook;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fen;
use crate::threadpool::ThreadPool;
use crate::tt::TranspositionTable;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

impl Engine {
    /// Builds an engine: loads the opening book, allocates the
    /// transposition table, starts the worker pool and sets up the
    /// starting position.
    ///
    /// A missing, empty or malformed book is an error — the book is a
    /// required asset, and an engine without one would silently play
    /// weaker openings.
    pub fn new(config: EngineConfig) -> Result<Engine, EngineError> {
        let book = OpeningBook::load(&config.book_path)?;

        let pool = match config.workers {
            Some(workers) => ThreadPool::with_workers(workers),
            None => ThreadPool::new(),
        };

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Engine {
            state: GameState::new_initial(),
            tt: Arc::new(TranspositionTable::new()),
            book,
            pool,
            rng,
            config,
            search_started: None,
        })
    }

    /// Starts a fresh game: initial position, empty table, no search
    /// in flight.
    pub fn new_game(&mut self) {
        self.state = GameState::new_initial();
        self.tt.clear();
        self.search_started = None;
        tracing::debug!("new game");
    }

    /// Replaces the position with one parsed from FEN. On a parse
    /// error the current position is untouched. A successful load
    /// clears the table, since its entries describe lines of the
    /// abandoned game.
    pub fn load_fen(&mut self, fen_str: &str) -> Result<(), EngineError> {
        let state = fen::parse(fen_str)?;
        self.state = state;
        self.tt.clear();
        self.search_started = None;
        Ok(())
    }

    /// The current position as FEN.
    pub fn to_fen(&self) -> String {
        fen::serialize(&self.state)
    }

    /// The current position, for inspection.
    pub fn position(&self) -> &GameState {
        &self.state
    }
}
