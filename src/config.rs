//! Engine configuration.

use crate::constants::DEFAULT_SEARCH_BUDGET;
use std::path::PathBuf;
use std::time::Duration;

/// Construction-time settings for an [`Engine`](crate::Engine).
///
/// The default configuration is what a desktop frontend wants: the
/// book at its conventional path, two seconds of thinking time, one
/// worker per logical core and a randomly seeded book RNG.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Polyglot book file. Loading it is required; a missing or
    /// invalid book fails [`Engine::new`](crate::Engine::new).
    pub book_path: PathBuf,

    /// Wall-clock budget per engine move. Searches abort
    /// cooperatively once it lapses.
    pub search_budget: Duration,

    /// Worker threads for the search pool. `None` detects the
    /// machine's parallelism (overridable via `CHESS_NPROC`);
    /// `Some(0)` disables the pool entirely and runs searches inline
    /// on the caller, which is the deterministic mode.
    pub workers: Option<usize>,

    /// Seed for the book-move RNG. `None` seeds from entropy; fixing
    /// it makes book choices reproducible.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            book_path: PathBuf::from("res/opening_book.bin"),
            search_budget: DEFAULT_SEARCH_BUDGET,
            workers: None,
            rng_seed: None,
        }
    }
}
