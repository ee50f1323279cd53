//! # fianchetto
//!
//! A chess engine core: board model, move generation and legality,
//! negamax search with alpha-beta pruning and iterative deepening, a
//! concurrent transposition table shared by a Lazy-SMP worker pool, and
//! a Polyglot opening book.
//!
//! The crate deliberately ends at the engine boundary. Rendering, input
//! handling and move logs belong to the embedding application; the
//! [`Engine`] facade exposes everything such an application needs:
//!
//! ```no_run
//! use fianchetto::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! engine.submit_move((4, 6).into(), (4, 4).into())?; // e2e4
//! engine.request_engine_move();
//! let reply = loop {
//!     if let Some(mv) = engine.poll_engine_move() {
//!         break mv;
//!     }
//!     std::thread::sleep(std::time::Duration::from_millis(10));
//! };
//! println!("engine plays {reply}");
//! # Ok::<(), fianchetto::EngineError>(())
//! ```
//!
//! Coordinates are engine-oriented: rank 0 is the top row (black's
//! home rank), rank 7 the bottom. FEN strings and Polyglot book files
//! use bottom-origin ranks and are translated at the boundary.

pub mod api;
pub mod board;
pub mod book;
pub mod config;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod fen;
pub mod hash;
pub mod move_gen;
pub mod search;
pub mod threadpool;
pub mod tt;

pub use api::{Engine, GameResult};
pub use board::{BoardPos, GameState, Move, Piece, PieceKind, Player};
pub use config::EngineConfig;
pub use error::{BookError, EngineError, FenError};
