//! Human move submission.

use crate::api::Engine;
use crate::board::{BoardPos, Move};
use crate::error::EngineError;
use crate::move_gen;

impl Engine {
    /// Validates and applies a move for the side to move.
    ///
    /// Anything illegal — wrong side, bad shape, exposing the king —
    /// is rejected with [`EngineError::IllegalMove`] and the position
    /// stays as it was. The caller re-prompts; no distinction between
    /// the ways a move can be illegal is reported, matching how a
    /// board UI treats a misdrop.
    pub fn submit_move(&mut self, from: BoardPos, to: BoardPos) -> Result<(), EngineError> {
        let mv = Move::new(from, to);
        if !move_gen::is_move_legal(&self.state, mv) {
            return Err(EngineError::IllegalMove { from, to });
        }
        move_gen::make_move(&mut self.state, mv, true);
        Ok(())
    }

    /// Whether a move would be accepted right now. Lets a UI
    /// highlight legal targets without attempting the move.
    pub fn is_legal(&self, from: BoardPos, to: BoardPos) -> bool {
        move_gen::is_move_legal(&self.state, Move::new(from, to))
    }
}
