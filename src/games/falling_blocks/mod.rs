//! Falling-block puzzle.
//!
//! - Pieces come from a shuffled bag of the seven tetrominoes
//! - Gravity is a repeating timer that speeds up every ten cleared rows
//! - Full rows are removed and the board compacted in a single step
//! - A spawn that overlaps locked cells ends the game

mod game;
mod pieces;

pub use game::{Cell, FallingBlocks, Phase};
pub use pieces::{Piece, PieceKind};
