//! Game-neutral commands produced by input adapters.
//!
//! Engines never see raw device events. The adapter turns key and pointer
//! events into `Command`s and each engine interprets the subset it cares
//! about, ignoring the rest.

use serde::{Deserialize, Serialize};

/// Direction-free intent delivered to an engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Start moving (or step) left.
    Left,
    /// Start moving (or step) right.
    Right,
    /// Step up (cursor games).
    Up,
    /// Step down / soft drop.
    Down,
    /// Release of a held horizontal key.
    StopHorizontal,
    /// Rotate the active piece clockwise.
    Rotate,
    /// Hard drop / confirm.
    Drop,
    /// Shoot.
    Fire,
    /// Jump.
    Jump,
    /// Place a mark at a board cell.
    Place { row: usize, col: usize },
    /// Pointer-driven horizontal aim, in play-area pixels.
    Aim { x: f32 },
    /// Toggle pause.
    Pause,
}
