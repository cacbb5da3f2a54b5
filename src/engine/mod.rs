//! Engine contract and the frame machinery shared by every game.
//!
//! Games implement `GameEngine` to define:
//! - How they start and what work they schedule
//! - How one frame advances their rules
//! - How they are torn down
//!
//! The session controller drives engines through this trait only and
//! never interprets game-specific state.

pub mod contract;
pub mod frame;
pub mod schedule;

pub use contract::{EngineSnapshot, GameEngine, GameOutcome};
pub use frame::{substeps, Advance, CommandBuffer, FrameState};
pub use schedule::{WorkHandle, WorkQueue};
