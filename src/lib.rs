//! # arcade-session
//!
//! Lifecycle control for a set of browser-style minigames: at most one game
//! runs at a time, and every game is torn down completely before the next
//! one starts.
//!
//! ## Design Principles
//!
//! 1. **One Owner**: the `SessionController` exclusively owns the running
//!    engine and its input adapter. Nothing else holds a reference to them.
//!
//! 2. **Mandatory Teardown**: `cleanup()` is a required method of
//!    `GameEngine`. Stopping a session cancels all scheduled work and removes
//!    every input listener before returning.
//!
//! 3. **Deterministic Frames**: engines advance only when the host calls
//!    `frame(dt)`. Commands queued before a frame apply in that frame.
//!
//! ## Modules
//!
//! - `core`: Variants, commands, configuration, errors, geometry, RNG
//! - `engine`: The `GameEngine` contract, work queue and frame state
//! - `games`: FallingBlocks, BoardStrategy, Shooter, ObstacleDodger, Breaker
//! - `input`: Raw events, per-game bindings and the input adapter
//! - `session`: Game registry and session controller
//! - `navigation`: Route table and the navigation guard

pub mod core;
pub mod engine;
pub mod games;
pub mod input;
pub mod navigation;
pub mod session;

// Re-export commonly used types
pub use crate::core::{ArcadeConfig, ArcadeError, Command, GameRng, GameVariant, Result};

pub use crate::engine::{EngineSnapshot, GameEngine, GameOutcome, WorkHandle, WorkQueue};

pub use crate::games::{BoardStrategy, Breaker, FallingBlocks, ObstacleDodger, Shooter};

pub use crate::input::{Bindings, InputAdapter, Key, RawEvent};

pub use crate::session::{
    FrameReport, GameRegistry, GameSession, SessionController, SessionEnd, SessionHandle,
    SessionStatus, SessionSummary,
};

pub use crate::navigation::{NavigationGuard, RouteTable, RouteTarget, Transition};
