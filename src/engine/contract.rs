//! The run/stop contract every minigame implements.
//!
//! The session controller only ever talks to games through `GameEngine`:
//! - `start`: allocate initial state and schedule the first work
//! - `tick`: apply queued commands, fire due work, advance the rules
//! - `handle_input`: queue a command, never mutate game state directly
//! - `cleanup`: cancel every piece of scheduled work and release entities
//!
//! `cleanup` is a required method, so a game route can never be wired to
//! something that cannot be torn down.

use serde::{Deserialize, Serialize};

use crate::core::{Command, GameVariant, Result};

/// How a finished game ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Player lost (or the engine hit an internal fault).
    GameOver,
    /// Single-player win (breaker wall cleared).
    Cleared,
    /// Multi-player win for the given seat index.
    Winner(u8),
    /// Multi-player draw.
    Draw,
}

/// Serializable summary of an engine's observable state.
///
/// Two freshly started engines built from the same configuration produce
/// equal snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub variant: GameVariant,
    pub phase: &'static str,
    pub score: u64,
    pub elapsed: f32,
    pub entities: usize,
    pub pending_work: usize,
    pub outcome: Option<GameOutcome>,
}

/// Minigame engine contract.
///
/// ## Implementation Notes
///
/// - `tick` must be deterministic given current state and queued commands
/// - `tick` returning `Err` leaves the engine in a terminal state
/// - `cleanup` must tolerate being called before `start` and more than once
pub trait GameEngine {
    /// Which game this is.
    fn variant(&self) -> GameVariant;

    /// Allocate initial state and schedule the first work.
    fn start(&mut self) -> Result<()>;

    /// Advance the simulation by `dt` seconds.
    fn tick(&mut self, dt: f32) -> Result<()>;

    /// Queue a command for the next tick.
    fn handle_input(&mut self, command: Command);

    /// Cancel all scheduled work and release entity state.
    fn cleanup(&mut self);

    /// Name of the current state-machine state.
    fn phase(&self) -> &'static str;

    /// Final outcome, once the game has reached a terminal state.
    fn outcome(&self) -> Option<GameOutcome>;

    /// Current score.
    fn score(&self) -> u64;

    /// Seconds of unpaused simulation since `start`.
    fn elapsed(&self) -> f32;

    /// Live entities (cells, marks, sprites) currently held.
    fn entity_count(&self) -> usize;

    /// Pending scheduled work entries.
    fn pending_work(&self) -> usize;

    // === Convenience Methods ===

    /// Whether the game has ended.
    fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    /// Capture the observable state.
    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            variant: self.variant(),
            phase: self.phase(),
            score: self.score(),
            elapsed: self.elapsed(),
            entities: self.entity_count(),
            pending_work: self.pending_work(),
            outcome: self.outcome(),
        }
    }
}
