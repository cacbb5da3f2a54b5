//! One running game: engine, adapter and lifecycle status.

use std::fmt;

use log::{debug, warn};
use serde::Serialize;

use crate::core::{Command, GameVariant, Result};
use crate::engine::{GameEngine, GameOutcome};
use crate::input::{InputAdapter, ListenerSet, RawEvent};

/// Monotonic session identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle status of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Idle,
    Running,
    Stopped,
}

/// Why a session stopped producing frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SessionEnd {
    /// The game reached a terminal state on its own.
    Finished(GameOutcome),
    /// A tick failed; the engine is in its terminal state.
    Faulted(String),
}

/// Lightweight reference to the session that was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionHandle {
    pub id: SessionId,
    pub variant: GameVariant,
}

/// Final accounting for a stopped session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub variant: GameVariant,
    pub score: u64,
    pub elapsed: f32,
    pub frames: u64,
    pub end: Option<SessionEnd>,
}

/// Result of driving one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum FrameReport {
    /// No session is running.
    Idle,
    /// The frame advanced a live game.
    Running { session: SessionId, score: u64 },
    /// The game has ended; further frames do not tick it.
    Ended { session: SessionId, end: SessionEnd },
}

/// A started engine together with the adapter feeding it.
///
/// Dropping a session that is still running stops it, so the engine's
/// cleanup runs exactly once however the session goes away.
pub struct GameSession {
    id: SessionId,
    variant: GameVariant,
    engine: Box<dyn GameEngine>,
    adapter: InputAdapter,
    listeners: Option<ListenerSet>,
    status: SessionStatus,
    end: Option<SessionEnd>,
    frames: u64,
}

impl GameSession {
    pub(crate) fn new(id: SessionId, engine: Box<dyn GameEngine>, adapter: InputAdapter) -> Self {
        Self {
            id,
            variant: engine.variant(),
            engine,
            adapter,
            listeners: None,
            status: SessionStatus::Idle,
            end: None,
            frames: 0,
        }
    }

    /// Start the engine, then attach input.
    ///
    /// A failed start still runs the engine's cleanup and leaves the
    /// session `Stopped` with no listeners.
    pub(crate) fn start(&mut self) -> Result<()> {
        debug_assert_eq!(self.status, SessionStatus::Idle);

        if let Err(err) = self.engine.start() {
            warn!("session {}: {} failed to start: {}", self.id, self.variant, err);
            self.engine.cleanup();
            self.status = SessionStatus::Stopped;
            return Err(err);
        }

        self.listeners = Some(self.adapter.attach(self.engine.as_ref()));
        self.status = SessionStatus::Running;
        Ok(())
    }

    /// Tick once unless the game has already ended.
    pub(crate) fn frame(&mut self, dt: f32) -> FrameReport {
        if self.status != SessionStatus::Running {
            return FrameReport::Idle;
        }
        if let Some(end) = &self.end {
            return FrameReport::Ended {
                session: self.id,
                end: end.clone(),
            };
        }

        self.frames += 1;
        match self.engine.tick(dt) {
            Ok(()) => match self.engine.outcome() {
                Some(outcome) => {
                    debug!("session {}: {} finished with {:?}", self.id, self.variant, outcome);
                    let end = SessionEnd::Finished(outcome);
                    self.end = Some(end.clone());
                    FrameReport::Ended { session: self.id, end }
                }
                None => FrameReport::Running {
                    session: self.id,
                    score: self.engine.score(),
                },
            },
            Err(err) => {
                warn!("session {}: {}", self.id, err);
                let end = SessionEnd::Faulted(err.to_string());
                self.end = Some(end.clone());
                FrameReport::Ended { session: self.id, end }
            }
        }
    }

    /// Cancel all engine work, then remove every listener.
    ///
    /// Calling this on a session that is not running only reports the summary.
    pub(crate) fn stop(&mut self) -> SessionSummary {
        if self.status == SessionStatus::Running {
            self.engine.cleanup();
            let removed = self.adapter.detach();
            self.listeners = None;
            self.status = SessionStatus::Stopped;
            debug!(
                "session {}: {} stopped, {} listeners removed",
                self.id, self.variant, removed
            );
        }
        self.summary()
    }

    /// Route a raw event through the adapter. Returns true if it became a command.
    pub(crate) fn dispatch(&mut self, event: &RawEvent) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        match self.adapter.translate(event) {
            Some(command) => {
                self.engine.handle_input(command);
                true
            }
            None => false,
        }
    }

    /// Queue a command directly.
    pub(crate) fn handle_input(&mut self, command: Command) -> bool {
        if self.status != SessionStatus::Running {
            return false;
        }
        self.engine.handle_input(command);
        true
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn variant(&self) -> GameVariant {
        self.variant
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn end(&self) -> Option<&SessionEnd> {
        self.end.as_ref()
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            id: self.id,
            variant: self.variant,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &dyn GameEngine {
        self.engine.as_ref()
    }

    #[must_use]
    pub fn adapter(&self) -> &InputAdapter {
        &self.adapter
    }

    /// Listeners registered by the last successful start.
    #[must_use]
    pub fn listeners(&self) -> Option<&ListenerSet> {
        self.listeners.as_ref()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            variant: self.variant,
            score: self.engine.score(),
            elapsed: self.engine.elapsed(),
            frames: self.frames,
            end: self.end.clone(),
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("variant", &self.variant)
            .field("status", &self.status)
            .field("end", &self.end)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}
