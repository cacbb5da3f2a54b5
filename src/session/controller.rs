//! Session controller: the single owner of the active game.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle --activate--> Running --deactivate--> Idle
//! ```
//!
//! At most one session exists at a time. `activate` refuses to run while a
//! session is live; callers switch games by calling `deactivate` first, so
//! the outgoing engine is fully torn down before the incoming one starts.
//! All methods take `&mut self`, which rules out a teardown racing with an
//! in-flight frame.

use log::info;

use super::game_session::{
    FrameReport, GameSession, SessionHandle, SessionId, SessionStatus, SessionSummary,
};
use super::registry::GameRegistry;
use crate::core::{ArcadeConfig, ArcadeError, Command, GameVariant, Result};
use crate::engine::GameEngine;
use crate::input::RawEvent;

/// Owns the registry and at most one running session.
pub struct SessionController {
    registry: GameRegistry,
    current: Option<GameSession>,
    next_id: u64,
}

impl SessionController {
    #[must_use]
    pub fn new(registry: GameRegistry) -> Self {
        Self {
            registry,
            current: None,
            next_id: 0,
        }
    }

    /// Controller over every built-in game.
    #[must_use]
    pub fn with_defaults(config: ArcadeConfig) -> Self {
        Self::new(GameRegistry::with_defaults(config))
    }

    /// Build a fresh engine for `variant`, start it and attach input.
    ///
    /// ## Errors
    ///
    /// - `AlreadyActive` if a session is running
    /// - `UnknownVariant` if no factory is registered
    /// - `StartFailed` if the engine refused to start (its cleanup has run)
    pub fn activate(&mut self, variant: GameVariant) -> Result<SessionHandle> {
        if let Some(session) = &self.current {
            return Err(ArcadeError::AlreadyActive {
                running: session.variant(),
            });
        }

        let (engine, adapter) = self.registry.create(variant)?;
        self.next_id += 1;
        let mut session = GameSession::new(SessionId(self.next_id), engine, adapter);
        session.start()?;

        let handle = session.handle();
        info!("session {}: {} started", handle.id, variant);
        self.current = Some(session);
        Ok(handle)
    }

    /// Activate by string identifier.
    pub fn activate_id(&mut self, id: &str) -> Result<SessionHandle> {
        self.activate(GameVariant::from_id(id)?)
    }

    /// Stop the running session, if any.
    ///
    /// The engine's cleanup runs before listeners are removed, and both finish
    /// before this returns. Returns `None` (and does nothing) when idle.
    pub fn deactivate(&mut self) -> Option<SessionSummary> {
        let summary = self.current.as_mut()?.stop();
        self.current = None;
        info!(
            "session {}: {} deactivated (score {}, {} frames)",
            summary.id, summary.variant, summary.score, summary.frames
        );
        Some(summary)
    }

    /// Drive one frame of the running session.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        match self.current.as_mut() {
            Some(session) => session.frame(dt),
            None => FrameReport::Idle,
        }
    }

    /// Feed a raw device event to the running session.
    pub fn dispatch(&mut self, event: RawEvent) -> bool {
        self.current
            .as_mut()
            .is_some_and(|session| session.dispatch(&event))
    }

    /// Queue a command on the running session.
    pub fn handle_input(&mut self, command: Command) -> bool {
        self.current
            .as_mut()
            .is_some_and(|session| session.handle_input(command))
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.current
            .as_ref()
            .map_or(SessionStatus::Idle, GameSession::status)
    }

    #[must_use]
    pub fn active_variant(&self) -> Option<GameVariant> {
        self.current.as_ref().map(GameSession::variant)
    }

    #[must_use]
    pub fn session(&self) -> Option<&GameSession> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn engine(&self) -> Option<&dyn GameEngine> {
        self.current.as_ref().map(GameSession::engine)
    }

    #[must_use]
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Sessions handed a fresh engine, including ones whose start failed.
    #[must_use]
    pub fn sessions_started(&self) -> u64 {
        self.next_id
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SessionController {
        SessionController::with_defaults(ArcadeConfig::default())
    }

    #[test]
    fn test_activate_and_deactivate() {
        let mut c = controller();
        assert_eq!(c.status(), SessionStatus::Idle);

        let handle = c.activate(GameVariant::FallingBlocks).unwrap();
        assert_eq!(handle.variant, GameVariant::FallingBlocks);
        assert_eq!(c.status(), SessionStatus::Running);
        assert_eq!(c.active_variant(), Some(GameVariant::FallingBlocks));

        let summary = c.deactivate().unwrap();
        assert_eq!(summary.id, handle.id);
        assert_eq!(c.status(), SessionStatus::Idle);
        assert!(c.engine().is_none());
    }

    #[test]
    fn test_second_activate_rejected() {
        let mut c = controller();
        c.activate(GameVariant::Shooter).unwrap();
        assert_eq!(
            c.activate(GameVariant::Breaker),
            Err(ArcadeError::AlreadyActive {
                running: GameVariant::Shooter
            })
        );
        assert_eq!(c.active_variant(), Some(GameVariant::Shooter));
    }

    #[test]
    fn test_deactivate_when_idle() {
        let mut c = controller();
        assert!(c.deactivate().is_none());
        assert!(c.deactivate().is_none());
    }

    #[test]
    fn test_frame_when_idle() {
        let mut c = controller();
        assert_eq!(c.frame(0.016), FrameReport::Idle);
        assert!(!c.handle_input(Command::Fire));
    }

    #[test]
    fn test_activate_by_unknown_id() {
        let mut c = controller();
        assert!(matches!(
            c.activate_id("minesweeper"),
            Err(ArcadeError::UnknownVariant(_))
        ));
        assert_eq!(c.status(), SessionStatus::Idle);
        assert_eq!(c.sessions_started(), 0);
    }

    #[test]
    fn test_session_ids_increase() {
        let mut c = controller();
        let first = c.activate(GameVariant::Breaker).unwrap();
        c.deactivate();
        let second = c.activate(GameVariant::Breaker).unwrap();
        assert!(second.id > first.id);
        assert_eq!(c.sessions_started(), 2);
    }
}
