//! Session controller lifecycle tests.
//!
//! These tests verify the single-active-session contract:
//! - `deactivate` is idempotent and a no-op when idle
//! - Re-activating a game yields a freshly initialized engine
//! - The outgoing game's cleanup happens before the incoming game's start
//! - Engine faults end the session without taking down the controller

use std::cell::RefCell;
use std::rc::Rc;

use arcade_session::core::{ArcadeConfig, ArcadeError, Command, GameVariant, Result};
use arcade_session::engine::{GameEngine, GameOutcome};
use arcade_session::input::{Bindings, InputAdapter, Key, RawEvent};
use arcade_session::session::{
    FrameReport, GameRegistry, SessionController, SessionEnd, SessionStatus,
};

// =============================================================================
// Test doubles
// =============================================================================

type CallLog = Rc<RefCell<Vec<String>>>;

/// Engine that records lifecycle calls and can be told to fail.
struct Recorder {
    variant: GameVariant,
    log: CallLog,
    fail_start: bool,
    fail_tick_at: Option<u32>,
    ticks: u32,
    pending: usize,
    ended: bool,
}

impl Recorder {
    fn new(variant: GameVariant, log: CallLog) -> Self {
        Self {
            variant,
            log,
            fail_start: false,
            fail_tick_at: None,
            ticks: 0,
            pending: 0,
            ended: false,
        }
    }

    fn record(&self, call: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.variant, call));
    }
}

impl GameEngine for Recorder {
    fn variant(&self) -> GameVariant {
        self.variant
    }

    fn start(&mut self) -> Result<()> {
        self.record("start");
        if self.fail_start {
            return Err(ArcadeError::StartFailed {
                variant: self.variant,
                reason: "refused".into(),
            });
        }
        self.pending = 2;
        Ok(())
    }

    fn tick(&mut self, _dt: f32) -> Result<()> {
        self.ticks += 1;
        if self.fail_tick_at == Some(self.ticks) {
            self.ended = true;
            self.pending = 0;
            return Err(ArcadeError::runtime(self.variant, "invalid state"));
        }
        Ok(())
    }

    fn handle_input(&mut self, command: Command) {
        self.record(&format!("input {command:?}"));
    }

    fn cleanup(&mut self) {
        self.record("cleanup");
        self.pending = 0;
    }

    fn phase(&self) -> &'static str {
        if self.ended {
            "ended"
        } else {
            "running"
        }
    }

    fn outcome(&self) -> Option<GameOutcome> {
        self.ended.then_some(GameOutcome::GameOver)
    }

    fn score(&self) -> u64 {
        u64::from(self.ticks)
    }

    fn elapsed(&self) -> f32 {
        0.0
    }

    fn entity_count(&self) -> usize {
        0
    }

    fn pending_work(&self) -> usize {
        self.pending
    }
}

fn recording_registry(log: &CallLog) -> GameRegistry {
    let mut registry = GameRegistry::new(ArcadeConfig::default());
    for variant in GameVariant::ALL {
        let log = Rc::clone(log);
        registry.register(variant, move |config| {
            let engine = Recorder::new(variant, Rc::clone(&log));
            (
                Box::new(engine) as Box<dyn GameEngine>,
                InputAdapter::new(Bindings::for_variant(variant, config)),
            )
        });
    }
    registry
}

fn controller() -> SessionController {
    SessionController::with_defaults(ArcadeConfig::default())
}

// =============================================================================
// Idempotence and boundaries
// =============================================================================

/// Deactivating with no session is a no-op.
#[test]
fn test_deactivate_when_idle_is_noop() {
    let mut c = controller();
    assert!(c.deactivate().is_none());
    assert_eq!(c.status(), SessionStatus::Idle);
    assert_eq!(c.sessions_started(), 0);
}

/// A second deactivate neither cleans up again nor changes state.
#[test]
fn test_deactivate_twice() {
    let log = CallLog::default();
    let mut c = SessionController::new(recording_registry(&log));

    c.activate(GameVariant::Shooter).unwrap();
    assert!(c.deactivate().is_some());
    assert!(c.deactivate().is_none());

    let cleanups = log.borrow().iter().filter(|call| call.ends_with("cleanup")).count();
    assert_eq!(cleanups, 1);
    assert_eq!(c.status(), SessionStatus::Idle);
}

/// Activating over a running session fails and leaves it untouched.
#[test]
fn test_activate_while_running() {
    let mut c = controller();
    let first = c.activate(GameVariant::ObstacleDodger).unwrap();

    let err = c.activate(GameVariant::Shooter).unwrap_err();
    assert_eq!(
        err,
        ArcadeError::AlreadyActive {
            running: GameVariant::ObstacleDodger
        }
    );
    assert!(err.is_programmer_error());
    assert_eq!(c.session().map(|s| s.id()), Some(first.id));
}

// =============================================================================
// Teardown
// =============================================================================

/// Every built-in game can be stopped mid-play and releases its session.
#[test]
fn test_stop_every_game_mid_play() {
    for variant in GameVariant::ALL {
        let mut c = controller();
        let handle = c.activate(variant).unwrap();
        for _ in 0..30 {
            c.frame(1.0 / 60.0);
        }
        assert!(c.session().unwrap().adapter().listener_count() > 0);

        let summary = c.deactivate().unwrap();
        assert_eq!(summary.id, handle.id);
        assert_eq!(summary.variant, variant);
        assert_eq!(summary.frames, 30);
        assert!(c.engine().is_none());
    }
}

/// After deactivate, frames and input no longer reach the old engine.
#[test]
fn test_no_activity_after_deactivate() {
    let log = CallLog::default();
    let mut c = SessionController::new(recording_registry(&log));

    c.activate(GameVariant::Breaker).unwrap();
    c.deactivate();
    let recorded = log.borrow().len();

    assert_eq!(c.frame(0.016), FrameReport::Idle);
    assert!(!c.dispatch(RawEvent::KeyDown(Key::Space)));
    assert!(!c.handle_input(Command::Fire));
    assert_eq!(log.borrow().len(), recorded);
}

/// Raw events reach the engine only through the attached adapter.
#[test]
fn test_dispatch_goes_through_bindings() {
    let log = CallLog::default();
    let mut c = SessionController::new(recording_registry(&log));
    c.activate(GameVariant::Breaker).unwrap();

    assert!(c.dispatch(RawEvent::KeyDown(Key::Space)));
    assert!(!c.dispatch(RawEvent::KeyDown(Key::Char('z'))));
    assert_eq!(log.borrow().last().map(String::as_str), Some("breaker:input Fire"));
}

/// Dropping the controller tears down the running session.
#[test]
fn test_drop_runs_cleanup() {
    let log = CallLog::default();
    {
        let mut c = SessionController::new(recording_registry(&log));
        c.activate(GameVariant::FallingBlocks).unwrap();
    }
    assert_eq!(log.borrow().last().map(String::as_str), Some("falling-blocks:cleanup"));
}

// =============================================================================
// Ordering
// =============================================================================

/// Switching games runs the old cleanup before the new start.
#[test]
fn test_cleanup_happens_before_next_start() {
    let log = CallLog::default();
    let mut c = SessionController::new(recording_registry(&log));

    c.activate(GameVariant::ObstacleDodger).unwrap();
    c.frame(0.016);
    c.deactivate();
    c.activate(GameVariant::Shooter).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            "obstacle-dodger:start".to_string(),
            "obstacle-dodger:cleanup".to_string(),
            "shooter:start".to_string(),
        ]
    );
}

// =============================================================================
// Round-trip
// =============================================================================

/// A second activation starts from the same state as the first.
#[test]
fn test_reactivation_is_fresh() {
    for variant in GameVariant::ALL {
        let mut c = controller();
        c.activate(variant).unwrap();
        let first = c.engine().unwrap().snapshot();

        c.handle_input(Command::Fire);
        c.handle_input(Command::Jump);
        for _ in 0..120 {
            c.frame(1.0 / 60.0);
        }
        c.deactivate();

        c.activate(variant).unwrap();
        let second = c.engine().unwrap().snapshot();
        assert_eq!(first, second, "{variant} leaked state across sessions");
    }
}

// =============================================================================
// Failures
// =============================================================================

/// A start failure cleans up, returns the error and leaves the controller idle.
#[test]
fn test_start_failure() {
    let log = CallLog::default();
    let mut registry = GameRegistry::new(ArcadeConfig::default());
    {
        let log = Rc::clone(&log);
        registry.register(GameVariant::Shooter, move |config| {
            let mut engine = Recorder::new(GameVariant::Shooter, Rc::clone(&log));
            engine.fail_start = true;
            (
                Box::new(engine) as Box<dyn GameEngine>,
                InputAdapter::new(Bindings::for_variant(GameVariant::Shooter, config)),
            )
        });
    }
    let mut c = SessionController::new(registry);

    let err = c.activate(GameVariant::Shooter).unwrap_err();
    assert!(matches!(err, ArcadeError::StartFailed { .. }));
    assert_eq!(c.status(), SessionStatus::Idle);
    assert_eq!(*log.borrow(), vec!["shooter:start".to_string(), "shooter:cleanup".to_string()]);
}

/// A built-in engine rejects a degenerate configuration at start.
#[test]
fn test_bad_config_fails_to_start() {
    let mut config = ArcadeConfig::default();
    config.board_strategy.win_length = 99;
    let mut c = SessionController::with_defaults(config);

    assert!(matches!(
        c.activate(GameVariant::BoardStrategy),
        Err(ArcadeError::StartFailed {
            variant: GameVariant::BoardStrategy,
            ..
        })
    ));
    assert!(c.activate(GameVariant::Breaker).is_ok());
}

/// A tick fault ends the session but the controller keeps working.
#[test]
fn test_tick_fault_ends_session() {
    let log = CallLog::default();
    let mut registry = GameRegistry::new(ArcadeConfig::default());
    {
        let log = Rc::clone(&log);
        registry.register(GameVariant::Breaker, move |config| {
            let mut engine = Recorder::new(GameVariant::Breaker, Rc::clone(&log));
            engine.fail_tick_at = Some(3);
            (
                Box::new(engine) as Box<dyn GameEngine>,
                InputAdapter::new(Bindings::for_variant(GameVariant::Breaker, config)),
            )
        });
    }
    let mut c = SessionController::new(registry);
    let handle = c.activate(GameVariant::Breaker).unwrap();

    assert!(matches!(c.frame(0.016), FrameReport::Running { .. }));
    assert!(matches!(c.frame(0.016), FrameReport::Running { .. }));

    let expected = FrameReport::Ended {
        session: handle.id,
        end: SessionEnd::Faulted("breaker engine fault: invalid state".into()),
    };
    assert_eq!(c.frame(0.016), expected);
    // later frames report the same end without ticking again
    assert_eq!(c.frame(0.016), expected);
    assert_eq!(c.engine().unwrap().score(), 3);

    let summary = c.deactivate().unwrap();
    assert_eq!(summary.frames, 3);
    assert!(matches!(summary.end, Some(SessionEnd::Faulted(_))));
    assert_eq!(log.borrow().last().map(String::as_str), Some("breaker:cleanup"));
}

// =============================================================================
// Built-in games through the controller
// =============================================================================

/// Pausing through the keyboard freezes elapsed time.
#[test]
fn test_pause_key_freezes_game() {
    let mut c = controller();
    c.activate(GameVariant::ObstacleDodger).unwrap();
    c.frame(0.5);
    let before = c.engine().unwrap().elapsed();

    assert!(c.dispatch(RawEvent::KeyDown(Key::Char('p'))));
    c.frame(0.5);
    c.frame(0.5);
    assert_eq!(c.engine().unwrap().elapsed(), before);

    c.dispatch(RawEvent::KeyDown(Key::Escape));
    c.frame(0.5);
    assert!(c.engine().unwrap().elapsed() > before);
}

/// Pointer clicks on the board complete a five-in-a-row in one frame.
#[test]
fn test_board_strategy_win_through_clicks() {
    let mut c = controller();
    let handle = c.activate(GameVariant::BoardStrategy).unwrap();
    let cell = ArcadeConfig::default().board_strategy.cell_pixels;
    let click = |row: usize, col: usize| RawEvent::PointerClick {
        x: col as f32 * cell + cell / 2.0,
        y: row as f32 * cell + cell / 2.0,
    };

    for col in 0..4 {
        assert!(c.dispatch(click(7, col)));
        assert!(c.dispatch(click(8, col)));
    }
    c.dispatch(click(7, 4));

    assert_eq!(
        c.frame(0.016),
        FrameReport::Ended {
            session: handle.id,
            end: SessionEnd::Finished(GameOutcome::Winner(0)),
        }
    );
    assert_eq!(c.engine().unwrap().phase(), "win");
}

/// A falling-blocks game left alone eventually tops out.
#[test]
fn test_falling_blocks_tops_out() {
    let mut c = controller();
    c.activate(GameVariant::FallingBlocks).unwrap();

    let mut ended = None;
    for _ in 0..200 {
        c.handle_input(Command::Drop);
        if let FrameReport::Ended { end, .. } = c.frame(0.1) {
            ended = Some(end);
            break;
        }
    }
    assert_eq!(ended, Some(SessionEnd::Finished(GameOutcome::GameOver)));
}
