//! Per-engine frame bookkeeping shared by every game.
//!
//! Holds the command queue, pause flag, elapsed time and the engine's
//! `WorkQueue`. Engines call `take_commands` then `advance` at the top of
//! each tick, which gives every game the same ordering: input queued since
//! the previous frame is applied before that frame's rules run.
//!
//! Physics integrates over `substeps(dt)` rather than one `dt` jump, so a
//! long frame cannot carry a fast body through a thin surface.

use smallvec::SmallVec;

use super::schedule::{WorkHandle, WorkQueue};
use crate::core::Command;

/// Commands buffered between two frames.
pub type CommandBuffer = SmallVec<[Command; 8]>;

/// Longest physics step integrated at once, in seconds.
const MAX_PHYSICS_STEP: f32 = 1.0 / 120.0;

/// Upper bound on substeps per frame. Longer frames take longer steps.
const MAX_SUBSTEPS: u32 = 16;

/// Split `dt` into equal physics steps no longer than `MAX_PHYSICS_STEP`.
///
/// Always yields at least one step, so a zero-length frame still resolves
/// contacts once.
pub fn substeps(dt: f32) -> impl Iterator<Item = f32> {
    let dt = dt.max(0.0);
    let count = ((dt / MAX_PHYSICS_STEP).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    let step = dt / count as f32;
    (0..count).map(move |_| step)
}

/// Result of advancing a running frame.
#[derive(Clone, Debug)]
pub struct Advance<T> {
    /// Frame length after clamping; never negative.
    pub dt: f32,
    /// Work that came due, in creation order.
    pub fired: SmallVec<[(WorkHandle, T); 4]>,
}

/// Frame state for one engine, generic over its work tag type.
#[derive(Clone, Debug)]
pub struct FrameState<T> {
    commands: CommandBuffer,
    /// Timers and frame callbacks owned by the engine.
    pub work: WorkQueue<T>,
    paused: bool,
    started: bool,
    elapsed: f32,
}

impl<T> Default for FrameState<T> {
    fn default() -> Self {
        Self {
            commands: SmallVec::new(),
            work: WorkQueue::default(),
            paused: false,
            started: false,
            elapsed: 0.0,
        }
    }
}

impl<T: Copy> FrameState<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the engine started with a clean slate.
    pub fn begin(&mut self) {
        self.reset();
        self.started = true;
    }

    /// Cancel all work and forget queued input. Returns cancelled work count.
    pub fn reset(&mut self) -> usize {
        self.commands.clear();
        self.paused = false;
        self.started = false;
        self.elapsed = 0.0;
        self.work.cancel_all()
    }

    /// Queue a command for the next frame.
    pub fn queue(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Drain queued commands, handling `Pause` toggles in place.
    ///
    /// Commands that arrive while paused are dropped.
    pub fn take_commands(&mut self) -> CommandBuffer {
        let mut out = CommandBuffer::new();
        for command in self.commands.drain(..) {
            match command {
                Command::Pause => self.paused = !self.paused,
                other if !self.paused => out.push(other),
                _ => {}
            }
        }
        out
    }

    /// Advance time and fire due work.
    ///
    /// Returns `None` when the engine is not started or is paused, in which
    /// case the caller must skip its simulation step. Otherwise the returned
    /// `dt` is the clamped frame length the caller must simulate.
    pub fn advance(&mut self, dt: f32) -> Option<Advance<T>> {
        if !self.started || self.paused {
            return None;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;
        Some(Advance {
            dt,
            fired: self.work.advance(dt),
        })
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[must_use]
    pub fn pending_work(&self) -> usize {
        self.work.len()
    }
}
