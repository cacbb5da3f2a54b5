//! Scheduled work owned by one engine.
//!
//! Engines never hold timers anywhere else: every one-shot delay, repeating
//! interval and next-frame callback lives in the engine's `WorkQueue`, so
//! `cancel_all()` during cleanup is guaranteed to leave nothing behind.
//!
//! The queue is advanced by the engine itself at the top of each tick. Fired
//! entries are returned in handle order, which is creation order, so two
//! timers expiring in the same frame always fire in the same sequence.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Shortest repeating period accepted; protects `advance` from spinning.
const MIN_PERIOD: f32 = 1.0e-3;

/// Upper bound on how many times one repeating entry fires per advance.
const MAX_CATCH_UP: u32 = 8;

/// Opaque handle to a piece of scheduled work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkHandle(u64);

#[derive(Clone, Copy, Debug, PartialEq)]
enum WorkKind {
    Once,
    Every(f32),
    NextFrame,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    tag: T,
    remaining: f32,
    kind: WorkKind,
}

/// Table of timers and frame callbacks, keyed by handle.
#[derive(Clone, Debug)]
pub struct WorkQueue<T> {
    entries: FxHashMap<WorkHandle, Entry<T>>,
    next_id: u64,
}

impl<T> Default for WorkQueue<T> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            next_id: 1,
        }
    }
}

impl<T: Copy> WorkQueue<T> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, tag: T, remaining: f32, kind: WorkKind) -> WorkHandle {
        let handle = WorkHandle(self.next_id);
        self.next_id += 1;
        self.entries.insert(handle, Entry { tag, remaining, kind });
        handle
    }

    /// Fire `tag` once after `delay` seconds.
    pub fn schedule_after(&mut self, delay: f32, tag: T) -> WorkHandle {
        self.insert(tag, delay.max(0.0), WorkKind::Once)
    }

    /// Fire `tag` every `period` seconds until cancelled.
    pub fn schedule_every(&mut self, period: f32, tag: T) -> WorkHandle {
        let period = period.max(MIN_PERIOD);
        self.insert(tag, period, WorkKind::Every(period))
    }

    /// Fire `tag` on the next advance, whatever its `dt`.
    pub fn request_frame(&mut self, tag: T) -> WorkHandle {
        self.insert(tag, 0.0, WorkKind::NextFrame)
    }

    /// Cancel one entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: WorkHandle) -> bool {
        self.entries.remove(&handle).is_some()
    }

    /// Cancel everything. Returns the number of entries removed.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Advance every entry by `dt` seconds and collect what fired.
    ///
    /// One-shot and next-frame entries are removed when they fire. Repeating
    /// entries fire once per elapsed period, capped at `MAX_CATCH_UP`.
    pub fn advance(&mut self, dt: f32) -> SmallVec<[(WorkHandle, T); 4]> {
        let mut fired: SmallVec<[(WorkHandle, T); 4]> = SmallVec::new();
        let mut finished: SmallVec<[WorkHandle; 4]> = SmallVec::new();

        for (&handle, entry) in &mut self.entries {
            match entry.kind {
                WorkKind::NextFrame => {
                    fired.push((handle, entry.tag));
                    finished.push(handle);
                }
                WorkKind::Once => {
                    entry.remaining -= dt;
                    if entry.remaining <= 0.0 {
                        fired.push((handle, entry.tag));
                        finished.push(handle);
                    }
                }
                WorkKind::Every(period) => {
                    entry.remaining -= dt;
                    let mut count = 0;
                    while entry.remaining <= 0.0 && count < MAX_CATCH_UP {
                        fired.push((handle, entry.tag));
                        entry.remaining += period;
                        count += 1;
                    }
                    if entry.remaining <= 0.0 {
                        entry.remaining = period;
                    }
                }
            }
        }

        for handle in finished {
            self.entries.remove(&handle);
        }

        fired.sort_by_key(|(handle, _)| *handle);
        fired
    }
}
