//! Input adapter bound to one engine's lifetime.

use log::debug;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::bindings::Bindings;
use super::event::{EventKind, RawEvent};
use crate::core::{Command, GameVariant};
use crate::engine::GameEngine;

/// Handle of one registered listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u32);

/// Listeners registered by one `attach` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerSet {
    pub variant: GameVariant,
    pub listeners: SmallVec<[(EventKind, ListenerId); 4]>,
}

impl ListenerSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Bridges raw events to commands for exactly one engine.
///
/// Events are only translated while listeners are registered, so a detached
/// adapter silently drops everything.
#[derive(Clone, Debug)]
pub struct InputAdapter {
    bindings: Bindings,
    listeners: FxHashMap<EventKind, ListenerId>,
    attached_to: Option<GameVariant>,
    next_id: u32,
}

impl InputAdapter {
    #[must_use]
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            listeners: FxHashMap::default(),
            attached_to: None,
            next_id: 0,
        }
    }

    /// Register one listener per event kind the bindings consume.
    ///
    /// Attaching again first drops the previous registration.
    pub fn attach(&mut self, engine: &dyn GameEngine) -> ListenerSet {
        self.detach();

        let variant = engine.variant();
        let mut listeners = SmallVec::new();
        for kind in self.bindings.kinds() {
            let id = ListenerId(self.next_id);
            self.next_id += 1;
            self.listeners.insert(kind, id);
            listeners.push((kind, id));
        }
        self.attached_to = Some(variant);
        debug!("input: attached {} listeners for {}", listeners.len(), variant);

        ListenerSet { variant, listeners }
    }

    /// Remove every listener. Returns how many were removed; 0 when already detached.
    pub fn detach(&mut self) -> usize {
        let removed = self.listeners.len();
        self.listeners.clear();
        if let Some(variant) = self.attached_to.take() {
            debug!("input: detached {} listeners from {}", removed, variant);
        }
        removed
    }

    /// Translate an event through a registered listener.
    #[must_use]
    pub fn translate(&self, event: &RawEvent) -> Option<Command> {
        if !self.listeners.contains_key(&event.kind()) {
            return None;
        }
        self.bindings.translate(event)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached_to.is_some()
    }

    #[must_use]
    pub fn attached_variant(&self) -> Option<GameVariant> {
        self.attached_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArcadeConfig, BreakerConfig};
    use crate::games::Breaker;
    use crate::input::Key;

    fn breaker_adapter() -> (Breaker, InputAdapter) {
        let config = ArcadeConfig::default();
        let engine = Breaker::new(BreakerConfig::default());
        let adapter = InputAdapter::new(Bindings::for_variant(GameVariant::Breaker, &config));
        (engine, adapter)
    }

    #[test]
    fn test_detached_adapter_drops_events() {
        let (_, adapter) = breaker_adapter();
        assert_eq!(adapter.translate(&RawEvent::KeyDown(Key::Space)), None);
    }

    #[test]
    fn test_attach_then_translate() {
        let (engine, mut adapter) = breaker_adapter();
        let set = adapter.attach(&engine);

        assert_eq!(set.variant, GameVariant::Breaker);
        assert_eq!(set.len(), 4);
        assert_eq!(adapter.translate(&RawEvent::KeyDown(Key::Space)), Some(Command::Fire));
        assert_eq!(
            adapter.translate(&RawEvent::PointerMove { x: 12.0, y: 0.0 }),
            Some(Command::Aim { x: 12.0 })
        );
    }

    #[test]
    fn test_detach_is_idempotent() {
        let (engine, mut adapter) = breaker_adapter();
        adapter.attach(&engine);

        assert_eq!(adapter.detach(), 4);
        assert_eq!(adapter.detach(), 0);
        assert!(!adapter.is_attached());
        assert_eq!(adapter.translate(&RawEvent::KeyDown(Key::Space)), None);
    }

    #[test]
    fn test_reattach_does_not_leak_listeners() {
        let (engine, mut adapter) = breaker_adapter();
        let first = adapter.attach(&engine);
        let second = adapter.attach(&engine);

        assert_eq!(adapter.listener_count(), 4);
        assert_ne!(first, second);
    }
}
