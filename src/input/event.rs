//! Raw device events as delivered by the host.

use serde::{Deserialize, Serialize};

/// Keyboard keys the games listen to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Enter,
    Escape,
    Char(char),
}

/// One raw keyboard or pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer position in play-area pixels.
    PointerMove { x: f32, y: f32 },
    /// Primary-button click in play-area pixels.
    PointerClick { x: f32, y: f32 },
}

/// Event category a listener is registered for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    PointerMove,
    PointerClick,
}

impl RawEvent {
    /// Category of this event.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            RawEvent::KeyDown(_) => EventKind::KeyDown,
            RawEvent::KeyUp(_) => EventKind::KeyUp,
            RawEvent::PointerMove { .. } => EventKind::PointerMove,
            RawEvent::PointerClick { .. } => EventKind::PointerClick,
        }
    }
}
