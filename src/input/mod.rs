//! Input adapters: raw keyboard and pointer events to game commands.
//!
//! Each session owns one `InputAdapter`, attached after the engine starts
//! and detached synchronously when the session stops.

mod adapter;
mod bindings;
mod event;

pub use adapter::{InputAdapter, ListenerId, ListenerSet};
pub use bindings::{Bindings, PointerMapping};
pub use event::{EventKind, Key, RawEvent};
