//! Per-game mapping from raw events to commands.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::event::{EventKind, Key, RawEvent};
use crate::core::{ArcadeConfig, Command, GameVariant};

/// How pointer events become commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerMapping {
    /// Horizontal pointer position becomes `Command::Aim`.
    Aim,
    /// Pointer position selects a board cell of the given pixel size.
    Grid { cell_pixels: f32 },
    /// Any pointer event emits a fixed command.
    Emit(Command),
}

impl PointerMapping {
    fn map(self, x: f32, y: f32) -> Option<Command> {
        match self {
            PointerMapping::Aim => Some(Command::Aim { x }),
            PointerMapping::Grid { cell_pixels } => {
                if x < 0.0 || y < 0.0 || cell_pixels <= 0.0 {
                    return None;
                }
                Some(Command::Place {
                    row: (y / cell_pixels) as usize,
                    col: (x / cell_pixels) as usize,
                })
            }
            PointerMapping::Emit(command) => Some(command),
        }
    }
}

/// Binding table for one game.
#[derive(Clone, Debug, Default)]
pub struct Bindings {
    key_down: FxHashMap<Key, Command>,
    key_up: FxHashMap<Key, Command>,
    pointer_move: Option<PointerMapping>,
    pointer_click: Option<PointerMapping>,
}

impl Bindings {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key press.
    #[must_use]
    pub fn on_key_down(mut self, key: Key, command: Command) -> Self {
        self.key_down.insert(key, command);
        self
    }

    /// Bind a key release.
    #[must_use]
    pub fn on_key_up(mut self, key: Key, command: Command) -> Self {
        self.key_up.insert(key, command);
        self
    }

    /// Bind pointer movement.
    #[must_use]
    pub fn on_pointer_move(mut self, mapping: PointerMapping) -> Self {
        self.pointer_move = Some(mapping);
        self
    }

    /// Bind pointer clicks.
    #[must_use]
    pub fn on_pointer_click(mut self, mapping: PointerMapping) -> Self {
        self.pointer_click = Some(mapping);
        self
    }

    /// Default bindings for a built-in game.
    #[must_use]
    pub fn for_variant(variant: GameVariant, config: &ArcadeConfig) -> Self {
        let common = Bindings::new()
            .on_key_down(Key::Char('p'), Command::Pause)
            .on_key_down(Key::Escape, Command::Pause);

        match variant {
            GameVariant::FallingBlocks => common
                .on_key_down(Key::ArrowLeft, Command::Left)
                .on_key_down(Key::ArrowRight, Command::Right)
                .on_key_down(Key::ArrowUp, Command::Rotate)
                .on_key_down(Key::ArrowDown, Command::Down)
                .on_key_down(Key::Space, Command::Drop),
            GameVariant::BoardStrategy => common
                .on_key_down(Key::ArrowLeft, Command::Left)
                .on_key_down(Key::ArrowRight, Command::Right)
                .on_key_down(Key::ArrowUp, Command::Up)
                .on_key_down(Key::ArrowDown, Command::Down)
                .on_key_down(Key::Enter, Command::Drop)
                .on_key_down(Key::Space, Command::Drop)
                .on_pointer_click(PointerMapping::Grid {
                    cell_pixels: config.board_strategy.cell_pixels,
                }),
            GameVariant::Shooter => common
                .on_key_down(Key::ArrowLeft, Command::Left)
                .on_key_down(Key::ArrowRight, Command::Right)
                .on_key_up(Key::ArrowLeft, Command::StopHorizontal)
                .on_key_up(Key::ArrowRight, Command::StopHorizontal)
                .on_key_down(Key::Space, Command::Fire),
            GameVariant::ObstacleDodger => common
                .on_key_down(Key::Space, Command::Jump)
                .on_key_down(Key::ArrowUp, Command::Jump)
                .on_pointer_click(PointerMapping::Emit(Command::Jump)),
            GameVariant::Breaker => common
                .on_key_down(Key::ArrowLeft, Command::Left)
                .on_key_down(Key::ArrowRight, Command::Right)
                .on_key_up(Key::ArrowLeft, Command::StopHorizontal)
                .on_key_up(Key::ArrowRight, Command::StopHorizontal)
                .on_key_down(Key::Space, Command::Fire)
                .on_pointer_move(PointerMapping::Aim)
                .on_pointer_click(PointerMapping::Emit(Command::Fire)),
        }
    }

    /// Event kinds this table consumes, in a stable order.
    #[must_use]
    pub fn kinds(&self) -> SmallVec<[EventKind; 4]> {
        let mut kinds = SmallVec::new();
        if !self.key_down.is_empty() {
            kinds.push(EventKind::KeyDown);
        }
        if !self.key_up.is_empty() {
            kinds.push(EventKind::KeyUp);
        }
        if self.pointer_move.is_some() {
            kinds.push(EventKind::PointerMove);
        }
        if self.pointer_click.is_some() {
            kinds.push(EventKind::PointerClick);
        }
        kinds
    }

    /// Translate one event, ignoring unbound keys.
    #[must_use]
    pub fn translate(&self, event: &RawEvent) -> Option<Command> {
        match *event {
            RawEvent::KeyDown(key) => self.key_down.get(&key).copied(),
            RawEvent::KeyUp(key) => self.key_up.get(&key).copied(),
            RawEvent::PointerMove { x, y } => self.pointer_move?.map(x, y),
            RawEvent::PointerClick { x, y } => self.pointer_click?.map(x, y),
        }
    }
}
