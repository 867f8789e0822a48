//! Window-system independent input events

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Keyboard modifiers held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }
}

/// A pointer event in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Identifies one pointer (mouse, pen or touch contact) across its
    /// down/move/up sequence
    pub pointer_id: u64,
    pub position: Point,
    pub button: PointerButton,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub const MOUSE: u64 = 1;

    /// Primary-button mouse event at `(x, y)`
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            pointer_id: Self::MOUSE,
            position: Point::new(x, y),
            button: PointerButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_pointer(mut self, pointer_id: u64) -> Self {
        self.pointer_id = pointer_id;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.button == PointerButton::Primary
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Escape,
    Enter,
    Tab,
    Other,
}

impl Key {
    /// Unit direction for arrow keys
    pub fn arrow_delta(&self) -> Option<(f64, f64)> {
        match self {
            Key::ArrowLeft => Some((-1.0, 0.0)),
            Key::ArrowRight => Some((1.0, 0.0)),
            Key::ArrowUp => Some((0.0, -1.0)),
            Key::ArrowDown => Some((0.0, 1.0)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// Outcome of offering an event to a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was fully handled; stop propagation and suppress the default
    Consumed {
        /// Whether a redraw is needed
        redraw: bool,
    },

    /// Event was not handled here; allow fallback handling
    Bubble,
}

impl EventResult {
    pub fn consumed_redraw() -> Self {
        Self::Consumed { redraw: true }
    }

    /// Event blocked but nothing changed
    pub fn consumed_no_redraw() -> Self {
        Self::Consumed { redraw: false }
    }

    pub fn is_consumed(&self) -> bool {
        matches!(self, Self::Consumed { .. })
    }

    pub fn needs_redraw(&self) -> bool {
        matches!(self, Self::Consumed { redraw: true })
    }

    /// Combine two results: consumed if either is, redraw if either asks
    pub fn or(self, other: EventResult) -> EventResult {
        match (self, other) {
            (EventResult::Bubble, r) | (r, EventResult::Bubble) => r,
            (EventResult::Consumed { redraw: a }, EventResult::Consumed { redraw: b }) => {
                EventResult::Consumed { redraw: a || b }
            }
        }
    }
}
