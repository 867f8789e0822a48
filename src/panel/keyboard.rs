//! Keyboard contract of a focused panel
//!
//! Arrow keys move the panel, Ctrl+Arrow resizes it. Shift switches to the
//! large step. Escape is left to the panel, which uses it to abort a resize.

use crate::interaction::{Key, KeyInput};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyCommand {
    Move { dx: f64, dy: f64 },
    Resize { dw: f64, dh: f64 },
}

pub fn key_command(input: &KeyInput, step: f64, large_step: f64) -> Option<KeyCommand> {
    let (ux, uy) = input.key.arrow_delta()?;
    let step = if input.modifiers.shift {
        large_step
    } else {
        step
    };
    let (dx, dy) = (ux * step, uy * step);
    if input.modifiers.ctrl || input.modifiers.meta {
        Some(KeyCommand::Resize { dw: dx, dh: dy })
    } else if input.modifiers.alt {
        None
    } else {
        Some(KeyCommand::Move { dx, dy })
    }
}

pub fn is_escape(input: &KeyInput) -> bool {
    input.key == Key::Escape
}
