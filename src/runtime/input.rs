//! winit -> engine input translation
//!
//! Also maps the desktop-level shortcuts that do not belong to any panel.

use winit::event::{MouseButton, TouchPhase};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

use refdesk::interaction::{Key, KeyInput, Modifiers, PointerButton};
use refdesk::ArrangeMode;

pub fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

pub fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Back => PointerButton::Other(3),
        MouseButton::Forward => PointerButton::Other(4),
        MouseButton::Other(n) => PointerButton::Other(n),
    }
}

pub fn key_input(key: &WinitKey, state: ModifiersState) -> KeyInput {
    let key = match key {
        WinitKey::Named(NamedKey::ArrowLeft) => Key::ArrowLeft,
        WinitKey::Named(NamedKey::ArrowRight) => Key::ArrowRight,
        WinitKey::Named(NamedKey::ArrowUp) => Key::ArrowUp,
        WinitKey::Named(NamedKey::ArrowDown) => Key::ArrowDown,
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Named(NamedKey::Enter) => Key::Enter,
        WinitKey::Named(NamedKey::Tab) => Key::Tab,
        _ => Key::Other,
    };
    KeyInput::new(key, modifiers(state))
}

/// Pointer ids for touch contacts start above the mouse's
pub fn touch_pointer_id(touch_id: u64) -> u64 {
    touch_id.saturating_add(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchAction {
    Down,
    Move,
    Up,
    Cancel,
}

pub fn touch_action(phase: TouchPhase) -> TouchAction {
    match phase {
        TouchPhase::Started => TouchAction::Down,
        TouchPhase::Moved => TouchAction::Move,
        TouchPhase::Ended => TouchAction::Up,
        TouchPhase::Cancelled => TouchAction::Cancel,
    }
}

/// Desktop shortcuts, all under Ctrl (or Cmd)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Ctrl+1..3: open the n-th built-in panel type
    OpenBuiltin(usize),
    /// Ctrl+Shift+C / T / K
    Arrange(ArrangeMode),
    /// Ctrl+S
    SaveLayout,
    /// Ctrl+W
    CloseActive,
    /// Ctrl+Shift+L
    ToggleTheme,
}

pub fn shortcut(key: &WinitKey, state: ModifiersState) -> Option<Shortcut> {
    if !(state.control_key() || state.super_key()) {
        return None;
    }
    let WinitKey::Character(text) = key else {
        return None;
    };
    let shift = state.shift_key();
    match (text.to_lowercase().as_str(), shift) {
        ("1", false) => Some(Shortcut::OpenBuiltin(0)),
        ("2", false) => Some(Shortcut::OpenBuiltin(1)),
        ("3", false) => Some(Shortcut::OpenBuiltin(2)),
        ("c", true) => Some(Shortcut::Arrange(ArrangeMode::Cascade)),
        ("t", true) => Some(Shortcut::Arrange(ArrangeMode::Tile)),
        ("k", true) => Some(Shortcut::Arrange(ArrangeMode::Stack)),
        ("l", true) => Some(Shortcut::ToggleTheme),
        ("s", false) => Some(Shortcut::SaveLayout),
        ("w", false) => Some(Shortcut::CloseActive),
        _ => None,
    }
}
