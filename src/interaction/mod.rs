//! Pointer interaction engine
//!
//! Drag and resize share one [`InteractionLock`]: at most one interaction is
//! live at a time, across every panel. While it is live the owning panel's
//! handler is registered in [`GlobalListeners`], so pointer-up, cancel and
//! Escape reach it wherever they happen. Visual updates are coalesced by a
//! [`FrameBatcher`] and applied once per animation frame; the store sees a
//! single commit when the interaction ends.

pub mod drag;
pub mod pointer;
pub mod resize;

use std::cell::{Cell, RefCell};

use thiserror::Error;

use crate::geometry::ResizeDirection;
use crate::model::PanelId;

pub use drag::DragHandler;
pub use pointer::{EventResult, Key, KeyInput, Modifiers, PointerButton, PointerEvent};
pub use resize::ResizeHandler;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InteractionError {
    #[error("panel {owner} is already {activity}")]
    Busy {
        owner: PanelId,
        activity: &'static str,
    },
    #[error("non-finite pointer position ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

// ============================================================================
// Interaction lock
// ============================================================================

/// What the pointer is doing right now
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        panel: PanelId,
        pointer_id: u64,
    },
    Resizing {
        panel: PanelId,
        direction: ResizeDirection,
        pointer_id: u64,
    },
}

impl Interaction {
    pub fn panel(&self) -> Option<&PanelId> {
        match self {
            Interaction::Idle => None,
            Interaction::Dragging { panel, .. } | Interaction::Resizing { panel, .. } => {
                Some(panel)
            }
        }
    }

    fn activity(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Dragging { .. } => "being dragged",
            Interaction::Resizing { .. } => "being resized",
        }
    }
}

/// Shared Idle/Dragging/Resizing state machine
///
/// Transitions are Idle -> Dragging/Resizing on acquire and back to Idle on
/// release. Acquiring while not idle fails without changing anything.
#[derive(Debug, Default)]
pub struct InteractionLock {
    state: RefCell<Interaction>,
}

impl InteractionLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, next: Interaction) -> Result<(), InteractionError> {
        let mut state = self.state.borrow_mut();
        if let Some(owner) = state.panel() {
            return Err(InteractionError::Busy {
                owner: owner.clone(),
                activity: state.activity(),
            });
        }
        *state = next;
        Ok(())
    }

    /// Return to idle if `panel` holds the lock
    pub fn release(&self, panel: &PanelId) -> bool {
        let mut state = self.state.borrow_mut();
        if state.panel() == Some(panel) {
            *state = Interaction::Idle;
            true
        } else {
            false
        }
    }

    /// Return to idle whoever holds the lock
    pub fn force_release(&self) -> Interaction {
        self.state.replace(Interaction::Idle)
    }

    pub fn current(&self) -> Interaction {
        self.state.borrow().clone()
    }

    pub fn is_idle(&self) -> bool {
        *self.state.borrow() == Interaction::Idle
    }

    pub fn owner(&self) -> Option<PanelId> {
        self.state.borrow().panel().cloned()
    }

    pub fn is_held_by(&self, panel: &PanelId) -> bool {
        self.state.borrow().panel() == Some(panel)
    }
}

// ============================================================================
// Global listeners
// ============================================================================

/// Event streams a live interaction listens to outside its own element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalEvent {
    PointerMove,
    PointerUp,
    PointerCancel,
    KeyDown,
}

impl GlobalEvent {
    /// Everything a drag or resize needs while it is live
    pub const TRACKING: [GlobalEvent; 4] = [
        GlobalEvent::PointerMove,
        GlobalEvent::PointerUp,
        GlobalEvent::PointerCancel,
        GlobalEvent::KeyDown,
    ];
}

/// Registry of document-level listeners, keyed by owning panel
#[derive(Debug, Default)]
pub struct GlobalListeners {
    entries: RefCell<Vec<(GlobalEvent, PanelId)>>,
    attached_total: Cell<u64>,
}

impl GlobalListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&self, owner: &PanelId, events: &[GlobalEvent]) {
        let mut entries = self.entries.borrow_mut();
        for event in events {
            if !entries.iter().any(|(e, o)| e == event && o == owner) {
                entries.push((*event, owner.clone()));
                self.attached_total.set(self.attached_total.get() + 1);
            }
        }
    }

    /// Remove every listener `owner` registered; safe to call repeatedly
    pub fn detach_all(&self, owner: &PanelId) -> usize {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(_, o)| o != owner);
        before - entries.len()
    }

    /// Panel listening for `event`, if any
    pub fn owner_of(&self, event: GlobalEvent) -> Option<PanelId> {
        self.entries
            .borrow()
            .iter()
            .rev()
            .find(|(e, _)| *e == event)
            .map(|(_, o)| o.clone())
    }

    pub fn count(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn count_for(&self, owner: &PanelId) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(_, o)| o == owner)
            .count()
    }

    /// Listeners attached over the whole session
    pub fn attached_total(&self) -> u64 {
        self.attached_total.get()
    }

    pub fn clear(&self) -> usize {
        let mut entries = self.entries.borrow_mut();
        let removed = entries.len();
        entries.clear();
        removed
    }
}

// ============================================================================
// Frame batching
// ============================================================================

/// Keeps only the latest value pushed between two animation frames
#[derive(Debug)]
pub struct FrameBatcher<T> {
    pending: Option<T>,
    flushed: u64,
}

impl<T> Default for FrameBatcher<T> {
    fn default() -> Self {
        Self {
            pending: None,
            flushed: 0,
        }
    }
}

impl<T> FrameBatcher<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `value` for the next frame, replacing anything queued.
    /// Returns true when a frame has to be requested.
    pub fn push(&mut self, value: T) -> bool {
        self.pending.replace(value).is_none()
    }

    /// Value to apply in this frame
    pub fn take(&mut self) -> Option<T> {
        let value = self.pending.take();
        if value.is_some() {
            self.flushed += 1;
        }
        value
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Frames that applied a value
    pub fn flushed(&self) -> u64 {
        self.flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(panel: &str) -> Interaction {
        Interaction::Dragging {
            panel: panel.into(),
            pointer_id: 1,
        }
    }

    #[test]
    fn test_lock_rejects_second_interaction() {
        let lock = InteractionLock::new();
        lock.try_acquire(drag("a")).unwrap();
        let err = lock
            .try_acquire(Interaction::Resizing {
                panel: "b".into(),
                direction: ResizeDirection::East,
                pointer_id: 1,
            })
            .unwrap_err();
        assert!(matches!(err, InteractionError::Busy { .. }));
        assert!(lock.is_held_by(&"a".into()));
    }

    #[test]
    fn test_only_owner_releases() {
        let lock = InteractionLock::new();
        lock.try_acquire(drag("a")).unwrap();
        assert!(!lock.release(&"b".into()));
        assert!(lock.release(&"a".into()));
        assert!(!lock.release(&"a".into()));
        assert!(lock.is_idle());
    }

    #[test]
    fn test_listeners_attach_once_and_detach_idempotently() {
        let listeners = GlobalListeners::new();
        let a: PanelId = "a".into();
        listeners.attach(&a, &GlobalEvent::TRACKING);
        listeners.attach(&a, &GlobalEvent::TRACKING);
        assert_eq!(listeners.count(), 4);
        assert_eq!(listeners.owner_of(GlobalEvent::PointerUp), Some(a.clone()));

        assert_eq!(listeners.detach_all(&a), 4);
        assert_eq!(listeners.detach_all(&a), 0);
        assert_eq!(listeners.owner_of(GlobalEvent::PointerUp), None);
    }

    #[test]
    fn test_frame_batcher_keeps_latest() {
        let mut batcher = FrameBatcher::new();
        assert!(batcher.push(1));
        assert!(!batcher.push(2));
        assert!(!batcher.push(3));
        assert_eq!(batcher.take(), Some(3));
        assert_eq!(batcher.take(), None);
        assert_eq!(batcher.flushed(), 1);
    }
}
