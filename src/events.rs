//! Event bus for panel lifecycle notifications
//!
//! The bus is a plain publish/subscribe channel shared by `Rc`. Listeners
//! are cloned out before an event is emitted, so a listener may subscribe
//! or unsubscribe (itself included) while it runs.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::geometry::{Point, Rect, ResizeDirection};
use crate::model::{Breakpoint, PanelId};

/// Lifecycle events published by the store, manager, panels and handlers
#[derive(Debug, Clone, PartialEq)]
pub enum DeskEvent {
    // === Store ===
    /// An action is about to reach the reducer
    ActionDispatched { action: &'static str },

    // === Panel lifecycle ===
    PanelCreated { id: PanelId },
    PanelRemoved { id: PanelId },
    PanelFocused { id: PanelId },
    PanelBlurred { id: PanelId },
    BeforeClose { id: PanelId },
    Closed { id: PanelId },
    Minimized { id: PanelId },
    Maximized { id: PanelId },
    Restored { id: PanelId },
    ContentError { id: PanelId, message: String },

    // === Interaction ===
    DragStart { id: PanelId, position: Point },
    DragMove { id: PanelId, position: Point },
    DragEnd { id: PanelId, position: Point },
    ResizeStart {
        id: PanelId,
        direction: ResizeDirection,
        rect: Rect,
    },
    ResizeMove { id: PanelId, rect: Rect },
    ResizeEnd { id: PanelId, rect: Rect },
    ResizeCancel { id: PanelId, rect: Rect },

    // === Responsive ===
    BreakpointChanged { from: Breakpoint, to: Breakpoint },
}

impl DeskEvent {
    /// Stable event name, e.g. `"panel:created"`
    pub fn name(&self) -> &'static str {
        match self {
            DeskEvent::ActionDispatched { .. } => "store:action",
            DeskEvent::PanelCreated { .. } => "panel:created",
            DeskEvent::PanelRemoved { .. } => "panel:removed",
            DeskEvent::PanelFocused { .. } => "panel:focused",
            DeskEvent::PanelBlurred { .. } => "panel:blurred",
            DeskEvent::BeforeClose { .. } => "panel:before-close",
            DeskEvent::Closed { .. } => "panel:closed",
            DeskEvent::Minimized { .. } => "panel:minimized",
            DeskEvent::Maximized { .. } => "panel:maximized",
            DeskEvent::Restored { .. } => "panel:restored",
            DeskEvent::ContentError { .. } => "panel:content-error",
            DeskEvent::DragStart { .. } => "drag:start",
            DeskEvent::DragMove { .. } => "drag:move",
            DeskEvent::DragEnd { .. } => "drag:end",
            DeskEvent::ResizeStart { .. } => "resize:start",
            DeskEvent::ResizeMove { .. } => "resize:move",
            DeskEvent::ResizeEnd { .. } => "resize:end",
            DeskEvent::ResizeCancel { .. } => "resize:cancel",
            DeskEvent::BreakpointChanged { .. } => "breakpoint:changed",
        }
    }

    /// Panel the event is about, if any
    pub fn panel_id(&self) -> Option<&PanelId> {
        match self {
            DeskEvent::ActionDispatched { .. } | DeskEvent::BreakpointChanged { .. } => None,
            DeskEvent::PanelCreated { id }
            | DeskEvent::PanelRemoved { id }
            | DeskEvent::PanelFocused { id }
            | DeskEvent::PanelBlurred { id }
            | DeskEvent::BeforeClose { id }
            | DeskEvent::Closed { id }
            | DeskEvent::Minimized { id }
            | DeskEvent::Maximized { id }
            | DeskEvent::Restored { id }
            | DeskEvent::ContentError { id, .. }
            | DeskEvent::DragStart { id, .. }
            | DeskEvent::DragMove { id, .. }
            | DeskEvent::DragEnd { id, .. }
            | DeskEvent::ResizeStart { id, .. }
            | DeskEvent::ResizeMove { id, .. }
            | DeskEvent::ResizeEnd { id, .. }
            | DeskEvent::ResizeCancel { id, .. } => Some(id),
        }
    }
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&DeskEvent)>;

struct Entry {
    id: ListenerId,
    /// Only deliver events with this name; `None` receives everything
    filter: Option<&'static str>,
    listener: Listener,
}

#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<Entry>>,
    next_id: Cell<u64>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Receive every event
    pub fn subscribe(&self, listener: impl Fn(&DeskEvent) + 'static) -> ListenerId {
        self.insert(None, Rc::new(listener))
    }

    /// Receive only events whose [`DeskEvent::name`] equals `name`
    pub fn on(&self, name: &'static str, listener: impl Fn(&DeskEvent) + 'static) -> ListenerId {
        self.insert(Some(name), Rc::new(listener))
    }

    fn insert(&self, filter: Option<&'static str>, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push(Entry {
            id,
            filter,
            listener,
        });
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|e| e.id != id);
        listeners.len() != before
    }

    pub fn emit(&self, event: DeskEvent) {
        let name = event.name();
        let targets: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|e| e.filter.map_or(true, |f| f == name))
            .map(|e| e.listener.clone())
            .collect();

        tracing::trace!(target: "events", event = name, listeners = targets.len(), "emit");
        for listener in targets {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Drop every listener (used on shutdown)
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}
