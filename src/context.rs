//! Shared handles passed to every panel and interaction handler

use std::cell::Cell;
use std::rc::Rc;

use crate::config::DeskConfig;
use crate::events::EventBus;
use crate::geometry::{DragBounds, Size};
use crate::interaction::{GlobalListeners, InteractionLock};
use crate::store::LayoutStore;

/// Everything a panel needs from the desktop it lives on
///
/// Cloning is cheap; clones share the same store, bus, lock and viewport.
#[derive(Clone)]
pub struct DeskContext {
    pub store: Rc<LayoutStore>,
    pub lock: Rc<InteractionLock>,
    pub listeners: Rc<GlobalListeners>,
    pub config: Rc<DeskConfig>,
    viewport: Rc<Cell<Size>>,
}

impl std::fmt::Debug for DeskContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeskContext")
            .field("viewport", &self.viewport.get())
            .field("lock", &self.lock.current())
            .field("listeners", &self.listeners.count())
            .finish()
    }
}

impl DeskContext {
    pub fn new(store: Rc<LayoutStore>, config: DeskConfig, viewport: Size) -> Self {
        Self {
            store,
            lock: Rc::new(InteractionLock::new()),
            listeners: Rc::new(GlobalListeners::new()),
            config: Rc::new(config),
            viewport: Rc::new(Cell::new(viewport)),
        }
    }

    pub fn events(&self) -> &Rc<EventBus> {
        self.store.events()
    }

    pub fn viewport(&self) -> Size {
        self.viewport.get()
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.viewport.set(viewport);
    }

    /// Area a dragged panel is kept inside
    pub fn drag_bounds(&self) -> DragBounds {
        DragBounds {
            viewport: self.viewport(),
            nav_height: self.config.nav_height,
        }
    }

    /// Desktop area below the navigation bar, as `(x, y, width, height)`
    pub fn work_area(&self) -> crate::geometry::Rect {
        let viewport = self.viewport();
        let nav = self.config.nav_height;
        crate::geometry::Rect::new(0.0, nav, viewport.width, (viewport.height - nav).max(0.0))
    }
}
