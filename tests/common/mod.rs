//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::rc::Rc;

use refdesk::geometry::Size;
use refdesk::model::{PanelConfig, PanelId};
use refdesk::panel::{ContentRegistry, PanelContent, PanelDescriptor, StaticContent};
use refdesk::{DeskConfig, DeskContext, LayoutStore, PanelManager, PanelOptions};

pub const VIEWPORT: Size = Size::new(1280.0, 800.0);

/// Context over a fresh in-memory store
pub fn test_context(viewport: Size) -> DeskContext {
    DeskContext::new(LayoutStore::new(), DeskConfig::default(), viewport)
}

/// Context over a store built elsewhere
pub fn context_for(store: Rc<LayoutStore>) -> DeskContext {
    DeskContext::new(store, DeskConfig::default(), VIEWPORT)
}

/// Registry with the built-in types plus an unconstrained "widget" and a
/// "bounded" type limited to 100x100..600x500
pub fn test_registry() -> ContentRegistry {
    let mut registry = refdesk::panels::builtin_registry().unwrap();
    registry
        .register(PanelDescriptor::new("widget", "Widget"), |_| {
            Ok(Box::new(StaticContent::new(["widget"])) as Box<dyn PanelContent>)
        })
        .unwrap();
    registry
        .register(
            PanelDescriptor::new("bounded", "Bounded").with_limits(
                Some(Size::new(100.0, 100.0)),
                Some(Size::new(600.0, 500.0)),
            ),
            |_| Ok(Box::new(StaticContent::new(["bounded"])) as Box<dyn PanelContent>),
        )
        .unwrap();
    registry
}

/// Manager on a 1280x800 desktop
pub fn test_manager() -> PanelManager {
    PanelManager::new(test_context(VIEWPORT), test_registry())
}

/// Open a "widget" panel at an exact rect
pub fn open_at(manager: &mut PanelManager, x: f64, y: f64, width: f64, height: f64) -> PanelId {
    manager
        .create_panel(
            "widget",
            PanelOptions::at(x, y).with_size(width, height),
        )
        .unwrap()
}

/// Canonical config of `id` as held by the store
pub fn stored(manager: &PanelManager, id: &PanelId) -> PanelConfig {
    manager
        .context()
        .store
        .state()
        .panel(id)
        .cloned()
        .unwrap()
}

/// Ids in store order
pub fn panel_ids(store: &LayoutStore) -> Vec<String> {
    store
        .state()
        .panels
        .iter()
        .map(|p| p.id.0.clone())
        .collect()
}
