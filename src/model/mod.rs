//! Application model - the complete canonical state of the desktop
//!
//! This module contains all the state types held by the layout store.
//! Only the store mutates them, always through the reducer in `update`.

pub mod layout;
pub mod notification;
pub mod panel;
pub mod settings;
pub mod ui;

pub use layout::Layout;
pub use notification::{
    Notification, NotificationKind, NotificationRequest, DEFAULT_NOTIFICATION_MS,
    MAX_NOTIFICATIONS,
};
pub use panel::{PanelConfig, PanelId, PanelType, PanelUpdate};
pub use settings::{AppSettings, SettingsUpdate, ThemeMode};
pub use ui::{Breakpoint, ContextMenu, DragSnapshot, ResizeSnapshot, UiState};

/// The complete application state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Live panels, in creation order
    pub panels: Vec<PanelConfig>,
    /// Saved layouts
    pub layouts: Vec<Layout>,
    pub settings: AppSettings,
    pub ui: UiState,
    pub notifications: Vec<Notification>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panel(&self, id: &PanelId) -> Option<&PanelConfig> {
        self.panels.iter().find(|p| &p.id == id)
    }

    pub fn panel_mut(&mut self, id: &PanelId) -> Option<&mut PanelConfig> {
        self.panels.iter_mut().find(|p| &p.id == id)
    }

    pub fn has_panel(&self, id: &PanelId) -> bool {
        self.panel(id).is_some()
    }

    /// Highest z-index among live panels
    pub fn max_z_index(&self) -> Option<i64> {
        self.panels.iter().map(|p| p.z_index).max()
    }

    pub fn active_panel(&self) -> Option<&PanelConfig> {
        self.ui
            .active_panel
            .as_ref()
            .and_then(|id| self.panel(id))
    }

    pub fn layout(&self, id: &str) -> Option<&Layout> {
        self.layouts.iter().find(|l| l.id == id)
    }
}
