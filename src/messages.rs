//! Action types for the layout store
//!
//! All state changes flow through these actions. They serialize in the
//! `{ "type": "ADD_PANEL", "payload": ... }` shape, and any unrecognized
//! `type` decodes to [`Action::Unknown`], which the reducer ignores.

use serde::{Deserialize, Serialize};

use crate::model::{
    AppSettings, Breakpoint, ContextMenu, DragSnapshot, Layout, Notification, PanelConfig,
    PanelId, PanelUpdate, ResizeSnapshot, SettingsUpdate, ThemeMode,
};

/// Actions dispatched to the layout store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // === Panels ===
    /// Append a panel and make it the active one
    AddPanel(PanelConfig),
    /// Merge fields into an existing panel (no-op if the id is absent)
    UpdatePanel { id: PanelId, updates: PanelUpdate },
    /// Remove a panel, clearing the active panel if it matched
    RemovePanel { id: PanelId },
    /// Set (or clear) the active panel
    SetActivePanel(Option<PanelId>),
    /// Remove every panel
    ClearPanels,
    /// Renumber z-indices from `base` upward, keeping stacking order
    CompactZOrder { base: i64 },

    // === Settings ===
    UpdateSettings(SettingsUpdate),
    SetTheme(ThemeMode),
    ResetSettings,

    // === Transient UI ===
    ToggleSidebar,
    SetSidebarOpen(bool),
    OpenModal(String),
    CloseModal,
    ShowContextMenu(ContextMenu),
    HideContextMenu,
    SetDragState(Option<DragSnapshot>),
    SetResizeState(Option<ResizeSnapshot>),
    SetBreakpoint(Breakpoint),

    // === Notifications ===
    AddNotification(Notification),
    RemoveNotification { id: u64 },

    // === Layouts ===
    /// Insert or replace a saved layout (matched by id)
    StoreLayout(Layout),
    /// Replace the live panel list with a saved layout's panels
    LoadLayout { id: String },
    DeleteLayout { id: String },
    /// Replace persisted slices with a loaded snapshot
    Hydrate {
        panels: Vec<PanelConfig>,
        layouts: Vec<Layout>,
        settings: AppSettings,
    },

    /// Any action type this build does not recognize
    #[serde(other)]
    Unknown,
}

impl Action {
    /// Action type name, as used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddPanel(_) => "ADD_PANEL",
            Action::UpdatePanel { .. } => "UPDATE_PANEL",
            Action::RemovePanel { .. } => "REMOVE_PANEL",
            Action::SetActivePanel(_) => "SET_ACTIVE_PANEL",
            Action::ClearPanels => "CLEAR_PANELS",
            Action::CompactZOrder { .. } => "COMPACT_Z_ORDER",
            Action::UpdateSettings(_) => "UPDATE_SETTINGS",
            Action::SetTheme(_) => "SET_THEME",
            Action::ResetSettings => "RESET_SETTINGS",
            Action::ToggleSidebar => "TOGGLE_SIDEBAR",
            Action::SetSidebarOpen(_) => "SET_SIDEBAR_OPEN",
            Action::OpenModal(_) => "OPEN_MODAL",
            Action::CloseModal => "CLOSE_MODAL",
            Action::ShowContextMenu(_) => "SHOW_CONTEXT_MENU",
            Action::HideContextMenu => "HIDE_CONTEXT_MENU",
            Action::SetDragState(_) => "SET_DRAG_STATE",
            Action::SetResizeState(_) => "SET_RESIZE_STATE",
            Action::SetBreakpoint(_) => "SET_BREAKPOINT",
            Action::AddNotification(_) => "ADD_NOTIFICATION",
            Action::RemoveNotification { .. } => "REMOVE_NOTIFICATION",
            Action::StoreLayout(_) => "STORE_LAYOUT",
            Action::LoadLayout { .. } => "LOAD_LAYOUT",
            Action::DeleteLayout { .. } => "DELETE_LAYOUT",
            Action::Hydrate { .. } => "HYDRATE",
            Action::Unknown => "UNKNOWN",
        }
    }

    /// Whether this action can only touch transient (non-persisted) state
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Action::SetActivePanel(_)
                | Action::ToggleSidebar
                | Action::SetSidebarOpen(_)
                | Action::OpenModal(_)
                | Action::CloseModal
                | Action::ShowContextMenu(_)
                | Action::HideContextMenu
                | Action::SetDragState(_)
                | Action::SetResizeState(_)
                | Action::SetBreakpoint(_)
                | Action::AddNotification(_)
                | Action::RemoveNotification { .. }
                | Action::Unknown
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        let action = Action::RemovePanel {
            id: PanelId::new("notes-1"),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "REMOVE_PANEL");
        assert_eq!(json["payload"]["id"], "notes-1");
    }

    #[test]
    fn test_unknown_action_type_decodes() {
        let action: Action = serde_json::from_str(r#"{"type":"DO_A_BARREL_ROLL"}"#).unwrap();
        assert_eq!(action, Action::Unknown);
    }

    #[test]
    fn test_breakpoint_action_decodes() {
        let action: Action =
            serde_json::from_str(r#"{"type":"SET_BREAKPOINT","payload":"Mobile"}"#).unwrap();
        assert_eq!(action, Action::SetBreakpoint(Breakpoint::Mobile));
    }
}
