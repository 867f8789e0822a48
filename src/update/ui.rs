//! Transient UI handlers (sidebar, modal, context menu, interaction snapshots)

use crate::messages::Action;
use crate::model::UiState;

/// Handle UI actions. None of these reach persisted state.
pub fn update_ui(ui: &mut UiState, action: &Action) {
    match action {
        Action::ToggleSidebar => ui.sidebar_open = !ui.sidebar_open,
        Action::SetSidebarOpen(open) => ui.sidebar_open = *open,

        Action::OpenModal(name) => {
            // Only one modal at a time; opening replaces the current one
            ui.modal = Some(name.clone());
            ui.context_menu = None;
        }
        Action::CloseModal => ui.modal = None,

        Action::ShowContextMenu(menu) => ui.context_menu = Some(menu.clone()),
        Action::HideContextMenu => ui.context_menu = None,

        Action::SetDragState(drag) => ui.drag = drag.clone(),
        Action::SetResizeState(resize) => ui.resize = resize.clone(),

        Action::SetBreakpoint(breakpoint) => ui.breakpoint = *breakpoint,

        _ => {}
    }
}
