//! Reducer for the layout store
//!
//! All state transformations flow through these functions. The public
//! entry point [`reduce`] is pure: it never touches its input and returns
//! the next state. Actions that address missing data or carry malformed
//! values leave the state unchanged.

mod layouts;
mod notifications;
mod panels;
mod settings;
mod ui;

use crate::messages::Action;
use crate::model::AppState;

pub use layouts::update_layouts;
pub use notifications::update_notifications;
pub use panels::{normalize_panels, update_panels};
pub use settings::update_settings;
pub use ui::update_ui;

/// Compute the state that results from applying `action` to `state`
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    let mut next = state.clone();
    update(&mut next, action);
    next
}

/// Apply `action` to `state` in place, dispatching to the slice handlers
pub fn update(state: &mut AppState, action: &Action) {
    match action {
        Action::AddPanel(_)
        | Action::UpdatePanel { .. }
        | Action::RemovePanel { .. }
        | Action::SetActivePanel(_)
        | Action::ClearPanels
        | Action::CompactZOrder { .. } => update_panels(state, action),

        Action::UpdateSettings(_) | Action::SetTheme(_) | Action::ResetSettings => {
            update_settings(&mut state.settings, action)
        }

        Action::ToggleSidebar
        | Action::SetSidebarOpen(_)
        | Action::OpenModal(_)
        | Action::CloseModal
        | Action::ShowContextMenu(_)
        | Action::HideContextMenu
        | Action::SetDragState(_)
        | Action::SetResizeState(_)
        | Action::SetBreakpoint(_) => update_ui(&mut state.ui, action),

        Action::AddNotification(_) | Action::RemoveNotification { .. } => {
            update_notifications(&mut state.notifications, action)
        }

        Action::StoreLayout(_)
        | Action::LoadLayout { .. }
        | Action::DeleteLayout { .. }
        | Action::Hydrate { .. } => update_layouts(state, action),

        Action::Unknown => {
            tracing::debug!(target: "store", "ignoring unknown action");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PanelConfig, PanelId};

    #[test]
    fn test_reduce_is_pure() {
        let state = AppState::new();
        let next = reduce(&state, &Action::AddPanel(PanelConfig::new("a", "notes")));
        assert!(state.panels.is_empty());
        assert_eq!(next.panels.len(), 1);
    }

    #[test]
    fn test_unknown_action_leaves_state_unchanged() {
        let state = reduce(
            &AppState::new(),
            &Action::AddPanel(PanelConfig::new("a", "notes")),
        );
        let next = reduce(&state, &Action::Unknown);
        assert_eq!(state, next);
    }

    #[test]
    fn test_actions_on_missing_panels_are_noops() {
        let state = AppState::new();
        let next = reduce(
            &state,
            &Action::RemovePanel {
                id: PanelId::new("ghost"),
            },
        );
        assert_eq!(state, next);
    }
}
