//! Saved layout and hydration handlers

use crate::messages::Action;
use crate::model::{AppState, Layout};

use super::panels::normalize_panels;

pub fn update_layouts(state: &mut AppState, action: &Action) {
    match action {
        Action::StoreLayout(layout) => {
            let layout = Layout {
                panels: normalize_panels(&layout.panels),
                ..layout.clone()
            };
            match state.layouts.iter_mut().find(|l| l.id == layout.id) {
                Some(existing) => {
                    let created_at = existing.created_at;
                    *existing = layout;
                    existing.created_at = created_at;
                }
                None => state.layouts.push(layout),
            }
        }

        Action::LoadLayout { id } => {
            let Some(layout) = state.layout(id) else {
                tracing::debug!(target: "store", layout = %id, "cannot load missing layout");
                return;
            };
            state.panels = normalize_panels(&layout.panels);
            state.ui.active_panel = None;
            state.ui.drag = None;
            state.ui.resize = None;
        }

        Action::DeleteLayout { id } => state.layouts.retain(|l| &l.id != id),

        Action::Hydrate {
            panels,
            layouts,
            settings,
        } => {
            state.panels = normalize_panels(panels);
            state.layouts = layouts
                .iter()
                .map(|l| Layout {
                    panels: normalize_panels(&l.panels),
                    ..l.clone()
                })
                .collect();
            state.settings = settings.clone();
            if state
                .ui
                .active_panel
                .as_ref()
                .is_some_and(|id| !state.panels.iter().any(|p| &p.id == id))
            {
                state.ui.active_panel = None;
            }
        }

        _ => {}
    }
}
