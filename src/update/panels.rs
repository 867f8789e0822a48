//! Panel list handlers

use std::collections::HashSet;

use crate::messages::Action;
use crate::model::{AppState, PanelConfig, PanelId, PanelUpdate};

/// Handle panel actions (add, update, remove, focus)
pub fn update_panels(state: &mut AppState, action: &Action) {
    match action {
        Action::AddPanel(config) => add_panel(state, config.clone()),

        Action::UpdatePanel { id, updates } => {
            if !updates.is_well_formed() {
                tracing::debug!(target: "store", panel = %id, "ignoring malformed panel update");
                return;
            }
            update_panel(state, id, updates);
        }

        Action::RemovePanel { id } => {
            state.panels.retain(|p| &p.id != id);
            if state.ui.active_panel.as_ref() == Some(id) {
                state.ui.active_panel = None;
            }
            if state.ui.drag.as_ref().is_some_and(|d| &d.panel_id == id) {
                state.ui.drag = None;
            }
            if state.ui.resize.as_ref().is_some_and(|r| &r.panel_id == id) {
                state.ui.resize = None;
            }
        }

        Action::SetActivePanel(id) => match id {
            Some(id) if !state.has_panel(id) => {
                tracing::debug!(target: "store", panel = %id, "cannot activate missing panel");
            }
            _ => state.ui.active_panel = id.clone(),
        },

        Action::ClearPanels => {
            state.panels.clear();
            state.ui.active_panel = None;
            state.ui.drag = None;
            state.ui.resize = None;
        }

        Action::CompactZOrder { base } => {
            let mut order: Vec<usize> = (0..state.panels.len()).collect();
            order.sort_by_key(|&i| state.panels[i].z_index);
            for (rank, i) in order.into_iter().enumerate() {
                state.panels[i].z_index = base + rank as i64;
            }
        }

        _ => {}
    }
}

fn add_panel(state: &mut AppState, config: PanelConfig) {
    if state.has_panel(&config.id) {
        tracing::warn!(target: "store", panel = %config.id, "panel id already in use, ignoring add");
        return;
    }

    let mut config = config.normalized();
    let taken = state.panels.iter().any(|p| p.z_index == config.z_index);
    if taken || config.z_index <= 0 {
        config.z_index = state.max_z_index().map_or(config.z_index.max(1), |max| max + 1);
    }

    state.ui.active_panel = Some(config.id.clone());
    state.panels.push(config);
}

fn update_panel(state: &mut AppState, id: &PanelId, updates: &PanelUpdate) {
    let z_conflict = updates
        .z_index
        .is_some_and(|z| state.panels.iter().any(|p| &p.id != id && p.z_index == z));

    let Some(panel) = state.panel_mut(id) else {
        return;
    };

    if let Some(title) = &updates.title {
        panel.title = title.clone();
    }
    if let Some(position) = updates.position {
        panel.position = position;
    }
    if let Some(size) = updates.size {
        panel.size = panel.limits().clamp(size);
    }
    if let Some(z_index) = updates.z_index {
        if z_conflict {
            tracing::debug!(target: "store", panel = %id, z_index, "ignoring tied z-index");
        } else {
            panel.z_index = z_index;
        }
    }
    if let Some(visible) = updates.visible {
        panel.visible = visible;
    }
    if let Some(resizable) = updates.resizable {
        panel.resizable = resizable;
    }
    if let Some(draggable) = updates.draggable {
        panel.draggable = draggable;
    }
    if let Some(closable) = updates.closable {
        panel.closable = closable;
    }
    if let Some(collapsible) = updates.collapsible {
        panel.collapsible = collapsible;
    }
    if let Some(settings) = &updates.settings {
        panel.settings = settings.clone();
    }
}

/// Restore list invariants on panels coming from outside the reducer
/// (a saved layout or a persisted snapshot): duplicate ids are dropped,
/// geometry is made finite and clamped, and tied z-indices are spread out
/// while keeping their relative order.
pub fn normalize_panels(panels: &[PanelConfig]) -> Vec<PanelConfig> {
    let mut seen = HashSet::new();
    let mut result: Vec<PanelConfig> = panels
        .iter()
        .filter(|p| seen.insert(p.id.clone()))
        .cloned()
        .map(PanelConfig::normalized)
        .collect();

    let mut order: Vec<usize> = (0..result.len()).collect();
    order.sort_by_key(|&i| result[i].z_index);
    let mut last: Option<i64> = None;
    for i in order {
        let z = result[i].z_index;
        let z = match last {
            Some(prev) if z <= prev => prev + 1,
            _ => z,
        };
        result[i].z_index = z;
        last = Some(z);
    }
    result
}
