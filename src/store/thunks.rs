//! Multi-step store flows
//!
//! Each function here reads state, dispatches one or more plain actions and
//! may schedule follow-up work. They are run through
//! [`LayoutStore::dispatch_thunk`] by callers that want the thunk form, or
//! called directly.

use crate::error::DeskError;
use crate::messages::Action;
use crate::model::{
    Layout, Notification, NotificationKind, PanelConfig, PanelId, PanelUpdate,
    DEFAULT_NOTIFICATION_MS,
};

use super::LayoutStore;

/// z-index given to the first panel, and the base compaction renumbers from
pub const BASE_Z_INDEX: i64 = 100;

/// Once focusing would go past this, z-indices are compacted back to the base
pub const Z_INDEX_CEILING: i64 = 1_000_000;

/// Show a notification that expires after the default duration
pub fn notify(store: &LayoutStore, kind: NotificationKind, title: &str, message: &str) -> u64 {
    notify_for(store, kind, title, message, DEFAULT_NOTIFICATION_MS)
}

/// Show a notification that expires after `duration_ms` (zero keeps it)
pub fn notify_for(
    store: &LayoutStore,
    kind: NotificationKind,
    title: &str,
    message: &str,
    duration_ms: u64,
) -> u64 {
    let id = store.next_notification_id();
    store.dispatch(Action::AddNotification(Notification {
        id,
        kind,
        title: title.to_string(),
        message: message.to_string(),
        duration: duration_ms,
        timestamp: store.now_ms(),
    }));
    if duration_ms > 0 {
        store.schedule(duration_ms, move |store| {
            store.dispatch(Action::RemoveNotification { id });
        });
    }
    id
}

/// z-index that puts a panel above every other one, compacting first when
/// the ceiling would be crossed
pub fn next_z_index(store: &LayoutStore) -> i64 {
    let state = store.state();
    match state.max_z_index() {
        None => BASE_Z_INDEX,
        Some(max) if max + 1 > Z_INDEX_CEILING => {
            tracing::debug!(target: "store", max, "compacting z-indices");
            let next = store.dispatch(Action::CompactZOrder { base: BASE_Z_INDEX });
            next.max_z_index().map_or(BASE_Z_INDEX, |m| m + 1)
        }
        Some(max) => max + 1,
    }
}

/// Add `config` on top of the stack, refusing once `max_panels` are open
///
/// Hitting the limit shows a warning notification and leaves the panel
/// list untouched.
pub fn add_panel_with_limit(
    store: &LayoutStore,
    mut config: PanelConfig,
    max_panels: usize,
) -> Result<PanelId, DeskError> {
    let count = store.state().panels.len();
    if count >= max_panels {
        tracing::warn!(target: "store", count, max_panels, "panel limit reached");
        notify(
            store,
            NotificationKind::Warning,
            "Panel limit reached",
            &format!("Close a panel before opening another (maximum {max_panels})."),
        );
        return Err(DeskError::PanelLimit { max: max_panels });
    }
    if store.state().has_panel(&config.id) {
        return Err(DeskError::DuplicatePanel(config.id));
    }

    config.z_index = next_z_index(store);
    let id = config.id.clone();
    store.dispatch(Action::AddPanel(config));
    Ok(id)
}

/// Raise `id` above every other panel and make it active
///
/// Returns the new z-index, or `None` if the panel does not exist.
pub fn focus_panel(store: &LayoutStore, id: &PanelId) -> Option<i64> {
    if !store.state().has_panel(id) {
        return None;
    }
    let z_index = next_z_index(store);
    store.dispatch(Action::UpdatePanel {
        id: id.clone(),
        updates: PanelUpdate::z_index(z_index),
    });
    store.dispatch(Action::SetActivePanel(Some(id.clone())));
    store.state().panel(id).map(|p| p.z_index)
}

/// Save the live panels as a named layout and write the snapshot
pub fn save_layout(store: &LayoutStore, name: &str) -> Result<Layout, DeskError> {
    let now = store.now_ms();
    let layout = Layout {
        id: Layout::id_for_name(name),
        name: name.trim().to_string(),
        panels: store.state().panels.clone(),
        created_at: now,
        updated_at: now,
    };
    let state = store.dispatch(Action::StoreLayout(layout.clone()));

    if store.has_storage() {
        if let Err(e) = store.persist_now() {
            tracing::error!(target: "persistence", layout = %layout.id, "{e}");
            notify(
                store,
                NotificationKind::Error,
                "Save failed",
                &format!("Layout \"{}\" is kept for this session only.", layout.name),
            );
            return Err(e.into());
        }
    }

    notify(
        store,
        NotificationKind::Success,
        "Layout saved",
        &format!("Saved \"{}\".", layout.name),
    );
    Ok(state.layout(&layout.id).cloned().unwrap_or(layout))
}

/// Replace the live panels with a saved layout
pub fn load_layout(store: &LayoutStore, id: &str) -> Result<(), DeskError> {
    let Some(layout) = store.state().layout(id).cloned() else {
        return Err(DeskError::LayoutNotFound(id.to_string()));
    };
    store.dispatch(Action::LoadLayout { id: id.to_string() });
    notify(
        store,
        NotificationKind::Info,
        "Layout loaded",
        &format!("Loaded \"{}\".", layout.name),
    );
    Ok(())
}

pub fn delete_layout(store: &LayoutStore, id: &str) -> bool {
    let had = store.state().layout(id).is_some();
    store.dispatch(Action::DeleteLayout { id: id.to_string() });
    had
}
