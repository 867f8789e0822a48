//! Store integration tests: panel bookkeeping, stacking order and persistence

mod common;

use std::collections::HashSet;

use common::panel_ids;
use proptest::prelude::*;
use refdesk::geometry::Point;
use refdesk::model::{PanelConfig, PanelId, PanelUpdate};
use refdesk::store::{thunks, FileStorage, MemoryStorage};
use refdesk::{Action, LayoutStore};

// ========================================================================
// Add / remove bookkeeping
// ========================================================================

#[derive(Debug, Clone)]
enum Op {
    Add(u8),
    Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![(0u8..8).prop_map(Op::Add), (0u8..8).prop_map(Op::Remove)]
}

proptest! {
    /// The panel list holds exactly the ids added and not yet removed
    #[test]
    fn panel_list_tracks_adds_and_removes(ops in prop::collection::vec(op(), 0..60)) {
        let store = LayoutStore::new();
        let mut expected: Vec<String> = Vec::new();

        for op in ops {
            match op {
                Op::Add(n) => {
                    let id = format!("panel-{n}");
                    store.dispatch(Action::AddPanel(PanelConfig::new(id.as_str(), "widget")));
                    if !expected.contains(&id) {
                        expected.push(id);
                    }
                }
                Op::Remove(n) => {
                    let id = format!("panel-{n}");
                    store.dispatch(Action::RemovePanel { id: PanelId::from(id.as_str()) });
                    expected.retain(|e| e != &id);
                }
            }
        }

        let ids = panel_ids(&store);
        let unique: HashSet<&String> = ids.iter().collect();
        prop_assert_eq!(unique.len(), ids.len(), "duplicate ids in {:?}", ids);
        prop_assert_eq!(ids, expected);
    }

    /// Focusing always lands strictly above every other panel, and the
    /// focused z-index only ever grows
    #[test]
    fn focus_is_strictly_topmost(picks in prop::collection::vec(0usize..4, 1..40)) {
        let store = LayoutStore::new();
        let ids: Vec<PanelId> = (0..4)
            .map(|i| {
                thunks::add_panel_with_limit(&store, PanelConfig::new(format!("p{i}"), "widget"), 10)
                    .unwrap()
            })
            .collect();

        let mut last = i64::MIN;
        for pick in picks {
            let id = &ids[pick];
            let z = thunks::focus_panel(&store, id).unwrap();
            let state = store.state();
            for other in state.panels.iter().filter(|p| &p.id != id) {
                prop_assert!(z > other.z_index, "{} not above {} ({})", z, other.id, other.z_index);
            }
            prop_assert!(z > last);
            prop_assert_eq!(state.ui.active_panel.as_ref(), Some(id));
            last = z;
        }
    }
}

#[test]
fn test_focus_missing_panel_is_none() {
    let store = LayoutStore::new();
    assert_eq!(thunks::focus_panel(&store, &"ghost".into()), None);
    assert!(store.state().ui.active_panel.is_none());
}

#[test]
fn test_limit_refuses_without_touching_panels() {
    let store = LayoutStore::new();
    thunks::add_panel_with_limit(&store, PanelConfig::new("a", "widget"), 1).unwrap();
    let refused = thunks::add_panel_with_limit(&store, PanelConfig::new("b", "widget"), 1);
    assert!(refused.is_err());
    assert_eq!(panel_ids(&store), vec!["a".to_string()]);
    assert_eq!(store.state().notifications.len(), 1);
}

// ========================================================================
// Persistence
// ========================================================================

fn populate(store: &LayoutStore) {
    for (id, x) in [("notes-1", 120.0), ("dice-1", 480.0)] {
        thunks::add_panel_with_limit(
            store,
            PanelConfig::new(id, id.split('-').next().unwrap_or("widget"))
                .with_position(x, 140.0)
                .with_size(320.0, 240.0),
            10,
        )
        .unwrap();
    }
    store.dispatch(Action::UpdatePanel {
        id: "dice-1".into(),
        updates: PanelUpdate {
            visible: Some(false),
            ..Default::default()
        },
    });
}

type PanelKey = (PanelId, Point, refdesk::geometry::Size, bool);

fn keys(store: &LayoutStore) -> Vec<PanelKey> {
    store
        .state()
        .panels
        .iter()
        .map(|p| (p.id.clone(), p.position, p.size, p.visible))
        .collect()
}

#[test]
fn test_saved_layout_reloads_identical_panels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("desktop.json");

    let store = LayoutStore::builder()
        .storage(FileStorage::new(path.clone()))
        .build();
    populate(&store);
    let layout = thunks::save_layout(&store, "Session").unwrap();
    assert_eq!(layout.id, "session");
    assert!(path.exists());

    let reloaded = LayoutStore::builder()
        .storage(FileStorage::new(path.clone()))
        .build();
    assert!(reloaded.hydrate());
    assert_eq!(keys(&reloaded), keys(&store));

    // Loading the saved layout after clearing gives the same list again
    reloaded.dispatch(Action::ClearPanels);
    assert!(reloaded.state().panels.is_empty());
    thunks::load_layout(&reloaded, "session").unwrap();
    assert_eq!(keys(&reloaded), keys(&store));
}

#[test]
fn test_transient_ui_is_not_persisted() {
    let storage = MemoryStorage::new();
    let store = LayoutStore::builder().storage(storage.clone()).build();
    populate(&store);
    store.dispatch(Action::OpenModal("settings".into()));
    store.persist_now().unwrap();

    let restored = LayoutStore::builder().storage(storage).build();
    assert!(restored.hydrate());
    assert!(restored.state().ui.modal.is_none());
    assert_eq!(keys(&restored), keys(&store));
}

#[test]
fn test_corrupt_snapshot_keeps_defaults() {
    let store = LayoutStore::builder()
        .storage(MemoryStorage::with_contents("{ not json"))
        .build();
    assert!(!store.hydrate());
    assert!(store.state().panels.is_empty());
    assert!(!store.is_persistence_degraded());
}

#[test]
fn test_read_failure_degrades_to_memory() {
    let storage = MemoryStorage::new();
    storage.set_fail_reads(true);
    let store = LayoutStore::builder().storage(storage.clone()).build();
    assert!(!store.hydrate());
    assert!(store.is_persistence_degraded());

    // The session keeps working in memory
    store.dispatch(Action::AddPanel(PanelConfig::new("a", "widget")));
    assert_eq!(panel_ids(&store), vec!["a".to_string()]);
    assert_eq!(storage.writes(), 0);
}

#[test]
fn test_missing_file_is_a_clean_start() {
    let dir = tempfile::tempdir().unwrap();
    let store = LayoutStore::builder()
        .storage(FileStorage::new(dir.path().join("absent.json")))
        .build();
    assert!(!store.hydrate());
    assert!(!store.is_persistence_degraded());
}
