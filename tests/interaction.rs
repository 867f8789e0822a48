//! Drag and resize driven through the manager's pointer routing

mod common;

use common::{open_at, stored, test_manager};
use refdesk::geometry::{Point, Size};
use refdesk::interaction::{EventResult, Key, KeyInput, PointerEvent};
use refdesk::PanelOptions;

fn press(x: f64, y: f64) -> PointerEvent {
    PointerEvent::at(x, y)
}

// ========================================================================
// Dragging
// ========================================================================

#[test]
fn test_drag_far_past_edges_is_clamped() {
    let mut m = test_manager();
    let id = open_at(&mut m, 200.0, 200.0, 400.0, 300.0);

    assert!(m.on_pointer_down(&press(220.0, 210.0)).is_consumed());
    m.on_pointer_move(&press(-5000.0, -5000.0));
    m.on_animation_frame();
    m.on_pointer_up(&press(-5000.0, -5000.0));

    let config = stored(&m, &id);
    assert_eq!(config.position, Point::new(0.0, 60.0));
    assert!(m.context().lock.is_idle());
}

#[test]
fn test_drag_past_far_edge_keeps_panel_on_screen() {
    let mut m = test_manager();
    let id = open_at(&mut m, 200.0, 200.0, 400.0, 300.0);

    m.on_pointer_down(&press(220.0, 210.0));
    m.on_pointer_move(&press(9000.0, 9000.0));
    m.on_pointer_up(&press(9000.0, 9000.0));

    let config = stored(&m, &id);
    assert_eq!(config.position, Point::new(880.0, 500.0));
}

#[test]
fn test_store_sees_only_the_final_drag_position() {
    let mut m = test_manager();
    let id = open_at(&mut m, 200.0, 200.0, 400.0, 300.0);

    m.on_pointer_down(&press(220.0, 210.0));
    for step in 1..=5 {
        let offset = step as f64 * 10.0;
        m.on_pointer_move(&press(220.0 + offset, 210.0 + offset));
        m.on_animation_frame();
    }
    assert_eq!(stored(&m, &id).position, Point::new(200.0, 200.0));
    assert_eq!(
        m.panel(&id).unwrap().element().rect().position(),
        Point::new(250.0, 250.0)
    );

    m.on_pointer_up(&press(250.0, 250.0));
    assert_eq!(stored(&m, &id).position, Point::new(230.0, 240.0));
}

#[test]
fn test_pointer_cancel_commits_the_drag() {
    let mut m = test_manager();
    let id = open_at(&mut m, 200.0, 200.0, 400.0, 300.0);

    m.on_pointer_down(&press(220.0, 210.0));
    m.on_pointer_move(&press(320.0, 260.0));
    m.on_pointer_cancel();

    assert_eq!(stored(&m, &id).position, Point::new(300.0, 250.0));
    assert!(m.context().lock.is_idle());
    assert_eq!(m.context().listeners.count(), 0);
}

// ========================================================================
// Resizing
// ========================================================================

#[test]
fn test_resize_respects_min_and_max_size() {
    let mut m = test_manager();
    let id = m
        .create_panel("bounded", PanelOptions::at(200.0, 200.0).with_size(300.0, 300.0))
        .unwrap();

    // Shrink far below the minimum from the south-east corner
    assert!(m.on_pointer_down(&press(497.0, 497.0)).is_consumed());
    assert!(m.panel(&id).unwrap().is_interacting());
    m.on_pointer_move(&press(-1000.0, -1000.0));
    m.on_pointer_up(&press(-1000.0, -1000.0));

    let config = stored(&m, &id);
    assert_eq!(config.size, Size::new(100.0, 100.0));
    assert_eq!(config.position, Point::new(200.0, 200.0));

    // Grow far past the maximum
    m.on_pointer_down(&press(297.0, 297.0));
    m.on_pointer_move(&press(5000.0, 5000.0));
    m.on_pointer_up(&press(5000.0, 5000.0));
    assert_eq!(stored(&m, &id).size, Size::new(600.0, 500.0));
}

#[test]
fn test_escape_reverts_resize_without_commit() {
    let mut m = test_manager();
    let id = open_at(&mut m, 200.0, 200.0, 300.0, 300.0);

    m.on_pointer_down(&press(497.0, 497.0));
    m.on_pointer_move(&press(700.0, 700.0));
    m.on_animation_frame();
    assert_eq!(
        m.panel(&id).unwrap().element().rect().size(),
        Size::new(503.0, 503.0)
    );

    assert!(m.handle_key(&KeyInput::plain(Key::Escape)).is_consumed());
    assert_eq!(stored(&m, &id).size, Size::new(300.0, 300.0));
    assert_eq!(
        m.panel(&id).unwrap().element().rect().size(),
        Size::new(300.0, 300.0)
    );
    assert!(m.context().lock.is_idle());
}

// ========================================================================
// Re-entrancy
// ========================================================================

#[test]
fn test_second_press_during_drag_changes_nothing() {
    let mut m = test_manager();
    let a = open_at(&mut m, 100.0, 100.0, 300.0, 200.0);
    let b = open_at(&mut m, 600.0, 100.0, 300.0, 200.0);

    m.on_pointer_down(&press(150.0, 110.0));
    let ctx = m.context().clone();
    assert!(ctx.lock.is_held_by(&a));

    let state_before = ctx.store.state();
    let listeners_before = ctx.listeners.count();
    let attached_before = ctx.listeners.attached_total();

    let result = m.on_pointer_down(&press(650.0, 110.0));
    assert_eq!(result, EventResult::consumed_no_redraw());

    assert_eq!(*ctx.store.state(), *state_before);
    assert_eq!(ctx.listeners.count(), listeners_before);
    assert_eq!(ctx.listeners.attached_total(), attached_before);
    assert!(ctx.lock.is_held_by(&a));
    assert!(!m.panel(&b).unwrap().is_interacting());

    // The original drag still completes normally
    m.on_pointer_move(&press(170.0, 130.0));
    m.on_pointer_up(&press(170.0, 130.0));
    assert_eq!(stored(&m, &a).position, Point::new(120.0, 120.0));
    assert_eq!(stored(&m, &b).position, Point::new(600.0, 100.0));
}

#[test]
fn test_press_on_resize_handle_during_drag_is_ignored() {
    let mut m = test_manager();
    let a = open_at(&mut m, 100.0, 100.0, 300.0, 200.0);
    let b = open_at(&mut m, 600.0, 100.0, 300.0, 200.0);

    m.on_pointer_down(&press(150.0, 110.0));
    m.on_pointer_down(&press(897.0, 297.0));

    assert!(m.context().lock.is_held_by(&a));
    assert!(m.context().store.state().ui.resize.is_none());
    assert_eq!(stored(&m, &b).size, Size::new(300.0, 200.0));
}
