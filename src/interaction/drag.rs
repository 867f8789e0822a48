//! Pointer-driven panel moving
//!
//! A drag starts on a primary-button press on the panel header, tracks the
//! pointer through the global listeners, and ends on release or cancel with
//! exactly one position commit to the store.

use crate::context::DeskContext;
use crate::events::DeskEvent;
use crate::geometry::{drag_position, Point, Rect, Size};
use crate::messages::Action;
use crate::model::{DragSnapshot, PanelId, PanelUpdate};

use super::{
    EventResult, FrameBatcher, GlobalEvent, Interaction, InteractionError, PointerEvent,
};

#[derive(Debug, Clone, Copy)]
struct DragState {
    pointer_id: u64,
    start_pointer: Point,
    start_position: Point,
    size: Size,
    current: Point,
}

#[derive(Debug)]
pub struct DragHandler {
    panel_id: PanelId,
    ctx: DeskContext,
    enabled: bool,
    active: Option<DragState>,
    frame: FrameBatcher<Point>,
}

impl DragHandler {
    pub fn new(panel_id: PanelId, ctx: DeskContext) -> Self {
        Self {
            panel_id,
            ctx,
            enabled: true,
            active: None,
            frame: FrameBatcher::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// In-flight position, while a drag is live
    pub fn current_position(&self) -> Option<Point> {
        self.active.map(|s| s.current)
    }

    /// Start dragging from a press on the header
    ///
    /// `rect` is the panel's geometry at the moment of the press.
    pub fn begin(&mut self, event: &PointerEvent, rect: Rect) -> EventResult {
        if !self.enabled || !event.is_primary() || self.active.is_some() {
            return EventResult::Bubble;
        }
        if !event.position.is_finite() || !rect.is_finite() {
            tracing::warn!(target: "drag", panel = %self.panel_id, "ignoring press with non-finite geometry");
            return EventResult::Bubble;
        }

        let interaction = Interaction::Dragging {
            panel: self.panel_id.clone(),
            pointer_id: event.pointer_id,
        };
        if let Err(e) = self.ctx.lock.try_acquire(interaction) {
            tracing::debug!(target: "drag", panel = %self.panel_id, "drag not started: {e}");
            return EventResult::consumed_no_redraw();
        }

        self.ctx
            .listeners
            .attach(&self.panel_id, &GlobalEvent::TRACKING);
        self.active = Some(DragState {
            pointer_id: event.pointer_id,
            start_pointer: event.position,
            start_position: rect.position(),
            size: rect.size(),
            current: rect.position(),
        });

        self.ctx
            .store
            .dispatch(Action::SetDragState(Some(DragSnapshot {
                panel_id: self.panel_id.clone(),
            })));
        self.ctx.events().emit(DeskEvent::DragStart {
            id: self.panel_id.clone(),
            position: rect.position(),
        });
        tracing::debug!(target: "drag", panel = %self.panel_id, "drag started");
        EventResult::consumed_redraw()
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> EventResult {
        match self.track(event) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(target: "drag", panel = %self.panel_id, "{e}; resetting drag");
                self.emergency_reset();
                EventResult::consumed_redraw()
            }
        }
    }

    fn track(&mut self, event: &PointerEvent) -> Result<EventResult, InteractionError> {
        let bounds = self.ctx.drag_bounds();
        let Some(state) = self.active.as_mut() else {
            return Ok(EventResult::Bubble);
        };
        if event.pointer_id != state.pointer_id {
            return Ok(EventResult::Bubble);
        }
        if !event.position.is_finite() {
            return Err(InteractionError::NonFinite {
                x: event.position.x,
                y: event.position.y,
            });
        }

        state.current = drag_position(
            state.start_position,
            state.start_pointer,
            event.position,
            state.size,
            &bounds,
        );
        self.frame.push(state.current);
        Ok(EventResult::consumed_redraw())
    }

    /// Position to show in this animation frame, if one is pending
    pub fn on_animation_frame(&mut self) -> Option<Point> {
        let position = self.frame.take()?;
        self.ctx.events().emit(DeskEvent::DragMove {
            id: self.panel_id.clone(),
            position,
        });
        Some(position)
    }

    /// Finish on pointer release, committing the final position
    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Option<Point> {
        let state = self.active?;
        if event.pointer_id != state.pointer_id {
            return None;
        }
        if event.position.is_finite() {
            let _ = self.track(event);
        }
        self.commit()
    }

    /// Finish on pointer cancel; the position reached so far is kept
    pub fn cancel(&mut self) -> Option<Point> {
        self.commit()
    }

    fn commit(&mut self) -> Option<Point> {
        let state = self.active.take()?;
        self.frame.clear();
        self.teardown();

        self.ctx.store.dispatch(Action::UpdatePanel {
            id: self.panel_id.clone(),
            updates: PanelUpdate::position(state.current),
        });
        self.ctx.events().emit(DeskEvent::DragEnd {
            id: self.panel_id.clone(),
            position: state.current,
        });
        tracing::debug!(
            target: "drag",
            panel = %self.panel_id,
            x = state.current.x,
            y = state.current.y,
            "drag committed"
        );
        Some(state.current)
    }

    fn teardown(&self) {
        self.ctx.lock.release(&self.panel_id);
        self.ctx.listeners.detach_all(&self.panel_id);
        let dragging_this = self
            .ctx
            .store
            .state()
            .ui
            .drag
            .as_ref()
            .is_some_and(|d| d.panel_id == self.panel_id);
        if dragging_this {
            self.ctx.store.dispatch(Action::SetDragState(None));
        }
    }

    /// Drop the drag without committing anything
    pub fn emergency_reset(&mut self) {
        self.active = None;
        self.frame.clear();
        self.teardown();
    }

    /// Tear down for good; safe to call more than once
    pub fn destroy(&mut self) {
        if self.active.is_some() || self.ctx.lock.is_held_by(&self.panel_id) {
            self.emergency_reset();
        }
        self.enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeskConfig;
    use crate::model::PanelConfig;
    use crate::store::LayoutStore;

    fn setup() -> (DeskContext, DragHandler) {
        let store = LayoutStore::new();
        store.dispatch(Action::AddPanel(
            PanelConfig::new("a", "notes").with_position(100.0, 100.0),
        ));
        let ctx = DeskContext::new(store, DeskConfig::default(), Size::new(1280.0, 800.0));
        let handler = DragHandler::new("a".into(), ctx.clone());
        (ctx, handler)
    }

    fn rect() -> Rect {
        Rect::new(100.0, 100.0, 400.0, 300.0)
    }

    #[test]
    fn test_drag_commits_once_on_release() {
        let (ctx, mut drag) = setup();
        let commits = std::rc::Rc::new(std::cell::Cell::new(0));
        let c = commits.clone();
        ctx.events().on("store:action", move |e| {
            if e == &(DeskEvent::ActionDispatched { action: "UPDATE_PANEL" }) {
                c.set(c.get() + 1);
            }
        });

        assert!(drag.begin(&PointerEvent::at(150.0, 110.0), rect()).is_consumed());
        drag.on_pointer_move(&PointerEvent::at(160.0, 120.0));
        drag.on_pointer_move(&PointerEvent::at(170.0, 130.0));
        assert_eq!(drag.on_animation_frame(), Some(Point::new(120.0, 120.0)));
        assert_eq!(drag.on_animation_frame(), None);
        assert_eq!(commits.get(), 0);

        let committed = drag.on_pointer_up(&PointerEvent::at(180.0, 140.0));
        assert_eq!(committed, Some(Point::new(130.0, 130.0)));
        assert_eq!(commits.get(), 1);
        assert_eq!(
            ctx.store.state().panel(&"a".into()).unwrap().position,
            Point::new(130.0, 130.0)
        );
        assert!(ctx.lock.is_idle());
        assert_eq!(ctx.listeners.count(), 0);
        assert!(ctx.store.state().ui.drag.is_none());
    }

    #[test]
    fn test_drag_clamps_to_viewport() {
        let (ctx, mut drag) = setup();
        drag.begin(&PointerEvent::at(150.0, 110.0), rect());
        drag.on_pointer_move(&PointerEvent::at(-5000.0, -5000.0));
        drag.on_pointer_up(&PointerEvent::at(-5000.0, -5000.0));
        let position = ctx.store.state().panel(&"a".into()).unwrap().position;
        assert_eq!(position, Point::new(0.0, 60.0));
    }

    #[test]
    fn test_disabled_or_secondary_press_bubbles() {
        let (ctx, mut drag) = setup();
        let secondary = PointerEvent::at(150.0, 110.0)
            .with_button(crate::interaction::PointerButton::Secondary);
        assert_eq!(drag.begin(&secondary, rect()), EventResult::Bubble);

        drag.set_enabled(false);
        assert_eq!(drag.begin(&PointerEvent::at(150.0, 110.0), rect()), EventResult::Bubble);
        assert!(ctx.lock.is_idle());
    }

    #[test]
    fn test_non_finite_move_resets_without_commit() {
        let (ctx, mut drag) = setup();
        drag.begin(&PointerEvent::at(150.0, 110.0), rect());
        drag.on_pointer_move(&PointerEvent::at(f64::NAN, 0.0));

        assert!(!drag.is_active());
        assert!(ctx.lock.is_idle());
        assert_eq!(ctx.listeners.count(), 0);
        assert_eq!(
            ctx.store.state().panel(&"a".into()).unwrap().position,
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (ctx, mut drag) = setup();
        drag.begin(&PointerEvent::at(150.0, 110.0), rect());
        drag.destroy();
        drag.destroy();
        assert!(ctx.lock.is_idle());
        assert_eq!(ctx.listeners.count(), 0);
    }
}
