//! Pointer-driven panel resizing through eight border handles
//!
//! Geometry is recomputed from the start rectangle on every move, so the
//! result depends only on where the pointer is, never on how it got there.
//! Escape restores the start rectangle; release commits once.

use crate::context::DeskContext;
use crate::events::DeskEvent;
use crate::geometry::{resize_rect, Point, Rect, ResizeConstraints, ResizeDirection, SizeLimits};
use crate::messages::Action;
use crate::model::{PanelId, PanelUpdate, ResizeSnapshot};

use super::{
    EventResult, FrameBatcher, GlobalEvent, Interaction, InteractionError, PointerEvent,
};

#[derive(Debug, Clone, Copy)]
struct ResizeState {
    pointer_id: u64,
    direction: ResizeDirection,
    start_pointer: Point,
    start: Rect,
    constraints: ResizeConstraints,
    current: Rect,
}

#[derive(Debug)]
pub struct ResizeHandler {
    panel_id: PanelId,
    ctx: DeskContext,
    enabled: bool,
    active: Option<ResizeState>,
    frame: FrameBatcher<Rect>,
}

impl ResizeHandler {
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

    pub fn direction(&self) -> Option<ResizeDirection> {
        self.active.map(|s| s.direction)
    }

    /// In-flight geometry, while a resize is live
    pub fn current_rect(&self) -> Option<Rect> {
        self.active.map(|s| s.current)
    }

    /// Handle under `point`, if resizing is enabled
    pub fn handle_at(&self, panel: Rect, point: Point) -> Option<ResizeDirection> {
        if !self.enabled {
            return None;
        }
        let thickness = self.ctx.config.handle_thickness;
        ResizeDirection::ALL
            .into_iter()
            .find(|d| d.handle_rect(panel, thickness).contains(point.x, point.y))
    }

    /// Start resizing from a press on `direction`'s handle
    pub fn begin(
        &mut self,
        event: &PointerEvent,
        direction: ResizeDirection,
        rect: Rect,
        limits: SizeLimits,
    ) -> EventResult {
        if !self.enabled || !event.is_primary() || self.active.is_some() {
            return EventResult::Bubble;
        }
        if !event.position.is_finite() || !rect.is_finite() {
            tracing::warn!(target: "resize", panel = %self.panel_id, "ignoring press with non-finite geometry");
            return EventResult::Bubble;
        }

        let interaction = Interaction::Resizing {
            panel: self.panel_id.clone(),
            direction,
            pointer_id: event.pointer_id,
        };
        if let Err(e) = self.ctx.lock.try_acquire(interaction) {
            tracing::debug!(target: "resize", panel = %self.panel_id, "resize not started: {e}");
            return EventResult::consumed_no_redraw();
        }

        let config = &self.ctx.config;
        let constraints = ResizeConstraints {
            limits,
            aspect_ratio: (config.lock_aspect_ratio && rect.height > 0.0)
                .then(|| rect.width / rect.height),
            grid: config.grid_size,
        };

        self.ctx
            .listeners
            .attach(&self.panel_id, &GlobalEvent::TRACKING);
        self.active = Some(ResizeState {
            pointer_id: event.pointer_id,
            direction,
            start_pointer: event.position,
            start: rect,
            constraints,
            current: rect,
        });

        self.ctx
            .store
            .dispatch(Action::SetResizeState(Some(ResizeSnapshot {
                panel_id: self.panel_id.clone(),
                direction,
            })));
        self.ctx.events().emit(DeskEvent::ResizeStart {
            id: self.panel_id.clone(),
            direction,
            rect,
        });
        tracing::debug!(target: "resize", panel = %self.panel_id, ?direction, "resize started");
        EventResult::consumed_redraw()
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> EventResult {
        match self.track(event) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(target: "resize", panel = %self.panel_id, "{e}; resetting resize");
                self.emergency_reset();
                EventResult::consumed_redraw()
            }
        }
    }

    fn track(&mut self, event: &PointerEvent) -> Result<EventResult, InteractionError> {
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

        let delta = event.position.delta_from(state.start_pointer);
        state.current = resize_rect(state.start, state.direction, delta, &state.constraints);
        self.frame.push(state.current);
        Ok(EventResult::consumed_redraw())
    }

    /// Geometry to show in this animation frame, if one is pending
    pub fn on_animation_frame(&mut self) -> Option<Rect> {
        let rect = self.frame.take()?;
        self.ctx.events().emit(DeskEvent::ResizeMove {
            id: self.panel_id.clone(),
            rect,
        });
        Some(rect)
    }

    /// Finish on pointer release, committing the final geometry
    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> Option<Rect> {
        let state = self.active?;
        if event.pointer_id != state.pointer_id {
            return None;
        }
        if event.position.is_finite() {
            let _ = self.track(event);
        }
        self.commit()
    }

    /// Finish on pointer cancel; the geometry reached so far is kept
    pub fn on_pointer_cancel(&mut self) -> Option<Rect> {
        self.commit()
    }

    /// Abort (Escape), returning the pre-resize geometry to put back
    ///
    /// Nothing reaches the store: it never saw the in-flight geometry.
    pub fn cancel(&mut self) -> Option<Rect> {
        let state = self.active.take()?;
        self.frame.clear();
        self.teardown();
        self.ctx.events().emit(DeskEvent::ResizeCancel {
            id: self.panel_id.clone(),
            rect: state.start,
        });
        tracing::debug!(target: "resize", panel = %self.panel_id, "resize cancelled");
        Some(state.start)
    }

    fn commit(&mut self) -> Option<Rect> {
        let state = self.active.take()?;
        self.frame.clear();
        self.teardown();

        let rect = state.current;
        self.ctx.store.dispatch(Action::UpdatePanel {
            id: self.panel_id.clone(),
            updates: PanelUpdate::geometry(rect.position(), rect.size()),
        });
        self.ctx.events().emit(DeskEvent::ResizeEnd {
            id: self.panel_id.clone(),
            rect,
        });
        tracing::debug!(
            target: "resize",
            panel = %self.panel_id,
            width = rect.width,
            height = rect.height,
            "resize committed"
        );
        Some(rect)
    }

    fn teardown(&self) {
        self.ctx.lock.release(&self.panel_id);
        self.ctx.listeners.detach_all(&self.panel_id);
        let resizing_this = self
            .ctx
            .store
            .state()
            .ui
            .resize
            .as_ref()
            .is_some_and(|r| r.panel_id == self.panel_id);
        if resizing_this {
            self.ctx.store.dispatch(Action::SetResizeState(None));
        }
    }

    /// Drop the resize without committing anything
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
    use crate::geometry::Size;
    use crate::model::PanelConfig;
    use crate::store::LayoutStore;

    fn setup(config: DeskConfig) -> (DeskContext, ResizeHandler) {
        let store = LayoutStore::new();
        store.dispatch(Action::AddPanel(
            PanelConfig::new("a", "notes")
                .with_position(100.0, 100.0)
                .with_size(400.0, 300.0),
        ));
        let ctx = DeskContext::new(store, config, Size::new(1280.0, 800.0));
        let handler = ResizeHandler::new("a".into(), ctx.clone());
        (ctx, handler)
    }

    fn rect() -> Rect {
        Rect::new(100.0, 100.0, 400.0, 300.0)
    }

    #[test]
    fn test_handle_at_corners_and_edges() {
        let (_, resize) = setup(DeskConfig::default());
        assert_eq!(
            resize.handle_at(rect(), Point::new(101.0, 101.0)),
            Some(ResizeDirection::NorthWest)
        );
        assert_eq!(
            resize.handle_at(rect(), Point::new(300.0, 398.0)),
            Some(ResizeDirection::South)
        );
        assert_eq!(resize.handle_at(rect(), Point::new(300.0, 250.0)), None);
    }

    #[test]
    fn test_west_resize_commits_with_fixed_right_edge() {
        let (ctx, mut resize) = setup(DeskConfig::default());
        resize.begin(
            &PointerEvent::at(102.0, 250.0),
            ResizeDirection::West,
            rect(),
            SizeLimits::default(),
        );
        resize.on_pointer_move(&PointerEvent::at(52.0, 250.0));
        let committed = resize.on_pointer_up(&PointerEvent::at(52.0, 250.0)).unwrap();

        assert_eq!(committed, Rect::new(50.0, 100.0, 450.0, 300.0));
        let panel = ctx.store.state().panel(&"a".into()).cloned().unwrap();
        assert_eq!(panel.position, Point::new(50.0, 100.0));
        assert_eq!(panel.size, Size::new(450.0, 300.0));
        assert!(ctx.lock.is_idle());
    }

    #[test]
    fn test_escape_restores_start_without_commit() {
        let (ctx, mut resize) = setup(DeskConfig::default());
        resize.begin(
            &PointerEvent::at(498.0, 398.0),
            ResizeDirection::SouthEast,
            rect(),
            SizeLimits::default(),
        );
        resize.on_pointer_move(&PointerEvent::at(700.0, 600.0));
        assert_eq!(
            resize.on_animation_frame(),
            Some(Rect::new(100.0, 100.0, 602.0, 502.0))
        );

        assert_eq!(resize.cancel(), Some(rect()));
        let panel = ctx.store.state().panel(&"a".into()).cloned().unwrap();
        assert_eq!(panel.size, Size::new(400.0, 300.0));
        assert_eq!(ctx.listeners.count(), 0);
        assert!(ctx.store.state().ui.resize.is_none());
    }

    #[test]
    fn test_aspect_lock_uses_start_ratio() {
        let config = DeskConfig {
            lock_aspect_ratio: true,
            ..Default::default()
        };
        let (_, mut resize) = setup(config);
        resize.begin(
            &PointerEvent::at(498.0, 150.0),
            ResizeDirection::East,
            Rect::new(100.0, 100.0, 400.0, 200.0),
            SizeLimits::default(),
        );
        resize.on_pointer_move(&PointerEvent::at(598.0, 150.0));
        let r = resize.current_rect().unwrap();
        assert_eq!(r.width, 500.0);
        assert_eq!(r.height, 250.0);
    }

    #[test]
    fn test_second_resize_is_refused_while_dragging_elsewhere() {
        let (ctx, mut resize) = setup(DeskConfig::default());
        ctx.lock
            .try_acquire(Interaction::Dragging {
                panel: "other".into(),
                pointer_id: 1,
            })
            .unwrap();
        let result = resize.begin(
            &PointerEvent::at(498.0, 398.0),
            ResizeDirection::SouthEast,
            rect(),
            SizeLimits::default(),
        );
        assert_eq!(result, EventResult::consumed_no_redraw());
        assert!(!resize.is_active());
        assert_eq!(ctx.listeners.count(), 0);
    }
}
