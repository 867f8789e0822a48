//! Panel - one floating window on the desktop
//!
//! A panel owns its render mirror ([`PanelElement`]), its drag and resize
//! handlers and its content. It never mutates canonical state: user-driven
//! changes (moves, resizes, focus, maximize, close) become store actions,
//! and [`Panel::sync`] mirrors whatever the store holds back onto the
//! element.
//!
//! ## States
//!
//! - `Normal` <-> `Minimized`: the element collapses to its title bar, the
//!   content stays mounted
//! - `Normal`/`Minimized` -> `Maximized`: the pre-maximize geometry is
//!   captured and the panel fills the area under the navigation bar
//! - any -> `Closed`: terminal

pub mod content;
pub mod element;
pub mod keyboard;

use crate::context::DeskContext;
use crate::events::DeskEvent;
use crate::geometry::{clamp_position, Rect, Size};
use crate::interaction::{DragHandler, EventResult, KeyInput, PointerEvent, ResizeHandler};
use crate::messages::Action;
use crate::model::{PanelConfig, PanelId, PanelUpdate};
use crate::store::thunks;

pub use content::{
    ContentError, ContentFactory, ContentRegistry, PanelContent, PanelDescriptor, RegistryError,
    StaticContent,
};
pub use element::{
    ContentSlot, ElementClass, ElementPart, HeaderControl, PanelElement, SlotState, HEADER_HEIGHT,
};
use keyboard::{is_escape, key_command, KeyCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Closed,
}

enum ContentState {
    /// Built from the registry on the next load pass
    Pending,
    /// Handed in pre-built, waiting to be mounted
    Injected(Box<dyn PanelContent>),
    Mounted(Box<dyn PanelContent>),
    Failed(ContentError),
    Unloaded,
}

impl std::fmt::Debug for ContentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentState::Pending => f.write_str("Pending"),
            ContentState::Injected(_) => f.write_str("Injected"),
            ContentState::Mounted(_) => f.write_str("Mounted"),
            ContentState::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
            ContentState::Unloaded => f.write_str("Unloaded"),
        }
    }
}

#[derive(Debug)]
pub struct Panel {
    id: PanelId,
    ctx: DeskContext,
    config: PanelConfig,
    state: PanelState,
    element: PanelElement,
    drag: DragHandler,
    resize: ResizeHandler,
    content: ContentState,
    /// Geometry to return to when leaving `Maximized`
    restore_rect: Option<Rect>,
}

impl Panel {
    pub fn new(config: &PanelConfig, ctx: DeskContext) -> Self {
        let id = config.id.clone();
        let mut panel = Self {
            element: PanelElement::new(config),
            drag: DragHandler::new(id.clone(), ctx.clone()),
            resize: ResizeHandler::new(id.clone(), ctx.clone()),
            id,
            ctx,
            config: config.clone(),
            state: PanelState::Normal,
            content: ContentState::Pending,
            restore_rect: None,
        };
        panel.apply_interaction_flags();
        panel
    }

    /// Use pre-built content instead of asking the registry
    pub fn with_content(mut self, content: Box<dyn PanelContent>) -> Self {
        self.content = ContentState::Injected(content);
        self
    }

    pub fn id(&self) -> &PanelId {
        &self.id
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == PanelState::Closed
    }

    /// Config as last mirrored from the store
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn element(&self) -> &PanelElement {
        &self.element
    }

    pub fn is_interacting(&self) -> bool {
        self.drag.is_active() || self.resize.is_active()
    }

    pub fn is_draggable(&self) -> bool {
        self.drag.is_enabled()
    }

    pub fn is_resizable(&self) -> bool {
        self.resize.is_enabled()
    }

    pub fn restore_rect(&self) -> Option<Rect> {
        self.restore_rect
    }

    pub fn content_error(&self) -> Option<&ContentError> {
        match &self.content {
            ContentState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn has_content(&self) -> bool {
        matches!(self.content, ContentState::Mounted(_))
    }

    /// Whether content is waiting for [`Panel::load_content`]
    pub fn needs_content(&self) -> bool {
        !self.is_closed()
            && matches!(
                self.content,
                ContentState::Pending | ContentState::Injected(_)
            )
    }

    fn current_config(&self) -> PanelConfig {
        self.ctx
            .store
            .state()
            .panel(&self.id)
            .cloned()
            .unwrap_or_else(|| self.config.clone())
    }

    // ========================================================================
    // Store -> element
    // ========================================================================

    pub fn mount(&mut self) {
        self.element.mount();
    }

    /// Mirror `config` onto the element
    ///
    /// Geometry is left alone while a drag or resize is live, so the element
    /// keeps showing the in-flight position.
    pub fn sync(&mut self, config: &PanelConfig, active: bool) {
        if self.is_closed() {
            return;
        }
        if self.config != *config {
            self.config = config.clone();
        }
        if !self.is_interacting() {
            self.element.set_rect(config.rect());
        }
        self.element.set_title(&config.title);
        self.element.set_z_index(config.z_index);
        self.element.set_visible(config.visible);
        self.element.set_controls(config.closable, config.collapsible);
        self.element.set_class(ElementClass::Active, active);
        self.apply_interaction_flags();
    }

    fn apply_interaction_flags(&mut self) {
        let draggable = self.config.draggable
            && matches!(self.state, PanelState::Normal | PanelState::Minimized);
        let resizable = self.config.resizable && self.state == PanelState::Normal;
        self.drag.set_enabled(draggable);
        self.resize.set_enabled(resizable);
        self.element.set_class(ElementClass::Draggable, draggable);
        self.element.set_class(ElementClass::Resizable, resizable);
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Bring this panel to the front and make it active
    pub fn focus(&mut self) {
        if self.is_closed() {
            return;
        }
        let state = self.ctx.store.state();
        let Some(me) = state.panel(&self.id) else {
            return;
        };
        let on_top = state
            .panels
            .iter()
            .all(|p| p.id == self.id || p.z_index < me.z_index);
        if on_top && state.ui.active_panel.as_ref() == Some(&self.id) {
            return;
        }

        if let Some(z_index) = thunks::focus_panel(&self.ctx.store, &self.id) {
            self.element.set_z_index(z_index);
            self.element.set_class(ElementClass::Active, true);
            self.ctx
                .events()
                .emit(DeskEvent::PanelFocused { id: self.id.clone() });
        }
    }

    /// Clear the active panel, but only if it is still this one
    pub fn blur(&mut self) {
        let active = self.ctx.store.state().ui.active_panel.clone();
        if active.as_ref() != Some(&self.id) {
            return;
        }
        self.ctx.store.dispatch(Action::SetActivePanel(None));
        self.element.set_class(ElementClass::Active, false);
        self.ctx
            .events()
            .emit(DeskEvent::PanelBlurred { id: self.id.clone() });
    }

    // ========================================================================
    // Window state
    // ========================================================================

    /// Collapse to the title bar. Ignored while maximized.
    pub fn minimize(&mut self) -> bool {
        match self.state {
            PanelState::Normal => {
                self.state = PanelState::Minimized;
                self.element.set_class(ElementClass::Minimized, true);
                self.apply_interaction_flags();
                self.ctx
                    .events()
                    .emit(DeskEvent::Minimized { id: self.id.clone() });
                true
            }
            PanelState::Maximized => {
                tracing::debug!(target: "panel", panel = %self.id, "minimize ignored while maximized");
                false
            }
            PanelState::Minimized | PanelState::Closed => false,
        }
    }

    /// Fill the desktop below the navigation bar; on a maximized panel this
    /// restores instead
    pub fn maximize(&mut self) -> bool {
        match self.state {
            PanelState::Maximized => self.restore(),
            PanelState::Closed => false,
            PanelState::Normal | PanelState::Minimized => {
                if self.is_interacting() {
                    return false;
                }
                let current = self.current_config();
                self.restore_rect = Some(current.rect());
                self.state = PanelState::Maximized;
                self.element.set_class(ElementClass::Minimized, false);
                self.element.set_class(ElementClass::Maximized, true);
                self.apply_interaction_flags();

                let area = self.ctx.work_area();
                self.ctx.store.dispatch(Action::UpdatePanel {
                    id: self.id.clone(),
                    updates: PanelUpdate::geometry(area.position(), area.size()),
                });
                self.sync_from_store();
                self.ctx
                    .events()
                    .emit(DeskEvent::Maximized { id: self.id.clone() });
                true
            }
        }
    }

    /// Back to `Normal` from either minimized or maximized
    pub fn restore(&mut self) -> bool {
        match self.state {
            PanelState::Minimized => {
                self.state = PanelState::Normal;
                self.element.set_class(ElementClass::Minimized, false);
            }
            PanelState::Maximized => {
                self.state = PanelState::Normal;
                self.element.set_class(ElementClass::Maximized, false);
                if let Some(rect) = self.restore_rect.take() {
                    self.ctx.store.dispatch(Action::UpdatePanel {
                        id: self.id.clone(),
                        updates: PanelUpdate::geometry(rect.position(), rect.size()),
                    });
                }
                self.sync_from_store();
            }
            PanelState::Normal | PanelState::Closed => return false,
        }
        self.apply_interaction_flags();
        self.ctx
            .events()
            .emit(DeskEvent::Restored { id: self.id.clone() });
        true
    }

    pub fn toggle_minimize(&mut self) -> bool {
        match self.state {
            PanelState::Minimized => self.restore(),
            _ => self.minimize(),
        }
    }

    fn sync_from_store(&mut self) {
        let state = self.ctx.store.state();
        if let Some(config) = state.panel(&self.id) {
            let active = state.ui.active_panel.as_ref() == Some(&self.id);
            self.sync(config, active);
        }
    }

    /// Remove the panel from the store and tear it down. Terminal.
    pub fn close(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        self.ctx
            .events()
            .emit(DeskEvent::BeforeClose { id: self.id.clone() });
        self.ctx
            .store
            .dispatch(Action::RemovePanel { id: self.id.clone() });
        self.destroy();
        self.ctx
            .events()
            .emit(DeskEvent::Closed { id: self.id.clone() });
        tracing::debug!(target: "panel", panel = %self.id, "closed");
        true
    }

    /// Release handlers, content and element. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        self.drag.destroy();
        self.resize.destroy();
        if let ContentState::Mounted(mut content) =
            std::mem::replace(&mut self.content, ContentState::Unloaded)
        {
            content.unmount(self.element.slot_mut());
        }
        self.element.unmount();
        self.state = PanelState::Closed;
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// Build and mount pending content
    ///
    /// A failure stays inside this panel: the slot shows the error and a
    /// retry button, and the shell keeps working.
    pub fn load_content(&mut self, registry: &ContentRegistry) {
        let content = match std::mem::replace(&mut self.content, ContentState::Unloaded) {
            ContentState::Pending => registry.create(&self.config),
            ContentState::Injected(content) => Ok(content),
            other => {
                self.content = other;
                return;
            }
        };

        self.element.set_slot_state(SlotState::Loading);
        let mounted = content.and_then(|mut content| {
            content.mount(self.element.slot_mut())?;
            Ok(content)
        });
        match mounted {
            Ok(content) => {
                self.element.set_slot_state(SlotState::Mounted);
                self.content = ContentState::Mounted(content);
            }
            Err(e) => {
                tracing::warn!(target: "panel", panel = %self.id, "content failed to load: {e}");
                self.element.slot_mut().clear();
                self.element.set_slot_state(SlotState::Error {
                    message: e.to_string(),
                });
                self.ctx.events().emit(DeskEvent::ContentError {
                    id: self.id.clone(),
                    message: e.to_string(),
                });
                self.content = ContentState::Failed(e);
            }
        }
    }

    /// Queue another load attempt after a failure
    pub fn retry_content(&mut self) -> bool {
        if !matches!(self.content, ContentState::Failed(_)) {
            return false;
        }
        self.content = ContentState::Pending;
        self.element.set_slot_state(SlotState::Loading);
        true
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> EventResult {
        if self.is_closed() || !self.element.contains(event.position) {
            return EventResult::Bubble;
        }
        if !self.ctx.lock.is_idle() {
            tracing::debug!(target: "panel", panel = %self.id, "pointer-down ignored during another interaction");
            return EventResult::consumed_no_redraw();
        }

        self.focus();

        if event.is_primary() {
            if let Some(direction) = self.resize.handle_at(self.element.rect(), event.position) {
                self.resize
                    .begin(event, direction, self.element.rect(), self.config.limits());
                self.element
                    .set_class(ElementClass::Resizing, self.resize.is_active());
                return EventResult::consumed_redraw();
            }
        }

        match self.element.hit(event.position) {
            Some(ElementPart::Control(control)) if event.is_primary() => {
                match control {
                    HeaderControl::Close => {
                        self.close();
                    }
                    HeaderControl::Maximize => {
                        self.maximize();
                    }
                    HeaderControl::Minimize => {
                        self.toggle_minimize();
                    }
                }
                EventResult::consumed_redraw()
            }
            Some(ElementPart::Header) => {
                self.drag.begin(event, self.element.rect());
                self.element
                    .set_class(ElementClass::Dragging, self.drag.is_active());
                EventResult::consumed_redraw()
            }
            Some(ElementPart::Retry) if event.is_primary() => {
                self.retry_content();
                EventResult::consumed_redraw()
            }
            _ => EventResult::consumed_redraw(),
        }
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> EventResult {
        if self.drag.is_active() {
            let result = self.drag.on_pointer_move(event);
            if !self.drag.is_active() {
                self.end_interaction_visuals();
            }
            return result;
        }
        if self.resize.is_active() {
            let result = self.resize.on_pointer_move(event);
            if !self.resize.is_active() {
                self.end_interaction_visuals();
            }
            return result;
        }

        let cursor = if self.element.contains(event.position) {
            self.resize
                .handle_at(self.element.rect(), event.position)
                .map(|d| d.cursor())
        } else {
            None
        };
        self.element.set_cursor(cursor);
        EventResult::Bubble
    }

    pub fn clear_hover(&mut self) {
        self.element.set_cursor(None);
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> EventResult {
        if let Some(position) = self.drag.on_pointer_up(event) {
            self.element.set_position(position);
            self.end_interaction_visuals();
            return EventResult::consumed_redraw();
        }
        if let Some(rect) = self.resize.on_pointer_up(event) {
            self.element.set_rect(rect);
            self.end_interaction_visuals();
            return EventResult::consumed_redraw();
        }
        EventResult::Bubble
    }

    pub fn on_pointer_cancel(&mut self) -> EventResult {
        if let Some(position) = self.drag.cancel() {
            self.element.set_position(position);
        } else if let Some(rect) = self.resize.on_pointer_cancel() {
            self.element.set_rect(rect);
        } else {
            return EventResult::Bubble;
        }
        self.end_interaction_visuals();
        EventResult::consumed_redraw()
    }

    /// Put back the store geometry after an interaction ended without a
    /// commit, and drop the interaction markers
    fn end_interaction_visuals(&mut self) {
        self.element.set_class(ElementClass::Dragging, false);
        self.element.set_class(ElementClass::Resizing, false);
        if !self.is_interacting() {
            let rect = self.current_config().rect();
            self.element.set_rect(rect);
        }
    }

    /// Apply at most one pending visual update; returns whether one was applied
    pub fn on_animation_frame(&mut self) -> bool {
        if let Some(position) = self.drag.on_animation_frame() {
            self.element.set_position(position);
            return true;
        }
        if let Some(rect) = self.resize.on_animation_frame() {
            self.element.set_rect(rect);
            return true;
        }
        false
    }

    // ========================================================================
    // Keyboard
    // ========================================================================

    pub fn on_key(&mut self, input: &KeyInput) -> EventResult {
        if self.is_closed() {
            return EventResult::Bubble;
        }
        if is_escape(input) {
            return match self.resize.cancel() {
                Some(start) => {
                    self.element.set_rect(start);
                    self.element.set_class(ElementClass::Resizing, false);
                    EventResult::consumed_redraw()
                }
                None => EventResult::Bubble,
            };
        }
        if self.is_interacting() {
            return EventResult::consumed_no_redraw();
        }

        let config = &self.ctx.config;
        let Some(command) = key_command(input, config.keyboard_step, config.keyboard_step_large)
        else {
            return EventResult::Bubble;
        };
        let current = self.current_config();
        let updates = match command {
            KeyCommand::Move { dx, dy } => {
                if !self.drag.is_enabled() {
                    return EventResult::Bubble;
                }
                let position = clamp_position(
                    current.position.offset(dx, dy),
                    current.size,
                    &self.ctx.drag_bounds(),
                );
                PanelUpdate::position(position)
            }
            KeyCommand::Resize { dw, dh } => {
                if !self.resize.is_enabled() {
                    return EventResult::Bubble;
                }
                PanelUpdate::size(Size::new(current.size.width + dw, current.size.height + dh))
            }
        };

        self.ctx.store.dispatch(Action::UpdatePanel {
            id: self.id.clone(),
            updates,
        });
        self.sync_from_store();
        EventResult::consumed_redraw()
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        // Never leave the shared lock or global listeners behind
        self.drag.destroy();
        self.resize.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeskConfig;
    use crate::geometry::Point;
    use crate::interaction::Key;
    use crate::store::LayoutStore;

    fn setup() -> (DeskContext, Panel) {
        let store = LayoutStore::new();
        let config = PanelConfig::new("a", "notes")
            .with_position(100.0, 100.0)
            .with_size(400.0, 300.0);
        thunks::add_panel_with_limit(&store, config.clone(), 10).unwrap();
        let ctx = DeskContext::new(store, DeskConfig::default(), Size::new(1280.0, 800.0));
        let stored = ctx.store.state().panel(&"a".into()).cloned().unwrap();
        let mut panel = Panel::new(&stored, ctx.clone());
        panel.mount();
        (ctx, panel)
    }

    #[test]
    fn test_maximize_round_trip() {
        let (ctx, mut panel) = setup();
        assert!(panel.maximize());
        let maxed = ctx.store.state().panel(&"a".into()).cloned().unwrap();
        assert_eq!(maxed.rect(), Rect::new(0.0, 60.0, 1280.0, 740.0));
        assert!(!panel.is_draggable());
        assert!(!panel.is_resizable());

        assert!(panel.restore());
        let restored = ctx.store.state().panel(&"a".into()).cloned().unwrap();
        assert_eq!(restored.position, Point::new(100.0, 100.0));
        assert_eq!(restored.size, Size::new(400.0, 300.0));
        assert!(panel.is_draggable());
    }

    #[test]
    fn test_minimize_ignored_while_maximized() {
        let (_, mut panel) = setup();
        panel.maximize();
        assert!(!panel.minimize());
        assert_eq!(panel.state(), PanelState::Maximized);
    }

    #[test]
    fn test_close_is_terminal() {
        let (ctx, mut panel) = setup();
        assert!(panel.close());
        assert!(!ctx.store.state().has_panel(&"a".into()));
        assert!(!panel.element().is_mounted());
        assert!(!panel.close());
        assert!(!panel.maximize());
        assert!(!panel.minimize());
    }

    #[test]
    fn test_arrow_keys_move_and_resize() {
        let (ctx, mut panel) = setup();
        let result = panel.on_key(&KeyInput::plain(Key::ArrowRight));
        assert!(result.is_consumed());
        let result = panel.on_key(&KeyInput::new(
            Key::ArrowDown,
            crate::interaction::Modifiers::shift(),
        ));
        assert!(result.is_consumed());
        let config = ctx.store.state().panel(&"a".into()).cloned().unwrap();
        assert_eq!(config.position, Point::new(101.0, 110.0));

        panel.on_key(&KeyInput::new(
            Key::ArrowLeft,
            crate::interaction::Modifiers::ctrl(),
        ));
        let config = ctx.store.state().panel(&"a".into()).cloned().unwrap();
        assert_eq!(config.size, Size::new(399.0, 300.0));
    }

    #[test]
    fn test_blur_only_clears_own_focus() {
        let (ctx, mut panel) = setup();
        ctx.store
            .dispatch(Action::AddPanel(PanelConfig::new("b", "notes")));
        panel.blur();
        assert_eq!(ctx.store.state().ui.active_panel, Some("b".into()));

        panel.focus();
        assert_eq!(ctx.store.state().ui.active_panel, Some("a".into()));
        panel.blur();
        assert_eq!(ctx.store.state().ui.active_panel, None);
    }

    #[test]
    fn test_content_failure_is_contained_and_retryable() {
        let (_, mut panel) = setup();
        let registry = ContentRegistry::new();
        panel.load_content(&registry);
        assert!(panel.content_error().is_some());
        assert!(panel.element().slot().has_error());
        assert_eq!(panel.state(), PanelState::Normal);

        assert!(panel.retry_content());
        let mut registry = ContentRegistry::new();
        registry
            .register(PanelDescriptor::new("notes", "Notes"), |_| {
                Ok(Box::new(StaticContent::new(["ok"])) as Box<dyn PanelContent>)
            })
            .unwrap();
        panel.load_content(&registry);
        assert!(panel.has_content());
        assert_eq!(panel.element().slot().lines(), ["ok".to_string()]);
    }

    #[test]
    fn test_header_press_drags_and_commits_on_release() {
        let (ctx, mut panel) = setup();
        panel.on_pointer_down(&PointerEvent::at(150.0, 110.0));
        assert!(panel.is_interacting());
        panel.on_pointer_move(&PointerEvent::at(250.0, 210.0));
        assert!(panel.on_animation_frame());
        assert_eq!(panel.element().rect().position(), Point::new(200.0, 200.0));
        // Store untouched until release
        assert_eq!(
            ctx.store.state().panel(&"a".into()).unwrap().position,
            Point::new(100.0, 100.0)
        );

        panel.on_pointer_up(&PointerEvent::at(250.0, 210.0));
        assert_eq!(
            ctx.store.state().panel(&"a".into()).unwrap().position,
            Point::new(200.0, 200.0)
        );
        assert!(!panel.element().has_class(ElementClass::Dragging));
    }
}
