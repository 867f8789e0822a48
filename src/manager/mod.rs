//! PanelManager - keeps the live panels in step with the store
//!
//! The manager owns every [`Panel`] and routes input to them. It never
//! holds geometry of its own: after anything that may have dispatched, it
//! reconciles its panel list against the store, which creates, destroys and
//! mirrors panels as needed.
//!
//! Pointer-down is hit tested against the rendered elements, topmost first.
//! Once a drag or resize is live, pointer-move/up/cancel and Escape go to
//! whichever panel registered for them in the global listener registry,
//! wherever the pointer happens to be.

pub mod arrange;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::context::DeskContext;
use crate::error::{DeskError, Result};
use crate::events::DeskEvent;
use crate::geometry::{clamp_position, Point, Rect, Size};
use crate::interaction::{EventResult, GlobalEvent, KeyInput, PointerEvent};
use crate::messages::Action;
use crate::model::{Breakpoint, PanelConfig, PanelId, PanelType, PanelUpdate};
use crate::panel::{ContentRegistry, Panel, PanelContent};
use crate::store::{thunks, SubscriptionId};

pub use arrange::ArrangeMode;

/// Overrides for [`PanelManager::create_panel`]; unset fields come from the
/// panel type's descriptor and the desktop config
#[derive(Debug, Clone, Default)]
pub struct PanelOptions {
    pub id: Option<PanelId>,
    pub title: Option<String>,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub settings: Option<serde_json::Value>,
}

impl PanelOptions {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<PanelId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }
}

/// What one reconcile pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub removed: usize,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.removed == 0
    }
}

pub struct PanelManager {
    ctx: DeskContext,
    registry: ContentRegistry,
    /// Live panels, in the order they were instantiated
    panels: Vec<Panel>,
    /// Pre-built content waiting for its panel to be instantiated
    injected: HashMap<PanelId, Box<dyn PanelContent>>,
    /// Breakpoint the panels were last adjusted for
    breakpoint: Breakpoint,
    dirty: Rc<Cell<bool>>,
    subscription: Option<SubscriptionId>,
}

impl std::fmt::Debug for PanelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelManager")
            .field("panels", &self.panels.len())
            .field("breakpoint", &self.breakpoint)
            .field("registry", &self.registry)
            .finish()
    }
}

impl PanelManager {
    /// Attach to the store in `ctx` and instantiate whatever panels it
    /// already holds
    pub fn new(ctx: DeskContext, registry: ContentRegistry) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = dirty.clone();
        let subscription = ctx.store.subscribe(move |_| flag.set(true));
        let breakpoint = ctx.store.state().ui.breakpoint;

        let mut manager = Self {
            ctx,
            registry,
            panels: Vec::new(),
            injected: HashMap::new(),
            breakpoint,
            dirty,
            subscription: Some(subscription),
        };
        manager.reconcile();
        manager
    }

    pub fn context(&self) -> &DeskContext {
        &self.ctx
    }

    pub fn registry(&self) -> &ContentRegistry {
        &self.registry
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, id: &PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id() == id)
    }

    fn panel_mut(&mut self, id: &PanelId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Whether the store changed since the last reconcile
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    /// Bring the panels in line with the store
    ///
    /// Re-derives every panel's drag/resize flags from the current
    /// breakpoint first, so panels arriving through hydration or a loaded
    /// layout lose whatever flags they were saved with. Then mirrors the
    /// panel list.
    pub fn reconcile(&mut self) -> SyncReport {
        let breakpoint = self.ctx.store.state().ui.breakpoint;
        let ids: Vec<PanelId> = self
            .ctx
            .store
            .state()
            .panels
            .iter()
            .map(|p| p.id.clone())
            .collect();
        for id in &ids {
            self.adjust_panel_for_breakpoint(id, breakpoint);
        }

        if breakpoint != self.breakpoint {
            let from = std::mem::replace(&mut self.breakpoint, breakpoint);
            tracing::info!(target: "manager", ?from, to = ?breakpoint, "breakpoint changed");
            self.ctx.events().emit(DeskEvent::BreakpointChanged {
                from,
                to: breakpoint,
            });
        }

        let state = self.ctx.store.state();
        let report = self.sync_panels(&state.panels);
        self.dirty.set(false);
        report
    }

    /// Instantiate new configs, destroy stale panels, mirror the rest
    ///
    /// Running it again with the same list touches nothing.
    pub fn sync_panels(&mut self, configs: &[PanelConfig]) -> SyncReport {
        let mut report = SyncReport::default();
        let events = self.ctx.events().clone();

        self.panels.retain_mut(|panel| {
            let live = !panel.is_closed() && configs.iter().any(|c| &c.id == panel.id());
            if !live {
                panel.destroy();
                events.emit(DeskEvent::PanelRemoved {
                    id: panel.id().clone(),
                });
                report.removed += 1;
            }
            live
        });

        let active = self.ctx.store.state().ui.active_panel.clone();
        for config in configs {
            let is_active = active.as_ref() == Some(&config.id);
            if let Some(panel) = self.panels.iter_mut().find(|p| p.id() == &config.id) {
                panel.sync(config, is_active);
                continue;
            }

            let mut panel = Panel::new(config, self.ctx.clone());
            if let Some(content) = self.injected.remove(&config.id) {
                panel = panel.with_content(content);
            }
            panel.mount();
            panel.sync(config, is_active);
            self.panels.push(panel);
            events.emit(DeskEvent::PanelCreated {
                id: config.id.clone(),
            });
            report.created += 1;
        }

        if !report.is_empty() {
            tracing::debug!(
                target: "manager",
                created = report.created,
                removed = report.removed,
                live = self.panels.len(),
                "panels synced"
            );
        }
        report
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Open a new panel of a registered type
    ///
    /// Unknown types and a full desktop are refused before anything is
    /// dispatched (the limit still raises a warning notification).
    pub fn create_panel(
        &mut self,
        panel_type: impl Into<PanelType>,
        options: PanelOptions,
    ) -> Result<PanelId> {
        let panel_type = panel_type.into();
        let Some(descriptor) = self.registry.descriptor(&panel_type).cloned() else {
            tracing::warn!(target: "manager", %panel_type, "refusing unknown panel type");
            return Err(DeskError::UnknownPanelType(panel_type));
        };

        let state = self.ctx.store.state();
        let id = options
            .id
            .unwrap_or_else(|| self.ctx.store.next_panel_id(&panel_type));
        let size = options
            .size
            .or(descriptor.default_size)
            .unwrap_or(self.ctx.config.default_panel_size);
        let position = options.position.unwrap_or_else(|| {
            let step = (state.panels.len() % 10) as f64 * arrange::CASCADE_STEP;
            clamp_position(
                Point::new(arrange::CASCADE_ORIGIN + step, arrange::CASCADE_ORIGIN + step),
                size,
                &self.ctx.drag_bounds(),
            )
        });
        let breakpoint = state.ui.breakpoint;

        let mut config = PanelConfig::new(id, panel_type)
            .with_title(options.title.unwrap_or(descriptor.title))
            .with_size(size.width, size.height)
            .with_limits(descriptor.min_size, descriptor.max_size);
        config.position = position;
        config.draggable = breakpoint.allows_drag();
        config.resizable = breakpoint.allows_resize();
        if let Some(settings) = options.settings {
            config.settings = settings;
        }

        let id = thunks::add_panel_with_limit(&self.ctx.store, config, self.ctx.config.max_panels)?;
        tracing::info!(target: "manager", panel = %id, "panel created");
        self.reconcile();
        Ok(id)
    }

    /// Like [`PanelManager::create_panel`], mounting `content` instead of
    /// asking the registry
    pub fn create_panel_with_content(
        &mut self,
        panel_type: impl Into<PanelType>,
        options: PanelOptions,
        content: Box<dyn PanelContent>,
    ) -> Result<PanelId> {
        let panel_type = panel_type.into();
        let id = options
            .id
            .clone()
            .unwrap_or_else(|| self.ctx.store.next_panel_id(&panel_type));
        self.injected.insert(id.clone(), content);
        let result = self.create_panel(panel_type, PanelOptions {
            id: Some(id.clone()),
            ..options
        });
        if result.is_err() {
            self.injected.remove(&id);
        }
        result
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Move every panel into `mode`'s arrangement, one UPDATE_PANEL each
    ///
    /// Panels are taken in creation order, as held by the store.
    pub fn arrange_panels(&mut self, mode: ArrangeMode) -> usize {
        let state = self.ctx.store.state();
        let sizes: Vec<Size> = state.panels.iter().map(|p| p.size).collect();
        let rects = arrange::arrange(mode, &sizes, self.ctx.work_area());

        for (config, rect) in state.panels.iter().zip(&rects) {
            let updates = match mode {
                ArrangeMode::Cascade => PanelUpdate::position(rect.position()),
                ArrangeMode::Tile | ArrangeMode::Stack => {
                    PanelUpdate::geometry(rect.position(), rect.size())
                }
            };
            self.ctx.store.dispatch(Action::UpdatePanel {
                id: config.id.clone(),
                updates,
            });
        }
        tracing::debug!(target: "manager", %mode, count = rects.len(), "panels arranged");
        self.reconcile();
        rects.len()
    }

    /// Re-classify the viewport width; dispatches only when the band changed
    pub fn update_breakpoint(&mut self) -> Option<Breakpoint> {
        let next = Breakpoint::from_width(self.ctx.viewport().width);
        if next == self.ctx.store.state().ui.breakpoint {
            return None;
        }
        self.ctx.store.dispatch(Action::SetBreakpoint(next));
        self.reconcile();
        Some(next)
    }

    /// Set a panel's drag/resize flags for `breakpoint`
    pub fn adjust_panel_for_breakpoint(&self, id: &PanelId, breakpoint: Breakpoint) {
        let Some(config) = self.ctx.store.state().panel(id).cloned() else {
            return;
        };
        let (draggable, resizable) = (breakpoint.allows_drag(), breakpoint.allows_resize());
        if (config.draggable, config.resizable) == (draggable, resizable) {
            return;
        }
        self.ctx.store.dispatch(Action::UpdatePanel {
            id: id.clone(),
            updates: PanelUpdate::interaction(draggable, resizable),
        });
    }

    pub fn set_viewport(&mut self, viewport: Size) -> Option<Breakpoint> {
        self.ctx.set_viewport(viewport);
        let changed = self.update_breakpoint();
        if changed.is_none() {
            self.reconcile();
        }
        changed
    }

    // ========================================================================
    // Panel operations
    // ========================================================================

    pub fn focus_panel(&mut self, id: &PanelId) -> Result<i64> {
        let z_index = thunks::focus_panel(&self.ctx.store, id)
            .ok_or_else(|| DeskError::PanelNotFound(id.clone()))?;
        self.ctx
            .events()
            .emit(DeskEvent::PanelFocused { id: id.clone() });
        self.reconcile();
        Ok(z_index)
    }

    fn with_panel<R>(&mut self, id: &PanelId, f: impl FnOnce(&mut Panel) -> R) -> Result<R> {
        let panel = self
            .panel_mut(id)
            .ok_or_else(|| DeskError::PanelNotFound(id.clone()))?;
        if panel.is_closed() {
            return Err(DeskError::PanelClosed(id.clone()));
        }
        let result = f(panel);
        self.reconcile();
        Ok(result)
    }

    pub fn blur_panel(&mut self, id: &PanelId) -> Result<()> {
        self.with_panel(id, Panel::blur)
    }

    pub fn minimize_panel(&mut self, id: &PanelId) -> Result<bool> {
        self.with_panel(id, Panel::minimize)
    }

    pub fn maximize_panel(&mut self, id: &PanelId) -> Result<bool> {
        self.with_panel(id, Panel::maximize)
    }

    pub fn restore_panel(&mut self, id: &PanelId) -> Result<bool> {
        self.with_panel(id, Panel::restore)
    }

    pub fn close_panel(&mut self, id: &PanelId) -> Result<bool> {
        self.with_panel(id, Panel::close)
    }

    /// Close every panel; returns how many were closed
    pub fn close_all(&mut self) -> usize {
        let closed = self.panels.iter_mut().map(Panel::close).filter(|c| *c).count();
        self.reconcile();
        closed
    }

    // ========================================================================
    // Input routing
    // ========================================================================

    /// Index of the topmost visible panel under `point`
    fn topmost_at(&self, point: Point) -> Option<usize> {
        self.panels
            .iter()
            .enumerate()
            .filter(|(_, p)| p.element().contains(point))
            .max_by_key(|(_, p)| p.element().z_index())
            .map(|(i, _)| i)
    }

    fn owner_index(&self, event: GlobalEvent) -> Option<usize> {
        let owner = self.ctx.listeners.owner_of(event)?;
        self.panels.iter().position(|p| p.id() == &owner)
    }

    pub fn on_pointer_down(&mut self, event: &PointerEvent) -> EventResult {
        if !self.ctx.lock.is_idle() {
            tracing::debug!(
                target: "manager",
                owner = ?self.ctx.lock.owner(),
                "pointer-down ignored during an interaction"
            );
            return EventResult::consumed_no_redraw();
        }

        if let Some(index) = self.topmost_at(event.position) {
            let result = self.panels[index].on_pointer_down(event);
            self.reconcile();
            return result;
        }

        // Desktop background
        let state = self.ctx.store.state();
        let mut result = EventResult::Bubble;
        if state.ui.context_menu.is_some() {
            self.ctx.store.dispatch(Action::HideContextMenu);
            result = EventResult::consumed_redraw();
        }
        if let Some(active) = state.ui.active_panel.clone() {
            if let Some(panel) = self.panel_mut(&active) {
                panel.blur();
                result = EventResult::consumed_redraw();
            }
        }
        self.reconcile();
        result
    }

    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> EventResult {
        if let Some(index) = self.owner_index(GlobalEvent::PointerMove) {
            let result = self.panels[index].on_pointer_move(event);
            if self.ctx.lock.is_idle() {
                // The interaction was reset mid-move
                self.reconcile();
            }
            return result;
        }

        let top = self.topmost_at(event.position);
        for (i, panel) in self.panels.iter_mut().enumerate() {
            if Some(i) == top {
                panel.on_pointer_move(event);
            } else {
                panel.clear_hover();
            }
        }
        EventResult::Bubble
    }

    pub fn on_pointer_up(&mut self, event: &PointerEvent) -> EventResult {
        let Some(index) = self.owner_index(GlobalEvent::PointerUp) else {
            return EventResult::Bubble;
        };
        let result = self.panels[index].on_pointer_up(event);
        self.reconcile();
        result
    }

    pub fn on_pointer_cancel(&mut self) -> EventResult {
        let Some(index) = self.owner_index(GlobalEvent::PointerCancel) else {
            return EventResult::Bubble;
        };
        let result = self.panels[index].on_pointer_cancel();
        self.reconcile();
        result
    }

    /// Escape goes to the panel holding the interaction; everything else to
    /// the active panel
    pub fn handle_key(&mut self, input: &KeyInput) -> EventResult {
        let target = self.owner_index(GlobalEvent::KeyDown).or_else(|| {
            let active = self.ctx.store.state().ui.active_panel.clone()?;
            self.panels.iter().position(|p| p.id() == &active)
        });
        let Some(index) = target else {
            return EventResult::Bubble;
        };
        let result = self.panels[index].on_key(input);
        if result.is_consumed() {
            self.reconcile();
        }
        result
    }

    /// Cursor to show for the pointer at `point`
    pub fn cursor_at(&self, point: Point) -> Option<&'static str> {
        let index = self.topmost_at(point)?;
        self.panels[index].element().cursor()
    }

    /// Flush frame-batched visuals; returns whether anything moved
    pub fn on_animation_frame(&mut self) -> bool {
        self.panels
            .iter_mut()
            .fold(false, |any, panel| panel.on_animation_frame() || any)
    }

    /// Run due store tasks and pending content loads
    ///
    /// Returns whether anything changed that needs a redraw.
    pub fn tick(&mut self) -> bool {
        let ran = self.ctx.store.run_due_tasks();
        let mut loaded = false;
        for panel in self.panels.iter_mut().filter(|p| p.needs_content()) {
            panel.load_content(&self.registry);
            loaded = true;
        }
        let dirty = self.dirty.get();
        if dirty {
            self.reconcile();
        }
        ran > 0 || loaded || dirty
    }

    /// Panels in paint order, bottom first
    pub fn paint_order(&self) -> Vec<&Panel> {
        let mut panels: Vec<&Panel> = self
            .panels
            .iter()
            .filter(|p| p.element().is_visible() && p.element().is_mounted())
            .collect();
        panels.sort_by_key(|p| p.element().z_index());
        panels
    }

    /// Frame of the desktop area panels are laid out in
    pub fn work_area(&self) -> Rect {
        self.ctx.work_area()
    }

    /// Destroy every panel and detach from the store
    pub fn shutdown(&mut self) {
        for panel in &mut self.panels {
            panel.destroy();
        }
        self.panels.clear();
        self.injected.clear();
        if let Some(id) = self.subscription.take() {
            self.ctx.store.unsubscribe(id);
        }
        self.ctx.listeners.clear();
        self.ctx.lock.force_release();
        self.ctx.store.shutdown();
        tracing::info!(target: "manager", "desktop shut down");
    }
}

impl Drop for PanelManager {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.ctx.store.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeskConfig;
    use crate::panel::{PanelDescriptor, StaticContent};
    use crate::store::LayoutStore;

    fn manager() -> PanelManager {
        let ctx = DeskContext::new(
            LayoutStore::new(),
            DeskConfig::default(),
            Size::new(1280.0, 800.0),
        );
        let mut registry = ContentRegistry::new();
        registry
            .register(PanelDescriptor::new("notes", "Notes"), |_| {
                Ok(Box::new(StaticContent::new(["notes"])) as Box<dyn PanelContent>)
            })
            .unwrap();
        PanelManager::new(ctx, registry)
    }

    #[test]
    fn test_sync_is_idempotent() {
        let mut m = manager();
        m.create_panel("notes", PanelOptions::default()).unwrap();
        let writes: Vec<u64> = m.panels().iter().map(|p| p.element().writes()).collect();

        let report = m.reconcile();
        assert!(report.is_empty());
        let after: Vec<u64> = m.panels().iter().map(|p| p.element().writes()).collect();
        assert_eq!(writes, after);
    }

    #[test]
    fn test_unknown_type_is_refused() {
        let mut m = manager();
        let result = m.create_panel("ghost", PanelOptions::default());
        assert!(matches!(result, Err(DeskError::UnknownPanelType(_))));
        assert!(m.is_empty());
    }

    #[test]
    fn test_removed_in_store_is_destroyed() {
        let mut m = manager();
        let id = m.create_panel("notes", PanelOptions::default()).unwrap();
        m.context()
            .store
            .dispatch(Action::RemovePanel { id: id.clone() });
        let report = m.reconcile();
        assert_eq!(report.removed, 1);
        assert!(m.panel(&id).is_none());
    }

    #[test]
    fn test_breakpoint_dispatched_only_on_change() {
        let mut m = manager();
        assert_eq!(m.update_breakpoint(), None);
        assert_eq!(
            m.set_viewport(Size::new(900.0, 800.0)),
            Some(Breakpoint::Tablet)
        );
        assert_eq!(m.set_viewport(Size::new(800.0, 800.0)), None);
    }

    #[test]
    fn test_tick_loads_content() {
        let mut m = manager();
        let id = m.create_panel("notes", PanelOptions::default()).unwrap();
        assert!(!m.panel(&id).unwrap().has_content());
        assert!(m.tick());
        assert!(m.panel(&id).unwrap().has_content());
    }
}
