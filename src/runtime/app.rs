use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use softbuffer::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::ModifiersState;
use winit::window::{CursorIcon, Window};

use refdesk::geometry::{Point, Size};
use refdesk::interaction::PointerEvent;
use refdesk::model::ThemeMode;
use refdesk::store::thunks;
use refdesk::view::Palette;
use refdesk::{Action, PanelManager, PanelOptions};

use super::input::{self, Shortcut, TouchAction};
use super::renderer::Renderer;

/// How often store tasks and deferred content loads run
const TICK_INTERVAL: Duration = Duration::from_millis(100);

const QUICK_SAVE_NAME: &str = "Quick save";

pub struct App {
    manager: PanelManager,
    palette: Palette,
    theme: ThemeMode,
    window_size: (u32, u32),
    window: Option<Rc<Window>>,
    context: Option<Context<Rc<Window>>>,
    renderer: Option<Renderer>,
    modifiers: ModifiersState,
    pointer: Point,
    last_tick: Instant,
}

impl App {
    pub fn new(manager: PanelManager, window_size: (u32, u32)) -> Self {
        let theme = manager.context().store.state().settings.theme;
        Self {
            manager,
            palette: Palette::load(theme),
            theme,
            window_size,
            window: None,
            context: None,
            renderer: None,
            modifiers: ModifiersState::empty(),
            pointer: Point::default(),
            last_tick: Instant::now(),
        }
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.window_size;
        let window_attributes = Window::default_attributes()
            .with_title("refdesk")
            .with_inner_size(LogicalSize::new(width, height));
        let window = Rc::new(event_loop.create_window(window_attributes)?);
        let context = Context::new(Rc::clone(&window))
            .map_err(|e| anyhow::anyhow!("Failed to create context: {}", e))?;
        let renderer = Renderer::new(Rc::clone(&window), &context)?;

        let (w, h) = renderer.size();
        self.manager.set_viewport(Size::new(w as f64, h as f64));
        self.renderer = Some(renderer);
        self.context = Some(context);
        self.window = Some(window);
        Ok(())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn pointer_event(&self, x: f64, y: f64) -> PointerEvent {
        let mut event = PointerEvent::at(x, y);
        event.modifiers = input::modifiers(self.modifiers);
        event
    }

    fn update_cursor(&self) {
        let Some(window) = &self.window else {
            return;
        };
        let icon = match self.manager.cursor_at(self.pointer) {
            Some("ns-resize") => CursorIcon::NsResize,
            Some("ew-resize") => CursorIcon::EwResize,
            Some("nesw-resize") => CursorIcon::NeswResize,
            Some("nwse-resize") => CursorIcon::NwseResize,
            _ if !self.manager.context().lock.is_idle() => CursorIcon::Grabbing,
            _ => CursorIcon::Default,
        };
        window.set_cursor(icon);
    }

    /// Handle one window event; returns whether a redraw is needed
    fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    if let Err(e) = renderer.resize(size.width, size.height) {
                        tracing::error!(target: "runtime", "{e}");
                    }
                }
                self.manager
                    .set_viewport(Size::new(size.width as f64, size.height as f64));
                true
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = Point::new(position.x, position.y);
                let event = self.pointer_event(position.x, position.y);
                let result = self.manager.on_pointer_move(&event);
                self.update_cursor();
                result.needs_redraw()
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let event = self
                    .pointer_event(self.pointer.x, self.pointer.y)
                    .with_button(input::pointer_button(*button));
                let result = match state {
                    ElementState::Pressed => self.manager.on_pointer_down(&event),
                    ElementState::Released => self.manager.on_pointer_up(&event),
                };
                self.update_cursor();
                result.needs_redraw()
            }
            WindowEvent::Touch(touch) => {
                let event = self
                    .pointer_event(touch.location.x, touch.location.y)
                    .with_pointer(input::touch_pointer_id(touch.id));
                let result = match input::touch_action(touch.phase) {
                    TouchAction::Down => self.manager.on_pointer_down(&event),
                    TouchAction::Move => self.manager.on_pointer_move(&event),
                    TouchAction::Up => self.manager.on_pointer_up(&event),
                    TouchAction::Cancel => self.manager.on_pointer_cancel(),
                };
                result.needs_redraw()
            }
            WindowEvent::Focused(false) => {
                // Releases never arrive once focus is gone
                self.manager.on_pointer_cancel().needs_redraw()
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                if let Some(shortcut) = input::shortcut(&event.logical_key, self.modifiers) {
                    self.run_shortcut(shortcut);
                    return true;
                }
                let key = input::key_input(&event.logical_key, self.modifiers);
                self.manager.handle_key(&key).needs_redraw()
            }
            _ => false,
        }
    }

    fn run_shortcut(&mut self, shortcut: Shortcut) {
        tracing::debug!(target: "runtime", ?shortcut, "shortcut");
        match shortcut {
            Shortcut::OpenBuiltin(index) => {
                let Some(panel_type) = refdesk::panels::builtin_types().nth(index) else {
                    return;
                };
                if let Err(e) = self.manager.create_panel(panel_type, PanelOptions::default()) {
                    tracing::warn!(target: "runtime", "could not open {panel_type}: {e}");
                }
            }
            Shortcut::Arrange(mode) => {
                self.manager.arrange_panels(mode);
            }
            Shortcut::SaveLayout => {
                let store = Rc::clone(&self.manager.context().store);
                if let Err(e) = thunks::save_layout(&store, QUICK_SAVE_NAME) {
                    tracing::warn!(target: "runtime", "quick save failed: {e}");
                }
            }
            Shortcut::CloseActive => {
                let active = self.manager.context().store.state().ui.active_panel.clone();
                if let Some(id) = active {
                    if let Err(e) = self.manager.close_panel(&id) {
                        tracing::warn!(target: "runtime", "{e}");
                    }
                }
            }
            Shortcut::ToggleTheme => {
                let next = match self.theme {
                    ThemeMode::Dark => ThemeMode::Light,
                    ThemeMode::Light => ThemeMode::Dark,
                };
                self.manager.context().store.dispatch(Action::SetTheme(next));
            }
        }
    }

    fn sync_theme(&mut self) {
        let theme = self.manager.context().store.state().settings.theme;
        if theme != self.theme {
            self.theme = theme;
            self.palette = Palette::load(theme);
        }
    }

    fn redraw(&mut self) {
        self.manager.on_animation_frame();
        self.sync_theme();
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.render(&self.manager, &self.palette) {
                tracing::error!(target: "runtime", "render failed: {e}");
            }
        }
        // Keep frames coming while an interaction is live
        if !self.manager.context().lock.is_idle() {
            self.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init_window(event_loop) {
                tracing::error!(target: "runtime", "failed to open window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let ours = self.window.as_ref().is_some_and(|w| w.id() == window_id);
        if !ours {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            other => {
                if self.handle_event(&other) {
                    self.request_redraw();
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now.duration_since(self.last_tick) >= TICK_INTERVAL {
            self.last_tick = now;
            if self.manager.tick() || self.manager.is_dirty() {
                self.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.last_tick + TICK_INTERVAL));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Err(e) = self.manager.context().store.persist_now() {
            tracing::debug!(target: "runtime", "final save skipped: {e}");
        }
        self.manager.shutdown();
    }
}
