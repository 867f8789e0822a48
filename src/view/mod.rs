//! Software renderer for the desktop
//!
//! Draws the desktop into a [`Frame`] from the manager's panel elements and
//! the store's UI state. Content lines are drawn as bars; there is no text
//! shaping.

pub mod frame;
pub mod theme;

pub use frame::{blend_colors, Frame};
pub use theme::{Color, Palette};

use crate::geometry::Rect;
use crate::manager::PanelManager;
use crate::model::{AppState, NotificationKind};
use crate::panel::{ElementClass, HeaderControl, PanelElement, SlotState};

const LINE_HEIGHT: f64 = 18.0;
const LINE_BAR_HEIGHT: f64 = 8.0;
const CONTENT_PADDING: f64 = 12.0;
const TOAST_SIZE: (f64, f64) = (280.0, 56.0);
const TOAST_GAP: f64 = 8.0;
const MODAL_DIM_ALPHA: u8 = 0x80;

/// Draw a whole frame
pub fn render(frame: &mut Frame, manager: &PanelManager, palette: &Palette) {
    let ctx = manager.context();
    let state = ctx.store.state();

    frame.clear(palette.desktop.to_argb_u32());
    let viewport = ctx.viewport();
    frame.fill_rect(
        Rect::new(0.0, 0.0, viewport.width, ctx.config.nav_height),
        palette.nav_bar.to_argb_u32(),
    );

    for panel in manager.paint_order() {
        render_panel(frame, panel.element(), palette);
    }

    render_notifications(frame, &state, ctx.config.nav_height, palette);

    if state.ui.modal.is_some() {
        frame.dim(MODAL_DIM_ALPHA);
    }
}

pub fn render_panel(frame: &mut Frame, element: &PanelElement, palette: &Palette) {
    let active = element.has_class(ElementClass::Active);
    let outer = element.display_rect();

    frame.fill_rect(outer, palette.panel_body.to_argb_u32());

    let header = if active {
        palette.header_active
    } else {
        palette.header
    };
    frame.fill_rect(element.header_rect(), header.to_argb_u32());

    for (control, rect) in element.controls() {
        let color = match control {
            HeaderControl::Close => palette.control_close,
            HeaderControl::Maximize | HeaderControl::Minimize => palette.control,
        };
        frame.fill_rect(rect, color.to_argb_u32());
    }

    if let Some(content) = element.content_rect() {
        frame.set_clip(content);
        render_slot(frame, element, content, palette);
        frame.clear_clip();
    }

    let border = if active {
        palette.border_active
    } else {
        palette.border
    };
    frame.stroke_rect(outer, border.to_argb_u32());

    if element.has_class(ElementClass::Dragging) || element.has_class(ElementClass::Resizing) {
        frame.fill_rect_blended(outer, palette.interaction.to_argb_u32() & 0x30FFFFFF);
    }
}

fn render_slot(frame: &mut Frame, element: &PanelElement, content: Rect, palette: &Palette) {
    match element.slot().state() {
        SlotState::Error { .. } => {
            let band = Rect::new(
                content.x + CONTENT_PADDING,
                content.y + CONTENT_PADDING,
                (content.width - 2.0 * CONTENT_PADDING).max(0.0),
                LINE_HEIGHT,
            );
            frame.fill_rect(band, palette.error.to_argb_u32());
            if let Some(retry) = element.retry_rect() {
                frame.draw_bordered_rect(
                    retry,
                    palette.header.to_argb_u32(),
                    palette.border_active.to_argb_u32(),
                );
            }
        }
        SlotState::Mounted => {
            for (i, line) in element.slot().lines().iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let y = content.y + CONTENT_PADDING + i as f64 * LINE_HEIGHT;
                if y > content.bottom() {
                    break;
                }
                // Bar length follows the line length
                let width = (line.chars().count() as f64 * 7.0)
                    .min(content.width - 2.0 * CONTENT_PADDING);
                frame.fill_rect(
                    Rect::new(content.x + CONTENT_PADDING, y, width.max(0.0), LINE_BAR_HEIGHT),
                    palette.content_line.to_argb_u32(),
                );
            }
        }
        SlotState::Empty | SlotState::Loading => {}
    }
}

/// Toast rectangles, newest at the top, stacked below the navigation bar
pub fn notification_rects(state: &AppState, viewport_width: f64, nav_height: f64) -> Vec<Rect> {
    let (w, h) = TOAST_SIZE;
    state
        .notifications
        .iter()
        .rev()
        .enumerate()
        .map(|(i, _)| {
            Rect::new(
                viewport_width - w - TOAST_GAP,
                nav_height + TOAST_GAP + i as f64 * (h + TOAST_GAP),
                w,
                h,
            )
        })
        .collect()
}

fn render_notifications(frame: &mut Frame, state: &AppState, nav_height: f64, palette: &Palette) {
    let rects = notification_rects(state, frame.width() as f64, nav_height);
    for (notification, rect) in state.notifications.iter().rev().zip(rects) {
        let accent = match notification.kind {
            NotificationKind::Error | NotificationKind::Warning => palette.error,
            NotificationKind::Info | NotificationKind::Success => palette.border_active,
        };
        frame.draw_bordered_rect(
            rect,
            palette.notification.to_argb_u32(),
            accent.to_argb_u32(),
        );
        frame.fill_rect(
            Rect::new(rect.x, rect.y, 4.0, rect.height),
            accent.to_argb_u32(),
        );
    }
}
