//! Retained render mirror of one panel
//!
//! The element is what the renderer draws and what pointer events are hit
//! tested against. It never talks to the store; the owning panel writes to
//! it. Every setter is a no-op when the value is unchanged, and
//! [`PanelElement::writes`] counts the ones that were not.

use std::collections::BTreeSet;

use crate::geometry::{Point, Rect};
use crate::model::{PanelConfig, PanelId};

/// Height of the title bar
pub const HEADER_HEIGHT: f64 = 32.0;
/// Side of a square header button
pub const CONTROL_SIZE: f64 = 24.0;
const CONTROL_GAP: f64 = 4.0;
const RETRY_SIZE: (f64, f64) = (96.0, 28.0);

/// State markers, the counterpart of CSS classes on the panel node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementClass {
    Active,
    Minimized,
    Maximized,
    Dragging,
    Resizing,
    Draggable,
    Resizable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderControl {
    Minimize,
    Maximize,
    Close,
}

impl HeaderControl {
    /// Buttons from the right edge inward
    pub const ORDER: [HeaderControl; 3] = [
        HeaderControl::Close,
        HeaderControl::Maximize,
        HeaderControl::Minimize,
    ];
}

/// Part of an element under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementPart {
    Header,
    Control(HeaderControl),
    Content,
    /// Retry button shown after a content load failure
    Retry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SlotState {
    #[default]
    Empty,
    Loading,
    Mounted,
    Error {
        message: String,
    },
}

/// Container content is mounted into
#[derive(Debug, Default)]
pub struct ContentSlot {
    state: SlotState,
    lines: Vec<String>,
}

impl ContentSlot {
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn has_error(&self) -> bool {
        matches!(self.state, SlotState::Error { .. })
    }
}

#[derive(Debug)]
pub struct PanelElement {
    id: PanelId,
    title: String,
    rect: Rect,
    z_index: i64,
    visible: bool,
    closable: bool,
    collapsible: bool,
    classes: BTreeSet<ElementClass>,
    cursor: Option<&'static str>,
    slot: ContentSlot,
    mounted: bool,
    writes: u64,
}

impl PanelElement {
    pub fn new(config: &PanelConfig) -> Self {
        let mut classes = BTreeSet::new();
        if config.draggable {
            classes.insert(ElementClass::Draggable);
        }
        if config.resizable {
            classes.insert(ElementClass::Resizable);
        }
        Self {
            id: config.id.clone(),
            title: config.title.clone(),
            rect: config.rect(),
            z_index: config.z_index,
            visible: config.visible,
            closable: config.closable,
            collapsible: config.collapsible,
            classes,
            cursor: None,
            slot: ContentSlot::default(),
            mounted: false,
            writes: 0,
        }
    }

    pub fn id(&self) -> &PanelId {
        &self.id
    }

    // ========================================================================
    // Mounting
    // ========================================================================

    pub fn mount(&mut self) {
        if !self.mounted {
            self.mounted = true;
            self.writes += 1;
        }
    }

    pub fn unmount(&mut self) {
        if self.mounted {
            self.mounted = false;
            self.slot.clear();
            self.slot.state = SlotState::Empty;
            self.writes += 1;
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Mutations applied so far
    pub fn writes(&self) -> u64 {
        self.writes
    }

    // ========================================================================
    // Properties
    // ========================================================================

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_string();
            self.writes += 1;
        }
    }

    /// Geometry as last applied (full size, even when minimized)
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn set_rect(&mut self, rect: Rect) {
        if self.rect != rect {
            self.rect = rect;
            self.writes += 1;
        }
    }

    pub fn set_position(&mut self, position: Point) {
        self.set_rect(Rect::from_parts(position, self.rect.size()));
    }

    pub fn z_index(&self) -> i64 {
        self.z_index
    }

    pub fn set_z_index(&mut self, z_index: i64) {
        if self.z_index != z_index {
            self.z_index = z_index;
            self.writes += 1;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.writes += 1;
        }
    }

    pub fn set_controls(&mut self, closable: bool, collapsible: bool) {
        if (self.closable, self.collapsible) != (closable, collapsible) {
            self.closable = closable;
            self.collapsible = collapsible;
            self.writes += 1;
        }
    }

    pub fn has_class(&self, class: ElementClass) -> bool {
        self.classes.contains(&class)
    }

    pub fn set_class(&mut self, class: ElementClass, on: bool) {
        let changed = if on {
            self.classes.insert(class)
        } else {
            self.classes.remove(&class)
        };
        if changed {
            self.writes += 1;
        }
    }

    pub fn cursor(&self) -> Option<&'static str> {
        self.cursor
    }

    /// Hover cursor; not counted as a write
    pub fn set_cursor(&mut self, cursor: Option<&'static str>) {
        self.cursor = cursor;
    }

    pub fn slot(&self) -> &ContentSlot {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut ContentSlot {
        &mut self.slot
    }

    pub fn set_slot_state(&mut self, state: SlotState) {
        if self.slot.state != state {
            self.slot.state = state;
            self.writes += 1;
        }
    }

    // ========================================================================
    // Layout
    // ========================================================================

    /// Area actually drawn: a minimized panel collapses to its title bar
    pub fn display_rect(&self) -> Rect {
        if self.has_class(ElementClass::Minimized) {
            Rect::new(
                self.rect.x,
                self.rect.y,
                self.rect.width,
                HEADER_HEIGHT.min(self.rect.height),
            )
        } else {
            self.rect
        }
    }

    pub fn header_rect(&self) -> Rect {
        Rect::new(
            self.rect.x,
            self.rect.y,
            self.rect.width,
            HEADER_HEIGHT.min(self.rect.height),
        )
    }

    pub fn content_rect(&self) -> Option<Rect> {
        if self.has_class(ElementClass::Minimized) || self.rect.height <= HEADER_HEIGHT {
            return None;
        }
        Some(Rect::new(
            self.rect.x,
            self.rect.y + HEADER_HEIGHT,
            self.rect.width,
            self.rect.height - HEADER_HEIGHT,
        ))
    }

    /// Header buttons present on this element, with their rectangles
    pub fn controls(&self) -> Vec<(HeaderControl, Rect)> {
        let header = self.header_rect();
        let top = header.y + (header.height - CONTROL_SIZE).max(0.0) / 2.0;
        let mut right = header.right() - CONTROL_GAP;
        let mut controls = Vec::with_capacity(3);
        for control in HeaderControl::ORDER {
            let present = match control {
                HeaderControl::Close => self.closable,
                HeaderControl::Maximize => true,
                HeaderControl::Minimize => self.collapsible,
            };
            if !present {
                continue;
            }
            let x = right - CONTROL_SIZE;
            controls.push((control, Rect::new(x, top, CONTROL_SIZE, CONTROL_SIZE)));
            right = x - CONTROL_GAP;
        }
        controls
    }

    pub fn control_rect(&self, control: HeaderControl) -> Option<Rect> {
        self.controls()
            .into_iter()
            .find(|(c, _)| *c == control)
            .map(|(_, r)| r)
    }

    /// Retry button, shown only while the content slot holds an error
    pub fn retry_rect(&self) -> Option<Rect> {
        if !self.slot.has_error() {
            return None;
        }
        let content = self.content_rect()?;
        let (w, h) = RETRY_SIZE;
        Some(Rect::new(
            content.x + (content.width - w) / 2.0,
            content.y + (content.height - h) / 2.0,
            w,
            h,
        ))
    }

    pub fn contains(&self, point: Point) -> bool {
        self.visible && self.mounted && self.display_rect().contains(point.x, point.y)
    }

    /// Which part of the element is under `point`
    pub fn hit(&self, point: Point) -> Option<ElementPart> {
        if !self.contains(point) {
            return None;
        }
        for (control, rect) in self.controls() {
            if rect.contains(point.x, point.y) {
                return Some(ElementPart::Control(control));
            }
        }
        if self.header_rect().contains(point.x, point.y) {
            return Some(ElementPart::Header);
        }
        if self
            .retry_rect()
            .is_some_and(|r| r.contains(point.x, point.y))
        {
            return Some(ElementPart::Retry);
        }
        Some(ElementPart::Content)
    }
}
