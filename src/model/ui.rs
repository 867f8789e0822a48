//! Transient UI state - never persisted

use serde::{Deserialize, Serialize};

use super::panel::PanelId;
use crate::geometry::{Point, ResizeDirection};

// ============================================================================
// Breakpoints
// ============================================================================

/// Named viewport-width band driving responsive behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Breakpoint {
    /// Narrower than 768px
    Mobile,
    /// 768px up to 1023px
    Tablet,
    /// 1024px up to 1535px
    #[default]
    Desktop,
    /// 1536px and wider
    Wide,
}

impl Breakpoint {
    pub const TABLET_MIN: f64 = 768.0;
    pub const DESKTOP_MIN: f64 = 1024.0;
    pub const WIDE_MIN: f64 = 1536.0;

    /// Classify a viewport width
    pub fn from_width(width: f64) -> Self {
        if width < Self::TABLET_MIN {
            Breakpoint::Mobile
        } else if width < Self::DESKTOP_MIN {
            Breakpoint::Tablet
        } else if width >= Self::WIDE_MIN {
            Breakpoint::Wide
        } else {
            Breakpoint::Desktop
        }
    }

    /// Whether panels may be dragged at this breakpoint
    pub fn allows_drag(&self) -> bool {
        !matches!(self, Breakpoint::Mobile)
    }

    /// Whether panels may be resized at this breakpoint
    pub fn allows_resize(&self) -> bool {
        matches!(self, Breakpoint::Desktop | Breakpoint::Wide)
    }
}

// ============================================================================
// Context Menu
// ============================================================================

/// Descriptor of an open context menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMenu {
    pub position: Point,
    /// Panel the menu was opened on, if any
    pub panel_id: Option<PanelId>,
    pub items: Vec<String>,
}

// ============================================================================
// Interaction snapshots
// ============================================================================

/// Panel currently being dragged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSnapshot {
    pub panel_id: PanelId,
}

/// Panel currently being resized, and through which handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeSnapshot {
    pub panel_id: PanelId,
    pub direction: ResizeDirection,
}

/// UI state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// Focused panel
    pub active_panel: Option<PanelId>,
    pub sidebar_open: bool,
    /// Name of the open modal, if any
    pub modal: Option<String>,
    pub context_menu: Option<ContextMenu>,
    pub drag: Option<DragSnapshot>,
    pub resize: Option<ResizeSnapshot>,
    pub breakpoint: Breakpoint,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_interacting(&self) -> bool {
        self.drag.is_some() || self.resize.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoint_thresholds() {
        assert_eq!(Breakpoint::from_width(0.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(767.0), Breakpoint::Mobile);
        assert_eq!(Breakpoint::from_width(768.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1023.0), Breakpoint::Tablet);
        assert_eq!(Breakpoint::from_width(1024.0), Breakpoint::Desktop);
        assert_eq!(Breakpoint::from_width(1535.0), Breakpoint::Desktop);
        assert_eq!(Breakpoint::from_width(1536.0), Breakpoint::Wide);
    }

    #[test]
    fn test_breakpoint_behavior() {
        assert!(!Breakpoint::Mobile.allows_drag());
        assert!(!Breakpoint::Mobile.allows_resize());
        assert!(Breakpoint::Tablet.allows_drag());
        assert!(!Breakpoint::Tablet.allows_resize());
        assert!(Breakpoint::Desktop.allows_resize());
        assert!(Breakpoint::Wide.allows_drag());
    }
}
