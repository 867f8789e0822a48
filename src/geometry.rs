//! Pure geometry for panel placement, dragging and resizing
//!
//! Everything here is a plain function of its inputs: a start state, a
//! pointer delta and a set of constraints go in, a new geometry comes out.
//! Applying the result to a panel element is left to the interaction
//! handlers, which keeps this math testable without any window system.

use serde::{Deserialize, Serialize};

// ============================================================================
// Basic Types
// ============================================================================

/// A point (or offset) in desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Vector from `origin` to `self`
    pub fn delta_from(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Width and height in desktop pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_parts(position: Point, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Whether `other` lies entirely inside, edges included
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn is_finite(&self) -> bool {
        self.position().is_finite() && self.size().is_finite()
    }
}

// ============================================================================
// Size Limits
// ============================================================================

/// Minimum size applied to a panel that does not declare one
pub const DEFAULT_MIN_SIZE: Size = Size::new(120.0, 80.0);

/// Inclusive size range a panel must stay within
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    pub min: Size,
    pub max: Size,
}

impl SizeLimits {
    /// Build limits from optional bounds, falling back to the default minimum.
    ///
    /// A maximum smaller than the minimum is raised to the minimum so the
    /// range is never empty.
    pub fn new(min: Option<Size>, max: Option<Size>) -> Self {
        let min = min.unwrap_or(DEFAULT_MIN_SIZE);
        let max = max.unwrap_or(Size::new(f64::INFINITY, f64::INFINITY));
        Self {
            min,
            max: Size::new(max.width.max(min.width), max.height.max(min.height)),
        }
    }

    pub fn clamp(&self, size: Size) -> Size {
        Size::new(
            clamp_axis(size.width, self.min.width, self.max.width),
            clamp_axis(size.height, self.min.height, self.max.height),
        )
    }
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[inline]
fn clamp_axis(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Round `value` to the nearest multiple of `quantum`
#[inline]
pub fn snap_to_grid(value: f64, quantum: f64) -> f64 {
    if quantum > 0.0 && quantum.is_finite() {
        (value / quantum).round() * quantum
    } else {
        value
    }
}

// ============================================================================
// Dragging
// ============================================================================

/// Area a dragged panel must stay inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragBounds {
    /// Size of the desktop surface
    pub viewport: Size,
    /// Height reserved at the top for the navigation bar
    pub nav_height: f64,
}

/// Clamp a panel position so the panel stays within `bounds`.
///
/// Left and top edges win over right and bottom when the panel is larger
/// than the available area: x never goes below 0 and y never above the
/// navigation bar.
pub fn clamp_position(position: Point, size: Size, bounds: &DragBounds) -> Point {
    let max_x = bounds.viewport.width - size.width;
    let max_y = bounds.viewport.height - size.height;
    Point::new(
        position.x.min(max_x).max(0.0),
        position.y.min(max_y).max(bounds.nav_height),
    )
}

/// Position of a dragged panel given where the drag started and where the
/// pointer is now
pub fn drag_position(
    start_offset: Point,
    start_pointer: Point,
    pointer: Point,
    size: Size,
    bounds: &DragBounds,
) -> Point {
    let delta = pointer.delta_from(start_pointer);
    clamp_position(start_offset.offset(delta.x, delta.y), size, bounds)
}

// ============================================================================
// Resizing
// ============================================================================

/// One of the eight resize handles around a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeDirection {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl ResizeDirection {
    /// All handles, corners last so edge handles win ties in hit testing
    pub const ALL: [ResizeDirection; 8] = [
        ResizeDirection::NorthWest,
        ResizeDirection::NorthEast,
        ResizeDirection::SouthWest,
        ResizeDirection::SouthEast,
        ResizeDirection::North,
        ResizeDirection::East,
        ResizeDirection::South,
        ResizeDirection::West,
    ];

    pub fn moves_north(&self) -> bool {
        matches!(
            self,
            ResizeDirection::North | ResizeDirection::NorthEast | ResizeDirection::NorthWest
        )
    }

    pub fn moves_south(&self) -> bool {
        matches!(
            self,
            ResizeDirection::South | ResizeDirection::SouthEast | ResizeDirection::SouthWest
        )
    }

    pub fn moves_east(&self) -> bool {
        matches!(
            self,
            ResizeDirection::East | ResizeDirection::NorthEast | ResizeDirection::SouthEast
        )
    }

    pub fn moves_west(&self) -> bool {
        matches!(
            self,
            ResizeDirection::West | ResizeDirection::NorthWest | ResizeDirection::SouthWest
        )
    }

    pub fn affects_width(&self) -> bool {
        self.moves_east() || self.moves_west()
    }

    pub fn affects_height(&self) -> bool {
        self.moves_north() || self.moves_south()
    }

    /// CSS-style cursor name shown while hovering this handle
    pub fn cursor(&self) -> &'static str {
        match self {
            ResizeDirection::North | ResizeDirection::South => "ns-resize",
            ResizeDirection::East | ResizeDirection::West => "ew-resize",
            ResizeDirection::NorthEast | ResizeDirection::SouthWest => "nesw-resize",
            ResizeDirection::NorthWest | ResizeDirection::SouthEast => "nwse-resize",
        }
    }

    /// Hit area of this handle along the inside edge of `panel`
    pub fn handle_rect(&self, panel: Rect, thickness: f64) -> Rect {
        let t = thickness;
        let inner_w = (panel.width - 2.0 * t).max(0.0);
        let inner_h = (panel.height - 2.0 * t).max(0.0);
        match self {
            ResizeDirection::North => Rect::new(panel.x + t, panel.y, inner_w, t),
            ResizeDirection::South => Rect::new(panel.x + t, panel.bottom() - t, inner_w, t),
            ResizeDirection::West => Rect::new(panel.x, panel.y + t, t, inner_h),
            ResizeDirection::East => Rect::new(panel.right() - t, panel.y + t, t, inner_h),
            ResizeDirection::NorthWest => Rect::new(panel.x, panel.y, t, t),
            ResizeDirection::NorthEast => Rect::new(panel.right() - t, panel.y, t, t),
            ResizeDirection::SouthWest => Rect::new(panel.x, panel.bottom() - t, t, t),
            ResizeDirection::SouthEast => Rect::new(panel.right() - t, panel.bottom() - t, t, t),
        }
    }
}

/// Constraints applied while resizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConstraints {
    pub limits: SizeLimits,
    /// Width / height ratio to preserve, captured when the resize starts
    pub aspect_ratio: Option<f64>,
    /// Grid quantum for snapping moving edges
    pub grid: Option<f64>,
}

impl ResizeConstraints {
    pub fn new(limits: SizeLimits) -> Self {
        Self {
            limits,
            aspect_ratio: None,
            grid: None,
        }
    }
}

/// Compute the geometry of a panel being resized from `start` by `delta`
/// through handle `direction`.
///
/// Edges the handle does not touch stay where they were: a west or north
/// handle shifts the origin so the east or south edge remains fixed.
pub fn resize_rect(
    start: Rect,
    direction: ResizeDirection,
    delta: Point,
    constraints: &ResizeConstraints,
) -> Rect {
    let limits = &constraints.limits;
    let right = start.right();
    let bottom = start.bottom();

    let mut width = if direction.moves_east() {
        start.width + delta.x
    } else if direction.moves_west() {
        start.width - delta.x
    } else {
        start.width
    };
    let mut height = if direction.moves_south() {
        start.height + delta.y
    } else if direction.moves_north() {
        start.height - delta.y
    } else {
        start.height
    };

    let clamped = limits.clamp(Size::new(width, height));
    width = clamped.width;
    height = clamped.height;

    if let Some(ratio) = constraints
        .aspect_ratio
        .filter(|r| r.is_finite() && *r > 0.0)
    {
        let width_dominant = match (direction.affects_width(), direction.affects_height()) {
            (true, false) => true,
            (false, true) => false,
            _ => delta.x.abs() >= delta.y.abs(),
        };
        if width_dominant {
            height = width / ratio;
        } else {
            width = height * ratio;
        }
        let clamped = limits.clamp(Size::new(width, height));
        width = clamped.width;
        height = clamped.height;
    }

    if let Some(quantum) = constraints.grid.filter(|q| q.is_finite() && *q > 0.0) {
        if direction.moves_west() {
            width = right - snap_to_grid(right - width, quantum);
        } else if direction.moves_east() {
            width = snap_to_grid(width, quantum);
        }
        if direction.moves_north() {
            height = bottom - snap_to_grid(bottom - height, quantum);
        } else if direction.moves_south() {
            height = snap_to_grid(height, quantum);
        }
        let clamped = limits.clamp(Size::new(width, height));
        width = clamped.width;
        height = clamped.height;
    }

    let x = if direction.moves_west() {
        right - width
    } else {
        start.x
    };
    let y = if direction.moves_north() {
        bottom - height
    } else {
        start.y
    };

    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> DragBounds {
        DragBounds {
            viewport: Size::new(1280.0, 800.0),
            nav_height: 60.0,
        }
    }

    #[test]
    fn test_clamp_position_keeps_panel_inside() {
        let size = Size::new(300.0, 200.0);
        let p = clamp_position(Point::new(-50.0, 10.0), size, &bounds());
        assert_eq!(p, Point::new(0.0, 60.0));

        let p = clamp_position(Point::new(5000.0, 5000.0), size, &bounds());
        assert_eq!(p, Point::new(980.0, 600.0));
    }

    #[test]
    fn test_clamp_position_prefers_top_left_when_oversized() {
        let size = Size::new(2000.0, 2000.0);
        let p = clamp_position(Point::new(300.0, 300.0), size, &bounds());
        assert_eq!(p, Point::new(0.0, 60.0));
    }

    #[test]
    fn test_drag_position_applies_delta() {
        let p = drag_position(
            Point::new(100.0, 100.0),
            Point::new(150.0, 110.0),
            Point::new(170.0, 140.0),
            Size::new(300.0, 200.0),
            &bounds(),
        );
        assert_eq!(p, Point::new(120.0, 130.0));
    }

    #[test]
    fn test_resize_east_only_changes_width() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let c = ResizeConstraints::new(SizeLimits::default());
        let r = resize_rect(start, ResizeDirection::East, Point::new(50.0, 80.0), &c);
        assert_eq!(r, Rect::new(100.0, 100.0, 350.0, 200.0));
    }

    #[test]
    fn test_resize_north_west_keeps_opposite_corner() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let c = ResizeConstraints::new(SizeLimits::default());
        let r = resize_rect(start, ResizeDirection::NorthWest, Point::new(-20.0, 30.0), &c);
        assert_eq!(r.right(), start.right());
        assert_eq!(r.bottom(), start.bottom());
        assert_eq!(r.width, 320.0);
        assert_eq!(r.height, 170.0);
    }

    #[test]
    fn test_resize_west_clamped_to_min_keeps_right_edge() {
        let start = Rect::new(100.0, 100.0, 300.0, 200.0);
        let limits = SizeLimits::new(Some(Size::new(100.0, 100.0)), None);
        let c = ResizeConstraints::new(limits);
        let r = resize_rect(start, ResizeDirection::West, Point::new(500.0, 0.0), &c);
        assert_eq!(r.width, 100.0);
        assert_eq!(r.x, 300.0);
    }

    #[test]
    fn test_resize_aspect_ratio_follows_dominant_axis() {
        let start = Rect::new(0.0, 100.0, 400.0, 200.0);
        let mut c = ResizeConstraints::new(SizeLimits::default());
        c.aspect_ratio = Some(2.0);
        let r = resize_rect(start, ResizeDirection::SouthEast, Point::new(100.0, 10.0), &c);
        assert_eq!(r.width, 500.0);
        assert_eq!(r.height, 250.0);
    }

    #[test]
    fn test_resize_grid_snaps_size() {
        let start = Rect::new(0.0, 100.0, 400.0, 200.0);
        let mut c = ResizeConstraints::new(SizeLimits::default());
        c.grid = Some(20.0);
        let r = resize_rect(start, ResizeDirection::SouthEast, Point::new(13.0, 27.0), &c);
        assert_eq!(r.width, 420.0);
        assert_eq!(r.height, 220.0);
    }

    #[test]
    fn test_size_limits_never_empty() {
        let limits = SizeLimits::new(Some(Size::new(200.0, 200.0)), Some(Size::new(100.0, 100.0)));
        assert_eq!(limits.max, Size::new(200.0, 200.0));
    }

    #[test]
    fn test_handle_rects_sit_on_edges() {
        let panel = Rect::new(0.0, 0.0, 200.0, 100.0);
        let se = ResizeDirection::SouthEast.handle_rect(panel, 8.0);
        assert!(se.contains(199.0, 99.0));
        let n = ResizeDirection::North.handle_rect(panel, 8.0);
        assert!(n.contains(100.0, 2.0));
        assert!(!n.contains(100.0, 50.0));
    }
}
