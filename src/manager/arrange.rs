//! Pure arrangement formulas
//!
//! Each function maps the current panel sizes and the desktop work area to
//! one target rectangle per panel, in the order given. Tile and stack fill
//! the work area; cascade uses fixed absolute offsets.

use std::fmt;
use std::str::FromStr;

use crate::geometry::{Rect, Size};

/// Cascade step between consecutive panels
pub const CASCADE_ORIGIN: f64 = 50.0;
pub const CASCADE_STEP: f64 = 30.0;
/// Gap kept around each tile
pub const TILE_MARGIN: f64 = 10.0;
/// Upper bound on the shared stack size
pub const STACK_MAX: Size = Size::new(600.0, 400.0);
const STACK_INSET: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrangeMode {
    #[default]
    Cascade,
    Tile,
    Stack,
}

impl ArrangeMode {
    pub const ALL: [ArrangeMode; 3] = [ArrangeMode::Cascade, ArrangeMode::Tile, ArrangeMode::Stack];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrangeMode::Cascade => "cascade",
            ArrangeMode::Tile => "tile",
            ArrangeMode::Stack => "stack",
        }
    }
}

impl fmt::Display for ArrangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrangeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrangeMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown arrangement `{s}` (expected cascade, tile or stack)"))
    }
}

/// Target rectangles for `sizes`, laid out inside `area`
pub fn arrange(mode: ArrangeMode, sizes: &[Size], area: Rect) -> Vec<Rect> {
    match mode {
        ArrangeMode::Cascade => cascade(sizes),
        ArrangeMode::Tile => tile(sizes.len(), area),
        ArrangeMode::Stack => stack(sizes.len(), area),
    }
}

/// Panel `i` moves to `(50 + 30i, 50 + 30i)`; sizes are kept
pub fn cascade(sizes: &[Size]) -> Vec<Rect> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, size)| {
            let offset = CASCADE_ORIGIN + CASCADE_STEP * i as f64;
            Rect::new(offset, offset, size.width, size.height)
        })
        .collect()
}

/// Grid dimensions `(cols, rows)` for `count` tiles
pub fn tile_grid(count: usize) -> (usize, usize) {
    if count == 0 {
        return (0, 0);
    }
    let cols = (count as f64).sqrt().ceil() as usize;
    let rows = count.div_ceil(cols);
    (cols, rows)
}

/// Row-major grid of equally sized cells with a margin around each panel
pub fn tile(count: usize, area: Rect) -> Vec<Rect> {
    let (cols, rows) = tile_grid(count);
    if count == 0 {
        return Vec::new();
    }
    let cell_w = (area.width / cols as f64).floor();
    let cell_h = (area.height / rows as f64).floor();
    (0..count)
        .map(|i| {
            let (col, row) = (i % cols, i / cols);
            Rect::new(
                area.x + col as f64 * cell_w + TILE_MARGIN,
                area.y + row as f64 * cell_h + TILE_MARGIN,
                cell_w - 2.0 * TILE_MARGIN,
                cell_h - 2.0 * TILE_MARGIN,
            )
        })
        .collect()
}

/// Every panel gets the same centered rectangle
pub fn stack(count: usize, area: Rect) -> Vec<Rect> {
    let width = STACK_MAX.width.min(area.width - STACK_INSET);
    let height = STACK_MAX.height.min(area.height - STACK_INSET);
    let rect = Rect::new(
        area.x + (area.width - width) / 2.0,
        area.y + (area.height - height) / 2.0,
        width,
        height,
    );
    vec![rect; count]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cascade_offsets() {
        let sizes = [Size::new(400.0, 300.0), Size::new(200.0, 100.0)];
        let rects = cascade(&sizes);
        assert_eq!(rects[0], Rect::new(50.0, 50.0, 400.0, 300.0));
        assert_eq!(rects[1], Rect::new(80.0, 80.0, 200.0, 100.0));
    }

    #[test]
    fn test_tile_grid_shapes() {
        assert_eq!(tile_grid(0), (0, 0));
        assert_eq!(tile_grid(1), (1, 1));
        assert_eq!(tile_grid(3), (2, 2));
        assert_eq!(tile_grid(5), (3, 2));
        assert_eq!(tile_grid(9), (3, 3));
        assert_eq!(tile_grid(10), (4, 3));
    }

    #[test]
    fn test_tile_three_panels() {
        let rects = tile(3, Rect::new(0.0, 0.0, 1000.0, 700.0));
        assert_eq!(rects[0], Rect::new(10.0, 10.0, 480.0, 330.0));
        assert_eq!(rects[1], Rect::new(510.0, 10.0, 480.0, 330.0));
        assert_eq!(rects[2], Rect::new(10.0, 360.0, 480.0, 330.0));
    }

    #[test]
    fn test_tile_offsets_by_area_origin() {
        let area = Rect::new(0.0, 60.0, 1280.0, 740.0);
        let rects = tile(4, area);
        assert_eq!(rects[0], Rect::new(10.0, 70.0, 620.0, 350.0));
        assert_eq!(rects[3], Rect::new(650.0, 440.0, 620.0, 350.0));
        assert!(rects.iter().all(|r| area.contains_rect(r)));
    }

    #[test]
    fn test_stack_centers_capped_size() {
        let rects = stack(2, Rect::new(0.0, 60.0, 1280.0, 740.0));
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0], Rect::new(340.0, 230.0, 600.0, 400.0));

        let small = stack(1, Rect::new(0.0, 0.0, 500.0, 400.0));
        assert_eq!(small[0], Rect::new(50.0, 50.0, 400.0, 300.0));
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Tile".parse::<ArrangeMode>(), Ok(ArrangeMode::Tile));
        assert!("spiral".parse::<ArrangeMode>().is_err());
        assert_eq!(ArrangeMode::Stack.to_string(), "stack");
    }
}
