//! Frame abstraction for drawing primitives
//!
//! A safe API over the softbuffer pixel slice. All coordinates are in
//! pixels; everything is clipped to the frame and the optional clip rect.

use crate::geometry::Rect;

/// Blend a foreground color onto a background color using alpha compositing.
///
/// Both colors are ARGB (0xAARRGGBB). Returns an opaque color.
#[inline]
pub fn blend_colors(bg: u32, fg: u32, alpha: f32) -> u32 {
    let channel = |shift: u32| {
        let b = ((bg >> shift) & 0xFF) as f32;
        let f = ((fg >> shift) & 0xFF) as f32;
        ((b * (1.0 - alpha) + f * alpha) as u32) << shift
    };
    0xFF000000 | channel(16) | channel(8) | channel(0)
}

/// Clipping rectangle in pixel coordinates (inclusive start, exclusive end).
#[derive(Clone, Copy, Debug)]
struct ClipRect {
    x0: usize,
    y0: usize,
    x1: usize,
    y1: usize,
}

pub struct Frame<'a> {
    buffer: &'a mut [u32],
    width: usize,
    height: usize,
    clip: Option<ClipRect>,
}

impl<'a> Frame<'a> {
    /// Wrap `buffer`; a buffer shorter than `width * height` shrinks the
    /// height to what fits
    pub fn new(buffer: &'a mut [u32], width: usize, height: usize) -> Self {
        let height = if width > 0 {
            height.min(buffer.len() / width)
        } else {
            0
        };
        Self {
            buffer,
            width,
            height,
            clip: None,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn set_clip(&mut self, rect: Rect) {
        let (x0, y0, x1, y1) = self.span(rect);
        self.clip = Some(ClipRect { x0, y0, x1, y1 });
    }

    pub fn clear_clip(&mut self) {
        self.clip = None;
    }

    /// Pixel span of `rect` after clipping
    fn span(&self, rect: Rect) -> (usize, usize, usize, usize) {
        let (cx0, cy0, cx1, cy1) = self
            .clip
            .map_or((0, 0, self.width, self.height), |c| (c.x0, c.y0, c.x1, c.y1));
        let px = |v: f64, max: usize| (v.max(0.0) as usize).min(max);
        let x0 = px(rect.x, self.width).max(cx0);
        let y0 = px(rect.y, self.height).max(cy0);
        let x1 = px(rect.right(), self.width).min(cx1);
        let y1 = px(rect.bottom(), self.height).min(cy1);
        (x0, y0, x1.max(x0), y1.max(y0))
    }

    #[inline]
    pub fn clear(&mut self, color: u32) {
        self.buffer.fill(color);
    }

    /// Fill with a solid color, no blending
    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        let (x0, y0, x1, y1) = self.span(rect);
        for y in y0..y1 {
            let row = y * self.width;
            self.buffer[row + x0..row + x1].fill(color);
        }
    }

    /// Fill honoring the color's alpha byte
    pub fn fill_rect_blended(&mut self, rect: Rect, color: u32) {
        let alpha = ((color >> 24) & 0xFF) as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        if alpha >= 1.0 {
            return self.fill_rect(rect, color);
        }
        let (x0, y0, x1, y1) = self.span(rect);
        for y in y0..y1 {
            let row = y * self.width;
            for px in &mut self.buffer[row + x0..row + x1] {
                *px = blend_colors(*px, color, alpha);
            }
        }
    }

    /// 1px opaque outline just inside `rect`
    pub fn stroke_rect(&mut self, rect: Rect, color: u32) {
        let color = color | 0xFF000000;
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, 1.0), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - 1.0, rect.width, 1.0), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1.0, rect.height), color);
        self.fill_rect(Rect::new(rect.right() - 1.0, rect.y, 1.0, rect.height), color);
    }

    pub fn draw_bordered_rect(&mut self, rect: Rect, fill: u32, border: u32) {
        self.fill_rect_blended(rect, fill);
        self.stroke_rect(rect, border);
    }

    /// Dim everything with translucent black
    pub fn dim(&mut self, alpha: u8) {
        let rect = Rect::new(0.0, 0.0, self.width as f64, self.height as f64);
        self.fill_rect_blended(rect, (alpha as u32) << 24);
    }

    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u32 {
        if x < self.width && y < self.height {
            self.buffer[y * self.width + x]
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_is_clipped_to_frame() {
        let mut buffer = vec![0u32; 16];
        let mut frame = Frame::new(&mut buffer, 4, 4);
        frame.fill_rect(Rect::new(-2.0, 2.0, 10.0, 10.0), 0xFF00FF00);
        assert_eq!(frame.get_pixel(0, 1), 0);
        assert_eq!(frame.get_pixel(3, 3), 0xFF00FF00);
    }

    #[test]
    fn test_clip_rect_limits_drawing() {
        let mut buffer = vec![0u32; 16];
        let mut frame = Frame::new(&mut buffer, 4, 4);
        frame.set_clip(Rect::new(1.0, 1.0, 2.0, 2.0));
        frame.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), 0xFFFFFFFF);
        assert_eq!(frame.get_pixel(0, 0), 0);
        assert_eq!(frame.get_pixel(1, 1), 0xFFFFFFFF);
        assert_eq!(frame.get_pixel(3, 3), 0);
    }

    #[test]
    fn test_short_buffer_shrinks_height() {
        let mut buffer = vec![0u32; 10];
        let frame = Frame::new(&mut buffer, 4, 4);
        assert_eq!(frame.height(), 2);
    }

    #[test]
    fn test_blend_half() {
        assert_eq!(blend_colors(0xFF000000, 0xFFFFFFFF, 0.5), 0xFF7F7F7F);
    }
}
