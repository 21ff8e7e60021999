//! Pixel canvas - persistent off-screen buffer for pixel-mode games.
//!
//! The canvas is allocated once per game instance and redrawn every frame.
//! Drawing happens in *logical cells*; each cell covers `cell_size x cell_size`
//! pixels, so a game can trade cell granularity for pattern richness without
//! changing its own coordinates.

use crate::finite_or_zero;
use crate::types::Rgb;

/// Immutable 0/1 stencil.
///
/// Rectangularity is checked at construction, so a malformed `const` pattern
/// fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelPattern {
    rows: &'static [&'static [u8]],
    width: usize,
}

impl PixelPattern {
    pub const fn new(rows: &'static [&'static [u8]]) -> Self {
        let width = if rows.is_empty() { 0 } else { rows[0].len() };
        let mut i = 0;
        while i < rows.len() {
            assert!(rows[i].len() == width, "pattern rows must have equal width");
            i += 1;
        }
        Self { rows, width }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .is_some_and(|&v| v != 0)
    }
}

/// Persistent pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    cols: usize,
    rows: usize,
    cell_size: usize,
    width_px: usize,
    height_px: usize,
    pixels: Vec<Option<Rgb>>,
}

impl PixelCanvas {
    /// Create a canvas of `cols x rows` logical cells at `cell_size` pixels per cell.
    pub fn new(cols: usize, rows: usize, cell_size: usize) -> Self {
        let cell_size = cell_size.max(1);
        let width_px = cols * cell_size;
        let height_px = rows * cell_size;
        Self {
            cols,
            rows,
            cell_size,
            width_px,
            height_px,
            pixels: vec![None; width_px * height_px],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    pub fn width_px(&self) -> usize {
        self.width_px
    }

    pub fn height_px(&self) -> usize {
        self.height_px
    }

    /// Pixel color (`None` = background).
    pub fn pixel(&self, px: usize, py: usize) -> Option<Rgb> {
        if px >= self.width_px || py >= self.height_px {
            return None;
        }
        self.pixels[py * self.width_px + px]
    }

    /// Clear every pixel to background.
    pub fn clear(&mut self) {
        self.pixels.fill(None);
    }

    fn set_cell_i(&mut self, cx: i64, cy: i64, color: Option<Rgb>) {
        if cx < 0 || cy < 0 || cx >= self.cols as i64 || cy >= self.rows as i64 {
            return;
        }
        let px0 = cx as usize * self.cell_size;
        let py0 = cy as usize * self.cell_size;
        for py in py0..py0 + self.cell_size {
            let start = py * self.width_px + px0;
            self.pixels[start..start + self.cell_size].fill(color);
        }
    }

    /// Fill one logical cell at the floored position.
    pub fn fill_cell(&mut self, x: f32, y: f32, color: Rgb) {
        let (cx, cy) = floor_pos(x, y);
        self.set_cell_i(cx, cy, Some(color));
    }

    /// Fill a rectangle of logical cells.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: usize, h: usize, color: Rgb) {
        let (cx, cy) = floor_pos(x, y);
        for dy in 0..h as i64 {
            for dx in 0..w as i64 {
                self.set_cell_i(cx + dx, cy + dy, Some(color));
            }
        }
    }

    /// Blit a 0/1 pattern with its top-left at the floored position.
    pub fn draw_pattern(&mut self, pattern: &PixelPattern, x: f32, y: f32, color: Rgb) {
        let (cx, cy) = floor_pos(x, y);
        for py in 0..pattern.height() {
            for px in 0..pattern.width() {
                if pattern.is_set(px, py) {
                    self.set_cell_i(cx + px as i64, cy + py as i64, Some(color));
                }
            }
        }
    }
}

#[inline]
fn floor_pos(x: f32, y: f32) -> (i64, i64) {
    (
        finite_or_zero(x).floor() as i64,
        finite_or_zero(y).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const DOT: PixelPattern = PixelPattern::new(&[&[0, 1], &[1, 0]]);

    #[test]
    fn cell_size_scales_pixels() {
        let mut c = PixelCanvas::new(3, 2, 2);
        assert_eq!((c.width_px(), c.height_px()), (6, 4));

        c.fill_cell(1.0, 1.0, RED);
        assert_eq!(c.pixel(2, 2), Some(RED));
        assert_eq!(c.pixel(3, 3), Some(RED));
        assert_eq!(c.pixel(1, 2), None);
        assert_eq!(c.pixel(4, 2), None);
    }

    #[test]
    fn pattern_blits_only_set_bits() {
        let mut c = PixelCanvas::new(4, 4, 1);
        c.draw_pattern(&DOT, 1.5, 1.2, RED);
        assert_eq!(c.pixel(1, 1), None);
        assert_eq!(c.pixel(2, 1), Some(RED));
        assert_eq!(c.pixel(1, 2), Some(RED));
    }

    #[test]
    fn drawing_clips_silently() {
        let mut c = PixelCanvas::new(2, 2, 1);
        c.draw_pattern(&DOT, -1.0, -1.0, RED);
        c.fill_rect(1.0, 1.0, 10, 10, RED);
        c.fill_cell(f32::NAN, 99.0, RED);
        assert_eq!(c.pixel(1, 1), Some(RED));
        assert_eq!(c.pixel(0, 0), None);
        assert_eq!(c.pixel(1, 0), None);
    }

    #[test]
    fn clear_keeps_dimensions() {
        let mut c = PixelCanvas::new(5, 3, 2);
        c.fill_rect(0.0, 0.0, 5, 3, RED);
        c.clear();
        assert_eq!((c.cols(), c.rows()), (5, 3));
        assert!((0..c.height_px()).all(|y| (0..c.width_px()).all(|x| c.pixel(x, y).is_none())));
    }
}
