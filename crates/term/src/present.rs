//! Surface presenters: copy a game surface into the framebuffer.
//!
//! Glyph surfaces map one character to one cell. Pixel surfaces pack two pixel
//! rows into each terminal row with the upper half block: the foreground is
//! the top pixel and the background the bottom one.

use crate::core::{CharGrid, PixelCanvas, BLANK};
use crate::engine::Surface;
use crate::fb::{CellStyle, FrameBuffer};
use crate::types::Rgb;

const UPPER_HALF: char = '▀';
const LOWER_HALF: char = '▄';

pub fn present_surface(fb: &mut FrameBuffer, surface: &Surface, x: u16, y: u16, style: CellStyle) {
    match surface {
        Surface::Glyph(grid) => present_glyphs(fb, grid, x, y, style),
        Surface::Pixel(canvas) => present_pixels(fb, canvas, x, y, style.bg),
    }
}

/// Blanks keep the background of `style`; everything else is drawn in its foreground.
pub fn present_glyphs(fb: &mut FrameBuffer, grid: &CharGrid, x: u16, y: u16, style: CellStyle) {
    for gy in 0..grid.height() {
        let Some(row) = grid.row(gy) else {
            continue;
        };
        let ty = y.saturating_add(gy as u16);
        for (gx, &ch) in row.iter().enumerate() {
            let tx = x.saturating_add(gx as u16);
            let style = if ch == BLANK { style.dim() } else { style };
            fb.put_char(tx, ty, ch, style);
        }
    }
}

pub fn present_pixels(fb: &mut FrameBuffer, canvas: &PixelCanvas, x: u16, y: u16, bg: Rgb) {
    let rows = canvas.height_px().div_ceil(2);
    for ty in 0..rows {
        for px in 0..canvas.width_px() {
            let top = canvas.pixel(px, ty * 2);
            let bottom = canvas.pixel(px, ty * 2 + 1);
            let (ch, style) = match (top, bottom) {
                (None, None) => (' ', CellStyle::new(bg, bg)),
                (Some(t), None) => (UPPER_HALF, CellStyle::new(t, bg)),
                (None, Some(b)) => (LOWER_HALF, CellStyle::new(b, bg)),
                (Some(t), Some(b)) => (UPPER_HALF, CellStyle::new(t, b)),
            };
            fb.put_char(
                x.saturating_add(px as u16),
                y.saturating_add(ty as u16),
                ch,
                style,
            );
        }
    }
}
