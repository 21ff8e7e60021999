//! Grid module - glyph cell buffer and sprite stencils
//!
//! A `CharGrid` is a fixed `width x height` buffer of characters stored row-major
//! in a flat vector (same layout as the tetris board). Sprites are blitted with
//! their top-left corner at `floor(x), floor(y)` and clipped silently at the edges.
//! Coordinates: (x, y) where x grows to the right and y grows downward.

use crate::finite_or_zero;

/// The blank cell every grid starts with.
pub const BLANK: char = ' ';

/// An immutable rectangular glyph stencil.
///
/// Rows are ASCII strings of equal length; a space is transparent when blitted.
/// Rectangularity is checked at construction, so a malformed `const` pattern
/// fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpritePattern {
    rows: &'static [&'static str],
    width: usize,
}

impl SpritePattern {
    pub const fn new(rows: &'static [&'static str]) -> Self {
        let width = if rows.is_empty() { 0 } else { rows[0].len() };
        let mut i = 0;
        while i < rows.len() {
            let bytes = rows[i].as_bytes();
            assert!(bytes.len() == width, "sprite rows must have equal width");
            let mut j = 0;
            while j < bytes.len() {
                assert!(bytes[j].is_ascii(), "sprite rows must be ascii");
                j += 1;
            }
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

    /// Glyph at (x, y) inside the pattern, `None` for transparent or outside.
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        let b = *self.rows.get(y)?.as_bytes().get(x)?;
        if b == b' ' {
            None
        } else {
            Some(b as char)
        }
    }
}

/// Fixed-size 2D glyph buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<char>,
}

impl CharGrid {
    /// Create a `height x width` buffer filled with [`BLANK`].
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize) * self.width + (x as usize))
    }

    pub fn get(&self, x: usize, y: usize) -> Option<char> {
        self.index(x as i64, y as i64).map(|i| self.cells[i])
    }

    /// Reset every cell to [`BLANK`] without reallocating.
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Write one cell at the floored position; off-grid writes are dropped.
    pub fn draw_char(&mut self, ch: char, x: f32, y: f32) {
        let (x, y) = floor_pos(x, y);
        if let Some(i) = self.index(x, y) {
            self.cells[i] = ch;
        }
    }

    /// Blit `pattern` with its top-left at the floored position.
    pub fn draw_sprite(&mut self, pattern: &SpritePattern, x: f32, y: f32) {
        let (ox, oy) = floor_pos(x, y);
        for py in 0..pattern.height() {
            for px in 0..pattern.width() {
                let Some(ch) = pattern.glyph(px, py) else {
                    continue;
                };
                if let Some(i) = self.index(ox + px as i64, oy + py as i64) {
                    self.cells[i] = ch;
                }
            }
        }
    }

    /// Write a string left to right, clipping at the edges.
    pub fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        let (ox, oy) = floor_pos(x, y);
        for (dx, ch) in text.chars().enumerate() {
            if let Some(i) = self.index(ox + dx as i64, oy) {
                self.cells[i] = ch;
            }
        }
    }

    /// One row of the buffer.
    pub fn row(&self, y: usize) -> Option<&[char]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Concatenate rows (separated by `\n`) into `out`, reusing its allocation.
    pub fn render_into(&self, out: &mut String) {
        out.clear();
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            if let Some(row) = self.row(y) {
                out.extend(row.iter());
            }
        }
    }

    /// Concatenate rows into one frame string.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        self.render_into(&mut out);
        out
    }
}

#[inline]
fn floor_pos(x: f32, y: f32) -> (i64, i64) {
    (
        finite_or_zero(x).floor() as i64,
        finite_or_zero(y).floor() as i64,
    )
}
