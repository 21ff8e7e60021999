//! Collision tester - axis-aligned overlap over integer cells.
//!
//! Positions and sizes are floored to whole cells before comparison, so two
//! rectangles collide exactly when they share at least one grid cell.

use crate::finite_or_zero;

/// Axis-aligned rectangle in cell units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Floored cell span `(x0, y0, x1, y1)`, half-open on the far edges.
    fn cells(&self) -> (i64, i64, i64, i64) {
        let x = finite_or_zero(self.x).floor() as i64;
        let y = finite_or_zero(self.y).floor() as i64;
        let w = finite_or_zero(self.width).floor().max(0.0) as i64;
        let h = finite_or_zero(self.height).floor().max(0.0) as i64;
        (x, y, x + w, y + h)
    }

    /// Whether the rectangle covers at least one cell.
    pub fn has_area(&self) -> bool {
        let (x0, y0, x1, y1) = self.cells();
        x1 > x0 && y1 > y0
    }
}

/// True iff `a` and `b` share at least one cell.
///
/// Symmetric, and zero-area rectangles never overlap anything (themselves included).
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    let (ax0, ay0, ax1, ay1) = a.cells();
    let (bx0, by0, bx1, by1) = b.cells();
    if ax1 <= ax0 || ay1 <= ay0 || bx1 <= bx0 || by1 <= by0 {
        return false;
    }
    ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1
}
