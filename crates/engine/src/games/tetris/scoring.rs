//! Scoring module - classic line rewards and drop points

/// Base points by lines cleared at once (index = line count).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Line clear reward at `level` (0-based): base * (level + 1).
pub fn line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines > 4 {
        return 0;
    }
    LINE_SCORES[lines] * (level + 1)
}

/// Hard drop: `per_row` points for every row travelled.
pub fn hard_drop_score(rows: u32, per_row: u32) -> u32 {
    rows.saturating_mul(per_row)
}
