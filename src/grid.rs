//! Grid geometry: row/column indices to canvas pixels.
//!
//! Every entity derives its on-screen position from these functions, so the
//! constants here are the single source of truth for the board layout.

// ── Board layout ──────────────────────────────────────────────────────────────

pub const ROWS: usize = 6;
pub const COLS: usize = 5;

pub const X_START: f32 = 0.0;
pub const X_OFFSET: f32 = 101.0;
/// Sprites sit slightly above their tile so the character's feet land on it.
pub const Y_START: f32 = 45.0;
pub const Y_OFFSET: f32 = 83.0;

pub const CANVAS_WIDTH: f32 = 505.0;
pub const CANVAS_HEIGHT: f32 = 606.0;

/// Hazards only ever travel in these lanes (inclusive).
pub const HAZARD_ROWS: (usize, usize) = (1, 3);
/// Bonus items only ever spawn in these rows (inclusive).
pub const BONUS_ROWS: (usize, usize) = (1, 2);

// ── Conversions ───────────────────────────────────────────────────────────────

pub fn row_to_y(row: usize) -> f32 {
    Y_START + row as f32 * Y_OFFSET
}

pub fn col_to_x(col: usize) -> f32 {
    X_START + col as f32 * X_OFFSET
}

/// Bottom row; where the player starts and respawns.
pub const fn start_row() -> usize {
    ROWS - 1
}

pub const fn start_col() -> usize {
    COLS / 2
}

/// One column-width past the last column.  A hazard beyond this has left the
/// board.
pub fn right_bound() -> f32 {
    col_to_x(COLS - 1) + X_OFFSET
}

/// Recycled hazards re-enter one column-width left of the board.
pub fn hazard_spawn_x() -> f32 {
    X_START - X_OFFSET
}
