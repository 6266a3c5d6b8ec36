//! Terminal rendering — all crossterm I/O lives here.
//!
//! Canvas pixels are projected onto character cells: ten cells per grid
//! column and four per grid row.  Anything that falls outside the canvas or
//! the terminal is clipped, which is how hazards slide in from off-board.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color, Print},
    terminal, QueueableCommand,
};

use super::{Rect, Sprite, Surface};
use crate::error::GameResult;
use crate::grid::{CANVAS_HEIGHT, CANVAS_WIDTH, X_OFFSET, Y_OFFSET};

pub const CELLS_PER_COL: f32 = 10.0;
pub const CELLS_PER_ROW: f32 = 4.0;

/// Terminal size needed to show the whole canvas.
pub fn canvas_cells() -> (u16, u16) {
    (
        (CANVAS_WIDTH * CELLS_PER_COL / X_OFFSET).ceil() as u16,
        (CANVAS_HEIGHT * CELLS_PER_ROW / Y_OFFSET).ceil() as u16,
    )
}

/// Map a canvas pixel to the cell containing it.  May be negative.
pub fn to_cell(x: f32, y: f32) -> (i32, i32) {
    // Multiply first so grid-aligned pixels land exactly on cell edges
    (
        (x * CELLS_PER_COL / X_OFFSET).floor() as i32,
        (y * CELLS_PER_ROW / Y_OFFSET).floor() as i32,
    )
}

pub struct TerminalSurface<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    fill: Color,
    bold: bool,
}

impl<W: Write> TerminalSurface<W> {
    /// `term_cols`/`term_rows` is the real terminal size; drawing is clipped
    /// to whichever is smaller, the terminal or the canvas.
    pub fn new(out: W, term_cols: u16, term_rows: u16) -> Self {
        let (canvas_cols, canvas_rows) = canvas_cells();
        TerminalSurface {
            out,
            cols: term_cols.min(canvas_cols),
            rows: term_rows.min(canvas_rows),
            fill: Color::White,
            bold: false,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && col < self.cols as i32 && row < self.rows as i32
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn begin_frame(&mut self) -> GameResult<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn end_frame(&mut self) -> GameResult<()> {
        // Park cursor below the board and flush
        self.out.queue(style::SetAttribute(Attribute::Reset))?;
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.rows))?;
        self.out.flush()?;
        Ok(())
    }

    /// Glyph sprites are stored pre-cropped, so `src` is not consulted.
    fn draw_image(&mut self, sprite: &Sprite, _src: Rect, dest: Rect) -> GameResult<()> {
        let (left, top) = to_cell(dest.x, dest.y);
        self.out.queue(style::SetForegroundColor(sprite.color))?;

        for (dy, line) in sprite.glyphs.iter().enumerate() {
            let row = top + dy as i32;
            for (dx, ch) in line.chars().enumerate() {
                let col = left + dx as i32;
                if ch == ' ' || !self.in_bounds(col, row) {
                    continue;
                }
                self.out.queue(cursor::MoveTo(col as u16, row as u16))?;
                self.out.queue(Print(ch))?;
            }
        }
        Ok(())
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn fill_color(&self) -> Color {
        self.fill
    }

    /// Terminals have one glyph size; only the weight is honoured.
    fn set_font(&mut self, font: &str) {
        self.bold = font.split_whitespace().any(|part| part == "bold");
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> GameResult<()> {
        let (left, row) = to_cell(x, y);
        if row < 0 || row >= self.rows as i32 {
            return Ok(());
        }

        // Clip on both sides of the canvas
        let skip = (-left).max(0) as usize;
        let start = left.max(0);
        let room = (self.cols as i32 - start).max(0) as usize;
        let visible: String = text.chars().skip(skip).take(room).collect();
        if visible.is_empty() {
            return Ok(());
        }

        self.out.queue(cursor::MoveTo(start as u16, row as u16))?;
        self.out.queue(style::SetForegroundColor(self.fill))?;
        if self.bold {
            self.out.queue(style::SetAttribute(Attribute::Bold))?;
        }
        self.out.queue(Print(visible))?;
        if self.bold {
            self.out.queue(style::SetAttribute(Attribute::NormalIntensity))?;
        }
        Ok(())
    }
}
