//! Character-cell surface for terminals
//! Location: src/render/text_canvas.rs
//!
//! One cell per surface unit. Dark fills become blanks and faint strokes
//! (the grid) are skipped so traces stay readable.

use super::framebuffer::raster_line;
use super::settings::Color;
use super::surface::{DrawSurface, Point, Rect};
use std::fmt::Write as _;

/// Strokes and fills at or below this luma are not drawn as glyphs
const FAINT_LUMA: u8 = 32;
const TRACE_GLYPH: char = '*';
const FILL_GLYPH: char = '#';

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::BLACK,
    };
}

#[derive(Debug, Clone)]
pub struct TextCanvas {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl TextCanvas {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols * rows],
        }
    }

    pub fn char_at(&self, col: usize, row: usize) -> Option<char> {
        self.cell(col, row).map(|c| c.ch)
    }

    pub fn color_at(&self, col: usize, row: usize) -> Option<Color> {
        self.cell(col, row).map(|c| c.color)
    }

    /// Row `row` as text, trailing blanks kept
    pub fn line(&self, row: usize) -> Option<String> {
        if row >= self.rows {
            return None;
        }
        Some(self.cells[row * self.cols..(row + 1) * self.cols].iter().map(|c| c.ch).collect())
    }

    pub fn render_plain(&self) -> String {
        (0..self.rows)
            .filter_map(|row| self.line(row))
            .map(|line| line.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text with 24-bit ANSI foreground colours
    pub fn render_ansi(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 2);
        for row in 0..self.rows {
            let mut current: Option<Color> = None;
            for cell in &self.cells[row * self.cols..(row + 1) * self.cols] {
                if cell.ch != ' ' && current != Some(cell.color) {
                    let _ = write!(out, "\x1b[38;2;{};{};{}m", cell.color.r, cell.color.g, cell.color.b);
                    current = Some(cell.color);
                }
                out.push(cell.ch);
            }
            out.push_str("\x1b[0m");
            if row + 1 < self.rows {
                out.push('\n');
            }
        }
        out
    }

    fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col < self.cols && row < self.rows {
            Some(&self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    fn put(&mut self, col: i64, row: i64, cell: Cell) {
        if col >= 0 && row >= 0 && (col as usize) < self.cols && (row as usize) < self.rows {
            self.cells[row as usize * self.cols + col as usize] = cell;
        }
    }
}

impl DrawSurface for TextCanvas {
    fn width(&self) -> usize {
        self.cols
    }

    fn height(&self) -> usize {
        self.rows
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let cell = if color.luma() <= FAINT_LUMA {
            Cell::BLANK
        } else {
            Cell { ch: FILL_GLYPH, color }
        };
        let rect = rect.normalized();
        let x0 = rect.x.max(0.0).floor() as i64;
        let x1 = rect.right().max(0.0).ceil() as i64;
        let y0 = rect.y.max(0.0).floor() as i64;
        let y1 = rect.bottom().max(0.0).ceil() as i64;
        for row in y0..y1 {
            for col in x0..x1 {
                self.put(col, row, cell);
            }
        }
    }

    fn stroke_lines(&mut self, segments: &[(Point, Point)], color: Color, _line_width: f32) {
        if color.luma() <= FAINT_LUMA {
            return;
        }
        let cell = Cell { ch: TRACE_GLYPH, color };
        for (a, b) in segments {
            let mut points = Vec::new();
            raster_line(
                a.x.floor() as i64,
                a.y.floor() as i64,
                b.x.floor() as i64,
                b.y.floor() as i64,
                |x, y| points.push((x, y)),
            );
            for (x, y) in points {
                self.put(x, y, cell);
            }
        }
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color) {
        let row = origin.y.floor() as i64;
        let col = origin.x.floor() as i64;
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i64, row, Cell { ch, color });
        }
    }
}
