//! In-memory RGB raster implementing [`DrawSurface`]
//! Location: src/render/framebuffer.rs

use super::settings::Color;
use super::surface::{DrawSurface, Point, Rect};
use std::io::{self, Write};

/// Text recorded on a raster; glyphs are not rasterized
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub origin: Point,
    pub text: String,
    pub color: Color,
}

/// Bresenham walk from `(x0, y0)` to `(x1, y1)`, inclusive
pub(crate) fn raster_line(x0: i64, y0: i64, x1: i64, y1: i64, mut plot: impl FnMut(i64, i64)) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;

    loop {
        plot(x, y);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Row-major RGB framebuffer
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    text_runs: Vec<TextRun>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BLACK; width * height],
            text_runs: Vec::new(),
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    pub fn count_color(&self, color: Color) -> usize {
        self.pixels.iter().filter(|p| **p == color).count()
    }

    /// Count `color` inside a region
    pub fn count_color_in(&self, rect: Rect, color: Color) -> usize {
        let (x0, x1) = self.span(rect.x, rect.right(), self.width);
        let (y0, y1) = self.span(rect.y, rect.bottom(), self.height);
        (y0..y1)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|(x, y)| self.pixels[y * self.width + x] == color)
            .count()
    }

    /// Binary PPM (P6) dump
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let bytes: Vec<u8> = self.pixels.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
        out.write_all(&bytes)?;
        out.flush()
    }

    fn span(&self, start: f32, end: f32, limit: usize) -> (usize, usize) {
        let start = start.max(0.0).floor() as usize;
        let end = end.max(0.0).ceil() as usize;
        (start.min(limit), end.min(limit))
    }

    fn plot(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = color;
        }
    }
}

impl DrawSurface for Framebuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rect = rect.normalized();
        let (x0, x1) = self.span(rect.x, rect.right(), self.width);
        let (y0, y1) = self.span(rect.y, rect.bottom(), self.height);
        for y in y0..y1 {
            self.pixels[y * self.width + x0..y * self.width + x1].fill(color);
        }
        // Filling over text erases it, as on a canvas.
        self.text_runs.retain(|run| {
            !(run.origin.x >= rect.x
                && run.origin.x < rect.right()
                && run.origin.y >= rect.y
                && run.origin.y < rect.bottom())
        });
    }

    fn stroke_lines(&mut self, segments: &[(Point, Point)], color: Color, line_width: f32) {
        let thickness = line_width.round().max(1.0) as i64;
        let lift = (thickness - 1) / 2;
        for (a, b) in segments {
            let (x0, y0) = (a.x.round() as i64, a.y.round() as i64);
            let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);
            let mut points = Vec::new();
            raster_line(x0, y0, x1, y1, |x, y| points.push((x, y)));
            for (x, y) in points {
                for dy in 0..thickness {
                    self.plot(x, y - lift + dy, color);
                }
            }
        }
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color) {
        self.text_runs.push(TextRun {
            origin,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = Framebuffer::new(10, 5);
        fb.fill_rect(Rect::new(-3.0, 2.0, 100.0, 100.0), Color::WHITE);
        assert_eq!(fb.count_color(Color::WHITE), 30);
        assert_eq!(fb.pixel(0, 1), Some(Color::BLACK));
        assert_eq!(fb.pixel(9, 4), Some(Color::WHITE));
        assert_eq!(fb.pixel(10, 0), None);
    }

    #[test]
    fn test_fill_rect_with_negative_extent() {
        let mut fb = Framebuffer::new(20, 10);
        fb.fill_rect(Rect::new(10.0, 0.0, -5.0, 5.0), Color::WHITE);
        assert_eq!(fb.count_color(Color::WHITE), 25);
        assert_eq!(fb.pixel(5, 0), Some(Color::WHITE));
        assert_eq!(fb.pixel(10, 0), Some(Color::BLACK));

        fb.fill_rect(Rect::new(-30.0, 40.0, -5.0, -5.0), Color::RED);
        assert_eq!(fb.count_color(Color::RED), 0);
    }

    #[test]
    fn test_line_endpoints_are_plotted() {
        let mut fb = Framebuffer::new(20, 20);
        fb.stroke_polyline(
            &[Point::new(1.0, 1.0), Point::new(15.0, 9.0), Point::new(3.0, 18.0)],
            Color::GREEN,
            1.0,
        );
        assert_eq!(fb.pixel(1, 1), Some(Color::GREEN));
        assert_eq!(fb.pixel(15, 9), Some(Color::GREEN));
        assert_eq!(fb.pixel(3, 18), Some(Color::GREEN));
    }

    #[test]
    fn test_thick_lines_cover_more() {
        let mut thin = Framebuffer::new(30, 30);
        let mut thick = Framebuffer::new(30, 30);
        let seg = [(Point::new(0.0, 15.0), Point::new(29.0, 15.0))];
        thin.stroke_lines(&seg, Color::GREEN, 1.0);
        thick.stroke_lines(&seg, Color::GREEN, 3.0);
        assert_eq!(thin.count_color(Color::GREEN), 30);
        assert_eq!(thick.count_color(Color::GREEN), 90);
    }

    #[test]
    fn test_fill_erases_text() {
        let mut fb = Framebuffer::new(40, 10);
        fb.draw_text(Point::new(5.0, 5.0), "ECG", Color::GREEN);
        assert_eq!(fb.text_runs().len(), 1);
        fb.clear(Color::BLACK);
        assert!(fb.text_runs().is_empty());
    }

    #[test]
    fn test_ppm_header_and_size() {
        let fb = Framebuffer::new(4, 3);
        let mut out = Vec::new();
        fb.write_ppm(&mut out).unwrap();
        let header = b"P6\n4 3\n255\n";
        assert!(out.starts_with(header));
        assert_eq!(out.len(), header.len() + 4 * 3 * 3);
    }
}
