//! Drawing surface abstraction the renderer targets
//! Location: src/render/surface.rs

use super::settings::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned region in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Same region with non-negative width and height
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 { (self.x + self.width, -self.width) } else { (self.x, self.width) };
        let (y, height) = if self.height < 0.0 { (self.y + self.height, -self.height) } else { (self.y, self.height) };
        Rect::new(x, y, width, height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Split off `width` from the right edge; returns (left, right)
    pub fn split_right(&self, width: f32) -> (Rect, Rect) {
        let width = width.clamp(0.0, self.width);
        (
            Rect::new(self.x, self.y, self.width - width, self.height),
            Rect::new(self.right() - width, self.y, width, self.height),
        )
    }
}

/// Minimal 2D drawing API, modelled on an HTML canvas context
pub trait DrawSurface {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Stroke independent segments
    fn stroke_lines(&mut self, segments: &[(Point, Point)], color: Color, line_width: f32);

    /// Top-left anchored text
    fn draw_text(&mut self, origin: Point, text: &str, color: Color);

    /// Stroke a connected path through `points`
    fn stroke_polyline(&mut self, points: &[Point], color: Color, line_width: f32) {
        let segments: Vec<(Point, Point)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        self.stroke_lines(&segments, color, line_width);
    }

    fn clear(&mut self, color: Color) {
        let full = Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32);
        self.fill_rect(full, color);
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width() as f32, self.height() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_right() {
        let (left, right) = Rect::new(0.0, 10.0, 800.0, 100.0).split_right(100.0);
        assert_eq!(left, Rect::new(0.0, 10.0, 700.0, 100.0));
        assert_eq!(right, Rect::new(700.0, 10.0, 100.0, 100.0));

        let (left, right) = Rect::new(0.0, 0.0, 50.0, 10.0).split_right(100.0);
        assert_eq!(left.width, 0.0);
        assert_eq!(right.width, 50.0);
    }

    #[test]
    fn test_normalized_flips_negative_extent() {
        let rect = Rect::new(10.0, 8.0, -5.0, -3.0).normalized();
        assert_eq!(rect, Rect::new(5.0, 5.0, 5.0, 3.0));
        let plain = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(plain.normalized(), plain);
    }
}
