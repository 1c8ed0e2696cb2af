//! Scrolling strip chart for one waveform
//! Location: src/render/strip_chart.rs

use super::settings::{Color, WaveformDisplaySettings};
use super::surface::{DrawSurface, Point, Rect};
use crate::config::constants::display;
use crate::config::DisplayConfig;
use crate::synth::WaveformKind;
use std::collections::VecDeque;

/// Grid divisions drawn behind a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
}

impl From<&DisplayConfig> for Grid {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            rows: config.grid_rows,
            columns: config.grid_columns,
        }
    }
}

/// Rolling window over a waveform source
///
/// The window always holds exactly `width` samples. Each advance drops the
/// oldest sample and appends the next one from the source, wrapping around.
#[derive(Debug, Clone)]
pub struct StripChart {
    kind: WaveformKind,
    settings: WaveformDisplaySettings,
    buffer: VecDeque<f32>,
    cursor: usize,
    /// Fractional samples owed when speed is applied
    carry: f32,
}

impl StripChart {
    pub fn new(kind: WaveformKind, settings: WaveformDisplaySettings, width: usize) -> Self {
        let width = width.max(1);
        let fill = settings.range.midpoint();
        Self {
            kind,
            settings,
            buffer: std::iter::repeat(fill).take(width).collect(),
            cursor: 0,
            carry: 0.0,
        }
    }

    pub fn kind(&self) -> WaveformKind {
        self.kind
    }

    pub fn settings(&self) -> &WaveformDisplaySettings {
        &self.settings
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Oldest to newest
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.buffer.iter().copied()
    }

    pub fn latest(&self) -> Option<f32> {
        self.buffer.back().copied()
    }

    /// Scroll by one sample; an empty source leaves the window untouched
    pub fn advance(&mut self, source: &[f32]) -> bool {
        if source.is_empty() {
            return false;
        }
        let index = self.cursor % source.len();
        self.buffer.pop_front();
        self.buffer.push_back(source[index]);
        self.cursor = (index + 1) % source.len();
        true
    }

    /// Advance for one frame, returning the samples consumed
    ///
    /// Without speed a frame consumes one sample. With speed the per-kind
    /// `speed` accumulates and whole samples are consumed as they fall due.
    /// Samples that would scroll past the whole window in one frame are
    /// skipped, so at most `len()` are pushed.
    pub fn tick_frame(&mut self, source: &[f32], apply_speed: bool) -> usize {
        let mut steps = if apply_speed {
            self.carry += self.settings.speed.max(0.0);
            let whole = self.carry.floor();
            self.carry -= whole;
            whole as usize
        } else {
            1
        };
        let window = self.buffer.len().max(1);
        if steps > window && !source.is_empty() {
            let skipped = (steps - window) % source.len();
            self.cursor = (self.cursor % source.len() + skipped) % source.len();
            steps = window;
        }
        (0..steps).filter(|_| self.advance(source)).count()
    }

    /// Draw into `area`; returns the value panel rectangle on the right
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S, area: Rect, panel_width: f32, grid: Grid) -> Rect {
        let (trace, panel) = area.split_right(panel_width);

        surface.fill_rect(area, Color::BLACK);
        self.draw_grid(surface, trace, grid);
        surface.fill_rect(panel, Color::BLACK);

        let offset_x = (display::LABEL_OFFSET as f32).min(area.width * 0.01);
        let offset_y = (display::LABEL_OFFSET as f32).min(area.height * 0.05);
        surface.draw_text(
            Point::new(area.x + offset_x, area.y + offset_y),
            self.kind.label(),
            self.settings.color,
        );

        let points = self.trace_points(trace);
        surface.stroke_polyline(&points, self.settings.color, self.settings.line_width);
        panel
    }

    /// Sample positions in surface coordinates
    pub fn trace_points(&self, trace: Rect) -> Vec<Point> {
        let n = self.buffer.len().max(1) as f32;
        let margin = display::TRACE_MARGIN.min(trace.height * 0.1);
        let usable = trace.height - 2.0 * margin;
        self.buffer
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let norm = self.settings.range.normalize(value);
                Point::new(
                    trace.x + i as f32 * trace.width / n,
                    trace.y + trace.height - norm * usable - margin,
                )
            })
            .collect()
    }

    fn draw_grid<S: DrawSurface + ?Sized>(&self, surface: &mut S, trace: Rect, grid: Grid) {
        let columns = grid.columns.max(1);
        let rows = grid.rows.max(1);
        let mut lines = Vec::with_capacity(columns + rows + 2);
        for i in 0..=columns {
            let x = trace.x + i as f32 * trace.width / columns as f32;
            lines.push((Point::new(x, trace.y), Point::new(x, trace.bottom())));
        }
        for j in 0..=rows {
            let y = trace.y + j as f32 * trace.height / rows as f32;
            lines.push((Point::new(trace.x, y), Point::new(trace.right(), y)));
        }
        surface.stroke_lines(&lines, Color::GRID, 1.0);
    }
}
