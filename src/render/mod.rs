// src/render/mod.rs
//! Monitor rendering
//!
//! Strip charts scroll a rolling window of each waveform across a
//! [`DrawSurface`]. [`PatientMonitor`] lays the strips out with their numerics
//! and [`FrameDriver`] redraws it on every store tick.

pub mod driver;
pub mod framebuffer;
pub mod monitor;
pub mod settings;
pub mod strip_chart;
pub mod surface;
pub mod text_canvas;

pub use driver::FrameDriver;
pub use framebuffer::{Framebuffer, TextRun};
pub use monitor::{MonitorLayout, MonitorReadout, PatientMonitor, Reading, ReadingSize};
pub use settings::{Color, DataRange, WaveformDisplaySettings};
pub use strip_chart::{Grid, StripChart};
pub use surface::{DrawSurface, Point, Rect};
pub use text_canvas::TextCanvas;
