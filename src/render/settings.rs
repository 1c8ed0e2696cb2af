//! Colours and per-waveform display settings
//! Location: src/render/settings.rs

use crate::synth::WaveformKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque RGB colour, written as `#RRGGBB` in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(156, 163, 175);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const DEEP_SKY_BLUE: Color = Color::rgb(0, 191, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const ORANGE: Color = Color::rgb(255, 165, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const KHAKI: Color = Color::rgb(240, 230, 140);
    pub const ALARM_CRITICAL: Color = Color::rgb(239, 68, 68);
    pub const ALARM_WARNING: Color = Color::rgb(245, 158, 11);
    /// rgba(50, 50, 50, 0.3) over black
    pub const GRID: Color = Color::rgb(15, 15, 15);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness in `[0, 255]`
    pub fn luma(self) -> u8 {
        let y = 0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32;
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Error for colour strings that are not `#RRGGBB`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid colour '{0}', expected #RRGGBB")]
pub struct InvalidColor(pub String);

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value.strip_prefix('#').unwrap_or(&value);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(InvalidColor(value));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Color::rgb(r, g, b)),
            _ => Err(InvalidColor(value)),
        }
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Value range mapped onto the strip height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataRange {
    pub min: f32,
    pub max: f32,
}

impl DataRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> f32 {
        (self.min + self.max) / 2.0
    }

    /// Position of `value` in the range, 0 at `min` and 1 at `max`
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        (value - self.min) / span
    }
}

/// How one waveform strip is drawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformDisplaySettings {
    pub line_width: f32,
    /// Source samples consumed per frame when speed is applied
    pub speed: f32,
    pub color: Color,
    pub range: DataRange,
}

impl Default for WaveformDisplaySettings {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            speed: 1.0,
            color: Color::GREEN,
            range: DataRange::new(0.0, 100.0),
        }
    }
}

impl WaveformDisplaySettings {
    pub fn for_kind(kind: WaveformKind) -> Self {
        match kind {
            WaveformKind::Ecg => Self {
                line_width: 2.0,
                speed: 1.5,
                color: Color::GREEN,
                range: DataRange::new(-20.0, 70.0),
            },
            WaveformKind::Pleth => Self {
                line_width: 2.0,
                speed: 1.0,
                color: Color::DEEP_SKY_BLUE,
                range: DataRange::new(0.0, 100.0),
            },
            WaveformKind::Eeg => Self {
                line_width: 1.5,
                speed: 1.0,
                color: Color::MAGENTA,
                range: DataRange::new(35.0, 65.0),
            },
            WaveformKind::Co2 => Self {
                line_width: 2.2,
                speed: 0.8,
                color: Color::YELLOW,
                range: DataRange::new(0.0, 50.0),
            },
            WaveformKind::Cvp => Self {
                line_width: 2.0,
                speed: 1.0,
                color: Color::ORANGE,
                range: DataRange::new(0.0, 30.0),
            },
        }
    }
}
