// src/config/mod.rs
//! Configuration for the store and the monitor renderer

pub mod constants;
pub mod loader;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};

use crate::render::settings::WaveformDisplaySettings;
use crate::store::RegenerationTable;
use crate::synth::WaveformKind;
use serde::{Deserialize, Serialize};

/// Complete configuration
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    pub store: StoreConfig,
    pub display: DisplayConfig,
    pub playback: PlaybackConfig,
}

/// Store timing, seeding and regeneration weights
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub tick_interval_ms: u64,

    /// Master seed; devices derive their own streams from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    pub event_capacity: usize,

    pub regeneration: RegenerationTable,
}

/// Recorded-case playback pacing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wall-clock time between steps
    pub step_interval_ms: u64,
    /// Case time advanced per step, in seconds
    pub step_seconds: f64,
    /// Case time to start from; the start of the recording when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<f64>,
}

/// Renderer geometry and per-waveform styling
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width of one strip, value panel included
    pub width: usize,
    /// Height of one strip
    pub height: usize,
    pub value_panel_width: usize,
    pub grid_rows: usize,
    pub grid_columns: usize,
    /// Scroll each strip by its `speed` instead of one sample per frame
    pub apply_speed: bool,
    pub waveforms: WaveformStyles,
}

/// Display settings for each waveform kind
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct WaveformStyles {
    pub ecg: WaveformDisplaySettings,
    pub pleth: WaveformDisplaySettings,
    pub eeg: WaveformDisplaySettings,
    pub co2: WaveformDisplaySettings,
    pub cvp: WaveformDisplaySettings,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: timing::DEFAULT_TICK_INTERVAL_MS,
            seed: None,
            event_capacity: timing::DEFAULT_EVENT_CAPACITY,
            regeneration: RegenerationTable::default(),
        }
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: playback::DEFAULT_STEP_INTERVAL_MS,
            step_seconds: playback::DEFAULT_STEP_SECONDS,
            start_at: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: display::DEFAULT_WIDTH,
            height: display::DEFAULT_HEIGHT,
            value_panel_width: display::VALUE_PANEL_WIDTH,
            grid_rows: display::GRID_ROWS,
            grid_columns: display::GRID_COLUMNS,
            apply_speed: false,
            waveforms: WaveformStyles::default(),
        }
    }
}

impl Default for WaveformStyles {
    fn default() -> Self {
        Self {
            ecg: WaveformDisplaySettings::for_kind(WaveformKind::Ecg),
            pleth: WaveformDisplaySettings::for_kind(WaveformKind::Pleth),
            eeg: WaveformDisplaySettings::for_kind(WaveformKind::Eeg),
            co2: WaveformDisplaySettings::for_kind(WaveformKind::Co2),
            cvp: WaveformDisplaySettings::for_kind(WaveformKind::Cvp),
        }
    }
}

impl WaveformStyles {
    pub fn get(&self, kind: WaveformKind) -> &WaveformDisplaySettings {
        match kind {
            WaveformKind::Ecg => &self.ecg,
            WaveformKind::Pleth => &self.pleth,
            WaveformKind::Eeg => &self.eeg,
            WaveformKind::Co2 => &self.co2,
            WaveformKind::Cvp => &self.cvp,
        }
    }
}

impl StoreConfig {
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = self.regeneration.invalid_entries();

        if !(timing::MIN_TICK_INTERVAL_MS..=timing::MAX_TICK_INTERVAL_MS).contains(&self.tick_interval_ms) {
            errors.push(format!(
                "store.tick_interval_ms = {} must be within [{}, {}]",
                self.tick_interval_ms,
                timing::MIN_TICK_INTERVAL_MS,
                timing::MAX_TICK_INTERVAL_MS
            ));
        }
        if self.event_capacity == 0 {
            errors.push("store.event_capacity must be greater than zero".to_string());
        }
        errors.extend(inverted_bounds(bounds::ALL));

        errors
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = self.validation_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

impl PlaybackConfig {
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(timing::MIN_TICK_INTERVAL_MS..=timing::MAX_TICK_INTERVAL_MS).contains(&self.step_interval_ms) {
            errors.push(format!(
                "playback.step_interval_ms = {} must be within [{}, {}]",
                self.step_interval_ms,
                timing::MIN_TICK_INTERVAL_MS,
                timing::MAX_TICK_INTERVAL_MS
            ));
        }
        if !(self.step_seconds.is_finite() && self.step_seconds > 0.0) {
            errors.push(format!("playback.step_seconds = {} must be positive", self.step_seconds));
        }
        if self.start_at.is_some_and(|t| !t.is_finite()) {
            errors.push("playback.start_at must be finite".to_string());
        }

        errors
    }

    pub fn step_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.step_interval_ms)
    }
}

/// Clamp ranges whose low end exceeds the high end
fn inverted_bounds(table: &[(&str, (f32, f32))]) -> Vec<String> {
    table
        .iter()
        .filter(|(_, (low, high))| !(low <= high))
        .map(|(name, (low, high))| format!("bounds.{}: low {} exceeds high {}", name, low, high))
        .collect()
}

impl DisplayConfig {
    /// Samples visible in one strip
    pub fn trace_width(&self) -> usize {
        self.width.saturating_sub(self.value_panel_width)
    }

    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.trace_width() < 2 {
            errors.push(format!(
                "display.width = {} leaves no room for a trace next to a {} wide value panel",
                self.width, self.value_panel_width
            ));
        }
        if self.height == 0 {
            errors.push("display.height must be greater than zero".to_string());
        }
        if self.grid_rows == 0 || self.grid_columns == 0 {
            errors.push("display grid divisions must be greater than zero".to_string());
        }
        for kind in WaveformKind::DISPLAY_ORDER {
            let settings = self.waveforms.get(kind);
            if settings.range.max <= settings.range.min {
                errors.push(format!(
                    "display.waveforms.{}: range max {} must exceed min {}",
                    kind.label().to_lowercase(),
                    settings.range.max,
                    settings.range.min
                ));
            }
            if !(settings.speed > 0.0 && settings.speed <= self.trace_width() as f32) {
                errors.push(format!(
                    "display.waveforms.{}: speed {} must be positive and at most the trace width {}",
                    kind.label().to_lowercase(),
                    settings.speed,
                    self.trace_width()
                ));
            }
        }

        errors
    }
}

impl MonitorConfig {
    /// Validate every section, collecting all problems
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = self.store.validation_errors();
        errors.extend(self.display.validation_errors());
        errors.extend(self.playback.validation_errors());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
