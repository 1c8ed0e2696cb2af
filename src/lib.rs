//! Vitals-Core: simulated multi-parameter patient monitor
//!
//! This library synthesizes physiological waveforms and drives a bedside
//! monitor display from them. It features:
//!
//! - ECG, plethysmograph, EEG, capnography and CVP waveform synthesis
//! - A per-device vital-sign store evolved by background Tokio tickers
//! - Scrolling strip-chart rendering onto pluggable drawing surfaces
//! - Alarm classification of the displayed numerics
//! - Playback of recorded cases into the store
//! - Layered TOML and environment configuration
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitals_core::config::MonitorConfig;
//! use vitals_core::render::{FrameDriver, PatientMonitor, TextCanvas};
//! use vitals_core::store::VitalSignsStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MonitorConfig::default();
//!     let store = Arc::new(VitalSignsStore::new(config.store.clone())?);
//!     store.add_device("OR01")?;
//!
//!     let monitor = PatientMonitor::new("OR01", config.display.clone());
//!     let mut driver = FrameDriver::new(store.clone(), monitor, TextCanvas::new(80, 24));
//!
//!     // One frame per store tick
//!     for _ in 0..25 {
//!         driver.next_frame().await;
//!     }
//!     println!("{}", driver.surface().render_plain());
//!
//!     store.shutdown();
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod alarms;
pub mod config;
pub mod error;
pub mod playback;
pub mod render;
pub mod store;
pub mod synth;
pub mod utils;

// Re-export commonly used types for convenience
pub use alarms::{AlarmReport, AlarmStatus, AlarmThresholds};
pub use config::{ConfigLoader, DisplayConfig, MonitorConfig, PlaybackConfig, StoreConfig};
pub use error::{Result, VitalsError};
pub use playback::{CasePlayer, RecordedCase};
pub use render::{DrawSurface, FrameDriver, Framebuffer, PatientMonitor, StripChart, TextCanvas};
pub use store::{DeviceId, StoreEvent, VitalSignsSnapshot, VitalSignsStore, VitalSignsUpdate};
pub use synth::{Waveform, WaveformKind, WaveformSynthesizer};
pub use utils::time::TimeProvider;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Simulated patient monitor: waveform synthesis, vital-sign store and strip-chart rendering"
            .to_string(),
        features: vec![
            "Physiological waveform synthesis".to_string(),
            "Per-device vital-sign store with background tickers".to_string(),
            "Strip-chart monitor rendering".to_string(),
            "Alarm classification".to_string(),
            "Recorded-case playback".to_string(),
            "Layered configuration".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
