// src/config/constants.rs
//! System-wide configuration constants
//!
//! Every tunable number the simulator and renderer rely on lives here so the
//! rest of the crate stays free of magic numbers.

/// Store timing constants
pub mod timing {
    /// Interval between store ticks for one device
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 40;
    pub const MIN_TICK_INTERVAL_MS: u64 = 1;
    pub const MAX_TICK_INTERVAL_MS: u64 = 10_000;

    /// Capacity of the store event broadcast channel
    pub const DEFAULT_EVENT_CAPACITY: usize = 256;
}

/// Recorded-case playback timing
pub mod playback {
    /// Wall-clock interval between playback steps
    pub const DEFAULT_STEP_INTERVAL_MS: u64 = 200;
    /// Case time advanced per step, in seconds
    pub const DEFAULT_STEP_SECONDS: f64 = 1.0;
}

/// Base vital values and the integer jitter applied when a device is seeded
pub mod baseline {
    pub const HR: f32 = 70.0;
    pub const SPO2: f32 = 98.0;
    pub const MAP: f32 = 82.0;
    pub const SYSTOLIC: f32 = 114.0;
    pub const DIASTOLIC: f32 = 61.0;
    pub const RR: f32 = 10.0;
    pub const ETCO2: f32 = 32.0;
    pub const TEMP: f32 = 37.1;
    pub const BIS: f32 = 61.0;
    pub const PVI: f32 = 15.0;

    pub const VNT: f32 = 382.0;
    pub const VNT_SUB: f32 = 12.0;
    pub const FLOW_RATE: f32 = 4.0;
    pub const TOTAL_VOL: f32 = 2623.0;

    // Seed jitter: base + floor(U * SPAN) - SPAN / 2
    pub const HR_SPAN: i32 = 20;
    pub const SPO2_SPAN: i32 = 4;
    pub const MAP_SPAN: i32 = 10;
    pub const SYSTOLIC_SPAN: i32 = 20;
    pub const DIASTOLIC_SPAN: i32 = 10;
    pub const RR_SPAN: i32 = 4;
    pub const ETCO2_SPAN: i32 = 6;
    pub const BIS_SPAN: i32 = 10;
    pub const PVI_SPAN: i32 = 6;
    pub const TEMP_HALF_SPAN: f32 = 0.3;
}

/// Per-tick percentage jitter for each scalar
pub mod variation {
    pub const HR_PCT: f32 = 1.0;
    pub const SPO2_PCT: f32 = 0.5;
    pub const SYSTOLIC_PCT: f32 = 1.0;
    pub const DIASTOLIC_PCT: f32 = 1.0;
    pub const RR_PCT: f32 = 2.0;
    pub const ETCO2_PCT: f32 = 2.0;
    pub const TEMP_PCT: f32 = 0.1;
    pub const BIS_PCT: f32 = 1.0;
    pub const PVI_PCT: f32 = 2.0;
}

/// Per-tick probabilities of regenerating each waveform buffer
pub mod regeneration {
    pub const ECG_PROBABILITY: f64 = 0.20;
    pub const PLETH_PROBABILITY: f64 = 0.10;
    pub const EEG_PROBABILITY: f64 = 0.05;
    pub const CO2_PROBABILITY: f64 = 0.02;
    pub const CVP_PROBABILITY: f64 = 0.01;
}

/// Clinical clamp bounds, inclusive
pub mod bounds {
    pub const HR: (f32, f32) = (20.0, 250.0);
    pub const SPO2: (f32, f32) = (90.0, 100.0);
    pub const SYSTOLIC: (f32, f32) = (40.0, 260.0);
    pub const DIASTOLIC: (f32, f32) = (20.0, 180.0);
    pub const RR: (f32, f32) = (0.0, 60.0);
    pub const ETCO2: (f32, f32) = (0.0, 100.0);
    pub const TEMP: (f32, f32) = (30.0, 43.0);
    pub const BIS: (f32, f32) = (0.0, 100.0);
    pub const PVI: (f32, f32) = (0.0, 100.0);

    pub const ALL: &[(&str, (f32, f32))] = &[
        ("hr", HR),
        ("spo2", SPO2),
        ("systolic", SYSTOLIC),
        ("diastolic", DIASTOLIC),
        ("rr", RR),
        ("etco2", ETCO2),
        ("temp", TEMP),
        ("bis", BIS),
        ("pvi", PVI),
    ];
}

/// Waveform synthesis geometry
pub mod waveform {
    pub const ECG_REFERENCE_LENGTH: usize = 250;
    pub const ECG_CYCLES: usize = 4;
    /// Heart rate range used for the ECG cycle length computation
    pub const ECG_RATE_LIMITS: (f32, f32) = (20.0, 300.0);

    pub const PLETH_CYCLES: usize = 4;
    pub const PLETH_CYCLE_LENGTH: usize = 50;

    pub const EEG_LENGTH: usize = 300;

    pub const CVP_CYCLES: usize = 4;
    pub const CVP_CYCLE_LENGTH: usize = 50;

    pub const CO2_LENGTH: usize = 200;
    pub const CO2_BREATHS: usize = 3;

    /// Envelope every synthesized sample stays inside
    pub const SAMPLE_ENVELOPE: (f32, f32) = (-50.0, 100.0);
}

/// Renderer geometry
pub mod display {
    pub const DEFAULT_WIDTH: usize = 800;
    pub const DEFAULT_HEIGHT: usize = 100;
    pub const VALUE_PANEL_WIDTH: usize = 100;
    pub const GRID_ROWS: usize = 8;
    pub const GRID_COLUMNS: usize = 16;
    /// Vertical margin kept free above and below the trace
    pub const TRACE_MARGIN: f32 = 10.0;
    pub const LABEL_OFFSET: usize = 5;
}

/// Alarm bands (low, high) borrowed from bedside defaults
pub mod alarms {
    pub const HR_CRITICAL: (f32, f32) = (40.0, 150.0);
    pub const HR_WARNING: (f32, f32) = (50.0, 120.0);
    pub const SPO2_CRITICAL: (f32, f32) = (90.0, 101.0);
    pub const SPO2_WARNING: (f32, f32) = (95.0, 101.0);
    pub const TEMP_CRITICAL: (f32, f32) = (35.0, 39.0);
    pub const TEMP_WARNING: (f32, f32) = (36.0, 38.0);
    pub const BP_CRITICAL: (f32, f32) = (80.0, 160.0);
    pub const BP_WARNING: (f32, f32) = (90.0, 140.0);
    pub const RR_CRITICAL: (f32, f32) = (8.0, 25.0);
    pub const RR_WARNING: (f32, f32) = (12.0, 20.0);
}

/// Configuration file discovery
pub mod paths {
    pub const DEFAULT_CONFIG_FILE: &str = "vitals.toml";
    pub const ENV_PREFIX: &str = "VITALS";
    pub const ENV_SEPARATOR: &str = "__";
}
