// src/alarms.rs
//! Alarm classification of vital-sign scalars
//!
//! A value is critical at or beyond a critical limit, a warning at or beyond a
//! warning limit, and normal otherwise.

use crate::config::constants::alarms;
use crate::render::settings::Color;
use crate::store::VitalSignsSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    Normal,
    Warning,
    Critical,
}

impl AlarmStatus {
    /// Colour used for a numeric in this state, `None` keeps the parameter colour
    pub fn color(self) -> Option<Color> {
        match self {
            AlarmStatus::Normal => None,
            AlarmStatus::Warning => Some(Color::ALARM_WARNING),
            AlarmStatus::Critical => Some(Color::ALARM_CRITICAL),
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlarmStatus::Normal => "normal",
            AlarmStatus::Warning => "warning",
            AlarmStatus::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Parameters that carry alarm limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlarmParameter {
    Hr,
    Spo2,
    Temp,
    /// Systolic pressure
    Bp,
    Rr,
}

impl AlarmParameter {
    pub const ALL: [AlarmParameter; 5] = [
        AlarmParameter::Hr,
        AlarmParameter::Spo2,
        AlarmParameter::Temp,
        AlarmParameter::Bp,
        AlarmParameter::Rr,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AlarmParameter::Hr => "HR",
            AlarmParameter::Spo2 => "SPO2",
            AlarmParameter::Temp => "TEMP",
            AlarmParameter::Bp => "BP",
            AlarmParameter::Rr => "RR",
        }
    }

    fn read(self, snapshot: &VitalSignsSnapshot) -> f32 {
        match self {
            AlarmParameter::Hr => snapshot.hr,
            AlarmParameter::Spo2 => snapshot.spo2,
            AlarmParameter::Temp => snapshot.temp,
            AlarmParameter::Bp => snapshot.nibp.systolic,
            AlarmParameter::Rr => snapshot.rr,
        }
    }
}

/// Critical and warning limits, each `(low, high)` inclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlarmBand {
    pub critical: (f32, f32),
    pub warning: (f32, f32),
}

impl AlarmBand {
    pub const fn new(critical: (f32, f32), warning: (f32, f32)) -> Self {
        Self { critical, warning }
    }

    pub fn classify(&self, value: f32) -> AlarmStatus {
        if value.is_nan() || value <= self.critical.0 || value >= self.critical.1 {
            AlarmStatus::Critical
        } else if value <= self.warning.0 || value >= self.warning.1 {
            AlarmStatus::Warning
        } else {
            AlarmStatus::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmThresholds {
    pub hr: AlarmBand,
    pub spo2: AlarmBand,
    pub temp: AlarmBand,
    pub bp: AlarmBand,
    pub rr: AlarmBand,
}

impl Default for AlarmThresholds {
    fn default() -> Self {
        Self {
            hr: AlarmBand::new(alarms::HR_CRITICAL, alarms::HR_WARNING),
            spo2: AlarmBand::new(alarms::SPO2_CRITICAL, alarms::SPO2_WARNING),
            temp: AlarmBand::new(alarms::TEMP_CRITICAL, alarms::TEMP_WARNING),
            bp: AlarmBand::new(alarms::BP_CRITICAL, alarms::BP_WARNING),
            rr: AlarmBand::new(alarms::RR_CRITICAL, alarms::RR_WARNING),
        }
    }
}

impl AlarmThresholds {
    pub fn band(&self, parameter: AlarmParameter) -> &AlarmBand {
        match parameter {
            AlarmParameter::Hr => &self.hr,
            AlarmParameter::Spo2 => &self.spo2,
            AlarmParameter::Temp => &self.temp,
            AlarmParameter::Bp => &self.bp,
            AlarmParameter::Rr => &self.rr,
        }
    }

    pub fn evaluate(&self, snapshot: &VitalSignsSnapshot) -> AlarmReport {
        let entries = AlarmParameter::ALL
            .iter()
            .map(|&parameter| {
                let value = parameter.read(snapshot);
                AlarmEntry {
                    parameter,
                    value,
                    status: self.band(parameter).classify(value),
                }
            })
            .collect();
        AlarmReport { entries }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlarmEntry {
    pub parameter: AlarmParameter,
    pub value: f32,
    pub status: AlarmStatus,
}

/// Status of every alarmed parameter for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmReport {
    pub entries: Vec<AlarmEntry>,
}

impl AlarmReport {
    pub fn status(&self, parameter: AlarmParameter) -> AlarmStatus {
        self.entries
            .iter()
            .find(|e| e.parameter == parameter)
            .map(|e| e.status)
            .unwrap_or(AlarmStatus::Normal)
    }

    /// Most severe status in the report
    pub fn worst(&self) -> AlarmStatus {
        self.entries
            .iter()
            .map(|e| e.status)
            .max()
            .unwrap_or(AlarmStatus::Normal)
    }

    /// Entries that are not normal
    pub fn active(&self) -> impl Iterator<Item = &AlarmEntry> {
        self.entries.iter().filter(|e| e.status != AlarmStatus::Normal)
    }
}

/// Classify a snapshot against the default bands
pub fn evaluate(snapshot: &VitalSignsSnapshot) -> AlarmReport {
    AlarmThresholds::default().evaluate(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::snapshot::tests::sample_snapshot;

    #[test]
    fn test_band_edges() {
        let hr = AlarmThresholds::default().hr;
        assert_eq!(hr.classify(40.0), AlarmStatus::Critical);
        assert_eq!(hr.classify(45.0), AlarmStatus::Warning);
        assert_eq!(hr.classify(50.0), AlarmStatus::Warning);
        assert_eq!(hr.classify(72.0), AlarmStatus::Normal);
        assert_eq!(hr.classify(120.0), AlarmStatus::Warning);
        assert_eq!(hr.classify(150.0), AlarmStatus::Critical);
        assert_eq!(hr.classify(f32::NAN), AlarmStatus::Critical);
    }

    #[test]
    fn test_spo2_has_no_high_alarm() {
        let spo2 = AlarmThresholds::default().spo2;
        assert_eq!(spo2.classify(100.0), AlarmStatus::Normal);
        assert_eq!(spo2.classify(95.0), AlarmStatus::Warning);
        assert_eq!(spo2.classify(90.0), AlarmStatus::Critical);
    }

    #[test]
    fn test_quiet_snapshot_is_normal() {
        let mut snap = sample_snapshot();
        snap.rr = 14.0;
        let report = evaluate(&snap);
        assert_eq!(report.entries.len(), 5);
        assert_eq!(report.worst(), AlarmStatus::Normal);
        assert_eq!(report.active().count(), 0);
    }

    #[test]
    fn test_default_respiratory_rate_warns() {
        // The seeded RR of 10 sits under the 12 bpm warning limit.
        let report = evaluate(&sample_snapshot());
        assert_eq!(report.status(AlarmParameter::Rr), AlarmStatus::Warning);
        assert_eq!(report.worst(), AlarmStatus::Warning);
    }

    #[test]
    fn test_report_picks_worst() {
        let mut snap = sample_snapshot();
        snap.rr = 22.0;
        snap.nibp.systolic = 170.0;
        let report = evaluate(&snap);
        assert_eq!(report.status(AlarmParameter::Rr), AlarmStatus::Warning);
        assert_eq!(report.status(AlarmParameter::Bp), AlarmStatus::Critical);
        assert_eq!(report.worst(), AlarmStatus::Critical);
        assert_eq!(report.active().count(), 2);
        assert_eq!(AlarmStatus::Critical.color(), Some(Color::ALARM_CRITICAL));
    }
}
