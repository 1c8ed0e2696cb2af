//! Recorded cases: time-stamped scalar vitals loaded from JSON
//! Location: src/playback/case.rs

use crate::error::{Result, VitalsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Scalar parameters a recorded case can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VitalSignal {
    Hr,
    Spo2,
    Sbp,
    Dbp,
    Rr,
    Temp,
    Etco2,
    Bis,
    Pvi,
}

impl VitalSignal {
    pub const ALL: [VitalSignal; 9] = [
        VitalSignal::Hr,
        VitalSignal::Spo2,
        VitalSignal::Sbp,
        VitalSignal::Dbp,
        VitalSignal::Rr,
        VitalSignal::Temp,
        VitalSignal::Etco2,
        VitalSignal::Bis,
        VitalSignal::Pvi,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VitalSignal::Hr => "HR",
            VitalSignal::Spo2 => "SPO2",
            VitalSignal::Sbp => "SBP",
            VitalSignal::Dbp => "DBP",
            VitalSignal::Rr => "RR",
            VitalSignal::Temp => "TEMP",
            VitalSignal::Etco2 => "ETCO2",
            VitalSignal::Bis => "BIS",
            VitalSignal::Pvi => "PVI",
        }
    }

    /// Map a column or track name such as `HR` or `Solar8000/NIBP_SBP`
    pub fn from_track_name(name: &str) -> Option<Self> {
        let short = name.rsplit('/').next().unwrap_or(name).trim().to_ascii_uppercase();
        let signal = match short.as_str() {
            "HR" | "PLETH_HR" | "ECG_HR" => VitalSignal::Hr,
            "SPO2" | "PLETH_SPO2" => VitalSignal::Spo2,
            "SBP" | "NIBP_SBP" | "ART_SBP" => VitalSignal::Sbp,
            "DBP" | "NIBP_DBP" | "ART_DBP" => VitalSignal::Dbp,
            "RR" | "RR_CO2" | "VENT_RR" => VitalSignal::Rr,
            "TEMP" | "BT" => VitalSignal::Temp,
            "ETCO2" => VitalSignal::Etco2,
            "BIS" => VitalSignal::Bis,
            "PVI" => VitalSignal::Pvi,
            _ => return None,
        };
        Some(signal)
    }
}

impl fmt::Display for VitalSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive span of case time, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min: f64,
    pub max: f64,
}

impl TimeRange {
    pub fn clamp(&self, time: f64) -> f64 {
        time.max(self.min).min(self.max)
    }

    pub fn duration(&self) -> f64 {
        self.max - self.min
    }
}

/// One row of a recorded case
#[derive(Debug, Clone, PartialEq)]
pub struct CasePoint {
    pub time: f64,
    pub values: BTreeMap<VitalSignal, f32>,
}

impl CasePoint {
    pub fn value(&self, signal: VitalSignal) -> Option<f32> {
        self.values.get(&signal).copied()
    }
}

/// Row as served by the case data API: `time` plus one column per track
#[derive(Debug, Deserialize)]
struct RawPoint {
    time: f64,
    #[serde(flatten)]
    columns: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    start_time: Option<f64>,
    end_time: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCase {
    Response {
        data: Vec<RawPoint>,
        #[serde(default)]
        meta: RawMeta,
    },
    Rows(Vec<RawPoint>),
}

/// A recorded case ready for playback
///
/// Points are kept sorted by time. Columns that do not name a known
/// parameter, and null or non-numeric cells, are dropped on load.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCase {
    points: Vec<CasePoint>,
    range: TimeRange,
}

impl RecordedCase {
    /// Build from points in any order; the range defaults to the first and last times
    pub fn new(mut points: Vec<CasePoint>, range: Option<TimeRange>) -> Result<Self> {
        if points.is_empty() {
            return Err(VitalsError::invalid_case("recorded case has no samples"));
        }
        if let Some(bad) = points.iter().find(|p| !p.time.is_finite()) {
            return Err(VitalsError::invalid_case(format!("sample time {} is not finite", bad.time)));
        }
        points.sort_by(|a, b| a.time.total_cmp(&b.time));

        let recorded = TimeRange {
            min: points[0].time,
            max: points[points.len() - 1].time,
        };
        let range = match range {
            Some(r) if r.min.is_finite() && r.max.is_finite() && r.min <= r.max => r,
            Some(r) => {
                return Err(VitalsError::invalid_case(format!(
                    "time range [{}, {}] is not ordered",
                    r.min, r.max
                )))
            }
            None => recorded,
        };

        Ok(Self { points, range })
    }

    /// Parse either a bare row array or a `{ "data": [...], "meta": {...} }` response
    pub fn from_json(text: &str) -> Result<Self> {
        let (rows, meta) = match serde_json::from_str::<RawCase>(text)? {
            RawCase::Response { data, meta } => (data, meta),
            RawCase::Rows(rows) => (rows, RawMeta::default()),
        };

        let points = rows
            .into_iter()
            .map(|row| CasePoint {
                time: row.time,
                values: row
                    .columns
                    .iter()
                    .filter_map(|(name, cell)| {
                        let signal = VitalSignal::from_track_name(name)?;
                        let value = cell.as_f64().filter(|v| v.is_finite())?;
                        Some((signal, value as f32))
                    })
                    .collect(),
            })
            .collect();

        let range = match (meta.start_time, meta.end_time) {
            (Some(min), Some(max)) => Some(TimeRange { min, max }),
            _ => None,
        };
        Self::new(points, range)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn points(&self) -> &[CasePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn time_range(&self) -> TimeRange {
        self.range
    }

    /// Parameters present in at least one row
    pub fn signals(&self) -> Vec<VitalSignal> {
        VitalSignal::ALL
            .into_iter()
            .filter(|s| self.points.iter().any(|p| p.values.contains_key(s)))
            .collect()
    }

    /// Row whose time is closest to `time`; ties go to the earlier row
    pub fn nearest(&self, time: f64) -> &CasePoint {
        let idx = self.points.partition_point(|p| p.time < time);
        if idx == 0 {
            return &self.points[0];
        }
        if idx == self.points.len() {
            return &self.points[idx - 1];
        }
        let (before, after) = (&self.points[idx - 1], &self.points[idx]);
        if (after.time - time).abs() < (time - before.time).abs() {
            after
        } else {
            before
        }
    }

    /// Value of `signal` in the row nearest to `time`
    pub fn value_at(&self, signal: VitalSignal, time: f64) -> Option<f32> {
        self.nearest(time).value(signal)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn point(time: f64, hr: f32) -> CasePoint {
        CasePoint {
            time,
            values: BTreeMap::from([(VitalSignal::Hr, hr)]),
        }
    }

    #[test]
    fn test_nearest_point_lookup() {
        let case = RecordedCase::new(vec![point(10.0, 60.0), point(0.0, 50.0), point(20.0, 70.0)], None).unwrap();
        assert_eq!(case.time_range(), TimeRange { min: 0.0, max: 20.0 });

        assert_eq!(case.nearest(-5.0).time, 0.0);
        assert_eq!(case.nearest(4.9).time, 0.0);
        assert_eq!(case.nearest(5.1).time, 10.0);
        assert_eq!(case.nearest(16.0).time, 20.0);
        assert_eq!(case.nearest(99.0).time, 20.0);
        // Equidistant: the earlier row wins
        assert_eq!(case.nearest(15.0).time, 10.0);
        assert_eq!(case.value_at(VitalSignal::Hr, 12.0), Some(60.0));
        assert_eq!(case.value_at(VitalSignal::Spo2, 12.0), None);
    }

    #[test]
    fn test_parse_api_response() {
        let text = r#"{
            "data": [
                {"time": 2, "Solar8000/HR": 81, "Solar8000/PLETH_SPO2": 97, "BIS/BIS": null},
                {"time": 1, "Solar8000/HR": 80, "Solar8000/NIBP_SBP": 121, "Orchestra/PPF20_CE": 2.1}
            ],
            "meta": {"original_points": 2, "returned_points": 2, "start_time": 0, "end_time": 5}
        }"#;
        let case = RecordedCase::from_json(text).unwrap();
        assert_eq!(case.len(), 2);
        assert_eq!(case.points()[0].time, 1.0);
        assert_eq!(case.time_range(), TimeRange { min: 0.0, max: 5.0 });
        assert_eq!(case.signals(), vec![VitalSignal::Hr, VitalSignal::Spo2, VitalSignal::Sbp]);
        assert_eq!(case.points()[1].value(VitalSignal::Bis), None);
    }

    #[test]
    fn test_parse_bare_rows() {
        let case = RecordedCase::from_json(r#"[{"time": 0.5, "HR": 72, "BT": 36.8}]"#).unwrap();
        assert_eq!(case.time_range(), TimeRange { min: 0.5, max: 0.5 });
        assert_eq!(case.points()[0].value(VitalSignal::Temp), Some(36.8));
    }

    #[test]
    fn test_rejects_unusable_cases() {
        assert!(matches!(RecordedCase::from_json("[]"), Err(VitalsError::InvalidCase { .. })));
        assert!(matches!(RecordedCase::from_json("{\"rows\": 1}"), Err(VitalsError::Serialization(_))));
        let inverted = Some(TimeRange { min: 5.0, max: 1.0 });
        assert!(RecordedCase::new(vec![point(1.0, 60.0)], inverted).is_err());
    }

    #[test]
    fn test_track_name_aliases() {
        assert_eq!(VitalSignal::from_track_name("Solar8000/RR_CO2"), Some(VitalSignal::Rr));
        assert_eq!(VitalSignal::from_track_name("spo2"), Some(VitalSignal::Spo2));
        assert_eq!(VitalSignal::from_track_name("SNUADC/ECG_II"), None);
    }
}
