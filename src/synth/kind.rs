//! Waveform kinds shown on the monitor
//! Location: src/synth/kind.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One synthesized physiological waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WaveformKind {
    Ecg,
    Pleth,
    Eeg,
    Co2,
    Cvp,
}

impl WaveformKind {
    /// Top-to-bottom order of the monitor strips
    pub const DISPLAY_ORDER: [WaveformKind; 5] = [
        WaveformKind::Ecg,
        WaveformKind::Pleth,
        WaveformKind::Eeg,
        WaveformKind::Co2,
        WaveformKind::Cvp,
    ];

    /// Label drawn in the strip's top-left corner
    pub fn label(self) -> &'static str {
        match self {
            WaveformKind::Ecg => "ECG",
            WaveformKind::Pleth => "PLETH",
            WaveformKind::Eeg => "EEG",
            WaveformKind::Co2 => "CO2",
            WaveformKind::Cvp => "CVP",
        }
    }

    /// Name of the numeric shown in the strip's value panel
    pub fn value_label(self) -> &'static str {
        match self {
            WaveformKind::Ecg => "HR",
            WaveformKind::Pleth => "SPO2",
            WaveformKind::Eeg => "BIS",
            WaveformKind::Co2 => "ETCO2",
            WaveformKind::Cvp => "CVP1",
        }
    }
}

impl fmt::Display for WaveformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown waveform label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown waveform '{0}'")]
pub struct UnknownWaveform(pub String);

impl FromStr for WaveformKind {
    type Err = UnknownWaveform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WaveformKind::DISPLAY_ORDER
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownWaveform(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_from_str() {
        for kind in WaveformKind::DISPLAY_ORDER {
            assert_eq!(kind.label().parse::<WaveformKind>().unwrap(), kind);
        }
        assert_eq!("pleth".parse::<WaveformKind>().unwrap(), WaveformKind::Pleth);
        assert!("SPO2".parse::<WaveformKind>().is_err());
    }

    #[test]
    fn test_value_mapping() {
        assert_eq!(WaveformKind::Ecg.value_label(), "HR");
        assert_eq!(WaveformKind::Cvp.value_label(), "CVP1");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&WaveformKind::Co2).unwrap();
        assert_eq!(json, "\"CO2\"");
    }
}
