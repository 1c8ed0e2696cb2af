//! Per-device vital-sign snapshot and partial updates
//! Location: src/store/snapshot.rs

use crate::config::constants::bounds;
use crate::error::Result;
use crate::synth::{SynthesisInputs, Waveform, WaveformKind};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Key of one simulated monitor
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-invasive blood pressure, mmHg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nibp {
    pub systolic: f32,
    pub diastolic: f32,
    pub mean: f32,
}

impl Nibp {
    /// Mean arterial pressure estimated from systolic and diastolic
    pub fn estimated_mean(systolic: f32, diastolic: f32) -> f32 {
        ((systolic + 2.0 * diastolic) / 3.0).round()
    }
}

/// Everything the monitor shows for one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalSignsSnapshot {
    pub ecg: Waveform,
    pub pleth: Waveform,
    pub cvp: Waveform,
    pub co2: Waveform,
    pub eeg: Waveform,
    pub hr: f32,
    pub spo2: f32,
    pub nibp: Nibp,
    pub etco2: f32,
    pub temp: f32,
    pub rr: f32,
    pub bis: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pvi: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnt: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vnt_sub: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_rate: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_vol: Option<f32>,
}

fn clamp_scalar(value: f32, (low, high): (f32, f32)) -> f32 {
    if value.is_nan() {
        low
    } else {
        value.max(low).min(high)
    }
}

fn in_bounds(value: f32, (low, high): (f32, f32)) -> bool {
    (low..=high).contains(&value)
}

impl VitalSignsSnapshot {
    pub fn waveform(&self, kind: WaveformKind) -> &[f32] {
        match kind {
            WaveformKind::Ecg => &self.ecg,
            WaveformKind::Pleth => &self.pleth,
            WaveformKind::Eeg => &self.eeg,
            WaveformKind::Co2 => &self.co2,
            WaveformKind::Cvp => &self.cvp,
        }
    }

    pub fn waveform_mut(&mut self, kind: WaveformKind) -> &mut Waveform {
        match kind {
            WaveformKind::Ecg => &mut self.ecg,
            WaveformKind::Pleth => &mut self.pleth,
            WaveformKind::Eeg => &mut self.eeg,
            WaveformKind::Co2 => &mut self.co2,
            WaveformKind::Cvp => &mut self.cvp,
        }
    }

    /// Scalars the waveform generators read
    pub fn inputs(&self) -> SynthesisInputs {
        SynthesisInputs {
            hr: self.hr,
            spo2: self.spo2,
            bis: self.bis,
            etco2: self.etco2,
        }
    }

    /// Pull every scalar back inside its clinical bounds
    pub fn clamp_to_bounds(&mut self) {
        self.hr = clamp_scalar(self.hr, bounds::HR);
        self.spo2 = clamp_scalar(self.spo2, bounds::SPO2);
        self.nibp.systolic = clamp_scalar(self.nibp.systolic, bounds::SYSTOLIC);
        self.nibp.diastolic = clamp_scalar(self.nibp.diastolic, bounds::DIASTOLIC);
        self.etco2 = clamp_scalar(self.etco2, bounds::ETCO2);
        self.temp = clamp_scalar(self.temp, bounds::TEMP);
        self.rr = clamp_scalar(self.rr, bounds::RR);
        self.bis = clamp_scalar(self.bis, bounds::BIS);
        self.pvi = self.pvi.map(|pvi| clamp_scalar(pvi, bounds::PVI));
    }

    pub fn is_within_bounds(&self) -> bool {
        in_bounds(self.hr, bounds::HR)
            && in_bounds(self.spo2, bounds::SPO2)
            && in_bounds(self.nibp.systolic, bounds::SYSTOLIC)
            && in_bounds(self.nibp.diastolic, bounds::DIASTOLIC)
            && in_bounds(self.etco2, bounds::ETCO2)
            && in_bounds(self.temp, bounds::TEMP)
            && in_bounds(self.rr, bounds::RR)
            && in_bounds(self.bis, bounds::BIS)
            && self.pvi.map_or(true, |pvi| in_bounds(pvi, bounds::PVI))
    }

    pub fn has_waveforms(&self) -> bool {
        WaveformKind::DISPLAY_ORDER
            .iter()
            .all(|kind| !self.waveform(*kind).is_empty())
    }

    /// Shallow-merge a partial update, then re-clamp
    ///
    /// Empty waveform replacements and non-finite scalars are dropped so a
    /// registered device always keeps drawable buffers and valid numbers.
    pub fn apply(&mut self, update: VitalSignsUpdate) {
        fn merge_wave(target: &mut Waveform, value: Option<Waveform>) {
            if let Some(wave) = value.filter(|w| !w.is_empty()) {
                *target = wave;
            }
        }
        fn merge_scalar(target: &mut f32, value: Option<f32>) {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                *target = v;
            }
        }
        fn merge_optional(target: &mut Option<f32>, value: Option<f32>) {
            if let Some(v) = value.filter(|v| v.is_finite()) {
                *target = Some(v);
            }
        }

        merge_wave(&mut self.ecg, update.ecg);
        merge_wave(&mut self.pleth, update.pleth);
        merge_wave(&mut self.cvp, update.cvp);
        merge_wave(&mut self.co2, update.co2);
        merge_wave(&mut self.eeg, update.eeg);
        merge_scalar(&mut self.hr, update.hr);
        merge_scalar(&mut self.spo2, update.spo2);
        if let Some(nibp) = update.nibp {
            if nibp.systolic.is_finite() && nibp.diastolic.is_finite() && nibp.mean.is_finite() {
                self.nibp = nibp;
            }
        }
        merge_scalar(&mut self.etco2, update.etco2);
        merge_scalar(&mut self.temp, update.temp);
        merge_scalar(&mut self.rr, update.rr);
        merge_scalar(&mut self.bis, update.bis);
        merge_optional(&mut self.pvi, update.pvi);
        merge_optional(&mut self.vnt, update.vnt);
        merge_optional(&mut self.vnt_sub, update.vnt_sub);
        merge_optional(&mut self.flow_rate, update.flow_rate);
        merge_optional(&mut self.total_vol, update.total_vol);

        self.clamp_to_bounds();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Partial update merged into an existing snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalSignsUpdate {
    pub ecg: Option<Waveform>,
    pub pleth: Option<Waveform>,
    pub cvp: Option<Waveform>,
    pub co2: Option<Waveform>,
    pub eeg: Option<Waveform>,
    pub hr: Option<f32>,
    pub spo2: Option<f32>,
    pub nibp: Option<Nibp>,
    pub etco2: Option<f32>,
    pub temp: Option<f32>,
    pub rr: Option<f32>,
    pub bis: Option<f32>,
    pub pvi: Option<f32>,
    pub vnt: Option<f32>,
    pub vnt_sub: Option<f32>,
    pub flow_rate: Option<f32>,
    pub total_vol: Option<f32>,
}

impl VitalSignsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == VitalSignsUpdate::default()
    }
}
