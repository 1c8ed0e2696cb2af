//! Steps through a recorded case and feeds it into the store
//! Location: src/playback/player.rs

use super::case::{RecordedCase, TimeRange, VitalSignal};
use crate::config::PlaybackConfig;
use crate::store::{DeviceId, Nibp, VitalSignsStore, VitalSignsUpdate};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Why a playback run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every position reached the end of the case
    EndOfRange,
    /// The target device left the store
    DeviceRemoved,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSummary {
    pub steps: u64,
    pub position: f64,
    pub reason: StopReason,
}

/// Playback cursor over one recorded case for one device
///
/// A shared position drives every parameter; individual parameters can be
/// seeked to their own position, which then advances alongside it.
#[derive(Debug, Clone)]
pub struct CasePlayer {
    case: Arc<RecordedCase>,
    device_id: DeviceId,
    position: f64,
    signal_positions: BTreeMap<VitalSignal, f64>,
    step_seconds: f64,
    step_interval: Duration,
    steps: u64,
}

impl CasePlayer {
    pub fn new(case: Arc<RecordedCase>, device_id: impl Into<DeviceId>, config: &PlaybackConfig) -> Self {
        let range = case.time_range();
        let position = range.clamp(config.start_at.unwrap_or(range.min));
        Self {
            case,
            device_id: device_id.into(),
            position,
            signal_positions: BTreeMap::new(),
            step_seconds: config.step_seconds,
            step_interval: config.step_interval(),
            steps: 0,
        }
    }

    pub fn case(&self) -> &RecordedCase {
        &self.case
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn time_range(&self) -> TimeRange {
        self.case.time_range()
    }

    /// Position used for `signal`
    pub fn position_for(&self, signal: VitalSignal) -> f64 {
        self.signal_positions.get(&signal).copied().unwrap_or(self.position)
    }

    /// Move the shared position, clamped to the case
    pub fn seek(&mut self, time: f64) {
        self.position = self.time_range().clamp(time);
    }

    /// Give `signal` its own position
    pub fn seek_signal(&mut self, signal: VitalSignal, time: f64) {
        let time = self.time_range().clamp(time);
        self.signal_positions.insert(signal, time);
    }

    /// Return `signal` to the shared position
    pub fn release_signal(&mut self, signal: VitalSignal) {
        self.signal_positions.remove(&signal);
    }

    pub fn is_finished(&self) -> bool {
        let end = self.time_range().max;
        self.position >= end && self.signal_positions.values().all(|&t| t >= end)
    }

    /// Advance every position by one step; `false` once all sat at the end
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let range = self.time_range();
        self.position = range.clamp(self.position + self.step_seconds);
        for time in self.signal_positions.values_mut() {
            *time = range.clamp(*time + self.step_seconds);
        }
        self.steps += 1;
        true
    }

    fn value(&self, signal: VitalSignal) -> Option<f32> {
        self.case.value_at(signal, self.position_for(signal))
    }

    /// Update carrying the recorded values at the current positions
    ///
    /// Blood pressure is only emitted when both halves are known; a missing
    /// half is taken from `current`.
    pub fn update(&self, current: Option<&Nibp>) -> VitalSignsUpdate {
        let systolic = self.value(VitalSignal::Sbp).or(current.map(|n| n.systolic));
        let diastolic = self.value(VitalSignal::Dbp).or(current.map(|n| n.diastolic));
        let recorded_bp = self.value(VitalSignal::Sbp).is_some() || self.value(VitalSignal::Dbp).is_some();
        let nibp = match (systolic, diastolic) {
            (Some(systolic), Some(diastolic)) if recorded_bp => Some(Nibp {
                systolic,
                diastolic,
                mean: Nibp::estimated_mean(systolic, diastolic),
            }),
            _ => None,
        };

        VitalSignsUpdate {
            hr: self.value(VitalSignal::Hr),
            spo2: self.value(VitalSignal::Spo2),
            nibp,
            rr: self.value(VitalSignal::Rr),
            temp: self.value(VitalSignal::Temp),
            etco2: self.value(VitalSignal::Etco2),
            bis: self.value(VitalSignal::Bis),
            pvi: self.value(VitalSignal::Pvi),
            ..Default::default()
        }
    }

    /// Push the current values into `store`; `false` if the device is gone
    pub fn apply(&self, store: &VitalSignsStore) -> bool {
        let current = store.with_snapshot(self.device_id.as_str(), |s| s.nibp);
        let Some(current) = current else {
            return false;
        };
        store.update_vital_signs(self.device_id.as_str(), self.update(Some(&current)))
    }

    /// Apply, then step and apply once per interval until the case ends
    pub async fn run(mut self, store: Arc<VitalSignsStore>) -> PlaybackSummary {
        let range = self.time_range();
        info!(
            device = %self.device_id,
            start = self.position,
            end = range.max,
            interval_ms = self.step_interval.as_millis() as u64,
            "playback started"
        );

        let mut ticker = interval_at(Instant::now() + self.step_interval, self.step_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let reason = if !self.apply(&store) {
            StopReason::DeviceRemoved
        } else {
            loop {
                ticker.tick().await;
                if !self.step() {
                    break StopReason::EndOfRange;
                }
                debug!(device = %self.device_id, position = self.position, "playback step");
                if !self.apply(&store) {
                    break StopReason::DeviceRemoved;
                }
            }
        };

        info!(device = %self.device_id, steps = self.steps, position = self.position, ?reason, "playback stopped");
        PlaybackSummary {
            steps: self.steps,
            position: self.position,
            reason,
        }
    }
}
