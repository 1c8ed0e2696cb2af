//! Weighted dispatch deciding which waveforms are re-synthesized per tick
//! Location: src/store/regeneration.rs

use crate::config::constants::regeneration;
use crate::synth::WaveformKind;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Independent per-tick regeneration probability for each waveform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenerationTable {
    pub ecg: f64,
    pub pleth: f64,
    pub eeg: f64,
    pub co2: f64,
    pub cvp: f64,
}

impl Default for RegenerationTable {
    fn default() -> Self {
        Self {
            ecg: regeneration::ECG_PROBABILITY,
            pleth: regeneration::PLETH_PROBABILITY,
            eeg: regeneration::EEG_PROBABILITY,
            co2: regeneration::CO2_PROBABILITY,
            cvp: regeneration::CVP_PROBABILITY,
        }
    }
}

impl RegenerationTable {
    /// Regenerate every waveform on every tick
    pub fn always() -> Self {
        Self::uniform(1.0)
    }

    /// Never regenerate; buffers stay as seeded
    pub fn never() -> Self {
        Self::uniform(0.0)
    }

    pub fn uniform(probability: f64) -> Self {
        Self {
            ecg: probability,
            pleth: probability,
            eeg: probability,
            co2: probability,
            cvp: probability,
        }
    }

    pub fn probability(&self, kind: WaveformKind) -> f64 {
        match kind {
            WaveformKind::Ecg => self.ecg,
            WaveformKind::Pleth => self.pleth,
            WaveformKind::Eeg => self.eeg,
            WaveformKind::Co2 => self.co2,
            WaveformKind::Cvp => self.cvp,
        }
    }

    /// Dispatch entries in draw order
    pub fn entries(&self) -> [(WaveformKind, f64); 5] {
        [
            (WaveformKind::Ecg, self.ecg),
            (WaveformKind::Pleth, self.pleth),
            (WaveformKind::Eeg, self.eeg),
            (WaveformKind::Co2, self.co2),
            (WaveformKind::Cvp, self.cvp),
        ]
    }

    /// Roll once per entry; returns the kinds that won their roll
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<WaveformKind> {
        self.entries()
            .into_iter()
            .filter(|(_, probability)| rng.gen::<f64>() < *probability)
            .map(|(kind, _)| kind)
            .collect()
    }

    /// Names of entries outside `[0, 1]`
    pub fn invalid_entries(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(_, p)| !(0.0..=1.0).contains(p))
            .map(|(kind, p)| format!("regeneration.{} = {} is not a probability", kind.label().to_lowercase(), p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_defaults_follow_constants() {
        let table = RegenerationTable::default();
        assert_eq!(table.probability(WaveformKind::Ecg), 0.20);
        assert_eq!(table.probability(WaveformKind::Cvp), 0.01);
        assert!(table.invalid_entries().is_empty());
    }

    #[test]
    fn test_extremes() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(RegenerationTable::always().draw(&mut rng), WaveformKind::DISPLAY_ORDER.to_vec());
        assert!(RegenerationTable::never().draw(&mut rng).is_empty());
    }

    #[test]
    fn test_empirical_rates_track_weights() {
        let table = RegenerationTable::default();
        let mut rng = StdRng::seed_from_u64(1234);
        let rounds = 20_000;
        let mut ecg = 0usize;
        let mut cvp = 0usize;
        for _ in 0..rounds {
            for kind in table.draw(&mut rng) {
                match kind {
                    WaveformKind::Ecg => ecg += 1,
                    WaveformKind::Cvp => cvp += 1,
                    _ => {}
                }
            }
        }
        let ecg_rate = ecg as f64 / rounds as f64;
        let cvp_rate = cvp as f64 / rounds as f64;
        assert!((ecg_rate - 0.20).abs() < 0.02, "ecg rate {}", ecg_rate);
        assert!((cvp_rate - 0.01).abs() < 0.005, "cvp rate {}", cvp_rate);
    }

    #[test]
    fn test_invalid_entries_reported() {
        let table = RegenerationTable {
            pleth: 1.5,
            co2: -0.1,
            ..Default::default()
        };
        let errors = table.invalid_entries();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("pleth"));
    }
}
