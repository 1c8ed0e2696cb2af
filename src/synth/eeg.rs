//! EEG waveform synthesis driven by the bispectral index
//! Location: src/synth/eeg.rs
//!
//! Three sinusoids share a random start phase. Lower BIS (deeper anaesthesia)
//! slows the signal, raises its amplitude and shifts weight to the delta band.

use super::noise::{finite_or, symmetric};
use crate::config::constants::{baseline, waveform};
use rand::Rng;
use std::f32::consts::PI;

const CENTER: f32 = 50.0;
const SAMPLE_NOISE: f32 = 1.5;

/// Band weights and timing derived from a BIS value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EegBands {
    pub frequency: f32,
    pub amplitude: f32,
    pub beta_weight: f32,
    pub delta_weight: f32,
}

impl EegBands {
    pub fn from_bis(bis: f32) -> Self {
        let depth = finite_or(bis, baseline::BIS) / 100.0;
        Self {
            frequency: 2.0 + depth * 8.0,
            amplitude: 5.0 - depth * 2.0,
            beta_weight: depth,
            delta_weight: 1.0 - depth,
        }
    }

    /// Noise-free value at sample index `i` for a start phase
    pub fn value_at(&self, i: usize, phase: f32) -> f32 {
        let t = i as f32 * self.frequency;
        let alpha = (t * 0.05 + phase).sin() * self.amplitude;
        let beta = self.beta_weight * (t * 0.2 + phase).sin() * self.amplitude * 0.5;
        let delta = self.delta_weight * (t * 0.01 + phase).sin() * self.amplitude * 1.2;
        CENTER + alpha + beta + delta
    }
}

/// Fixed-length EEG trace for the given BIS
pub fn generate_eeg<R: Rng + ?Sized>(bis: f32, rng: &mut R) -> Vec<f32> {
    let bands = EegBands::from_bis(bis);
    let phase = rng.gen_range(0.0..2.0 * PI);

    (0..waveform::EEG_LENGTH)
        .map(|i| bands.value_at(i, phase) + symmetric(rng, SAMPLE_NOISE))
        .collect()
}
