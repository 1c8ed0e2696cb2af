//! Capnography (CO2) waveform synthesis
//! Location: src/synth/co2.rs

use super::noise::{finite_or, symmetric};
use crate::config::constants::{baseline, waveform};
use rand::Rng;

const INSPIRED_LEVEL: f32 = 15.0;
const LOGISTIC_STEEPNESS: f32 = 10.0;
const SAMPLE_NOISE: f32 = 0.4;
const BASELINE_NOISE: f32 = 0.75;

/// Noise-free CO2 value at a normalized phase of one breath
pub fn co2_shape(phase: f32, etco2: f32) -> f32 {
    if phase < 0.3 {
        // expiratory upstroke
        let x = phase / 0.3;
        INSPIRED_LEVEL + (etco2 - INSPIRED_LEVEL) / (1.0 + (-LOGISTIC_STEEPNESS * (x - 0.5)).exp())
    } else if phase < 0.4 {
        etco2 + (phase * 20.0).sin() * 0.8
    } else if phase < 0.5 {
        // inspiratory downstroke
        let x = (phase - 0.4) / 0.1;
        etco2 * (1.0 - x).max(0.0).sqrt()
    } else {
        INSPIRED_LEVEL + (phase * 15.0).sin() * 0.7
    }
}

/// Three respiratory cycles peaking at the end-tidal value
pub fn generate_co2<R: Rng + ?Sized>(etco2: f32, rng: &mut R) -> Vec<f32> {
    let etco2 = finite_or(etco2, baseline::ETCO2);
    let baseline_offset = symmetric(rng, BASELINE_NOISE);
    let cycle_length = waveform::CO2_LENGTH / waveform::CO2_BREATHS;
    let mut data = Vec::with_capacity(cycle_length * waveform::CO2_BREATHS);

    for _ in 0..waveform::CO2_BREATHS {
        for i in 0..cycle_length {
            let phase = i as f32 / cycle_length as f32;
            data.push(co2_shape(phase, etco2) + symmetric(rng, SAMPLE_NOISE) + baseline_offset);
        }
    }

    data
}
