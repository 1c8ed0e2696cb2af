//! ECG waveform synthesis
//! Location: src/synth/ecg.rs
//!
//! Each cardiac cycle is split by normalized phase into P-wave, PR segment,
//! QRS complex, ST segment, T-wave and diastole. Shapes are closed-form; noise
//! is a single baseline offset per cycle.

use super::noise::{finite_or, symmetric};
use crate::config::constants::{baseline, waveform};
use rand::Rng;
use std::f32::consts::PI;

const ISOELECTRIC: f32 = 20.0;
const P_WAVE_HEIGHT: f32 = 8.0;
const Q_DEPTH: f32 = 15.0;
const R_HEIGHT: f32 = 60.0;
const S_DEPTH: f32 = 10.0;
const ST_LEVEL: f32 = 15.0;
const T_WAVE_HEIGHT: f32 = 12.0;
const BASELINE_NOISE: f32 = 1.0;

/// Samples per cardiac cycle for a heart rate; shorter cycles at higher rates
pub fn ecg_cycle_length(hr: f32) -> usize {
    let (min_rate, max_rate) = waveform::ECG_RATE_LIMITS;
    let hr = finite_or(hr, baseline::HR).clamp(min_rate, max_rate);
    let per_cycle = waveform::ECG_REFERENCE_LENGTH as f32 / waveform::ECG_CYCLES as f32;
    ((60.0 / hr * per_cycle).floor() as usize).max(1)
}

/// Noise-free ECG value at a normalized phase in `[0, 1)`
pub fn ecg_shape(phase: f32) -> f32 {
    if phase < 0.15 {
        ISOELECTRIC + (phase / 0.15 * PI).sin() * P_WAVE_HEIGHT
    } else if phase < 0.25 {
        ISOELECTRIC
    } else if phase < 0.35 {
        qrs_shape((phase - 0.25) / 0.1)
    } else if phase < 0.45 {
        ST_LEVEL
    } else if phase < 0.7 {
        let t = (phase - 0.45) / 0.25;
        ST_LEVEL + (t * PI).sin() * T_WAVE_HEIGHT
    } else {
        ISOELECTRIC
    }
}

fn qrs_shape(q: f32) -> f32 {
    let r_base = ISOELECTRIC - Q_DEPTH;
    if q < 0.25 {
        ISOELECTRIC - Q_DEPTH * (q / 0.25)
    } else if q < 0.4 {
        r_base + R_HEIGHT * ((q - 0.25) / 0.15)
    } else if q < 0.6 {
        r_base + R_HEIGHT - R_HEIGHT * ((q - 0.4) / 0.2)
    } else {
        r_base - S_DEPTH * (1.0 - (q - 0.6) / 0.4)
    }
}

/// Four concatenated cardiac cycles at `hr` beats per minute
pub fn generate_ecg<R: Rng + ?Sized>(hr: f32, rng: &mut R) -> Vec<f32> {
    let cycle_length = ecg_cycle_length(hr);
    let mut data = Vec::with_capacity(cycle_length * waveform::ECG_CYCLES);

    for _ in 0..waveform::ECG_CYCLES {
        let baseline_offset = symmetric(rng, BASELINE_NOISE);
        for i in 0..cycle_length {
            let phase = i as f32 / cycle_length as f32;
            data.push(ecg_shape(phase) + baseline_offset);
        }
    }

    data
}
