//! Plethysmograph (pulse oximetry) waveform synthesis
//! Location: src/synth/pleth.rs

use super::noise::{finite_or, symmetric};
use crate::config::constants::{baseline, waveform};
use rand::Rng;
use std::f32::consts::PI;

const BASE_LEVEL: f32 = 20.0;
const SYSTOLIC_RISE_END: f32 = 0.15;
const NOTCH_WIDTH: f32 = 0.08;
const SAMPLE_NOISE: f32 = 0.35;
const BASELINE_NOISE: f32 = 1.0;

/// Pulse amplitude; grows with saturation and saturates at 100 %
pub fn pleth_amplitude(spo2: f32) -> f32 {
    let spo2 = finite_or(spo2, baseline::SPO2);
    (spo2 / 100.0).min(1.0) * 40.0 + 3.0
}

/// Phase at which the dicrotic notch starts; later as saturation drops
pub fn dicrotic_notch_position(spo2: f32) -> f32 {
    let spo2 = finite_or(spo2, baseline::SPO2);
    // Keep the notch after the systolic rise and before the cycle end.
    (0.35 + (100.0 - spo2) / 100.0 * 0.2).clamp(SYSTOLIC_RISE_END + 0.01, 0.9)
}

/// Noise-free pulse value above the base level at a normalized phase
pub fn pleth_shape(phase: f32, amplitude: f32, notch: f32) -> f32 {
    if phase < SYSTOLIC_RISE_END {
        (phase / SYSTOLIC_RISE_END).powf(1.8) * amplitude
    } else if phase < notch {
        let fall = (phase - SYSTOLIC_RISE_END) / (notch - SYSTOLIC_RISE_END);
        amplitude - amplitude * 0.7 * fall.powf(0.8)
    } else if phase < notch + NOTCH_WIDTH {
        let n = (phase - notch) / NOTCH_WIDTH;
        amplitude * 0.3 + amplitude * 0.12 * (1.0 - (n * PI).sin().powi(2))
    } else {
        let diastole = (phase - (notch + NOTCH_WIDTH)) / (1.0 - (notch + NOTCH_WIDTH));
        amplitude * 0.3 * (1.0 - diastole).max(0.0).powf(1.2)
    }
}

/// Four pulse cycles for the given saturation
pub fn generate_pleth<R: Rng + ?Sized>(spo2: f32, rng: &mut R) -> Vec<f32> {
    let amplitude = pleth_amplitude(spo2);
    let notch = dicrotic_notch_position(spo2);
    let baseline_offset = symmetric(rng, BASELINE_NOISE);

    let cycle_length = waveform::PLETH_CYCLE_LENGTH;
    let mut data = Vec::with_capacity(cycle_length * waveform::PLETH_CYCLES);

    for _ in 0..waveform::PLETH_CYCLES {
        for i in 0..cycle_length {
            let phase = i as f32 / cycle_length as f32;
            let noise = symmetric(rng, SAMPLE_NOISE);
            data.push(BASE_LEVEL + pleth_shape(phase, amplitude, notch) + noise + baseline_offset);
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_amplitude_monotonic_over_physiological_range() {
        let mut last = pleth_amplitude(90.0);
        for step in 1..=100 {
            let spo2 = 90.0 + step as f32 * 0.1;
            let amp = pleth_amplitude(spo2);
            assert!(amp >= last, "amplitude dropped at spo2={}", spo2);
            last = amp;
        }
        assert!((pleth_amplitude(100.0) - 43.0).abs() < 1.0e-4);
        assert_eq!(pleth_amplitude(110.0), pleth_amplitude(100.0));
    }

    #[test]
    fn test_notch_moves_later_as_saturation_drops() {
        assert!(dicrotic_notch_position(90.0) > dicrotic_notch_position(100.0));
        assert!((dicrotic_notch_position(100.0) - 0.35).abs() < 1.0e-6);
    }

    #[test]
    fn test_peak_at_end_of_rise() {
        let amp = pleth_amplitude(98.0);
        let notch = dicrotic_notch_position(98.0);
        let peak = pleth_shape(SYSTOLIC_RISE_END, amp, notch);
        assert!((peak - amp).abs() < 1.0e-4);
        assert!(pleth_shape(0.0, amp, notch).abs() < 1.0e-6);
    }

    #[test]
    fn test_generate_fixed_length() {
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(generate_pleth(98.0, &mut rng).len(), 200);
        assert_eq!(generate_pleth(-400.0, &mut rng).len(), 200);
    }

    #[test]
    fn test_generated_swing_grows_with_saturation() {
        let mut rng = StdRng::seed_from_u64(5);
        let swing = |data: Vec<f32>| {
            let max = data.iter().cloned().fold(f32::MIN, f32::max);
            let min = data.iter().cloned().fold(f32::MAX, f32::min);
            max - min
        };
        let low = swing(generate_pleth(90.0, &mut rng));
        let high = swing(generate_pleth(100.0, &mut rng));
        assert!(high > low);
    }

    #[test]
    fn test_out_of_domain_input_stays_finite() {
        let mut rng = StdRng::seed_from_u64(1);
        for spo2 in [f32::NAN, -1000.0, 0.0, 1000.0] {
            assert!(generate_pleth(spo2, &mut rng).iter().all(|v| v.is_finite()));
        }
    }
}
