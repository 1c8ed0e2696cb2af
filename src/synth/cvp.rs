//! Central venous pressure waveform synthesis
//! Location: src/synth/cvp.rs

use super::noise::symmetric;
use crate::config::constants::waveform;
use rand::Rng;
use std::f32::consts::PI;

const SAMPLE_NOISE: f32 = 0.6;
const BASELINE_NOISE: f32 = 1.0;

/// Named phases of one venous pressure cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvpPhase {
    /// a wave, atrial systole
    AtrialSystole,
    /// c wave, tricuspid closure
    ValveClosure,
    /// x descent
    Descent,
    /// v wave, atrial filling
    AtrialFilling,
    /// y descent, tricuspid opening
    ValveOpening,
}

impl CvpPhase {
    pub fn at(phase: f32) -> Self {
        if phase < 0.2 {
            CvpPhase::AtrialSystole
        } else if phase < 0.35 {
            CvpPhase::ValveClosure
        } else if phase < 0.5 {
            CvpPhase::Descent
        } else if phase < 0.7 {
            CvpPhase::AtrialFilling
        } else {
            CvpPhase::ValveOpening
        }
    }
}

/// Noise-free pressure at a normalized phase
pub fn cvp_shape(phase: f32) -> f32 {
    match CvpPhase::at(phase) {
        CvpPhase::AtrialSystole => 15.0 + 10.0 * (phase / 0.2 * PI).sin().max(0.0).powf(1.2),
        CvpPhase::ValveClosure => {
            let c = (phase - 0.2) / 0.15;
            15.0 + 8.0 * (c * PI).sin()
        }
        CvpPhase::Descent => {
            let x = (phase - 0.35) / 0.15;
            15.0 + 5.0 - 8.0 * x.powf(0.8)
        }
        CvpPhase::AtrialFilling => {
            let v = (phase - 0.5) / 0.2;
            7.0 + 15.0 * (v * PI).sin().max(0.0).powf(1.3)
        }
        CvpPhase::ValveOpening => {
            let y = (phase - 0.7) / 0.3;
            22.0 - 15.0 * y.powf(0.9)
        }
    }
}

/// Four venous pressure cycles
pub fn generate_cvp<R: Rng + ?Sized>(rng: &mut R) -> Vec<f32> {
    let baseline_offset = symmetric(rng, BASELINE_NOISE);
    let cycle_length = waveform::CVP_CYCLE_LENGTH;
    let mut data = Vec::with_capacity(cycle_length * waveform::CVP_CYCLES);

    for _ in 0..waveform::CVP_CYCLES {
        for i in 0..cycle_length {
            let phase = i as f32 / cycle_length as f32;
            data.push(cvp_shape(phase) + symmetric(rng, SAMPLE_NOISE) + baseline_offset);
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
    fn test_phase_partition() {
        assert_eq!(CvpPhase::at(0.1), CvpPhase::AtrialSystole);
        assert_eq!(CvpPhase::at(0.3), CvpPhase::ValveClosure);
        assert_eq!(CvpPhase::at(0.4), CvpPhase::Descent);
        assert_eq!(CvpPhase::at(0.6), CvpPhase::AtrialFilling);
        assert_eq!(CvpPhase::at(0.9), CvpPhase::ValveOpening);
    }

    #[test]
    fn test_a_and_v_waves_are_peaks() {
        assert!((cvp_shape(0.1) - 25.0).abs() < 1.0e-3);
        assert!((cvp_shape(0.6) - 22.0).abs() < 1.0e-3);
        assert!(cvp_shape(0.49) < cvp_shape(0.35));
    }

    #[test]
    fn test_generate_within_display_range() {
        let mut rng = StdRng::seed_from_u64(21);
        let data = generate_cvp(&mut rng);
        assert_eq!(data.len(), 200);
        assert!(data.iter().all(|v| (0.0..=30.0).contains(v)));
    }
}
