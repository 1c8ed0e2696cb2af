// tests/synth_properties.rs
//! Property tests for the waveform synthesizers

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use vitals_core::config::constants::waveform;
use vitals_core::synth::{self, ecg, pleth, SynthesisInputs, WaveformKind, WaveformSynthesizer};

fn within_envelope(samples: &[f32]) -> bool {
    let (low, high) = waveform::SAMPLE_ENVELOPE;
    samples.iter().all(|v| v.is_finite() && (low..=high).contains(v))
}

proptest! {
    #[test]
    fn ecg_length_depends_only_on_rate(hr in 20.0f32..250.0, seed_a: u64, seed_b: u64) {
        let a = synth::generate_ecg(hr, &mut StdRng::seed_from_u64(seed_a));
        let b = synth::generate_ecg(hr, &mut StdRng::seed_from_u64(seed_b));
        prop_assert!(!a.is_empty());
        prop_assert_eq!(a.len(), b.len());
        prop_assert_eq!(a.len(), ecg::ecg_cycle_length(hr) * waveform::ECG_CYCLES);
        prop_assert!(within_envelope(&a));
    }

    #[test]
    fn ecg_survives_any_rate(hr in proptest::num::f32::ANY, seed: u64) {
        let samples = synth::generate_ecg(hr, &mut StdRng::seed_from_u64(seed));
        prop_assert!(!samples.is_empty());
        prop_assert!(within_envelope(&samples));
    }

    #[test]
    fn pleth_amplitude_non_decreasing(a in 90.0f32..=100.0, b in 90.0f32..=100.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(pleth::pleth_amplitude(lo) <= pleth::pleth_amplitude(hi));
    }

    #[test]
    fn every_kind_stays_in_envelope(
        hr in 20.0f32..250.0,
        spo2 in 90.0f32..=100.0,
        bis in 0.0f32..=100.0,
        etco2 in 0.0f32..=60.0,
        seed: u64,
    ) {
        let inputs = SynthesisInputs { hr, spo2, bis, etco2 };
        let mut synth = WaveformSynthesizer::new(seed);
        for kind in WaveformKind::DISPLAY_ORDER {
            let samples = synth.synthesize(kind, &inputs);
            prop_assert!(!samples.is_empty(), "{} empty", kind);
            prop_assert!(within_envelope(&samples), "{} left the envelope", kind);
        }
    }
}

#[test]
fn fixed_lengths() {
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(synth::generate_pleth(98.0, &mut rng).len(), 200);
    assert_eq!(synth::generate_eeg(61.0, &mut rng).len(), 300);
    assert_eq!(synth::generate_cvp(&mut rng).len(), 200);
    assert_eq!(synth::generate_co2(32.0, &mut rng).len(), 198);
}

#[test]
fn same_seed_same_waveforms() {
    let inputs = SynthesisInputs {
        hr: 72.0,
        spo2: 98.0,
        bis: 61.0,
        etco2: 32.0,
    };
    let mut a = WaveformSynthesizer::new(42);
    let mut b = WaveformSynthesizer::new(42);
    for kind in WaveformKind::DISPLAY_ORDER {
        assert_eq!(a.synthesize(kind, &inputs), b.synthesize(kind, &inputs));
    }
}
