//! Synthetic physiological waveform generation
//! Location: src/synth/mod.rs
//!
//! Generators are pure apart from the random source they are handed. They
//! never fail: out-of-domain parameters give implausible but finite traces.

pub mod co2;
pub mod cvp;
pub mod ecg;
pub mod eeg;
pub mod kind;
pub mod noise;
pub mod pleth;

pub use co2::generate_co2;
pub use cvp::generate_cvp;
pub use ecg::generate_ecg;
pub use eeg::generate_eeg;
pub use kind::WaveformKind;
pub use pleth::generate_pleth;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ordered buffer of synthesized samples
pub type Waveform = Vec<f32>;

/// Scalars the generators are parameterized by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisInputs {
    pub hr: f32,
    pub spo2: f32,
    pub bis: f32,
    pub etco2: f32,
}

/// Generate one waveform of the given kind
pub fn synthesize<R: Rng + ?Sized>(kind: WaveformKind, inputs: &SynthesisInputs, rng: &mut R) -> Waveform {
    match kind {
        WaveformKind::Ecg => generate_ecg(inputs.hr, rng),
        WaveformKind::Pleth => generate_pleth(inputs.spo2, rng),
        WaveformKind::Eeg => generate_eeg(inputs.bis, rng),
        WaveformKind::Co2 => generate_co2(inputs.etco2, rng),
        WaveformKind::Cvp => generate_cvp(rng),
    }
}

/// Waveform generator owning its own random stream
///
/// Every simulated device holds one of these so that no two devices share
/// synthesizer state, and a fixed seed reproduces a run exactly.
pub struct WaveformSynthesizer {
    rng: StdRng,
}

impl WaveformSynthesizer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn synthesize(&mut self, kind: WaveformKind, inputs: &SynthesisInputs) -> Waveform {
        synthesize(kind, inputs, &mut self.rng)
    }

    /// Random stream shared with the scalar jitter of the same device
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

impl std::fmt::Debug for WaveformSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaveformSynthesizer").finish_non_exhaustive()
    }
}
