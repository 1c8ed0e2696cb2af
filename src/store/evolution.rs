//! Seeding and per-tick evolution of a device snapshot
//! Location: src/store/evolution.rs

use super::regeneration::RegenerationTable;
use super::snapshot::{Nibp, VitalSignsSnapshot};
use crate::config::constants::{baseline, variation};
use crate::synth::{WaveformKind, WaveformSynthesizer};
use rand::Rng;

/// Jitter `base` by up to `pct` percent either way, rounded to one decimal
pub fn add_variation<R: Rng + ?Sized>(rng: &mut R, base: f32, pct: f32) -> f32 {
    let jitter = base * (pct / 100.0) * rng.gen_range(-1.0f32..1.0);
    ((base + jitter) * 10.0).round() / 10.0
}

/// `base + floor(U * span) - span / 2`, the integer seed offset
fn seed_jitter<R: Rng + ?Sized>(rng: &mut R, base: f32, span: i32) -> f32 {
    if span <= 0 {
        return base;
    }
    base + rng.gen_range(0..span) as f32 - (span / 2) as f32
}

/// Fresh snapshot for a newly registered device
pub fn seed_snapshot(synth: &mut WaveformSynthesizer) -> VitalSignsSnapshot {
    let rng = synth.rng();
    let hr = seed_jitter(rng, baseline::HR, baseline::HR_SPAN);
    let spo2 = seed_jitter(rng, baseline::SPO2, baseline::SPO2_SPAN);
    let mean = seed_jitter(rng, baseline::MAP, baseline::MAP_SPAN);
    let systolic = seed_jitter(rng, baseline::SYSTOLIC, baseline::SYSTOLIC_SPAN);
    let diastolic = seed_jitter(rng, baseline::DIASTOLIC, baseline::DIASTOLIC_SPAN);
    let rr = seed_jitter(rng, baseline::RR, baseline::RR_SPAN);
    let etco2 = seed_jitter(rng, baseline::ETCO2, baseline::ETCO2_SPAN);
    let temp = baseline::TEMP + rng.gen_range(-baseline::TEMP_HALF_SPAN..baseline::TEMP_HALF_SPAN);
    let bis = seed_jitter(rng, baseline::BIS, baseline::BIS_SPAN);
    let pvi = seed_jitter(rng, baseline::PVI, baseline::PVI_SPAN);

    let mut snapshot = VitalSignsSnapshot {
        ecg: Vec::new(),
        pleth: Vec::new(),
        cvp: Vec::new(),
        co2: Vec::new(),
        eeg: Vec::new(),
        hr,
        spo2,
        nibp: Nibp {
            systolic,
            diastolic,
            mean,
        },
        etco2,
        temp,
        rr,
        bis,
        pvi: Some(pvi),
        vnt: Some(baseline::VNT),
        vnt_sub: Some(baseline::VNT_SUB),
        flow_rate: Some(baseline::FLOW_RATE),
        total_vol: Some(baseline::TOTAL_VOL),
    };
    snapshot.clamp_to_bounds();

    let inputs = snapshot.inputs();
    for kind in WaveformKind::DISPLAY_ORDER {
        *snapshot.waveform_mut(kind) = synth.synthesize(kind, &inputs);
    }

    snapshot
}

/// Advance a snapshot by one store tick
///
/// Returns the waveforms that were re-synthesized; the rest keep their
/// previous buffers.
pub fn evolve(
    snapshot: &mut VitalSignsSnapshot,
    synth: &mut WaveformSynthesizer,
    table: &RegenerationTable,
) -> Vec<WaveformKind> {
    let rng = synth.rng();
    snapshot.hr = add_variation(rng, snapshot.hr, variation::HR_PCT);
    snapshot.spo2 = add_variation(rng, snapshot.spo2, variation::SPO2_PCT);
    snapshot.nibp.systolic = add_variation(rng, snapshot.nibp.systolic, variation::SYSTOLIC_PCT);
    snapshot.nibp.diastolic = add_variation(rng, snapshot.nibp.diastolic, variation::DIASTOLIC_PCT);
    snapshot.rr = add_variation(rng, snapshot.rr, variation::RR_PCT);
    snapshot.etco2 = add_variation(rng, snapshot.etco2, variation::ETCO2_PCT);
    snapshot.temp = add_variation(rng, snapshot.temp, variation::TEMP_PCT);
    snapshot.bis = add_variation(rng, snapshot.bis, variation::BIS_PCT);
    let pvi = snapshot.pvi.unwrap_or(baseline::PVI);
    snapshot.pvi = Some(add_variation(rng, pvi, variation::PVI_PCT));

    snapshot.clamp_to_bounds();
    snapshot.nibp.mean = Nibp::estimated_mean(snapshot.nibp.systolic, snapshot.nibp.diastolic);

    let regenerated = table.draw(synth.rng());
    let inputs = snapshot.inputs();
    for kind in &regenerated {
        *snapshot.waveform_mut(*kind) = synth.synthesize(*kind, &inputs);
    }

    regenerated
}
