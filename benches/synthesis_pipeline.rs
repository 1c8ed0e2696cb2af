use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vitals_core::config::{DisplayConfig, StoreConfig};
use vitals_core::render::{Framebuffer, PatientMonitor, TextCanvas};
use vitals_core::store::VitalSignsStore;
use vitals_core::synth::{SynthesisInputs, WaveformKind, WaveformSynthesizer};

const HEART_RATES: &[f32] = &[40.0, 70.0, 120.0, 180.0];
const DEVICE_COUNTS: &[usize] = &[1, 4, 16, 64];

fn benchmark_synthesizers(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis");

    for &hr in HEART_RATES {
        let inputs = SynthesisInputs {
            hr,
            spo2: 98.0,
            bis: 61.0,
            etco2: 32.0,
        };
        group.bench_with_input(BenchmarkId::new("ecg", format!("{}bpm", hr)), &inputs, |b, inputs| {
            let mut synth = WaveformSynthesizer::new(1);
            b.iter(|| synth.synthesize(WaveformKind::Ecg, black_box(inputs)));
        });
    }

    let inputs = SynthesisInputs {
        hr: 70.0,
        spo2: 98.0,
        bis: 61.0,
        etco2: 32.0,
    };
    for kind in WaveformKind::DISPLAY_ORDER {
        group.bench_with_input(BenchmarkId::new("kind", kind), &kind, |b, &kind| {
            let mut synth = WaveformSynthesizer::new(2);
            b.iter(|| synth.synthesize(black_box(kind), &inputs));
        });
    }

    group.finish();
}

fn benchmark_store_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_tick");

    for &devices in DEVICE_COUNTS {
        group.throughput(Throughput::Elements(devices as u64));
        group.bench_with_input(BenchmarkId::new("tick_all", devices), &devices, |b, &devices| {
            let store = VitalSignsStore::new_manual(StoreConfig {
                seed: Some(3),
                ..Default::default()
            })
            .expect("store");
            for i in 0..devices {
                store.add_device(format!("dev-{}", i)).expect("device");
            }
            b.iter(|| black_box(store.tick_all()));
        });
    }

    group.finish();
}

fn benchmark_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let store = VitalSignsStore::new_manual(StoreConfig {
        seed: Some(4),
        ..Default::default()
    })
    .expect("store");
    store.add_device("OR01").expect("device");
    let snapshot = store.snapshot("OR01").expect("snapshot");

    group.bench_function("framebuffer_frame", |b| {
        let config = DisplayConfig::default();
        let (w, h) = PatientMonitor::preferred_size(&config);
        let mut monitor = PatientMonitor::new("OR01", config);
        let mut fb = Framebuffer::new(w, h);
        b.iter(|| {
            monitor.advance(&snapshot);
            monitor.draw(&mut fb, black_box(&snapshot));
        });
    });

    group.bench_function("text_canvas_frame", |b| {
        let config = DisplayConfig {
            width: 100,
            value_panel_width: 12,
            ..Default::default()
        };
        let mut monitor = PatientMonitor::new("OR01", config);
        let mut canvas = TextCanvas::new(100, 30);
        b.iter(|| {
            monitor.advance(&snapshot);
            monitor.draw(&mut canvas, black_box(&snapshot));
            black_box(canvas.render_ansi())
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_synthesizers, benchmark_store_ticks, benchmark_rendering);
criterion_main!(benches);
