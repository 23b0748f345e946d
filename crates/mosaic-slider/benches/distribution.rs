use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mosaic_foundation::DraggableState;
use mosaic_slider::{SensitivitySlice, SliderState, ValueDistribution};

const SEGMENT_SAMPLES: &[usize] = &[2, 8, 32];
const LOOKUPS: usize = 256;
const TRACK_WIDTH: f32 = 1080.0;

/// Checkpoints with `segments` pieces of alternating steepness.
fn checkpoint_curve(segments: usize) -> ValueDistribution {
    let mut value = 0.0;
    let points: Vec<(f32, f32)> = (0..=segments)
        .map(|i| {
            if i > 0 {
                value += if i % 2 == 0 { 1.0 } else { 4.0 };
            }
            (i as f32 / segments as f32, value)
        })
        .collect();
    ValueDistribution::checkpoints(&points).expect("benchmark checkpoints")
}

fn sensitivity_curve(segments: usize) -> ValueDistribution {
    let slices: Vec<SensitivitySlice> = (0..segments)
        .map(|i| SensitivitySlice::new(1.0 + (i % 3) as f32, i as f32 / segments as f32))
        .collect();
    ValueDistribution::sensitivity(&slices).expect("benchmark slices")
}

fn lookup_inputs() -> Vec<f32> {
    (0..LOOKUPS).map(|i| i as f32 / (LOOKUPS - 1) as f32).collect()
}

fn bench_lookup(c: &mut Criterion) {
    let inputs = lookup_inputs();
    let mut group = c.benchmark_group("distribution_lookup");
    for &segments in SEGMENT_SAMPLES {
        for (name, curve) in [
            ("checkpoints", checkpoint_curve(segments)),
            ("sensitivity", sensitivity_curve(segments)),
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("{name}_interpolate"), segments),
                &curve,
                |b, curve| {
                    b.iter(|| {
                        for &x in &inputs {
                            black_box(curve.interpolate(black_box(x)));
                        }
                    });
                },
            );
            group.bench_with_input(
                BenchmarkId::new(format!("{name}_inverse"), segments),
                &curve,
                |b, curve| {
                    b.iter(|| {
                        for &y in &inputs {
                            black_box(curve.inverse(black_box(y)));
                        }
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("slider_drag");
    for &segments in SEGMENT_SAMPLES {
        group.bench_with_input(
            BenchmarkId::new("raw_delta", segments),
            &segments,
            |b, &segments| {
                let state = SliderState::new(0.0, 0.0..=1000.0, None, checkpoint_curve(segments));
                state.update_dimensions(TRACK_WIDTH, 24.0);
                let mut direction = 1.0;
                b.iter(|| {
                    if state.raw_offset() >= TRACK_WIDTH - 3.0 {
                        direction = -1.0;
                    } else if state.raw_offset() <= 3.0 {
                        direction = 1.0;
                    }
                    state
                        .dispatch_raw_delta(black_box(direction * 3.0))
                        .expect("slider is idle");
                    black_box(state.value());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_lookup, bench_drag);
criterion_main!(benches);
