//! Criterion micro-benchmarks for band dispatch and the field store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eddy_core::{GridDims, SampleBoundary, Vec2};
use eddy_exec::{BandExecutor, ExecutorConfig};
use eddy_grid::FieldStore;

fn executor() -> BandExecutor {
    BandExecutor::new(&ExecutorConfig::default()).unwrap()
}

/// One Jacobi-style pass over 150x150 at several band counts.
fn bench_stencil_pass(c: &mut Criterion) {
    let exec = executor();
    let dims = GridDims::new(150, 150);
    let src: Vec<f64> = (0..dims.cell_count()).map(|i| (i % 97) as f64).collect();
    let mut out = vec![0.0; dims.cell_count()];
    let (w, h) = (dims.width(), dims.height());
    let at = |x: usize, y: usize| src[dims.index(x.min(w - 1), y.min(h - 1))];

    let mut group = c.benchmark_group("stencil_150x150");
    for bands in [1usize, 8, 24, 150] {
        group.bench_with_input(BenchmarkId::from_parameter(bands), &bands, |b, &bands| {
            b.iter(|| {
                exec.for_each_cell(dims, bands, &mut out[..], |x, y| {
                    let sum = at(x.saturating_sub(1), y)
                        + at(x + 1, y)
                        + at(x, y.saturating_sub(1))
                        + at(x, y + 1);
                    Ok(0.25 * sum)
                })
                .unwrap();
                black_box(&out);
            });
        });
    }
    group.finish();
}

/// Peak-speed reduction, the adaptive timestep's scan.
fn bench_max_speed(c: &mut Criterion) {
    let exec = executor();
    let store = FieldStore::new(GridDims::new(150, 150), SampleBoundary::Clamp).unwrap();
    let view = store.view();
    let dims = view.dims();

    c.bench_function("max_speed_sq_150x150", |b| {
        b.iter(|| {
            let peaks = exec
                .map_bands(dims, 24, |band| {
                    let mut peak = 0.0f64;
                    for y in band.rows.clone() {
                        for x in 0..dims.width() {
                            peak = peak.max(view.velocity(x, y).length_sq());
                        }
                    }
                    Ok(peak)
                })
                .unwrap();
            black_box(peaks.into_iter().fold(0.0, f64::max))
        });
    });
}

fn bench_bilinear_sample(c: &mut Criterion) {
    let store = FieldStore::new(GridDims::new(150, 150), SampleBoundary::Clamp).unwrap();
    let view = store.view();
    c.bench_function("sample_velocity_10k", |b| {
        b.iter(|| {
            let mut acc = Vec2::ZERO;
            for i in 0..10_000 {
                let p = Vec2::new((i % 150) as f64 + 0.37, (i / 150 % 150) as f64 + 0.61);
                acc += view.sample_velocity(p);
            }
            black_box(acc)
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let store = FieldStore::new(GridDims::new(150, 150), SampleBoundary::Clamp).unwrap();
    c.bench_function("snapshot_150x150", |b| {
        b.iter(|| black_box(store.snapshot(0)));
    });
}

criterion_group!(
    benches,
    bench_stencil_pass,
    bench_max_speed,
    bench_bilinear_sample,
    bench_snapshot
);
criterion_main!(benches);
