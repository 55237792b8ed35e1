//! Dispatch results do not depend on band or worker count.

use eddy_core::GridDims;
use eddy_exec::{BandExecutor, ExecutorConfig};
use proptest::prelude::*;

/// Five-point average over a read-only source, clamped at the edges.
fn smooth(exec: &BandExecutor, dims: GridDims, bands: usize, src: &[f64]) -> Vec<f64> {
    let (w, h) = (dims.width() as i64, dims.height() as i64);
    let at = |x: i64, y: i64| {
        src[dims.index(x.clamp(0, w - 1) as usize, y.clamp(0, h - 1) as usize)]
    };
    let mut out = vec![0.0; dims.cell_count()];
    exec.for_each_cell(dims, bands, &mut out[..], |x, y| {
        let (x, y) = (x as i64, y as i64);
        Ok((at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) + at(x, y)) / 5.0)
    })
    .unwrap();
    out
}

fn seed(dims: GridDims) -> Vec<f64> {
    (0..dims.cell_count())
        .map(|i| ((i * 7919) % 101) as f64 * 0.37)
        .collect()
}

#[test]
fn stencil_is_bit_exact_across_band_counts() {
    let exec = BandExecutor::new(&ExecutorConfig {
        worker_count: Some(4),
    })
    .unwrap();
    let dims = GridDims::new(23, 31);
    let src = seed(dims);
    let reference = smooth(&exec, dims, 1, &src);
    for bands in [2, 3, 7, 24, 31, 64] {
        assert_eq!(smooth(&exec, dims, bands, &src), reference, "bands = {bands}");
    }
}

#[test]
fn worker_count_does_not_change_results() {
    let dims = GridDims::new(16, 16);
    let src = seed(dims);
    let one = BandExecutor::new(&ExecutorConfig {
        worker_count: Some(1),
    })
    .unwrap();
    let many = BandExecutor::new(&ExecutorConfig {
        worker_count: Some(8),
    })
    .unwrap();
    assert_eq!(one.workers(), 1);
    assert_eq!(many.workers(), 8);
    assert_eq!(smooth(&one, dims, 5, &src), smooth(&many, dims, 5, &src));
}

#[test]
fn max_reduction_over_bands() {
    let exec = BandExecutor::new(&ExecutorConfig::default()).unwrap();
    let dims = GridDims::new(10, 12);
    let src = seed(dims);
    let expected = src.iter().copied().fold(0.0, f64::max);
    let per_band = exec
        .map_bands(dims, 5, |band| {
            let mut m = 0.0f64;
            for y in band.rows.clone() {
                for x in 0..dims.width() {
                    m = m.max(src[dims.index(x, y)]);
                }
            }
            Ok(m)
        })
        .unwrap();
    assert_eq!(per_band.len(), 5);
    assert_eq!(per_band.into_iter().fold(0.0, f64::max), expected);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_partition_writes_every_cell(w in 1usize..20, h in 1usize..20, bands in 1usize..40) {
        let exec = BandExecutor::new(&ExecutorConfig { worker_count: Some(3) }).unwrap();
        let dims = GridDims::new(w, h);
        let mut out = vec![None; dims.cell_count()];
        exec.for_each_cell(dims, bands, &mut out[..], |x, y| Ok(Some((x, y)))).unwrap();
        for y in 0..h {
            for x in 0..w {
                prop_assert_eq!(out[dims.index(x, y)], Some((x, y)));
            }
        }
    }
}
