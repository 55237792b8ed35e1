//! Fixed-size worker pool with full-barrier band dispatch.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use eddy_core::{BandFault, GridDims, KernelFault, StageError};

use crate::band::{partition, RowBand};
use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::output::BandOutput;

/// Runs per-cell kernels over the grid, one task per row band.
///
/// The pool size is fixed at construction and independent of both the
/// grid size and the band count of any dispatch. Every dispatch method
/// blocks the caller until all bands have reported, then aggregates the
/// outcomes: `Ok` only if every band succeeded.
pub struct BandExecutor {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl std::fmt::Debug for BandExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandExecutor")
            .field("workers", &self.workers)
            .finish()
    }
}

impl BandExecutor {
    /// Build the worker pool.
    pub fn new(config: &ExecutorConfig) -> Result<Self, ExecutorError> {
        let workers = config.resolved_worker_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("eddy-band-{i}"))
            .build()
            .map_err(|e| ExecutorError::PoolBuild {
                reason: e.to_string(),
            })?;
        tracing::debug!(workers, "band executor started");
        Ok(Self { pool, workers })
    }

    /// Number of pool threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Compute one value per cell and write it into `out`.
    ///
    /// `out` must cover `dims.cell_count()` cells in row-major order.
    /// The grid's rows are split into `bands` bands (see
    /// [`partition`]); each band task visits its rows in order and every
    /// column within a row, calling `kernel(x, y)` and writing the result
    /// at the cell's position. A band stops at its first fault.
    ///
    /// `kernel` must only read state that no band writes during this
    /// dispatch; `out` is the only thing written.
    ///
    /// # Panics
    ///
    /// Panics if `out.len() != dims.cell_count()`.
    pub fn for_each_cell<O, F>(
        &self,
        dims: GridDims,
        bands: usize,
        out: O,
        kernel: F,
    ) -> Result<(), StageError>
    where
        O: BandOutput,
        F: Fn(usize, usize) -> Result<O::Value, KernelFault> + Sync,
    {
        assert_eq!(
            out.len(),
            dims.cell_count(),
            "output does not cover the grid"
        );
        let width = dims.width();
        let plan = partition(dims.height(), bands);

        let mut parts = Vec::with_capacity(plan.len());
        let mut rest = out;
        for band in &plan {
            let (head, tail) = rest.split_at(band.len() * width);
            parts.push(head);
            rest = tail;
        }

        let kernel = &kernel;
        self.dispatch(&plan, parts, |band, mut part: O| {
            let mut local = 0;
            for y in band.rows.clone() {
                for x in 0..width {
                    part.write(local, kernel(x, y)?);
                    local += 1;
                }
            }
            Ok(())
        })
        .map(|_| ())
    }

    /// Evaluate `f` once per band and return the results in band order.
    ///
    /// Used for read-only reductions over the grid, such as the maximum
    /// speed scan of adaptive timestep selection.
    pub fn map_bands<T, F>(&self, dims: GridDims, bands: usize, f: F) -> Result<Vec<T>, StageError>
    where
        T: Send,
        F: Fn(&RowBand) -> Result<T, KernelFault> + Sync,
    {
        let plan = partition(dims.height(), bands);
        let parts = vec![(); plan.len()];
        self.dispatch(&plan, parts, |band, ()| f(band))
    }

    /// Run one task per band and wait for all of them.
    ///
    /// Each task reports `(band index, outcome)` over a channel sized to
    /// the band count. Panics are caught per task. After the scope
    /// closes, missing reports become [`StageError::BarrierBroken`] and
    /// faulted bands become [`StageError::BandsFailed`].
    fn dispatch<P, T, F>(
        &self,
        plan: &[RowBand],
        parts: Vec<P>,
        task: F,
    ) -> Result<Vec<T>, StageError>
    where
        P: Send,
        T: Send,
        F: Fn(&RowBand, P) -> Result<T, KernelFault> + Sync,
    {
        let expected = plan.len();
        let (tx, rx) = crossbeam_channel::bounded(expected.max(1));
        let task = &task;

        self.pool.scope(|scope| {
            for (band, part) in plan.iter().zip(parts) {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(band, part)))
                        .unwrap_or_else(|payload| {
                            Err(KernelFault::Panicked {
                                message: panic_message(payload.as_ref()),
                            })
                        });
                    // The receiver outlives the scope; a failed send
                    // surfaces as a missing report below.
                    let _ = tx.send((band.index, outcome));
                });
            }
        });
        drop(tx);

        let mut outcomes: Vec<Option<Result<T, KernelFault>>> =
            std::iter::repeat_with(|| None).take(expected).collect();
        for (index, outcome) in rx.try_iter() {
            if let Some(slot) = outcomes.get_mut(index) {
                *slot = Some(outcome);
            }
        }

        let received = outcomes.iter().filter(|o| o.is_some()).count();
        if received < expected {
            tracing::warn!(expected, received, "band completion barrier broken");
            return Err(StageError::BarrierBroken { expected, received });
        }

        let mut values = Vec::with_capacity(expected);
        let mut faults = Vec::new();
        for (band, outcome) in plan.iter().zip(outcomes) {
            match outcome {
                Some(Ok(value)) => values.push(value),
                Some(Err(fault)) => faults.push(BandFault {
                    band: band.index,
                    rows: band.rows.clone(),
                    fault,
                }),
                None => {}
            }
        }
        if faults.is_empty() {
            Ok(values)
        } else {
            Err(StageError::BandsFailed(faults))
        }
    }
}

/// Render a panic payload as text.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
