//! Execution context passed to stages during a tick.

use eddy_core::{Dye, KernelFault, StageError, Vec2};
use eddy_exec::BandExecutor;
use eddy_grid::{FieldStore, FieldView};

/// Execution context passed to each stage's [`run`](crate::Stage::run).
///
/// Bundles the field store, the band executor and the per-tick
/// parameters. The dispatch helpers encode the pass discipline: a
/// `write_*` helper computes scratch values from the committed fields,
/// and a `commit_*` helper copies scratch into committed. Each is a
/// separate full-grid dispatch with its own barrier.
pub struct StageContext<'a> {
    store: &'a mut FieldStore,
    executor: &'a BandExecutor,
    dt: f64,
    bands: usize,
    check_finite: bool,
}

impl<'a> StageContext<'a> {
    /// Construct a stage context.
    ///
    /// Typically called by the simulation, not by stages directly.
    pub fn new(
        store: &'a mut FieldStore,
        executor: &'a BandExecutor,
        dt: f64,
        bands: usize,
        check_finite: bool,
    ) -> Self {
        Self {
            store,
            executor,
            dt,
            bands,
            check_finite,
        }
    }

    /// Timestep for this tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Row bands per dispatch.
    pub fn bands(&self) -> usize {
        self.bands
    }

    /// Whether kernels should reject non-finite results.
    pub fn check_finite(&self) -> bool {
        self.check_finite
    }

    // ── Stage passes ───────────────────────────────────────────────

    /// Compute scratch velocity for every cell.
    pub fn write_velocity<F>(&mut self, kernel: F) -> Result<(), StageError>
    where
        F: Fn(&FieldView<'_>, usize, usize) -> Result<Vec2, KernelFault> + Sync,
    {
        let (view, scratch) = self.store.stage();
        self.executor
            .for_each_cell(view.dims(), self.bands, scratch.velocity, |x, y| {
                kernel(&view, x, y)
            })
    }

    /// Compute scratch velocity and scratch dye for every cell.
    pub fn write_velocity_and_dye<F>(&mut self, kernel: F) -> Result<(), StageError>
    where
        F: Fn(&FieldView<'_>, usize, usize) -> Result<(Vec2, Dye), KernelFault> + Sync,
    {
        let (view, scratch) = self.store.stage();
        self.executor.for_each_cell(
            view.dims(),
            self.bands,
            (scratch.velocity, scratch.dye),
            |x, y| kernel(&view, x, y),
        )
    }

    /// Compute scratch pressure for every cell.
    pub fn write_pressure<F>(&mut self, kernel: F) -> Result<(), StageError>
    where
        F: Fn(&FieldView<'_>, usize, usize) -> Result<f64, KernelFault> + Sync,
    {
        let (view, scratch) = self.store.stage();
        self.executor
            .for_each_cell(view.dims(), self.bands, scratch.pressure, |x, y| {
                kernel(&view, x, y)
            })
    }

    // ── Commit passes ──────────────────────────────────────────────

    /// Commit scratch velocity, zeroing solid cells.
    pub fn commit_velocity(&mut self) -> Result<(), StageError> {
        let (committed, scratch) = self.store.commit_split();
        self.executor
            .for_each_cell(scratch.dims(), self.bands, committed.velocity, |x, y| {
                Ok(scratch.velocity_to_commit(x, y))
            })
    }

    /// Commit scratch velocity (zeroing solid cells) and scratch dye.
    pub fn commit_velocity_and_dye(&mut self) -> Result<(), StageError> {
        let (committed, scratch) = self.store.commit_split();
        self.executor.for_each_cell(
            scratch.dims(),
            self.bands,
            (committed.velocity, committed.dye),
            |x, y| Ok((scratch.velocity_to_commit(x, y), scratch.dye_to_commit(x, y))),
        )
    }

    /// Commit scratch pressure.
    pub fn commit_pressure(&mut self) -> Result<(), StageError> {
        let (committed, scratch) = self.store.commit_split();
        self.executor
            .for_each_cell(scratch.dims(), self.bands, committed.pressure, |x, y| {
                Ok(scratch.pressure_to_commit(x, y))
            })
    }
}
