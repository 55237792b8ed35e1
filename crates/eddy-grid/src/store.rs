//! The field store: committed and scratch buffers for every cell.

use eddy_core::{Dye, FieldKind, GridDims, SampleBoundary, Vec2};

use crate::error::GridError;
use crate::geometry::Geometry;
use crate::scratch::{commit_velocity_rule, CommittedMut, ScratchMut, ScratchView};
use crate::snapshot::FieldSnapshot;
use crate::view::{FieldView, Sampled};

/// Velocity assigned to every fluid cell by the initial condition.
pub const INITIAL_VELOCITY: Vec2 = Vec2::new(-10.0, 0.0);

/// Number of checkerboard tiles along each axis of the initial dye.
const CHECKER_TILES: usize = 10;

/// Per-cell physical quantities and their scratch copies.
///
/// Storage is struct-of-arrays in row-major order. Pressure and dye have
/// independent scratch buffers even though they are never live in the
/// same pass.
///
/// # Buffer layout
///
/// ```text
/// velocity / scratch_velocity : [Vec2; w*h]
/// dye      / scratch_dye      : [Dye;  w*h]
/// pressure / scratch_pressure : [f64;  w*h]
/// ```
#[derive(Clone, Debug)]
pub struct FieldStore {
    dims: GridDims,
    boundary: SampleBoundary,
    geometry: Geometry,
    velocity: Vec<Vec2>,
    dye: Vec<Dye>,
    pressure: Vec<f64>,
    scratch_velocity: Vec<Vec2>,
    scratch_dye: Vec<Dye>,
    scratch_pressure: Vec<f64>,
}

impl FieldStore {
    /// Create a store holding the deterministic initial condition.
    ///
    /// Returns `Err(GridError::TooSmall)` if either axis is shorter than
    /// three cells.
    pub fn new(dims: GridDims, boundary: SampleBoundary) -> Result<Self, GridError> {
        let (width, height) = (dims.width(), dims.height());
        if width < 3 || height < 3 {
            return Err(GridError::TooSmall { width, height });
        }
        let n = width
            .checked_mul(height)
            .ok_or(GridError::CellCountOverflow { width, height })?;

        let mut store = Self {
            dims,
            boundary,
            geometry: Geometry::new(dims),
            velocity: vec![Vec2::ZERO; n],
            dye: vec![Dye::default(); n],
            pressure: vec![0.0; n],
            scratch_velocity: vec![Vec2::ZERO; n],
            scratch_dye: vec![Dye::default(); n],
            scratch_pressure: vec![0.0; n],
        };
        store.reset();
        Ok(store)
    }

    /// Restore the initial condition in place.
    ///
    /// Dye is a checkerboard (red varies with column tile, green with row
    /// tile, blue constant). Fluid cells move left at
    /// [`INITIAL_VELOCITY`]; solid cells start at rest so the solid
    /// invariant holds before the first tick. Pressure and all scratch
    /// buffers are zeroed.
    pub fn reset(&mut self) {
        let (w, h) = (self.dims.width(), self.dims.height());
        for y in 0..h {
            for x in 0..w {
                let i = self.dims.index(x, y);
                let r = if (x * CHECKER_TILES / w) % 2 == 0 { 1.0 } else { 0.0 };
                let g = if (y * CHECKER_TILES / h) % 2 == 0 { 1.0 } else { 0.0 };
                self.dye[i] = Dye::new(r, g, 1.0);
                self.velocity[i] = commit_velocity_rule(&self.geometry, x, y, INITIAL_VELOCITY);
            }
        }
        self.pressure.fill(0.0);
        self.scratch_velocity.fill(Vec2::ZERO);
        self.scratch_dye.fill(Dye::default());
        self.scratch_pressure.fill(0.0);
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Off-grid lookup policy.
    pub fn boundary(&self) -> SampleBoundary {
        self.boundary
    }

    /// Solid layout.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Whether `(x, y)` is a solid cell.
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.geometry.is_solid(x, y)
    }

    // ── Borrow splits ───────────────────────────────────────────

    /// Read-only view of the committed fields.
    pub fn view(&self) -> FieldView<'_> {
        FieldView {
            dims: self.dims,
            boundary: self.boundary,
            geometry: self.geometry,
            velocity: &self.velocity,
            dye: &self.dye,
            pressure: &self.pressure,
        }
    }

    /// Split for a stage pass: committed fields read-only, scratch
    /// buffers writable.
    pub fn stage(&mut self) -> (FieldView<'_>, ScratchMut<'_>) {
        let view = FieldView {
            dims: self.dims,
            boundary: self.boundary,
            geometry: self.geometry,
            velocity: &self.velocity,
            dye: &self.dye,
            pressure: &self.pressure,
        };
        let scratch = ScratchMut {
            velocity: &mut self.scratch_velocity,
            dye: &mut self.scratch_dye,
            pressure: &mut self.scratch_pressure,
        };
        (view, scratch)
    }

    /// Split for a commit pass: committed fields writable, scratch
    /// buffers read-only.
    pub fn commit_split(&mut self) -> (CommittedMut<'_>, ScratchView<'_>) {
        let committed = CommittedMut {
            velocity: &mut self.velocity,
            dye: &mut self.dye,
            pressure: &mut self.pressure,
        };
        let scratch = ScratchView {
            dims: self.dims,
            geometry: self.geometry,
            velocity: &self.scratch_velocity,
            dye: &self.scratch_dye,
            pressure: &self.scratch_pressure,
        };
        (committed, scratch)
    }

    /// Copy the committed fields into an owned snapshot.
    pub fn snapshot(&self, tick: u64) -> FieldSnapshot {
        FieldSnapshot {
            tick,
            dims: self.dims,
            boundary: self.boundary,
            geometry: self.geometry,
            velocity: self.velocity.clone(),
            dye: self.dye.clone(),
            pressure: self.pressure.clone(),
        }
    }

    // ── Per-cell access ─────────────────────────────────────────

    /// Bilinearly sample a committed field at a fractional position.
    pub fn sample(&self, pos: Vec2, field: FieldKind) -> Sampled {
        self.view().sample(pos, field)
    }

    /// Committed velocity.
    pub fn velocity(&self, x: usize, y: usize) -> Vec2 {
        self.velocity[self.dims.index(x, y)]
    }

    /// Overwrite committed velocity. Bypasses the solid rule.
    pub fn set_velocity(&mut self, x: usize, y: usize, v: Vec2) {
        let i = self.dims.index(x, y);
        self.velocity[i] = v;
    }

    /// Committed dye.
    pub fn dye(&self, x: usize, y: usize) -> Dye {
        self.dye[self.dims.index(x, y)]
    }

    /// Overwrite committed dye.
    pub fn set_dye(&mut self, x: usize, y: usize, d: Dye) {
        let i = self.dims.index(x, y);
        self.dye[i] = d;
    }

    /// Committed pressure.
    pub fn pressure(&self, x: usize, y: usize) -> f64 {
        self.pressure[self.dims.index(x, y)]
    }

    /// Overwrite committed pressure.
    pub fn set_pressure(&mut self, x: usize, y: usize, p: f64) {
        let i = self.dims.index(x, y);
        self.pressure[i] = p;
    }

    /// Scratch velocity.
    pub fn scratch_velocity(&self, x: usize, y: usize) -> Vec2 {
        self.scratch_velocity[self.dims.index(x, y)]
    }

    /// Overwrite scratch velocity.
    pub fn set_scratch_velocity(&mut self, x: usize, y: usize, v: Vec2) {
        let i = self.dims.index(x, y);
        self.scratch_velocity[i] = v;
    }

    /// Scratch dye.
    pub fn scratch_dye(&self, x: usize, y: usize) -> Dye {
        self.scratch_dye[self.dims.index(x, y)]
    }

    /// Overwrite scratch dye.
    pub fn set_scratch_dye(&mut self, x: usize, y: usize, d: Dye) {
        let i = self.dims.index(x, y);
        self.scratch_dye[i] = d;
    }

    /// Scratch pressure.
    pub fn scratch_pressure(&self, x: usize, y: usize) -> f64 {
        self.scratch_pressure[self.dims.index(x, y)]
    }

    /// Overwrite scratch pressure.
    pub fn set_scratch_pressure(&mut self, x: usize, y: usize, p: f64) {
        let i = self.dims.index(x, y);
        self.scratch_pressure[i] = p;
    }

    /// Commit scratch velocity at one cell, zeroing it on solid cells.
    pub fn commit_velocity(&mut self, x: usize, y: usize) {
        let i = self.dims.index(x, y);
        self.velocity[i] = commit_velocity_rule(&self.geometry, x, y, self.scratch_velocity[i]);
    }

    /// Commit scratch dye at one cell.
    pub fn commit_dye(&mut self, x: usize, y: usize) {
        let i = self.dims.index(x, y);
        self.dye[i] = self.scratch_dye[i];
    }

    /// Commit scratch pressure at one cell.
    pub fn commit_pressure(&mut self, x: usize, y: usize) {
        let i = self.dims.index(x, y);
        self.pressure[i] = self.scratch_pressure[i];
    }
}
