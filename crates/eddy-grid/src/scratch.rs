//! Borrow splits used by stage and commit passes.
//!
//! A stage pass borrows the committed fields immutably (as a
//! [`FieldView`](crate::FieldView)) and the scratch buffers mutably
//! ([`ScratchMut`]). A commit pass does the opposite: committed fields
//! mutably ([`CommittedMut`]) and scratch immutably ([`ScratchView`]).
//! No pass can hold both halves of the same field mutably, which is the
//! property that lets bands read across band boundaries without locks.

use eddy_core::{Dye, GridDims, Vec2};

use crate::geometry::Geometry;

/// Mutable scratch buffers, written by a stage pass.
#[derive(Debug)]
pub struct ScratchMut<'a> {
    /// Next velocity per cell.
    pub velocity: &'a mut [Vec2],
    /// Next dye per cell.
    pub dye: &'a mut [Dye],
    /// Next pressure per cell.
    pub pressure: &'a mut [f64],
}

/// Mutable committed fields, written by a commit pass.
#[derive(Debug)]
pub struct CommittedMut<'a> {
    /// Committed velocity per cell.
    pub velocity: &'a mut [Vec2],
    /// Committed dye per cell.
    pub dye: &'a mut [Dye],
    /// Committed pressure per cell.
    pub pressure: &'a mut [f64],
}

/// Read-only scratch buffers, read by a commit pass.
///
/// The accessors apply the commit rules: velocity commits to zero on
/// solid cells, dye and pressure commit unchanged.
#[derive(Clone, Copy, Debug)]
pub struct ScratchView<'a> {
    pub(crate) dims: GridDims,
    pub(crate) geometry: Geometry,
    pub(crate) velocity: &'a [Vec2],
    pub(crate) dye: &'a [Dye],
    pub(crate) pressure: &'a [f64],
}

impl ScratchView<'_> {
    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Velocity to commit at `(x, y)`: the scratch value, or zero if the
    /// cell is solid.
    #[inline]
    pub fn velocity_to_commit(&self, x: usize, y: usize) -> Vec2 {
        commit_velocity_rule(&self.geometry, x, y, self.velocity[self.dims.index(x, y)])
    }

    /// Dye to commit at `(x, y)`.
    #[inline]
    pub fn dye_to_commit(&self, x: usize, y: usize) -> Dye {
        self.dye[self.dims.index(x, y)]
    }

    /// Pressure to commit at `(x, y)`.
    #[inline]
    pub fn pressure_to_commit(&self, x: usize, y: usize) -> f64 {
        self.pressure[self.dims.index(x, y)]
    }
}

/// The velocity commit rule shared by the per-cell and band paths.
#[inline]
pub(crate) fn commit_velocity_rule(geometry: &Geometry, x: usize, y: usize, next: Vec2) -> Vec2 {
    if geometry.is_solid(x, y) {
        Vec2::ZERO
    } else {
        next
    }
}
