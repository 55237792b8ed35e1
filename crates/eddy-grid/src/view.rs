//! Read-only view of the committed fields with boundary-aware sampling.

use eddy_core::math::lerp;
use eddy_core::{Dye, FieldKind, GridDims, SampleBoundary, Vec2};

use crate::geometry::Geometry;

/// A value sampled from one of the three fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sampled {
    /// A velocity sample.
    Velocity(Vec2),
    /// A dye sample.
    Dye(Dye),
    /// A pressure sample.
    Pressure(f64),
}

/// Borrowed, immutable view of committed velocity, dye and pressure.
///
/// Obtained from [`FieldStore::view`](crate::FieldStore::view),
/// [`FieldStore::stage`](crate::FieldStore::stage), or
/// [`FieldSnapshot::view`](crate::FieldSnapshot::view). The view is
/// `Copy` and `Sync`, so every band task of a dispatch can hold one.
#[derive(Clone, Copy, Debug)]
pub struct FieldView<'a> {
    pub(crate) dims: GridDims,
    pub(crate) boundary: SampleBoundary,
    pub(crate) geometry: Geometry,
    pub(crate) velocity: &'a [Vec2],
    pub(crate) dye: &'a [Dye],
    pub(crate) pressure: &'a [f64],
}

impl<'a> FieldView<'a> {
    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Off-grid lookup policy.
    pub fn boundary(&self) -> SampleBoundary {
        self.boundary
    }

    /// Solid layout for this grid.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Whether `(x, y)` is a solid cell.
    #[inline]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.geometry.is_solid(x, y)
    }

    /// Committed velocity slice in row-major order.
    pub fn velocity_slice(&self) -> &'a [Vec2] {
        self.velocity
    }

    /// Committed dye slice in row-major order.
    pub fn dye_slice(&self) -> &'a [Dye] {
        self.dye
    }

    /// Committed pressure slice in row-major order.
    pub fn pressure_slice(&self) -> &'a [f64] {
        self.pressure
    }

    /// Committed velocity of an in-bounds cell.
    #[inline]
    pub fn velocity(&self, x: usize, y: usize) -> Vec2 {
        self.velocity[self.dims.index(x, y)]
    }

    /// Committed dye of an in-bounds cell.
    #[inline]
    pub fn dye(&self, x: usize, y: usize) -> Dye {
        self.dye[self.dims.index(x, y)]
    }

    /// Committed pressure of an in-bounds cell.
    #[inline]
    pub fn pressure(&self, x: usize, y: usize) -> f64 {
        self.pressure[self.dims.index(x, y)]
    }

    /// Flat index for a possibly off-grid integer coordinate, resolved
    /// through the boundary policy.
    #[inline]
    pub fn resolve(&self, x: i64, y: i64) -> usize {
        let rx = self.boundary.resolve(x, self.dims.width());
        let ry = self.boundary.resolve(y, self.dims.height());
        self.dims.index(rx, ry)
    }

    /// Velocity at a possibly off-grid integer coordinate.
    #[inline]
    pub fn velocity_at(&self, x: i64, y: i64) -> Vec2 {
        self.velocity[self.resolve(x, y)]
    }

    /// Dye at a possibly off-grid integer coordinate.
    #[inline]
    pub fn dye_at(&self, x: i64, y: i64) -> Dye {
        self.dye[self.resolve(x, y)]
    }

    /// Pressure at a possibly off-grid integer coordinate.
    #[inline]
    pub fn pressure_at(&self, x: i64, y: i64) -> f64 {
        self.pressure[self.resolve(x, y)]
    }

    /// Bilinearly interpolate velocity at a fractional grid position.
    pub fn sample_velocity(&self, pos: Vec2) -> Vec2 {
        self.bilinear(self.velocity, pos, Vec2::lerp)
    }

    /// Bilinearly interpolate dye at a fractional grid position.
    pub fn sample_dye(&self, pos: Vec2) -> Dye {
        self.bilinear(self.dye, pos, Dye::lerp)
    }

    /// Bilinearly interpolate pressure at a fractional grid position.
    pub fn sample_pressure(&self, pos: Vec2) -> f64 {
        self.bilinear(self.pressure, pos, lerp)
    }

    /// Bilinearly interpolate the selected field at a fractional position.
    pub fn sample(&self, pos: Vec2, field: FieldKind) -> Sampled {
        match field {
            FieldKind::Velocity => Sampled::Velocity(self.sample_velocity(pos)),
            FieldKind::Dye => Sampled::Dye(self.sample_dye(pos)),
            FieldKind::Pressure => Sampled::Pressure(self.sample_pressure(pos)),
        }
    }

    /// Largest squared speed over all committed cells.
    pub fn max_speed_sq(&self) -> f64 {
        self.velocity
            .iter()
            .map(|v| v.length_sq())
            .fold(0.0, f64::max)
    }

    /// Interpolate between the four cells surrounding `pos`.
    ///
    /// The cell at `floor(pos)` is the lower-left corner; each of the
    /// four corner lookups is resolved through the boundary policy
    /// independently, so positions beyond an edge replicate (or wrap)
    /// the edge values.
    fn bilinear<T: Copy>(&self, data: &[T], pos: Vec2, mix: fn(T, T, f64) -> T) -> T {
        let fx = pos.x.floor();
        let fy = pos.y.floor();
        let tx = pos.x - fx;
        let ty = pos.y - fy;
        let x0 = fx as i64;
        let y0 = fy as i64;
        let x1 = x0.saturating_add(1);
        let y1 = y0.saturating_add(1);

        let p00 = data[self.resolve(x0, y0)];
        let p10 = data[self.resolve(x1, y0)];
        let p01 = data[self.resolve(x0, y1)];
        let p11 = data[self.resolve(x1, y1)];

        mix(mix(p00, p10, tx), mix(p01, p11, tx), ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldStore;
    use proptest::prelude::*;

    fn ramp_store(boundary: SampleBoundary) -> FieldStore {
        // pressure(x, y) = x + 10 * y on a 5x5 grid
        let dims = GridDims::new(5, 5);
        let mut store = FieldStore::new(dims, boundary).unwrap();
        for y in 0..5 {
            for x in 0..5 {
                store.set_pressure(x, y, x as f64 + 10.0 * y as f64);
            }
        }
        store
    }

    #[test]
    fn integer_positions_return_cell_values() {
        let store = ramp_store(SampleBoundary::Clamp);
        let view = store.view();
        assert_eq!(view.sample_pressure(Vec2::new(2.0, 3.0)), 32.0);
        assert_eq!(view.sample_pressure(Vec2::new(0.0, 0.0)), 0.0);
    }

    #[test]
    fn interior_sampling_is_bilinear() {
        let store = ramp_store(SampleBoundary::Clamp);
        let view = store.view();
        let p = view.sample_pressure(Vec2::new(1.5, 2.25));
        assert!((p - (1.5 + 22.5)).abs() < 1e-12, "got {p}");
    }

    #[test]
    fn clamp_replicates_edges() {
        let store = ramp_store(SampleBoundary::Clamp);
        let view = store.view();
        assert_eq!(view.sample_pressure(Vec2::new(-3.5, 0.0)), 0.0);
        assert_eq!(view.sample_pressure(Vec2::new(9.0, 4.0)), 44.0);
        assert_eq!(view.pressure_at(-1, 2), 20.0);
        assert_eq!(view.pressure_at(7, 7), 44.0);
    }

    #[test]
    fn wrap_is_periodic() {
        let store = ramp_store(SampleBoundary::Wrap);
        let view = store.view();
        assert_eq!(view.pressure_at(-1, 0), 4.0);
        assert_eq!(view.pressure_at(0, 5), 0.0);
        // Halfway between column 4 and wrapped column 0.
        let p = view.sample_pressure(Vec2::new(4.5, 0.0));
        assert!((p - 2.0).abs() < 1e-12, "got {p}");
    }

    #[test]
    fn sample_dispatches_on_field_kind() {
        let store = ramp_store(SampleBoundary::Clamp);
        let view = store.view();
        let pos = Vec2::new(2.0, 2.0);
        assert_eq!(view.sample(pos, FieldKind::Pressure), Sampled::Pressure(22.0));
        assert_eq!(
            view.sample(pos, FieldKind::Velocity),
            Sampled::Velocity(view.velocity(2, 2))
        );
        assert_eq!(view.sample(pos, FieldKind::Dye), Sampled::Dye(view.dye(2, 2)));
    }

    proptest! {
        #[test]
        fn sample_stays_within_field_range(px in -20.0f64..20.0, py in -20.0f64..20.0) {
            for boundary in [SampleBoundary::Clamp, SampleBoundary::Wrap] {
                let store = ramp_store(boundary);
                let p = store.view().sample_pressure(Vec2::new(px, py));
                prop_assert!((-1e-9..=44.0 + 1e-9).contains(&p), "{p} out of range");
            }
        }
    }
}
