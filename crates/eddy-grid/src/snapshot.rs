//! Owned, immutable copies of the committed fields.

use eddy_core::{Dye, GridDims, SampleBoundary, Vec2};

use crate::geometry::Geometry;
use crate::view::FieldView;

/// A point-in-time copy of every committed field.
///
/// Snapshots are taken between ticks and never observe a partially
/// committed stage. They are `Send + Sync` and typically shared as
/// `Arc<FieldSnapshot>` with observer threads.
#[derive(Clone, Debug)]
pub struct FieldSnapshot {
    pub(crate) tick: u64,
    pub(crate) dims: GridDims,
    pub(crate) boundary: SampleBoundary,
    pub(crate) geometry: Geometry,
    pub(crate) velocity: Vec<Vec2>,
    pub(crate) dye: Vec<Dye>,
    pub(crate) pressure: Vec<f64>,
}

impl FieldSnapshot {
    /// Number of completed ticks when the snapshot was taken.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Borrowed view for reading and sampling.
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
}
