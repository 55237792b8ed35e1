//! Timestep selection.

use eddy_core::StageError;
use eddy_exec::BandExecutor;
use eddy_grid::FieldView;

/// Scale of the adaptive rule `dt = scale / max|v|`.
pub const ADAPTIVE_SCALE: f64 = 2.0;

/// Timestep used by the adaptive rule when every cell is at rest.
pub const FALLBACK_TIMESTEP: f64 = 0.01;

/// How each tick chooses its timestep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimestepPolicy {
    /// Use the configured value unchanged every tick.
    Fixed(f64),
    /// Bound the backtrace distance by the fastest cell:
    /// `dt = scale / sqrt(max |v|^2)`, or `fallback` when that maximum
    /// is exactly zero.
    Adaptive {
        /// Numerator of the adaptive rule.
        scale: f64,
        /// Timestep when the field is at rest.
        fallback: f64,
    },
}

impl Default for TimestepPolicy {
    fn default() -> Self {
        Self::Adaptive {
            scale: ADAPTIVE_SCALE,
            fallback: FALLBACK_TIMESTEP,
        }
    }
}

impl TimestepPolicy {
    /// Policy for a configured timestep, where `0.0` selects the adaptive
    /// rule.
    pub fn from_configured(timestep: f64) -> Self {
        if timestep == 0.0 {
            Self::default()
        } else {
            Self::Fixed(timestep)
        }
    }

    /// Whether the policy needs a velocity scan.
    pub fn is_adaptive(&self) -> bool {
        matches!(self, Self::Adaptive { .. })
    }

    /// Timestep for a given maximum squared speed.
    pub fn for_max_speed_sq(&self, max_speed_sq: f64) -> f64 {
        match *self {
            Self::Fixed(dt) => dt,
            Self::Adaptive { scale, fallback } => {
                if max_speed_sq == 0.0 {
                    fallback
                } else {
                    scale / max_speed_sq.sqrt()
                }
            }
        }
    }

    /// Select the timestep for the committed fields in `view`.
    ///
    /// Fixed policies never touch the fields. Adaptive policies scan every
    /// cell through `executor`, one band per task.
    pub fn select(
        &self,
        executor: &BandExecutor,
        view: &FieldView<'_>,
        bands: usize,
    ) -> Result<f64, StageError> {
        if !self.is_adaptive() {
            return Ok(self.for_max_speed_sq(0.0));
        }
        let max_sq = max_speed_sq(executor, view, bands)?;
        let dt = self.for_max_speed_sq(max_sq);
        tracing::debug!(dt, max_speed = max_sq.sqrt(), "adaptive timestep");
        Ok(dt)
    }
}

/// Parallel scan for the largest squared speed over all cells.
pub fn max_speed_sq(
    executor: &BandExecutor,
    view: &FieldView<'_>,
    bands: usize,
) -> Result<f64, StageError> {
    let dims = view.dims();
    let per_band = executor.map_bands(dims, bands, |band| {
        let mut max = 0.0f64;
        for y in band.rows.clone() {
            for x in 0..dims.width() {
                max = max.max(view.velocity(x, y).length_sq());
            }
        }
        Ok(max)
    })?;
    Ok(per_band.into_iter().fold(0.0, f64::max))
}
