//! The five numerical stages of a stable-fluids tick.

use eddy_core::StageError;

use crate::context::StageContext;
use crate::kernels::{self, finite_dye, finite_pressure, finite_velocity};
use crate::pipeline::PipelineError;
use crate::stage::Stage;

/// Default Jacobi sweeps for viscous diffusion.
pub const DEFAULT_DIFFUSION_SWEEPS: usize = 80;

/// Default Jacobi sweeps for the pressure solve.
pub const DEFAULT_PRESSURE_SWEEPS: usize = 50;

// ── Advection ──────────────────────────────────────────────────────

/// Semi-Lagrangian transport of velocity and dye.
#[derive(Clone, Copy, Debug, Default)]
pub struct Advection;

impl Stage for Advection {
    fn name(&self) -> &str {
        "advection"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        let dt = ctx.dt();
        let check = ctx.check_finite();
        ctx.write_velocity_and_dye(|view, x, y| {
            let (v, d) = kernels::advect(view, x, y, dt);
            Ok((finite_velocity(check, x, y, v)?, finite_dye(check, x, y, d)?))
        })?;
        ctx.commit_velocity_and_dye()
    }
}

// ── Diffusion ──────────────────────────────────────────────────────

/// Implicit viscous diffusion by Jacobi relaxation.
///
/// Each sweep reads the velocity committed by the previous sweep.
#[derive(Clone, Copy, Debug)]
pub struct Diffusion {
    /// Kinematic viscosity. Must be finite and positive.
    pub viscosity: f64,
    /// Number of Jacobi sweeps.
    pub sweeps: usize,
}

impl Diffusion {
    /// Diffusion with the default sweep count.
    pub fn new(viscosity: f64) -> Self {
        Self {
            viscosity,
            sweeps: DEFAULT_DIFFUSION_SWEEPS,
        }
    }
}

impl Stage for Diffusion {
    fn name(&self) -> &str {
        "diffusion"
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if !self.viscosity.is_finite() || self.viscosity <= 0.0 {
            return Err(PipelineError::InvalidViscosity {
                value: self.viscosity,
            });
        }
        if self.sweeps == 0 {
            return Err(PipelineError::ZeroSweeps {
                stage: self.name().to_string(),
            });
        }
        Ok(())
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        let (alpha, beta) = kernels::diffusion_coefficients(self.viscosity, ctx.dt());
        let check = ctx.check_finite();
        for _ in 0..self.sweeps {
            ctx.write_velocity(|view, x, y| {
                finite_velocity(check, x, y, kernels::diffuse(view, x, y, alpha, beta))
            })?;
            ctx.commit_velocity()?;
        }
        Ok(())
    }
}

// ── Projection ─────────────────────────────────────────────────────

/// Jacobi solve of the pressure Poisson equation.
///
/// Pressure carries over between ticks as the seed of the next solve.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    /// Number of Jacobi sweeps.
    pub sweeps: usize,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            sweeps: DEFAULT_PRESSURE_SWEEPS,
        }
    }
}

impl Stage for Projection {
    fn name(&self) -> &str {
        "projection"
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.sweeps == 0 {
            return Err(PipelineError::ZeroSweeps {
                stage: self.name().to_string(),
            });
        }
        Ok(())
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        let check = ctx.check_finite();
        for _ in 0..self.sweeps {
            ctx.write_pressure(|view, x, y| {
                finite_pressure(check, x, y, kernels::pressure(view, x, y))
            })?;
            ctx.commit_pressure()?;
        }
        Ok(())
    }
}

// ── Gradient subtraction ───────────────────────────────────────────

/// Removes the pressure gradient from velocity.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientSubtraction;

impl Stage for GradientSubtraction {
    fn name(&self) -> &str {
        "gradient"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        let check = ctx.check_finite();
        ctx.write_velocity(|view, x, y| {
            finite_velocity(check, x, y, kernels::subtract_gradient(view, x, y))
        })?;
        ctx.commit_velocity()
    }
}

// ── Forcing ────────────────────────────────────────────────────────

/// Constant leftward impulse inside the forcing region.
#[derive(Clone, Copy, Debug)]
pub struct Forcing {
    /// Amount subtracted from the x velocity each tick.
    pub impulse: f64,
}

impl Default for Forcing {
    fn default() -> Self {
        Self {
            impulse: kernels::FORCING_IMPULSE,
        }
    }
}

impl Stage for Forcing {
    fn name(&self) -> &str {
        "forcing"
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        let check = ctx.check_finite();
        let impulse = self.impulse;
        ctx.write_velocity(|view, x, y| {
            finite_velocity(check, x, y, kernels::force(view, x, y, impulse))
        })?;
        ctx.commit_velocity()
    }
}
