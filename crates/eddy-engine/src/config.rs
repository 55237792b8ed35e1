//! Simulation configuration, validation, and error types.

use std::error::Error;
use std::fmt;

use eddy_core::{GridDims, SampleBoundary};
use eddy_exec::{ExecutorConfig, ExecutorError};
use eddy_grid::GridError;
use eddy_solver::{PipelineError, DEFAULT_DIFFUSION_SWEEPS, DEFAULT_PRESSURE_SWEEPS};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`SolverConfig::validate()`] or while building
/// a simulation from a valid config.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Field store construction failed.
    Grid(GridError),
    /// Stage pipeline validation failed.
    Pipeline(PipelineError),
    /// The band executor could not be built.
    Executor(ExecutorError),
    /// A grid axis is shorter than three cells.
    GridTooSmall {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
    /// `width * height` overflows `usize`.
    CellCountOverflow {
        /// Configured width.
        width: usize,
        /// Configured height.
        height: usize,
    },
    /// Viscosity is NaN, infinite, zero, or negative.
    InvalidViscosity {
        /// The invalid value.
        value: f64,
    },
    /// Timestep is NaN, infinite, or negative.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
    /// Granularity (bands per dispatch) is zero.
    ZeroGranularity,
    /// A Jacobi sweep count is zero.
    ZeroSweeps {
        /// Which relaxation (`"diffusion"` or `"pressure"`).
        solve: &'static str,
    },
    /// tick_rate_hz is NaN, infinite, zero, or negative.
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Pipeline(e) => write!(f, "pipeline: {e}"),
            Self::Executor(e) => write!(f, "executor: {e}"),
            Self::GridTooSmall { width, height } => {
                write!(f, "grid {width}x{height} is too small: both axes must be at least 3")
            }
            Self::CellCountOverflow { width, height } => {
                write!(f, "grid {width}x{height} overflows the cell count")
            }
            Self::InvalidViscosity { value } => {
                write!(f, "viscosity must be finite and positive, got {value}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "timestep must be finite and non-negative, got {value}")
            }
            Self::ZeroGranularity => write!(f, "granularity must be at least 1"),
            Self::ZeroSweeps { solve } => write!(f, "{solve} sweeps must be at least 1"),
            Self::InvalidTickRate { value } => {
                write!(f, "tick_rate_hz must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Pipeline(e) => Some(e),
            Self::Executor(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<PipelineError> for ConfigError {
    fn from(e: PipelineError) -> Self {
        Self::Pipeline(e)
    }
}

impl From<ExecutorError> for ConfigError {
    fn from(e: ExecutorError) -> Self {
        Self::Executor(e)
    }
}

// ── SolverConfig ───────────────────────────────────────────────────

/// Construction parameters for a
/// [`FluidSimulation`](crate::FluidSimulation).
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Grid width in cells. Minimum: 3. Default: 150.
    pub width: usize,
    /// Grid height in cells. Minimum: 3. Default: 150.
    pub height: usize,
    /// Kinematic viscosity. Default: 0.001.
    pub viscosity: f64,
    /// Fixed timestep; `0.0` selects the adaptive rule. Default: 0.1.
    pub timestep: f64,
    /// Row bands per dispatch. Default: 24.
    pub granularity: usize,
    /// Worker threads. `None` = auto-detect. Explicit values clamp to
    /// `[1, 64]`.
    pub worker_count: Option<usize>,
    /// Off-grid lookup policy. Default: clamp.
    pub boundary: SampleBoundary,
    /// Jacobi sweeps for viscous diffusion. Default: 80.
    pub diffusion_sweeps: usize,
    /// Jacobi sweeps for the pressure solve. Default: 50.
    pub pressure_sweeps: usize,
    /// Fault a tick instead of committing NaN or infinity. Default: true.
    pub check_finite: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            width: 150,
            height: 150,
            viscosity: 0.001,
            timestep: 0.1,
            granularity: 24,
            worker_count: None,
            boundary: SampleBoundary::Clamp,
            diffusion_sweeps: DEFAULT_DIFFUSION_SWEEPS,
            pressure_sweeps: DEFAULT_PRESSURE_SWEEPS,
            check_finite: true,
        }
    }
}

impl SolverConfig {
    /// Square grid of `size` cells per side with all other defaults.
    pub fn square(size: usize) -> Self {
        Self {
            width: size,
            height: size,
            ..Self::default()
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.width, self.height);
        if width < 3 || height < 3 {
            return Err(ConfigError::GridTooSmall { width, height });
        }
        if width.checked_mul(height).is_none() {
            return Err(ConfigError::CellCountOverflow { width, height });
        }
        if !self.viscosity.is_finite() || self.viscosity <= 0.0 {
            return Err(ConfigError::InvalidViscosity {
                value: self.viscosity,
            });
        }
        if !self.timestep.is_finite() || self.timestep < 0.0 {
            return Err(ConfigError::InvalidTimestep {
                value: self.timestep,
            });
        }
        if self.granularity == 0 {
            return Err(ConfigError::ZeroGranularity);
        }
        if self.diffusion_sweeps == 0 {
            return Err(ConfigError::ZeroSweeps { solve: "diffusion" });
        }
        if self.pressure_sweeps == 0 {
            return Err(ConfigError::ZeroSweeps { solve: "pressure" });
        }
        Ok(())
    }

    /// Grid dimensions.
    pub fn dims(&self) -> GridDims {
        GridDims::new(self.width, self.height)
    }

    /// Executor settings derived from this config.
    pub fn executor(&self) -> ExecutorConfig {
        ExecutorConfig {
            worker_count: self.worker_count,
        }
    }
}

// ── RealtimeConfig ─────────────────────────────────────────────────

/// Configuration for [`RealtimeSimulation`](crate::RealtimeSimulation).
#[derive(Clone, Debug, PartialEq)]
pub struct RealtimeConfig {
    /// Target tick rate. `None` = tick back to back.
    pub tick_rate_hz: Option<f64>,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: None,
        }
    }
}

impl RealtimeConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(hz) = self.tick_rate_hz {
            if !hz.is_finite() || hz <= 0.0 || !(1.0 / hz).is_finite() {
                return Err(ConfigError::InvalidTickRate { value: hz });
            }
        }
        Ok(())
    }
}
