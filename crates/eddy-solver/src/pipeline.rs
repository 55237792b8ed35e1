//! Pipeline assembly and startup validation.

use std::error::Error;
use std::fmt;

use indexmap::IndexMap;

use crate::stage::Stage;
use crate::stages::{Advection, Diffusion, Forcing, GradientSubtraction, Projection};
use crate::timestep::TimestepPolicy;

// ── Errors ─────────────────────────────────────────────────────────

/// Errors from pipeline validation (startup-time, not per-tick).
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineError {
    /// No stages registered.
    EmptyPipeline,
    /// Two stages share a name, which would make metrics and error
    /// reports ambiguous.
    DuplicateStage {
        /// The repeated name.
        name: String,
    },
    /// A relaxation stage was configured with zero sweeps.
    ZeroSweeps {
        /// Which stage.
        stage: String,
    },
    /// Viscosity is NaN, infinite, zero, or negative.
    InvalidViscosity {
        /// The invalid value.
        value: f64,
    },
    /// A fixed timestep is NaN, infinite, zero, or negative.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPipeline => write!(f, "pipeline has no stages"),
            Self::DuplicateStage { name } => write!(f, "stage name '{name}' is used twice"),
            Self::ZeroSweeps { stage } => {
                write!(f, "stage '{stage}' needs at least one sweep")
            }
            Self::InvalidViscosity { value } => {
                write!(f, "viscosity must be finite and positive, got {value}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "fixed timestep must be finite and positive, got {value}")
            }
        }
    }
}

impl Error for PipelineError {}

// ── Validation ─────────────────────────────────────────────────────

/// Validate a stage list.
///
/// Checks performed (all at startup, not per-tick):
///
/// 1. Pipeline is non-empty.
/// 2. Stage names are unique.
/// 3. Every stage's own [`validate`](Stage::validate) passes.
pub fn validate_pipeline(stages: &[Box<dyn Stage>]) -> Result<(), PipelineError> {
    if stages.is_empty() {
        return Err(PipelineError::EmptyPipeline);
    }

    let mut seen: IndexMap<&str, usize> = IndexMap::new();
    for (i, stage) in stages.iter().enumerate() {
        if seen.insert(stage.name(), i).is_some() {
            return Err(PipelineError::DuplicateStage {
                name: stage.name().to_string(),
            });
        }
    }

    for stage in stages {
        stage.validate()?;
    }
    Ok(())
}

// ── Pipeline ───────────────────────────────────────────────────────

/// An ordered, validated list of stages plus the timestep policy.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
    timestep: TimestepPolicy,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.names().collect::<Vec<_>>())
            .field("timestep", &self.timestep)
            .finish()
    }
}

impl Pipeline {
    /// Validate and assemble a pipeline.
    pub fn new(
        stages: Vec<Box<dyn Stage>>,
        timestep: TimestepPolicy,
    ) -> Result<Self, PipelineError> {
        if let TimestepPolicy::Fixed(value) = timestep {
            if !value.is_finite() || value <= 0.0 {
                return Err(PipelineError::InvalidTimestep { value });
            }
        }
        validate_pipeline(&stages)?;
        Ok(Self { stages, timestep })
    }

    /// The standard stable-fluids sequence: advection, diffusion,
    /// projection, gradient subtraction, forcing.
    pub fn stable_fluids(
        viscosity: f64,
        diffusion_sweeps: usize,
        pressure_sweeps: usize,
        timestep: TimestepPolicy,
    ) -> Result<Self, PipelineError> {
        let stages: Vec<Box<dyn Stage>> = vec![
            Box::new(Advection),
            Box::new(Diffusion {
                viscosity,
                sweeps: diffusion_sweeps,
            }),
            Box::new(Projection {
                sweeps: pressure_sweeps,
            }),
            Box::new(GradientSubtraction),
            Box::new(Forcing::default()),
        ];
        Self::new(stages, timestep)
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Box<dyn Stage>] {
        &self.stages
    }

    /// Stage names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name())
    }

    /// The timestep policy.
    pub fn timestep(&self) -> TimestepPolicy {
        self.timestep
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages. Always false once built.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
