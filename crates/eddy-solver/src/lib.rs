//! Stable-fluids stage pipeline for the Eddy fluid solver.
//!
//! A tick is a fixed sequence of [`Stage`]s, each made of full-grid passes
//! dispatched through the band executor:
//!
//! 1. timestep selection ([`TimestepPolicy`]),
//! 2. [`Advection`] of velocity and dye,
//! 3. [`Diffusion`] by Jacobi relaxation,
//! 4. [`Projection`]: Jacobi pressure solve,
//! 5. [`GradientSubtraction`],
//! 6. [`Forcing`] inside the forcing region.
//!
//! The per-cell arithmetic lives in [`kernels`] as pure functions over a
//! committed [`FieldView`](eddy_grid::FieldView).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod kernels;
pub mod pipeline;
pub mod stage;
pub mod stages;
pub mod timestep;

pub use context::StageContext;
pub use pipeline::{validate_pipeline, Pipeline, PipelineError};
pub use stage::Stage;
pub use stages::{
    Advection, Diffusion, Forcing, GradientSubtraction, Projection, DEFAULT_DIFFUSION_SWEEPS,
    DEFAULT_PRESSURE_SWEEPS,
};
pub use timestep::{TimestepPolicy, ADAPTIVE_SCALE, FALLBACK_TIMESTEP};
