//! Test fixtures and config builders for Eddy development.
//!
//! Provides stages with controlled failure behaviour ([`FailingStage`],
//! [`PanickingStage`]) and small, fast configurations for tests that
//! need a whole simulation.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{FailingStage, IdentityStage, PanickingStage, NUDGE};

use eddy_engine::SolverConfig;

/// A `size`x`size` config with cheap relaxation and two workers.
///
/// Keeps the default viscosity, timestep and boundary so results stay
/// representative of the full solver.
pub fn small_config(size: usize) -> SolverConfig {
    SolverConfig {
        width: size,
        height: size,
        granularity: 4,
        worker_count: Some(2),
        diffusion_sweeps: 8,
        pressure_sweeps: 8,
        ..SolverConfig::default()
    }
}

/// [`small_config`] with a specific band count.
pub fn banded_config(size: usize, granularity: usize) -> SolverConfig {
    SolverConfig {
        granularity,
        ..small_config(size)
    }
}
