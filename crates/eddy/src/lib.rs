//! Eddy: a parallel stable-fluids solver for 2D grids.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Eddy sub-crates. For most users, adding `eddy` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use eddy::prelude::*;
//!
//! let config = SolverConfig {
//!     granularity: 4,
//!     diffusion_sweeps: 10,
//!     pressure_sweeps: 10,
//!     ..SolverConfig::square(32)
//! };
//! let mut sim = FluidSimulation::new(config).unwrap();
//! let report = sim.tick().unwrap();
//! assert_eq!(report.tick, 1);
//!
//! // Border cells are solid and render black.
//! assert_eq!(sim.colour_at(0, 0), Some(Colour::BLACK));
//! assert_eq!(sim.colour_at(32, 0), None);
//! assert_eq!(sim.switch_colour_mode(), ColourMode::Velocity);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `eddy-core` | Cell value types, grid dimensions, errors |
//! | [`grid`] | `eddy-grid` | Field store, sampling, geometry, snapshots |
//! | [`exec`] | `eddy-exec` | Band partitioning and the parallel executor |
//! | [`solver`] | `eddy-solver` | Stage trait, stable-fluids stages, pipeline |
//! | [`engine`] | `eddy-engine` | Simulation driver, colour queries, tick thread |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types and the error taxonomy (`eddy-core`).
pub use eddy_core as types;

/// Field storage, bilinear sampling and solid geometry (`eddy-grid`).
///
/// [`grid::FieldStore`] owns the committed and scratch buffers;
/// [`grid::FieldSnapshot`] is an owned copy for other threads.
pub use eddy_grid as grid;

/// Row-band partitioning and the parallel-for executor (`eddy-exec`).
pub use eddy_exec as exec;

/// The [`solver::Stage`] trait and the stable-fluids stages (`eddy-solver`).
///
/// Implement [`solver::Stage`] to add custom passes to a
/// [`solver::Pipeline`].
pub use eddy_solver as solver;

/// Simulation driver (`eddy-engine`).
///
/// [`engine::FluidSimulation`] for ticking on the caller's thread,
/// [`engine::RealtimeSimulation`] for a background tick thread.
pub use eddy_engine as engine;

/// Common imports for typical Eddy usage.
///
/// ```rust
/// use eddy::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use eddy_core::{Dye, FieldKind, GridDims, SampleBoundary, Vec2};

    // Errors
    pub use eddy_core::{KernelFault, StageError, StepError};

    // Grid
    pub use eddy_grid::{FieldSnapshot, FieldStore, FieldView};

    // Solver
    pub use eddy_solver::{Pipeline, PipelineError, Stage, StageContext, TimestepPolicy};

    // Engine
    pub use eddy_engine::{
        Colour, ColourMode, ColourQuery, ConfigError, FluidSimulation, RealtimeConfig,
        RealtimeSimulation, SolverConfig, StepMetrics, TickReport,
    };
}
