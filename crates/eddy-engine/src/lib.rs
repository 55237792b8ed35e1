//! Simulation driver for the Eddy fluid solver.
//!
//! [`FluidSimulation`] owns the field store, the band executor and the
//! stage pipeline, and advances them one tick at a time. It also answers
//! the visual query ([`colour_at`](FluidSimulation::colour_at)) and keeps
//! tick-rate instrumentation. [`RealtimeSimulation`] runs the same
//! simulation on a dedicated thread and publishes snapshots for readers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod colour;
pub mod config;
pub mod metrics;
pub mod publish;
pub mod realtime;
pub mod simulation;
mod tick_thread;

pub use colour::{colour_at, Colour, ColourMode, ColourQuery};
pub use config::{ConfigError, RealtimeConfig, SolverConfig};
pub use metrics::StepMetrics;
pub use publish::SnapshotSlot;
pub use realtime::{RealtimeError, RealtimeSimulation, ShutdownReport};
pub use simulation::{FluidSimulation, TickReport};
