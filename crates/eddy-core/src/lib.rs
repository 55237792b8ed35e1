//! Core types and error taxonomy for the Eddy fluid solver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value types stored per cell (velocity and dye), grid dimensions,
//! the off-grid lookup policy, and the error types shared by the field
//! store, the band executor, and the solver pipeline.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod dims;
pub mod error;
pub mod math;

pub use boundary::SampleBoundary;
pub use dims::GridDims;
pub use error::{BandFault, FieldKind, KernelFault, StageError, StepError};
pub use math::{Dye, Vec2};
