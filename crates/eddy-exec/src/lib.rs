//! Row-band parallel executor for the Eddy fluid solver.
//!
//! A [`BandExecutor`] owns a fixed-size worker pool. Each dispatch splits
//! the grid's rows into contiguous [`RowBand`]s, runs one task per band,
//! and returns only after every band has reported its outcome. Band
//! outputs are disjoint `&mut` slices carved from the destination buffer,
//! so no two tasks can write the same cell; inputs are shared immutable
//! borrows of the previous pass's committed state, so tasks may read
//! across band boundaries freely.
//!
//! Any band that faults (a [`KernelFault`](eddy_core::KernelFault) or a
//! panic) is reported back to the caller as part of a
//! [`StageError`](eddy_core::StageError); a dispatch never returns `Ok`
//! unless every band completed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod band;
pub mod config;
pub mod error;
pub mod executor;
pub mod output;

pub use band::{band_height, partition, RowBand};
pub use config::ExecutorConfig;
pub use error::ExecutorError;
pub use executor::BandExecutor;
pub use output::BandOutput;
