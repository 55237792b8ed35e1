//! Double-buffered field storage and sampling for the Eddy fluid solver.
//!
//! [`FieldStore`] owns every per-cell quantity (velocity, dye, pressure)
//! together with a scratch copy of each. Stages read the committed
//! fields through a [`FieldView`] and write the scratch buffers; a
//! separate commit pass copies scratch into committed. The two borrow
//! splits, [`FieldStore::stage`] and [`FieldStore::commit_split`], make
//! it impossible to read a buffer that is being written in the same pass.
//!
//! Solid cells are not stored: [`Geometry`] derives them from grid
//! coordinates alone.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod scratch;
pub mod snapshot;
pub mod store;
pub mod view;

pub use error::GridError;
pub use geometry::{Geometry, OpenRect};
pub use scratch::{CommittedMut, ScratchMut, ScratchView};
pub use snapshot::FieldSnapshot;
pub use store::{FieldStore, INITIAL_VELOCITY};
pub use view::{FieldView, Sampled};
