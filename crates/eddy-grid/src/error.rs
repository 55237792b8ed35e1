//! Error types for field store construction.

use std::fmt;

/// Errors arising from field store construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The grid has no interior: each axis needs at least three cells so
    /// that something remains inside the solid border ring.
    TooSmall {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// `width * height` does not fit in `usize`.
    CellCountOverflow {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { width, height } => write!(
                f,
                "grid {width}x{height} is too small: both axes must be at least 3"
            ),
            Self::CellCountOverflow { width, height } => {
                write!(f, "grid {width}x{height} overflows the cell count")
            }
        }
    }
}

impl std::error::Error for GridError {}
