//! Error types for the Eddy fluid solver.
//!
//! Organised by the layer that raises them: a single cell's kernel
//! ([`KernelFault`]), one band task ([`BandFault`]), one full-grid
//! dispatch ([`StageError`]), and one tick ([`StepError`]).

use std::error::Error;
use std::fmt;
use std::ops::Range;

/// Which per-cell quantity a fault refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// The two-component velocity field.
    Velocity,
    /// The three-channel dye field.
    Dye,
    /// The scalar pressure field.
    Pressure,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Velocity => write!(f, "velocity"),
            Self::Dye => write!(f, "dye"),
            Self::Pressure => write!(f, "pressure"),
        }
    }
}

/// A failure inside one cell's computation.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelFault {
    /// The kernel produced NaN or an infinity.
    NonFinite {
        /// The field being written.
        field: FieldKind,
        /// Column of the offending cell.
        x: usize,
        /// Row of the offending cell.
        y: usize,
    },
    /// The kernel panicked; the payload message is preserved when it
    /// was a string.
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl fmt::Display for KernelFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite { field, x, y } => {
                write!(f, "non-finite {field} at cell ({x}, {y})")
            }
            Self::Panicked { message } => write!(f, "kernel panicked: {message}"),
        }
    }
}

impl Error for KernelFault {}

/// The first fault raised by one band task.
///
/// A band stops at its first faulting cell; cells after it in the same
/// band are left unwritten.
#[derive(Clone, Debug, PartialEq)]
pub struct BandFault {
    /// Zero-based band index within the dispatch.
    pub band: usize,
    /// Row range owned by the band.
    pub rows: Range<usize>,
    /// The underlying fault.
    pub fault: KernelFault,
}

impl fmt::Display for BandFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "band {} (rows {}..{}): {}",
            self.band, self.rows.start, self.rows.end, self.fault
        )
    }
}

impl Error for BandFault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.fault)
    }
}

/// Aggregated outcome of a full-grid dispatch that did not succeed.
///
/// A dispatch either completes on every band or fails as a whole; the
/// caller must treat the written buffer as unusable on any error.
#[derive(Clone, Debug, PartialEq)]
pub enum StageError {
    /// One or more bands faulted. Faults are listed in band order.
    BandsFailed(Vec<BandFault>),
    /// Fewer bands signalled completion than were submitted.
    BarrierBroken {
        /// Number of bands submitted.
        expected: usize,
        /// Number of completion signals received.
        received: usize,
    },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BandsFailed(faults) => {
                write!(f, "{} band(s) failed: ", faults.len())?;
                for (i, fault) in faults.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{fault}")?;
                }
                Ok(())
            }
            Self::BarrierBroken { expected, received } => {
                write!(
                    f,
                    "barrier broken: {received} of {expected} bands signalled completion"
                )
            }
        }
    }
}

impl Error for StageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::BandsFailed(faults) => faults.first().map(|f| f as &(dyn Error + 'static)),
            Self::BarrierBroken { .. } => None,
        }
    }
}

/// Errors from advancing the simulation by one tick.
#[derive(Clone, Debug, PartialEq)]
pub enum StepError {
    /// A pipeline stage failed; the tick was abandoned part-way and the
    /// field store may hold a mix of old and new values.
    StageFailed {
        /// Name of the failing stage.
        stage: String,
        /// The dispatch failure.
        reason: StageError,
    },
    /// Ticking is disabled because an earlier tick failed. Call
    /// `reset()` to rebuild the initial condition.
    TickDisabled,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageFailed { stage, reason } => {
                write!(f, "stage '{stage}' failed: {reason}")
            }
            Self::TickDisabled => write!(f, "ticking disabled after a failed tick"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StageFailed { reason, .. } => Some(reason),
            Self::TickDisabled => None,
        }
    }
}
