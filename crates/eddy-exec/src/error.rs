//! Executor construction errors.

use std::fmt;

/// Errors from building a [`BandExecutor`](crate::BandExecutor).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutorError {
    /// The worker pool could not be created.
    PoolBuild {
        /// Reason reported by the pool builder.
        reason: String,
    },
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PoolBuild { reason } => write!(f, "failed to build worker pool: {reason}"),
        }
    }
}

impl std::error::Error for ExecutorError {}
