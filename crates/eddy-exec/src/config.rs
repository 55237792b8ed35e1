//! Worker pool configuration.

/// Upper bound on explicitly requested workers.
const MAX_WORKERS: usize = 64;

/// Configuration for a [`BandExecutor`](crate::BandExecutor).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Number of pool threads. `None` = auto-detect from
    /// `available_parallelism`.
    pub worker_count: Option<usize>,
}

impl ExecutorConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Both explicit and detected values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, MAX_WORKERS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .clamp(1, MAX_WORKERS),
        }
    }
}
