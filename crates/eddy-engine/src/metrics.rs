//! Per-tick performance metrics.
//!
//! [`StepMetrics`] captures timing data for a single tick. The simulation
//! replaces it after every successful tick; readers see the most recent.

use indexmap::IndexMap;

/// Timing data collected during a single tick.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepMetrics {
    /// Wall-clock time for the entire tick.
    pub total_us: u64,
    /// Time spent selecting the timestep (the velocity scan, when
    /// adaptive).
    pub timestep_us: u64,
    /// The timestep the tick used.
    pub timestep: f64,
    /// Per-stage execution times in pipeline order.
    pub stage_us: IndexMap<String, u64>,
}

impl StepMetrics {
    /// Sum of per-stage times.
    pub fn stages_total_us(&self) -> u64 {
        self.stage_us.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.timestep_us, 0);
        assert_eq!(m.timestep, 0.0);
        assert!(m.stage_us.is_empty());
    }

    #[test]
    fn stage_times_keep_pipeline_order() {
        let mut m = StepMetrics::default();
        m.stage_us.insert("advection".into(), 40);
        m.stage_us.insert("diffusion".into(), 300);
        m.stage_us.insert("projection".into(), 200);
        let names: Vec<_> = m.stage_us.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["advection", "diffusion", "projection"]);
        assert_eq!(m.stages_total_us(), 540);
    }
}
