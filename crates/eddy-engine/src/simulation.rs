//! The simulation driver: owns the field store, executor and pipeline.
//!
//! [`FluidSimulation`] advances the fluid one tick at a time on the
//! calling thread (the per-stage work itself fans out to the band
//! executor). `tick(&mut self)` holds an exclusive borrow for the whole
//! tick, so no query can observe a half-finished tick; the read-only
//! queries (`colour_at`, `snapshot`, `view`) run between ticks.

use std::time::Instant;

use indexmap::IndexMap;

use eddy_core::StepError;
use eddy_exec::BandExecutor;
use eddy_grid::{FieldSnapshot, FieldStore, FieldView};
use eddy_solver::{Pipeline, StageContext, TimestepPolicy};

use crate::colour::{self, Colour, ColourMode};
use crate::config::{ConfigError, SolverConfig};
use crate::metrics::StepMetrics;

/// Name reported when timestep selection fails.
const TIMESTEP_STAGE: &str = "timestep";

// ── TickReport ───────────────────────────────────────────────────

/// Result of a successful tick.
#[derive(Clone, Debug)]
pub struct TickReport {
    /// Number of completed ticks, including this one.
    pub tick: u64,
    /// Timing for this tick.
    pub metrics: StepMetrics,
}

// ── SimTimer ─────────────────────────────────────────────────────

/// Tick-rate measurement window, restarted by `start_timer()`.
#[derive(Clone, Copy, Debug)]
struct SimTimer {
    start: Instant,
    ticks: u64,
}

impl SimTimer {
    fn started() -> Self {
        Self {
            start: Instant::now(),
            ticks: 0,
        }
    }

    fn rate(&self) -> f64 {
        let secs = self.start.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.ticks as f64 / secs
        } else {
            0.0
        }
    }
}

// ── FluidSimulation ──────────────────────────────────────────────

/// A stable-fluids simulation over a fixed 2D grid.
pub struct FluidSimulation {
    config: SolverConfig,
    store: FieldStore,
    executor: BandExecutor,
    pipeline: Pipeline,
    colour_mode: ColourMode,
    tick_count: u64,
    tick_disabled: bool,
    last_metrics: StepMetrics,
    timer: SimTimer,
}

impl std::fmt::Debug for FluidSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FluidSimulation")
            .field("dims", &self.store.dims())
            .field("pipeline", &self.pipeline)
            .field("executor", &self.executor)
            .field("tick_count", &self.tick_count)
            .field("tick_disabled", &self.tick_disabled)
            .finish()
    }
}

impl FluidSimulation {
    /// Build the standard stable-fluids simulation.
    ///
    /// Validates `config` before allocating any buffer or thread.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let pipeline = Pipeline::stable_fluids(
            config.viscosity,
            config.diffusion_sweeps,
            config.pressure_sweeps,
            TimestepPolicy::from_configured(config.timestep),
        )?;
        Self::with_pipeline(config, pipeline)
    }

    /// Build a simulation with a custom stage pipeline.
    ///
    /// The grid, executor and tick settings still come from `config`;
    /// its viscosity and sweep counts are ignored in favour of whatever
    /// stages `pipeline` carries.
    pub fn with_pipeline(config: SolverConfig, pipeline: Pipeline) -> Result<Self, ConfigError> {
        config.validate()?;
        let store = FieldStore::new(config.dims(), config.boundary)?;
        let executor = BandExecutor::new(&config.executor())?;
        let geometry = store.geometry();
        tracing::debug!(
            width = config.width,
            height = config.height,
            granularity = config.granularity,
            workers = executor.workers(),
            solid_cells = geometry.solid_count(),
            forcing = ?geometry.forcing_region(),
            "simulation built"
        );
        Ok(Self {
            config,
            store,
            executor,
            pipeline,
            colour_mode: ColourMode::default(),
            tick_count: 0,
            tick_disabled: false,
            last_metrics: StepMetrics::default(),
            timer: SimTimer::started(),
        })
    }

    /// Advance the simulation by exactly one tick.
    ///
    /// Runs timestep selection, then every stage in order. If any
    /// dispatch fails, the tick is abandoned part-way, ticking is
    /// disabled, and every later call returns
    /// [`StepError::TickDisabled`] until [`reset`](Self::reset).
    pub fn tick(&mut self) -> Result<TickReport, StepError> {
        if self.tick_disabled {
            return Err(StepError::TickDisabled);
        }
        let tick_start = Instant::now();
        let bands = self.config.granularity;

        // 1. Timestep.
        let ts_start = Instant::now();
        let selected = {
            let view = self.store.view();
            self.pipeline
                .timestep()
                .select(&self.executor, &view, bands)
        };
        let dt = match selected {
            Ok(dt) => dt,
            Err(reason) => return Err(self.disable(TIMESTEP_STAGE, reason)),
        };
        let timestep_us = ts_start.elapsed().as_micros() as u64;

        // 2. Stages.
        let mut stage_us = IndexMap::with_capacity(self.pipeline.len());
        for stage in self.pipeline.stages() {
            let stage_start = Instant::now();
            let mut ctx = StageContext::new(
                &mut self.store,
                &self.executor,
                dt,
                bands,
                self.config.check_finite,
            );
            if let Err(reason) = stage.run(&mut ctx) {
                self.tick_disabled = true;
                tracing::warn!(
                    stage = stage.name(),
                    tick = self.tick_count + 1,
                    error = %reason,
                    "stage failed; ticking disabled until reset"
                );
                return Err(StepError::StageFailed {
                    stage: stage.name().to_string(),
                    reason,
                });
            }
            let us = stage_start.elapsed().as_micros() as u64;
            tracing::trace!(stage = stage.name(), us, "stage complete");
            stage_us.insert(stage.name().to_string(), us);
        }

        self.tick_count += 1;
        self.timer.ticks += 1;
        let metrics = StepMetrics {
            total_us: tick_start.elapsed().as_micros() as u64,
            timestep_us,
            timestep: dt,
            stage_us,
        };
        tracing::debug!(tick = self.tick_count, dt, total_us = metrics.total_us, "tick complete");
        self.last_metrics = metrics.clone();
        Ok(TickReport {
            tick: self.tick_count,
            metrics,
        })
    }

    fn disable(&mut self, stage: &str, reason: eddy_core::StageError) -> StepError {
        self.tick_disabled = true;
        tracing::warn!(stage, error = %reason, "tick failed; ticking disabled until reset");
        StepError::StageFailed {
            stage: stage.to_string(),
            reason,
        }
    }

    /// Restore the initial condition, clear the fault flag and the tick
    /// counter, and restart the rate timer.
    pub fn reset(&mut self) {
        self.store.reset();
        self.tick_count = 0;
        self.tick_disabled = false;
        self.last_metrics = StepMetrics::default();
        self.timer = SimTimer::started();
    }

    // ── Visual query ─────────────────────────────────────────────

    /// Colour of `(x, y)` in the current colour mode, or `None` if
    /// `(x, y)` is off the grid.
    pub fn colour_at(&self, x: usize, y: usize) -> Option<Colour> {
        colour::colour_at(&self.store.view(), x, y, self.colour_mode)
    }

    /// Colour of `(x, y)` in an explicit mode, or `None` off the grid.
    pub fn colour_at_mode(&self, x: usize, y: usize, mode: ColourMode) -> Option<Colour> {
        colour::colour_at(&self.store.view(), x, y, mode)
    }

    /// Advance the colour mode (dye, velocity, pressure, dye, ...) and
    /// return the new mode.
    pub fn switch_colour_mode(&mut self) -> ColourMode {
        self.colour_mode = self.colour_mode.next();
        self.colour_mode
    }

    /// Current colour mode.
    pub fn colour_mode(&self) -> ColourMode {
        self.colour_mode
    }

    // ── Instrumentation ──────────────────────────────────────────

    /// Ticks per second since construction, the last
    /// [`start_timer`](Self::start_timer), or the last reset.
    pub fn sim_speed(&self) -> f64 {
        self.timer.rate()
    }

    /// Restart the tick-rate measurement window.
    pub fn start_timer(&mut self) {
        self.timer = SimTimer::started();
    }

    /// Completed ticks since construction or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Metrics from the most recent successful tick.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Whether an earlier tick failed and ticking is disabled.
    pub fn is_tick_disabled(&self) -> bool {
        self.tick_disabled
    }

    // ── State access ─────────────────────────────────────────────

    /// Copy the committed fields out for another thread.
    pub fn snapshot(&self) -> FieldSnapshot {
        self.store.snapshot(self.tick_count)
    }

    /// Borrowed view of the committed fields.
    pub fn view(&self) -> FieldView<'_> {
        self.store.view()
    }

    /// The field store.
    pub fn store(&self) -> &FieldStore {
        &self.store
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The stage pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SolverConfig {
        SolverConfig {
            width: 12,
            height: 12,
            granularity: 3,
            worker_count: Some(2),
            diffusion_sweeps: 4,
            pressure_sweeps: 4,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn invalid_config_fails_fast() {
        let err = FluidSimulation::new(SolverConfig {
            viscosity: 0.0,
            ..small()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidViscosity { .. }));
    }

    #[test]
    fn tick_records_metrics_in_pipeline_order() {
        let mut sim = FluidSimulation::new(small()).unwrap();
        let report = sim.tick().unwrap();
        assert_eq!(report.tick, 1);
        assert_eq!(sim.tick_count(), 1);
        assert_eq!(report.metrics.timestep, 0.1);
        let names: Vec<_> = report.metrics.stage_us.keys().cloned().collect();
        assert_eq!(
            names,
            vec!["advection", "diffusion", "projection", "gradient", "forcing"]
        );
        assert_eq!(sim.last_metrics(), &report.metrics);
    }

    #[test]
    fn colour_mode_cycles() {
        let mut sim = FluidSimulation::new(small()).unwrap();
        let start = sim.colour_mode();
        sim.switch_colour_mode();
        sim.switch_colour_mode();
        assert_eq!(sim.switch_colour_mode(), start);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut sim = FluidSimulation::new(small()).unwrap();
        let initial = sim.snapshot();
        sim.tick().unwrap();
        sim.tick().unwrap();
        sim.reset();
        assert_eq!(sim.tick_count(), 0);
        let again = sim.snapshot();
        assert_eq!(
            again.view().velocity_slice(),
            initial.view().velocity_slice()
        );
        assert_eq!(again.view().dye_slice(), initial.view().dye_slice());
    }

    #[test]
    fn snapshot_carries_tick_count() {
        let mut sim = FluidSimulation::new(small()).unwrap();
        sim.tick().unwrap();
        assert_eq!(sim.snapshot().tick(), 1);
    }

    #[test]
    fn sim_speed_counts_since_timer_start() {
        let mut sim = FluidSimulation::new(small()).unwrap();
        sim.tick().unwrap();
        sim.start_timer();
        assert_eq!(sim.timer.ticks, 0);
        sim.tick().unwrap();
        assert_eq!(sim.timer.ticks, 1);
        assert!(sim.sim_speed() >= 0.0);
    }
}
