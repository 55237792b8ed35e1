//! Run a simulation on a dedicated tick thread.
//!
//! [`RealtimeSimulation`] moves a [`FluidSimulation`] onto a background
//! thread that ticks it back to back (or at a target rate) and publishes
//! an immutable [`FieldSnapshot`] after every successful tick. Readers on
//! any thread query the latest snapshot; none of them ever sees a tick in
//! progress.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use eddy_core::StepError;
use eddy_grid::FieldSnapshot;

use crate::colour::{Colour, ColourMode, ColourQuery};
use crate::config::{ConfigError, RealtimeConfig};
use crate::publish::SnapshotSlot;
use crate::simulation::FluidSimulation;
use crate::tick_thread::{TickThreadExit, TickThreadState};

/// How long shutdown waits for the tick thread to acknowledge the flag
/// before joining anyway.
const DRAIN_BUDGET: Duration = Duration::from_millis(250);

// ── RealtimeError ────────────────────────────────────────────────

/// Errors from the realtime tick thread lifecycle.
#[derive(Debug)]
pub enum RealtimeError {
    /// The realtime configuration is invalid.
    Config(ConfigError),
    /// The OS refused to spawn the tick thread.
    SpawnFailed {
        /// Reason reported by the thread builder.
        reason: String,
    },
    /// The tick thread has already been shut down.
    AlreadyShutDown,
    /// The tick thread panicked, so the simulation could not be recovered.
    RecoveryFailed,
}

impl fmt::Display for RealtimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::SpawnFailed { reason } => write!(f, "failed to spawn tick thread: {reason}"),
            Self::AlreadyShutDown => write!(f, "tick thread already shut down"),
            Self::RecoveryFailed => {
                write!(f, "simulation could not be recovered from the tick thread")
            }
        }
    }
}

impl Error for RealtimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for RealtimeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from [`RealtimeSimulation::shutdown`].
#[derive(Debug)]
pub struct ShutdownReport {
    /// Total time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Ticks completed by the recovered simulation.
    pub ticks: u64,
    /// The tick failure that stopped the thread early, if any.
    pub error: Option<StepError>,
}

// ── RealtimeSimulation ───────────────────────────────────────────

/// A fluid simulation ticking on its own thread.
pub struct RealtimeSimulation {
    snapshots: Arc<SnapshotSlot>,
    shutdown_flag: Arc<AtomicBool>,
    tick_stopped: Arc<AtomicBool>,
    tick_thread: Option<JoinHandle<TickThreadExit>>,
    /// Recovered from the tick thread on shutdown, used by `reset()`.
    /// Behind a Mutex so this type stays Sync; stages are Send only.
    recovered: Mutex<Option<FluidSimulation>>,
    colour_mode: AtomicU8,
    config: RealtimeConfig,
}

impl fmt::Debug for RealtimeSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeSimulation")
            .field("running", &self.is_running())
            .field("published", &self.snapshots.published())
            .field("config", &self.config)
            .finish()
    }
}

impl RealtimeSimulation {
    /// Move `simulation` onto a new tick thread and start ticking.
    pub fn new(simulation: FluidSimulation, config: RealtimeConfig) -> Result<Self, RealtimeError> {
        config.validate()?;
        let colour_mode = AtomicU8::new(simulation.colour_mode().index());
        let mut rt = Self {
            snapshots: Arc::new(SnapshotSlot::new()),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            tick_stopped: Arc::new(AtomicBool::new(false)),
            tick_thread: None,
            recovered: Mutex::new(None),
            colour_mode,
            config,
        };
        rt.spawn(simulation)?;
        Ok(rt)
    }

    fn spawn(&mut self, simulation: FluidSimulation) -> Result<(), RealtimeError> {
        let snapshots = Arc::clone(&self.snapshots);
        let shutdown = Arc::clone(&self.shutdown_flag);
        let stopped = Arc::clone(&self.tick_stopped);
        let tick_rate_hz = self.config.tick_rate_hz;
        let handle = thread::Builder::new()
            .name("eddy-tick".into())
            .spawn(move || {
                TickThreadState::new(simulation, snapshots, shutdown, stopped, tick_rate_hz).run()
            })
            .map_err(|e| RealtimeError::SpawnFailed {
                reason: e.to_string(),
            })?;
        self.tick_thread = Some(handle);
        Ok(())
    }

    /// The most recently published snapshot, or `None` before the first
    /// tick completes.
    pub fn latest_snapshot(&self) -> Option<Arc<FieldSnapshot>> {
        self.snapshots.latest()
    }

    /// Tick number of the latest snapshot (0 before the first).
    pub fn tick_count(&self) -> u64 {
        self.latest_snapshot().map_or(0, |s| s.tick())
    }

    /// Colour of `(x, y)` in the latest snapshot, in the current mode.
    ///
    /// `None` before the first snapshot or when `(x, y)` is off the grid.
    pub fn colour_at(&self, x: usize, y: usize) -> Option<Colour> {
        self.latest_snapshot()?.colour_at(x, y, self.colour_mode())
    }

    /// Current colour mode.
    pub fn colour_mode(&self) -> ColourMode {
        ColourMode::from_index(self.colour_mode.load(Ordering::Relaxed))
    }

    /// Advance the colour mode and return the new mode.
    pub fn switch_colour_mode(&self) -> ColourMode {
        let prev = self
            .colour_mode
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |m| Some((m + 1) % 3))
            .unwrap_or_else(|m| m);
        ColourMode::from_index(prev + 1)
    }

    /// Whether the tick thread is still ticking.
    pub fn is_running(&self) -> bool {
        self.tick_thread.is_some() && !self.tick_stopped.load(Ordering::Acquire)
    }

    /// Stop the tick thread, join it and keep the simulation for
    /// [`reset`](Self::reset) or [`into_simulation`](Self::into_simulation).
    pub fn shutdown(&mut self) -> Result<ShutdownReport, RealtimeError> {
        let handle = self.tick_thread.take().ok_or(RealtimeError::AlreadyShutDown)?;
        let start = Instant::now();

        self.shutdown_flag.store(true, Ordering::Release);
        // The loop sleeps in park_timeout; wake it now.
        handle.thread().unpark();

        let deadline = start + DRAIN_BUDGET;
        while !self.tick_stopped.load(Ordering::Acquire) && Instant::now() < deadline {
            thread::yield_now();
        }

        let exit = handle.join().map_err(|_| RealtimeError::RecoveryFailed)?;
        let report = ShutdownReport {
            total_ms: start.elapsed().as_millis() as u64,
            ticks: exit.simulation.tick_count(),
            error: exit.error,
        };
        *self.recovered.lock().unwrap_or_else(PoisonError::into_inner) = Some(exit.simulation);
        Ok(report)
    }

    /// Stop ticking, rebuild the initial condition and start again.
    ///
    /// Clears a failed simulation back to a ticking one. Readers see no
    /// snapshot until the first tick after the reset.
    pub fn reset(&mut self) -> Result<(), RealtimeError> {
        if self.tick_thread.is_some() {
            self.shutdown()?;
        }
        let mut simulation = self
            .recovered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(RealtimeError::RecoveryFailed)?;
        simulation.reset();

        self.snapshots = Arc::new(SnapshotSlot::new());
        self.shutdown_flag = Arc::new(AtomicBool::new(false));
        self.tick_stopped = Arc::new(AtomicBool::new(false));
        self.spawn(simulation)
    }

    /// Shut down (if still running) and hand back the simulation.
    pub fn into_simulation(mut self) -> Result<FluidSimulation, RealtimeError> {
        if self.tick_thread.is_some() {
            self.shutdown()?;
        }
        self.recovered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(RealtimeError::RecoveryFailed)
    }
}

impl Drop for RealtimeSimulation {
    fn drop(&mut self) {
        if self.tick_thread.is_some() {
            if let Err(e) = self.shutdown() {
                tracing::warn!(error = %e, "tick thread shutdown failed during drop");
            }
        }
    }
}
