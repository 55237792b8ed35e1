//! Background tick loop for [`RealtimeSimulation`](crate::RealtimeSimulation).
//!
//! The tick thread owns the [`FluidSimulation`] exclusively (moved in at
//! spawn). After each successful tick it publishes a snapshot into the
//! shared [`SnapshotSlot`]; readers never touch the live store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eddy_core::StepError;

use crate::publish::SnapshotSlot;
use crate::simulation::FluidSimulation;

/// What the tick thread hands back when it stops.
#[derive(Debug)]
pub(crate) struct TickThreadExit {
    pub simulation: FluidSimulation,
    /// The tick failure that ended the loop, if any.
    pub error: Option<StepError>,
}

/// State owned by the tick thread.
pub(crate) struct TickThreadState {
    simulation: FluidSimulation,
    snapshots: Arc<SnapshotSlot>,
    shutdown_flag: Arc<AtomicBool>,
    tick_stopped: Arc<AtomicBool>,
    tick_budget: Option<Duration>,
}

impl TickThreadState {
    pub fn new(
        simulation: FluidSimulation,
        snapshots: Arc<SnapshotSlot>,
        shutdown_flag: Arc<AtomicBool>,
        tick_stopped: Arc<AtomicBool>,
        tick_rate_hz: Option<f64>,
    ) -> Self {
        Self {
            simulation,
            snapshots,
            shutdown_flag,
            tick_stopped,
            tick_budget: tick_rate_hz.map(|hz| Duration::from_secs_f64(1.0 / hz)),
        }
    }

    /// Main tick loop. Runs until `shutdown_flag` is set or a tick fails.
    ///
    /// Consumes self and returns the simulation so the owner can recover
    /// it through the `JoinHandle`.
    pub fn run(mut self) -> TickThreadExit {
        tracing::info!(
            tick_rate_hz = self.tick_budget.map(|b| 1.0 / b.as_secs_f64()),
            "tick thread started"
        );
        let mut error = None;
        loop {
            if self.shutdown_flag.load(Ordering::Acquire) {
                break;
            }
            let tick_start = Instant::now();

            match self.simulation.tick() {
                Ok(_) => {
                    self.snapshots.publish(Arc::new(self.simulation.snapshot()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "tick thread stopping after failed tick");
                    error = Some(e);
                    break;
                }
            }

            // park_timeout rather than sleep so shutdown can unpark us.
            if let Some(remaining) = self
                .tick_budget
                .and_then(|budget| budget.checked_sub(tick_start.elapsed()))
            {
                std::thread::park_timeout(remaining);
            }
        }

        self.tick_stopped.store(true, Ordering::Release);
        tracing::info!(
            ticks = self.simulation.tick_count(),
            failed = error.is_some(),
            "tick thread stopped"
        );
        TickThreadExit {
            simulation: self.simulation,
            error,
        }
    }
}
