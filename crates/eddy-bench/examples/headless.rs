//! Headless demo runner: tick the reference simulation and report speed.
//!
//! Usage: `headless [size] [granularity]` (defaults 150 and 24).
//! Runs until interrupted, printing ticks per second once a second.

use std::time::{Duration, Instant};

use eddy_bench::DemoArgs;
use eddy_engine::FluidSimulation;

fn main() {
    let args = match DemoArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("usage: headless [size] [granularity]");
            std::process::exit(2);
        }
    };

    let mut sim = match FluidSimulation::new(args.config()) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    println!(
        "=== Eddy headless: {0}x{0} grid, {1} bands ===",
        args.size, args.granularity
    );

    let mut last_report = Instant::now();
    sim.start_timer();
    loop {
        if let Err(e) = sim.tick() {
            eprintln!("tick {} failed: {e}", sim.tick_count() + 1);
            std::process::exit(1);
        }
        if last_report.elapsed() >= Duration::from_secs(1) {
            let m = sim.last_metrics();
            println!(
                "  tick {:>6}: {:>8.2} ticks/s, last tick {:>7}us ({}us in stages), dt={:.4}",
                sim.tick_count(),
                sim.sim_speed(),
                m.total_us,
                m.stages_total_us(),
                m.timestep,
            );
            sim.start_timer();
            last_report = Instant::now();
        }
    }
}
