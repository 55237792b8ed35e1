//! End-to-end behaviour of `FluidSimulation` over whole ticks.

use eddy_core::{KernelFault, StageError, StepError, Vec2};
use eddy_engine::{Colour, ColourMode, FluidSimulation, SolverConfig};
use eddy_grid::INITIAL_VELOCITY;
use eddy_solver::{Pipeline, Stage, TimestepPolicy};
use eddy_test_utils::{
    banded_config, small_config, FailingStage, IdentityStage, PanickingStage, NUDGE,
};

fn solid_velocities_are_zero(sim: &FluidSimulation) -> bool {
    let dims = sim.store().dims();
    (0..dims.height()).all(|y| {
        (0..dims.width())
            .all(|x| !sim.store().is_solid(x, y) || sim.view().velocity(x, y) == Vec2::ZERO)
    })
}

#[test]
fn four_by_four_scenario() {
    let mut sim = FluidSimulation::new(SolverConfig {
        width: 4,
        height: 4,
        viscosity: 0.001,
        timestep: 0.1,
        granularity: 2,
        ..SolverConfig::default()
    })
    .unwrap();

    assert!(sim.store().is_solid(0, 0));
    assert_eq!(sim.view().velocity(0, 0), Vec2::ZERO);

    sim.tick().unwrap();

    assert_eq!(sim.view().velocity(0, 0), Vec2::ZERO);
    let interior = sim.view().velocity(2, 1);
    assert_ne!(interior, INITIAL_VELOCITY);
    assert!((interior.x - INITIAL_VELOCITY.x).abs() > 1.0, "{interior:?}");
}

#[test]
fn solid_cells_stay_at_rest_every_tick() {
    let mut sim = FluidSimulation::new(small_config(42)).unwrap();
    assert!(solid_velocities_are_zero(&sim));
    for _ in 0..6 {
        sim.tick().unwrap();
        assert!(solid_velocities_are_zero(&sim));
    }
}

#[test]
fn results_are_bit_exact_across_band_counts() {
    let run = |granularity: usize| {
        let mut sim = FluidSimulation::new(banded_config(30, granularity)).unwrap();
        for _ in 0..4 {
            sim.tick().unwrap();
        }
        sim.snapshot()
    };
    let reference = run(1);
    for granularity in [2, 7, 24, 40] {
        let other = run(granularity);
        assert_eq!(
            other.view().velocity_slice(),
            reference.view().velocity_slice(),
            "velocity differs at granularity {granularity}"
        );
        assert_eq!(other.view().dye_slice(), reference.view().dye_slice());
        assert_eq!(other.view().pressure_slice(), reference.view().pressure_slice());
    }
}

#[test]
fn independent_runs_match() {
    let run = || {
        let mut sim = FluidSimulation::new(small_config(24)).unwrap();
        for _ in 0..3 {
            sim.tick().unwrap();
        }
        sim.snapshot()
    };
    let (a, b) = (run(), run());
    assert_eq!(a.view().velocity_slice(), b.view().velocity_slice());
    assert_eq!(a.view().pressure_slice(), b.view().pressure_slice());
}

#[test]
fn fixed_timestep_never_changes() {
    let mut sim = FluidSimulation::new(small_config(20)).unwrap();
    for _ in 0..5 {
        let report = sim.tick().unwrap();
        assert_eq!(report.metrics.timestep, 0.1);
    }
}

#[test]
fn adaptive_timestep_follows_peak_speed() {
    let mut sim = FluidSimulation::new(SolverConfig {
        timestep: 0.0,
        ..small_config(20)
    })
    .unwrap();
    // Peak initial speed is 10, so dt = 2 / 10.
    let report = sim.tick().unwrap();
    assert!((report.metrics.timestep - 0.2).abs() < 1e-12);
}

#[test]
fn mode_cycling_returns_to_start() {
    let mut sim = FluidSimulation::new(small_config(10)).unwrap();
    let start = sim.colour_mode();
    assert_eq!(sim.switch_colour_mode(), ColourMode::Velocity);
    assert_eq!(sim.switch_colour_mode(), ColourMode::Pressure);
    assert_eq!(sim.switch_colour_mode(), start);
}

#[test]
fn colour_query_tracks_mode() {
    let mut sim = FluidSimulation::new(small_config(10)).unwrap();
    let dye = sim.colour_at(4, 4);
    sim.switch_colour_mode();
    let velocity = sim.colour_at(4, 4);
    assert_eq!(velocity, sim.colour_at_mode(4, 4, ColourMode::Velocity));
    assert_ne!(dye, velocity);
    assert_eq!(velocity.map(|c| c.b), Some(1.0));
}

#[test]
fn colour_query_off_the_grid_is_none() {
    let sim = FluidSimulation::new(small_config(5)).unwrap();
    // (5, 1) is past the last column; it must not read cell (0, 2).
    assert_eq!(sim.colour_at(5, 1), None);
    assert_eq!(sim.colour_at_mode(5, 1, ColourMode::Dye), None);
    assert_eq!(sim.colour_at_mode(1, 5, ColourMode::Pressure), None);
    assert_eq!(sim.colour_at(0, 2), Some(Colour::BLACK));
}

fn pipeline_with(stage: Box<dyn Stage>) -> Pipeline {
    Pipeline::new(
        vec![Box::new(IdentityStage::new("identity")), stage],
        TimestepPolicy::Fixed(0.1),
    )
    .unwrap()
}

#[test]
fn failing_stage_disables_ticking_until_reset() {
    let pipeline = pipeline_with(Box::new(FailingStage::new("flaky", 1, 5)));
    let mut sim = FluidSimulation::with_pipeline(small_config(12), pipeline).unwrap();

    sim.tick().unwrap();
    let err = sim.tick().unwrap_err();
    match err {
        StepError::StageFailed {
            stage,
            reason: StageError::BandsFailed(faults),
        } => {
            assert_eq!(stage, "flaky");
            assert_eq!(faults.len(), 1);
            assert!(faults[0].rows.contains(&5));
            assert!(matches!(faults[0].fault, KernelFault::NonFinite { y: 5, .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(sim.is_tick_disabled());
    assert_eq!(sim.tick_count(), 1);
    assert!(matches!(sim.tick(), Err(StepError::TickDisabled)));

    sim.reset();
    assert!(!sim.is_tick_disabled());
    assert_eq!(sim.tick_count(), 0);
    // The fixture keeps failing, but the tick runs again instead of
    // being refused.
    assert!(matches!(sim.tick(), Err(StepError::StageFailed { .. })));
}

/// Bit patterns of every committed value, so `-0.0` and `0.0` differ.
type FieldBits = (Vec<[u64; 2]>, Vec<[u64; 3]>, Vec<u64>);

fn committed_bits(sim: &FluidSimulation) -> FieldBits {
    let view = sim.view();
    (
        view.velocity_slice()
            .iter()
            .map(|v| [v.x.to_bits(), v.y.to_bits()])
            .collect(),
        view.dye_slice()
            .iter()
            .map(|d| [d.r.to_bits(), d.g.to_bits(), d.b.to_bits()])
            .collect(),
        view.pressure_slice().iter().map(|p| p.to_bits()).collect(),
    )
}

#[test]
fn failed_band_leaves_committed_fields_untouched() {
    let pipeline = pipeline_with(Box::new(FailingStage::new("flaky", 1, 5)));
    let mut sim = FluidSimulation::with_pipeline(small_config(12), pipeline).unwrap();
    let initial = committed_bits(&sim);

    sim.tick().unwrap();
    let before = committed_bits(&sim);
    // The successful call committed its nudge.
    assert_ne!(before.0, initial.0);
    assert_eq!(sim.view().velocity(4, 2), INITIAL_VELOCITY + NUDGE);

    let err = sim.tick().unwrap_err();
    assert!(matches!(
        err,
        StepError::StageFailed {
            reason: StageError::BandsFailed(_),
            ..
        }
    ));
    // Every other band wrote a nudged velocity into scratch; none of it
    // may reach the committed fields.
    assert_eq!(committed_bits(&sim), before);
}

#[test]
fn panicking_band_leaves_committed_fields_untouched() {
    let pipeline = pipeline_with(Box::new(PanickingStage::new("explode", 7)));
    let mut sim = FluidSimulation::with_pipeline(small_config(12), pipeline).unwrap();
    let before = committed_bits(&sim);

    assert!(matches!(
        sim.tick(),
        Err(StepError::StageFailed {
            reason: StageError::BandsFailed(_),
            ..
        })
    ));
    assert_eq!(committed_bits(&sim), before);
    assert!(matches!(sim.tick(), Err(StepError::TickDisabled)));
    assert_eq!(committed_bits(&sim), before);
}

#[test]
fn kernel_panic_becomes_stage_error() {
    let pipeline = pipeline_with(Box::new(PanickingStage::new("explode", 7)));
    let mut sim = FluidSimulation::with_pipeline(small_config(12), pipeline).unwrap();

    match sim.tick().unwrap_err() {
        StepError::StageFailed {
            stage,
            reason: StageError::BandsFailed(faults),
        } => {
            assert_eq!(stage, "explode");
            assert_eq!(faults.len(), 1);
            match &faults[0].fault {
                KernelFault::Panicked { message } => assert!(message.contains("row 7")),
                other => panic!("unexpected fault: {other:?}"),
            }
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(sim.is_tick_disabled());
}

#[test]
fn identity_pipeline_leaves_fields_alone() {
    let pipeline = Pipeline::new(
        vec![Box::new(IdentityStage::new("identity"))],
        TimestepPolicy::Fixed(0.1),
    )
    .unwrap();
    let mut sim = FluidSimulation::with_pipeline(small_config(16), pipeline).unwrap();
    let before = sim.snapshot();
    sim.tick().unwrap();
    assert_eq!(sim.view().velocity_slice(), before.view().velocity_slice());
    assert_eq!(sim.view().dye_slice(), before.view().dye_slice());
}
