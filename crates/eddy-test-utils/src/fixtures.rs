//! Reusable stage fixtures.
//!
//! - [`IdentityStage`]: rewrites velocity unchanged through a full pass.
//! - [`FailingStage`]: faults one row deterministically after N calls.
//! - [`PanickingStage`]: panics inside a band kernel.
//!
//! The faulting fixtures add [`NUDGE`] to every cell they do not fault,
//! so a dispatch that leaked into the committed fields would show up as
//! changed velocity.

use std::sync::atomic::{AtomicUsize, Ordering};

use eddy_core::{FieldKind, KernelFault, StageError, Vec2};
use eddy_solver::{Stage, StageContext};

/// Velocity added by [`FailingStage`] and [`PanickingStage`] to every
/// cell that does not fault.
pub const NUDGE: Vec2 = Vec2::new(1.0, 0.0);

/// Copies committed velocity through scratch and back.
///
/// Useful for pipeline routing tests: the fields must come out unchanged.
pub struct IdentityStage {
    pub name: String,
}

impl IdentityStage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Stage for IdentityStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        ctx.write_velocity(|view, x, y| Ok(view.velocity(x, y)))?;
        ctx.commit_velocity()
    }
}

/// Adds [`NUDGE`] to velocity `succeed_count` times, then reports a
/// non-finite velocity in every cell of `fault_row`.
///
/// The fault goes through the band executor, so the resulting error
/// names the band that owns `fault_row`.
pub struct FailingStage {
    pub name: String,
    pub fault_row: usize,
    succeed_count: usize,
    calls: AtomicUsize,
}

impl FailingStage {
    pub fn new(name: impl Into<String>, succeed_count: usize, fault_row: usize) -> Self {
        Self {
            name: name.into(),
            fault_row,
            succeed_count,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Stage for FailingStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        let fail = n >= self.succeed_count;
        let fault_row = self.fault_row;
        ctx.write_velocity(move |view, x, y| {
            if fail && y == fault_row {
                Err(KernelFault::NonFinite {
                    field: FieldKind::Velocity,
                    x,
                    y,
                })
            } else {
                Ok(view.velocity(x, y) + NUDGE)
            }
        })?;
        ctx.commit_velocity()
    }
}

/// Panics in the kernel for the first cell of `row`; adds [`NUDGE`]
/// everywhere else.
pub struct PanickingStage {
    pub name: String,
    pub row: usize,
}

impl PanickingStage {
    pub fn new(name: impl Into<String>, row: usize) -> Self {
        Self {
            name: name.into(),
            row,
        }
    }
}

impl Stage for PanickingStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
        let row = self.row;
        ctx.write_velocity(move |view, x, y| {
            if y == row && x == 0 {
                panic!("fixture panic at row {row}");
            }
            Ok(view.velocity(x, y) + NUDGE)
        })?;
        ctx.commit_velocity()
    }
}
