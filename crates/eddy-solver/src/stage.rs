//! The [`Stage`] trait.
//!
//! Stages are stateless operators executed in order each tick. A stage
//! is made of one or more full-grid passes, each followed by a commit
//! pass, so the next pass (or the next stage) sees fully committed
//! fields.

use eddy_core::StageError;

use crate::context::StageContext;
use crate::pipeline::PipelineError;

/// A step of the per-tick solver pipeline.
///
/// # Contract
///
/// - `run()` must be deterministic: the same committed fields and `dt`
///   produce identical results regardless of band count.
/// - Within a pass, a kernel reads only committed fields and writes only
///   scratch (or the reverse for commit passes); the
///   [`StageContext`] helpers enforce this through borrow splits.
/// - `validate()` is called once when the pipeline is built.
///
/// # Object safety
///
/// This trait is object-safe; pipelines store stages as
/// `Vec<Box<dyn Stage>>`.
///
/// # Examples
///
/// A stage that damps every velocity by half:
///
/// ```
/// use eddy_solver::{Stage, StageContext};
/// use eddy_core::StageError;
///
/// struct Damp;
///
/// impl Stage for Damp {
///     fn name(&self) -> &str { "damp" }
///
///     fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError> {
///         ctx.write_velocity(|view, x, y| Ok(view.velocity(x, y) * 0.5))?;
///         ctx.commit_velocity()
///     }
/// }
///
/// assert_eq!(Damp.name(), "damp");
/// ```
pub trait Stage: Send + 'static {
    /// Human-readable name for error reporting and metrics.
    fn name(&self) -> &str;

    /// Startup-time parameter check. Default: accept.
    fn validate(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// Execute the stage for one tick.
    fn run(&self, ctx: &mut StageContext<'_>) -> Result<(), StageError>;
}
