//! Per-cell numerical kernels.
//!
//! Every kernel is a pure function of the committed fields (through a
//! [`FieldView`]) and a cell coordinate. Neighbour lookups go through the
//! view's boundary policy, so kernels never special-case the grid edge.
//! Stages call these from inside a band dispatch; tests call them
//! directly.

use eddy_core::{Dye, FieldKind, KernelFault, Vec2};
use eddy_grid::FieldView;

/// Constant leftward impulse applied inside the forcing region.
pub const FORCING_IMPULSE: f64 = 100.0;

/// Semi-Lagrangian advection: trace `(x, y)` back along its velocity
/// over `dt` and sample velocity and dye there.
pub fn advect(view: &FieldView<'_>, x: usize, y: usize, dt: f64) -> (Vec2, Dye) {
    let here = Vec2::new(x as f64, y as f64);
    let from = here - view.velocity(x, y) * dt;
    (view.sample_velocity(from), view.sample_dye(from))
}

/// Diffusion coefficients `(alpha, beta)` for one Jacobi sweep.
pub fn diffusion_coefficients(viscosity: f64, dt: f64) -> (f64, f64) {
    let alpha = 1.0 / (viscosity * dt);
    (alpha, 4.0 + alpha)
}

/// One Jacobi sweep of implicit viscous diffusion at `(x, y)`.
pub fn diffuse(view: &FieldView<'_>, x: usize, y: usize, alpha: f64, beta: f64) -> Vec2 {
    let (xi, yi) = (x as i64, y as i64);
    let sum = view.velocity_at(xi, yi + 1)
        + view.velocity_at(xi - 1, yi)
        + view.velocity_at(xi, yi - 1)
        + view.velocity_at(xi + 1, yi);
    (sum + view.velocity(x, y) * alpha) * (1.0 / beta)
}

/// Central-difference divergence of the committed velocity at `(x, y)`.
pub fn divergence(view: &FieldView<'_>, x: usize, y: usize) -> f64 {
    let (xi, yi) = (x as i64, y as i64);
    let dvx = view.velocity_at(xi + 1, yi).x - view.velocity_at(xi - 1, yi).x;
    let dvy = view.velocity_at(xi, yi + 1).y - view.velocity_at(xi, yi - 1).y;
    0.5 * (dvx + dvy)
}

/// One Jacobi sweep of the pressure Poisson equation at `(x, y)`.
pub fn pressure(view: &FieldView<'_>, x: usize, y: usize) -> f64 {
    let (xi, yi) = (x as i64, y as i64);
    let sum = view.pressure_at(xi, yi + 1)
        + view.pressure_at(xi - 1, yi)
        + view.pressure_at(xi, yi - 1)
        + view.pressure_at(xi + 1, yi);
    0.25 * (sum - divergence(view, x, y))
}

/// Velocity at `(x, y)` minus the central-difference pressure gradient.
pub fn subtract_gradient(view: &FieldView<'_>, x: usize, y: usize) -> Vec2 {
    let (xi, yi) = (x as i64, y as i64);
    let grad = Vec2::new(
        0.5 * (view.pressure_at(xi + 1, yi) - view.pressure_at(xi - 1, yi)),
        0.5 * (view.pressure_at(xi, yi + 1) - view.pressure_at(xi, yi - 1)),
    );
    view.velocity(x, y) - grad
}

/// Velocity at `(x, y)` after the external impulse; unchanged outside
/// the forcing region.
pub fn force(view: &FieldView<'_>, x: usize, y: usize, impulse: f64) -> Vec2 {
    let v = view.velocity(x, y);
    if view.geometry().is_forced(x, y) {
        Vec2::new(v.x - impulse, v.y)
    } else {
        v
    }
}

// ── Finite checks ──────────────────────────────────────────────────

/// Reject a non-finite velocity when `check` is on.
#[inline]
pub fn finite_velocity(check: bool, x: usize, y: usize, v: Vec2) -> Result<Vec2, KernelFault> {
    if check && !v.is_finite() {
        return Err(non_finite(FieldKind::Velocity, x, y));
    }
    Ok(v)
}

/// Reject a non-finite dye when `check` is on.
#[inline]
pub fn finite_dye(check: bool, x: usize, y: usize, d: Dye) -> Result<Dye, KernelFault> {
    if check && !d.is_finite() {
        return Err(non_finite(FieldKind::Dye, x, y));
    }
    Ok(d)
}

/// Reject a non-finite pressure when `check` is on.
#[inline]
pub fn finite_pressure(check: bool, x: usize, y: usize, p: f64) -> Result<f64, KernelFault> {
    if check && !p.is_finite() {
        return Err(non_finite(FieldKind::Pressure, x, y));
    }
    Ok(p)
}

fn non_finite(field: FieldKind, x: usize, y: usize) -> KernelFault {
    KernelFault::NonFinite { field, x, y }
}
