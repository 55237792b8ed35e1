//! Per-cell value types: [`Vec2`] for velocity and [`Dye`] for the tracer.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A two-component vector in grid units (cells per unit time for velocity).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    /// Horizontal component (positive = increasing column).
    pub x: f64,
    /// Vertical component (positive = increasing row).
    pub y: f64,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean length.
    pub fn length_sq(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Linear interpolation: `self` at `t = 0`, `other` at `t = 1`.
    pub fn lerp(self, other: Vec2, t: f64) -> Vec2 {
        Vec2::new(lerp(self.x, other.x, t), lerp(self.y, other.y, t))
    }

    /// Whether both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Three-channel passive tracer carried by the flow.
///
/// Channels are unbounded reals; they are only normalised when mapped to
/// a display colour.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Dye {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Dye {
    /// Create a dye value from its channels.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(self, other: Dye, t: f64) -> Dye {
        Dye::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
        )
    }

    /// Euclidean length of the channel triple.
    pub fn length(self) -> f64 {
        (self.r * self.r + self.g * self.g + self.b * self.b).sqrt()
    }

    /// Whether all channels are finite.
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

/// Scalar linear interpolation: `a` at `t = 0`, `b` at `t = 1`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec2_arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(b.length_sq(), 10.0);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        let a = Vec2::new(-10.0, 3.5);
        let b = Vec2::new(7.0, 0.25);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
    }

    #[test]
    fn dye_length_and_lerp() {
        let d = Dye::new(1.0, 2.0, 2.0);
        assert!((d.length() - 3.0).abs() < 1e-12);
        let mid = Dye::new(0.0, 0.0, 0.0).lerp(Dye::new(1.0, 1.0, 1.0), 0.5);
        assert_eq!(mid, Dye::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn non_finite_detection() {
        assert!(Vec2::new(1.0, 2.0).is_finite());
        assert!(!Vec2::new(f64::NAN, 0.0).is_finite());
        assert!(!Dye::new(0.0, f64::INFINITY, 0.0).is_finite());
    }
}
