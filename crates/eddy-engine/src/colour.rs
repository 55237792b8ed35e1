//! Visual query: map a cell's committed state to a display colour.

use std::f64::consts::PI;

use eddy_grid::{FieldSnapshot, FieldStore, FieldView};

/// Scale applied to each velocity component in [`ColourMode::Velocity`].
pub const VELOCITY_SCALE: f64 = 0.0005;

/// Scales applied to pressure for the red, green and blue channels in
/// [`ColourMode::Pressure`].
pub const PRESSURE_SCALES: [f64; 3] = [0.005, 0.00005, 0.0000005];

/// Which field the visual query shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColourMode {
    /// Normalised dye colour.
    #[default]
    Dye,
    /// Velocity components squashed into red and green, blue fixed at 1.
    Velocity,
    /// Pressure squashed at three scales into red, green and blue.
    Pressure,
}

impl ColourMode {
    /// The next mode in the cycle dye, velocity, pressure, dye, ...
    pub fn next(self) -> Self {
        match self {
            Self::Dye => Self::Velocity,
            Self::Velocity => Self::Pressure,
            Self::Pressure => Self::Dye,
        }
    }

    /// Numeric index of the mode: 0, 1 or 2.
    pub fn index(self) -> u8 {
        match self {
            Self::Dye => 0,
            Self::Velocity => 1,
            Self::Pressure => 2,
        }
    }

    /// Inverse of [`index`](Self::index), wrapping modulo 3.
    pub fn from_index(index: u8) -> Self {
        match index % 3 {
            1 => Self::Velocity,
            2 => Self::Pressure,
            _ => Self::Dye,
        }
    }
}

/// An RGB colour with channels in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Colour {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl Colour {
    /// Opaque black.
    pub const BLACK: Colour = Colour {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Construct from channel values.
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Quantise to 8-bit channels.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

/// Map any real onto `(0, 1)`: `atan(v) / pi + 0.5`.
#[inline]
pub fn squash(v: f64) -> f64 {
    v.atan() / PI + 0.5
}

/// Colour of cell `(x, y)` in `mode`, or `None` when `(x, y)` is off
/// the grid.
///
/// Solid cells are black in every mode. In [`ColourMode::Dye`] the dye
/// triple is normalised to unit length and clamped; a zero dye is black.
pub fn colour_at(view: &FieldView<'_>, x: usize, y: usize, mode: ColourMode) -> Option<Colour> {
    if !view.dims().contains(x, y) {
        return None;
    }
    Some(cell_colour(view, x, y, mode))
}

fn cell_colour(view: &FieldView<'_>, x: usize, y: usize, mode: ColourMode) -> Colour {
    if view.is_solid(x, y) {
        return Colour::BLACK;
    }
    match mode {
        ColourMode::Dye => {
            let d = view.dye(x, y);
            let len = d.length();
            if len == 0.0 || !len.is_finite() {
                return Colour::BLACK;
            }
            Colour::new(
                (d.r / len).clamp(0.0, 1.0),
                (d.g / len).clamp(0.0, 1.0),
                (d.b / len).clamp(0.0, 1.0),
            )
        }
        ColourMode::Velocity => {
            let v = view.velocity(x, y);
            Colour::new(squash(v.x * VELOCITY_SCALE), squash(v.y * VELOCITY_SCALE), 1.0)
        }
        ColourMode::Pressure => {
            let p = view.pressure(x, y);
            let [sr, sg, sb] = PRESSURE_SCALES;
            Colour::new(squash(p * sr), squash(p * sg), squash(p * sb))
        }
    }
}

/// Colour queries over anything that exposes committed fields.
pub trait ColourQuery {
    /// Borrow the committed fields.
    fn field_view(&self) -> FieldView<'_>;

    /// Colour of `(x, y)` in `mode`. See [`colour_at`].
    fn colour_at(&self, x: usize, y: usize, mode: ColourMode) -> Option<Colour> {
        colour_at(&self.field_view(), x, y, mode)
    }
}

impl ColourQuery for FieldStore {
    fn field_view(&self) -> FieldView<'_> {
        self.view()
    }
}

impl ColourQuery for FieldSnapshot {
    fn field_view(&self) -> FieldView<'_> {
        self.view()
    }
}
