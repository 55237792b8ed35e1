//! Solid-cell predicate and forcing region, derived from grid dimensions.
//!
//! Nothing here is stored per cell. The obstacle is a block centred in
//! the grid with its lower-left quadrant cut away, leaving a C-shaped
//! channel that the forced jet flows around. All thresholds use integer
//! arithmetic on the grid dimensions, so the same grid always carves the
//! same cells.

use eddy_core::GridDims;

/// An axis-aligned rectangle with exclusive bounds on every side.
///
/// A cell `(x, y)` is inside when `x_min < x < x_max` and
/// `y_min < y < y_max`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenRect {
    /// Exclusive lower column bound.
    pub x_min: usize,
    /// Exclusive upper column bound.
    pub x_max: usize,
    /// Exclusive lower row bound.
    pub y_min: usize,
    /// Exclusive upper row bound.
    pub y_max: usize,
}

impl OpenRect {
    /// Whether the cell lies strictly inside the rectangle.
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x > self.x_min && x < self.x_max && y > self.y_min && y < self.y_max
    }
}

/// Solid obstacle layout and forcing region for one grid size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    dims: GridDims,
    block: OpenRect,
    notch_x: usize,
    notch_y: usize,
    forcing: OpenRect,
}

impl Geometry {
    /// Derive the obstacle and forcing region for `dims`.
    pub fn new(dims: GridDims) -> Self {
        let w = dims.width();
        let h = dims.height();
        Self {
            dims,
            block: OpenRect {
                x_min: w * 3 / 7,
                x_max: w * 4 / 7,
                y_min: h * 3 / 7,
                y_max: h * 4 / 7,
            },
            notch_x: w * 23 / 42,
            notch_y: h * 23 / 42,
            forcing: OpenRect {
                x_min: w * 3 / 7,
                x_max: w * 4 / 7,
                y_min: h * 8 / 21,
                y_max: h * 13 / 21,
            },
        }
    }

    /// Grid dimensions this geometry was derived for.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Whether `(x, y)` is an impermeable cell: the outer border ring,
    /// or the centred block outside its notch.
    #[inline]
    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        if self.dims.is_border(x, y) {
            return true;
        }
        self.block.contains(x, y) && !(x < self.notch_x && y < self.notch_y)
    }

    /// Whether the constant forcing impulse is applied at `(x, y)`.
    #[inline]
    pub fn is_forced(&self, x: usize, y: usize) -> bool {
        self.forcing.contains(x, y)
    }

    /// The forcing rectangle.
    pub fn forcing_region(&self) -> OpenRect {
        self.forcing
    }

    /// Number of solid cells in the grid.
    pub fn solid_count(&self) -> usize {
        let mut n = 0;
        for y in 0..self.dims.height() {
            for x in 0..self.dims.width() {
                if self.is_solid(x, y) {
                    n += 1;
                }
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_is_solid() {
        let g = Geometry::new(GridDims::new(10, 8));
        for x in 0..10 {
            assert!(g.is_solid(x, 0));
            assert!(g.is_solid(x, 7));
        }
        for y in 0..8 {
            assert!(g.is_solid(0, y));
            assert!(g.is_solid(9, y));
        }
    }

    #[test]
    fn small_grid_has_no_obstacle() {
        // 4x4: block bounds are 1 < x < 2, which admits no integer.
        let g = Geometry::new(GridDims::new(4, 4));
        assert!(!g.is_solid(1, 1));
        assert!(!g.is_solid(2, 2));
        assert_eq!(g.solid_count(), 12);
    }

    #[test]
    fn obstacle_has_notch() {
        // 42x42: block is 18 < x,y < 24, notch removes x < 23 && y < 23.
        let g = Geometry::new(GridDims::new(42, 42));
        assert!(!g.is_solid(20, 20), "inside the notch");
        assert!(g.is_solid(23, 20), "right arm of the C");
        assert!(g.is_solid(20, 23), "top arm of the C");
        assert!(g.is_solid(23, 23), "corner of the C");
        assert!(!g.is_solid(18, 23), "block bounds are exclusive");
        assert!(!g.is_solid(24, 23), "block bounds are exclusive");
    }

    #[test]
    fn forcing_region_matches_thresholds() {
        // 21x21: forcing is 9 < x < 12, 8 < y < 13.
        let g = Geometry::new(GridDims::new(21, 21));
        assert!(g.is_forced(10, 9));
        assert!(g.is_forced(11, 12));
        assert!(!g.is_forced(9, 10));
        assert!(!g.is_forced(10, 8));
        assert!(!g.is_forced(10, 13));
    }

    #[test]
    fn open_rect_bounds_are_exclusive() {
        let r = OpenRect {
            x_min: 1,
            x_max: 3,
            y_min: 1,
            y_max: 3,
        };
        assert!(r.contains(2, 2));
        assert!(!r.contains(1, 2));
        assert!(!r.contains(3, 2));
        assert!(!r.contains(2, 3));
    }
}
