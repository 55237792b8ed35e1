//! Fixed grid dimensions and row-major cell indexing.

/// Width and height of the simulation grid.
///
/// Cells are addressed by `(x, y)` with `0 <= x < width` and
/// `0 <= y < height`, stored row-major: index `x + y * width`. A row
/// therefore occupies a contiguous run of `width` cells, which is what
/// lets the executor hand out disjoint row bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    width: usize,
    height: usize,
}

impl GridDims {
    /// Create grid dimensions. Callers validate positivity before this;
    /// see `SolverConfig::validate` in `eddy-engine`.
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub const fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major flat index of an in-bounds cell.
    ///
    /// An `x` past the last column would otherwise alias a cell of the
    /// next row, so debug builds assert `(x, y)` is on the grid. Callers
    /// taking untrusted coordinates check [`contains`](Self::contains).
    #[inline]
    pub const fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height, "cell index off the grid");
        x + y * self.width
    }

    /// Whether `(x, y)` lies inside the grid.
    #[inline]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Whether `(x, y)` lies on the outermost ring of cells.
    pub const fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }
}
