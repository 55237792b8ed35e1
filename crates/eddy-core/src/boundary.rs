//! Off-grid lookup policy for neighbour reads and bilinear sampling.

/// How an integer lookup outside the grid is resolved to a real cell.
///
/// The solver reads neighbours of border cells and samples backtraced
/// positions that may leave the grid entirely. `SampleBoundary` decides
/// which stored cell answers such a read.
///
/// # Examples
///
/// ```
/// use eddy_core::SampleBoundary;
///
/// assert_eq!(SampleBoundary::Clamp.resolve(-3, 10), 0);
/// assert_eq!(SampleBoundary::Clamp.resolve(12, 10), 9);
/// assert_eq!(SampleBoundary::Wrap.resolve(-1, 10), 9);
/// assert_eq!(SampleBoundary::Wrap.resolve(12, 10), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SampleBoundary {
    /// Out-of-range lookups replicate the nearest edge cell.
    #[default]
    Clamp,
    /// Out-of-range lookups wrap to the opposite side (periodic).
    Wrap,
}

impl SampleBoundary {
    /// Resolve an axis coordinate against an axis of length `len`.
    ///
    /// `len` must be non-zero.
    #[inline]
    pub fn resolve(self, val: i64, len: usize) -> usize {
        let n = len as i64;
        if val >= 0 && val < n {
            return val as usize;
        }
        match self {
            Self::Clamp => val.clamp(0, n - 1) as usize,
            Self::Wrap => val.rem_euclid(n) as usize,
        }
    }
}
