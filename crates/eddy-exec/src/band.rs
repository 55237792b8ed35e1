//! Row-band partitioning.

use std::ops::Range;

/// A contiguous range of grid rows owned by one task of a dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowBand {
    /// Zero-based band index within the dispatch.
    pub index: usize,
    /// Rows owned by this band. May be empty for trailing bands when the
    /// band count exceeds the row count.
    pub rows: Range<usize>,
}

impl RowBand {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the band owns no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows per band when `height` rows are split into `bands` bands.
///
/// Rounds up so that `bands` bands always cover every row; the last
/// non-empty band absorbs the remainder and may be shorter. A band count
/// of zero is treated as one.
pub fn band_height(height: usize, bands: usize) -> usize {
    let bands = bands.max(1);
    if height == 0 {
        return 0;
    }
    (height - 1) / bands + 1
}

/// Split `0..height` into exactly `max(bands, 1)` contiguous bands.
///
/// Bands are returned in row order and together cover every row exactly
/// once.
///
/// ```
/// use eddy_exec::partition;
///
/// let rows: Vec<_> = partition(10, 4).into_iter().map(|b| b.rows).collect();
/// assert_eq!(rows, vec![0..3, 3..6, 6..9, 9..10]);
/// ```
pub fn partition(height: usize, bands: usize) -> Vec<RowBand> {
    let bands = bands.max(1);
    let step = band_height(height, bands);
    (0..bands)
        .map(|index| {
            let start = (index * step).min(height);
            let end = (start + step).min(height);
            RowBand {
                index,
                rows: start..end,
            }
        })
        .collect()
}
