//! Destination buffers that can be carved into per-band pieces.

/// A row-major destination buffer a dispatch writes one value per cell
/// into.
///
/// Implemented for `&mut [T]` and for pairs and triples of outputs, so a
/// single pass can write several fields at once (advection writes
/// velocity and dye together). Splitting consumes the output and yields
/// two disjoint halves, which is what lets each band own its cells
/// without synchronisation.
pub trait BandOutput: Send + Sized {
    /// The value written into one cell.
    type Value;

    /// Number of cells covered.
    fn len(&self) -> usize;

    /// Whether the output covers no cells.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into cells `[0, mid)` and `[mid, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `mid > self.len()`.
    fn split_at(self, mid: usize) -> (Self, Self);

    /// Write `value` at local cell index `index`.
    fn write(&mut self, index: usize, value: Self::Value);
}

impl<T: Send> BandOutput for &mut [T] {
    type Value = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        self.split_at_mut(mid)
    }

    #[inline]
    fn write(&mut self, index: usize, value: T) {
        self[index] = value;
    }
}

impl<A: BandOutput, B: BandOutput> BandOutput for (A, B) {
    type Value = (A::Value, B::Value);

    fn len(&self) -> usize {
        debug_assert_eq!(self.0.len(), self.1.len(), "paired outputs differ in length");
        self.0.len()
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        let (a0, a1) = self.0.split_at(mid);
        let (b0, b1) = self.1.split_at(mid);
        ((a0, b0), (a1, b1))
    }

    #[inline]
    fn write(&mut self, index: usize, (a, b): Self::Value) {
        self.0.write(index, a);
        self.1.write(index, b);
    }
}

impl<A: BandOutput, B: BandOutput, C: BandOutput> BandOutput for (A, B, C) {
    type Value = (A::Value, B::Value, C::Value);

    fn len(&self) -> usize {
        debug_assert_eq!(self.0.len(), self.1.len(), "outputs differ in length");
        debug_assert_eq!(self.0.len(), self.2.len(), "outputs differ in length");
        self.0.len()
    }

    fn split_at(self, mid: usize) -> (Self, Self) {
        let (a0, a1) = self.0.split_at(mid);
        let (b0, b1) = self.1.split_at(mid);
        let (c0, c1) = self.2.split_at(mid);
        ((a0, b0, c0), (a1, b1, c1))
    }

    #[inline]
    fn write(&mut self, index: usize, (a, b, c): Self::Value) {
        self.0.write(index, a);
        self.1.write(index, b);
        self.2.write(index, c);
    }
}
