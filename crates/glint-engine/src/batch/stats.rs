/// Counters accumulated across batch flushes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of completed flushes, including empty ones.
    pub batches_flushed: u64,
    /// Total primitives drained across all flushes.
    pub primitives_flushed: u64,
    /// Largest single batch seen so far.
    pub largest_batch: usize,
}

impl BatchStats {
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn record_flush(&mut self, drained: usize) {
        self.batches_flushed += 1;
        self.primitives_flushed += drained as u64;
        if drained > self.largest_batch {
            self.largest_batch = drained;
        }
    }
}
