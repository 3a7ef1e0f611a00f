//! Fixed-capacity ring of recent readings.

use core::iter::FusedIterator;

use crate::constants::history::CAPACITY;

/// Circular store of the last `N` readings.
///
/// Slots that have not been written yet hold `0.0`, so the buffer always
/// exposes exactly `N` values.
#[derive(Debug, Clone)]
pub struct HistoryBuffer<const N: usize = CAPACITY> {
    slots: [f32; N],
    next: usize,
    recorded: usize,
}

impl<const N: usize> HistoryBuffer<N> {
    pub const fn new() -> Self {
        const { assert!(N > 0, "history capacity must be non-zero") };
        Self {
            slots: [0.0; N],
            next: 0,
            recorded: 0,
        }
    }

    /// Store `reading`, overwriting the oldest slot.
    pub fn record(&mut self, reading: f32) {
        self.slots[self.next] = reading;
        self.next = (self.next + 1) % N;
        if self.recorded < N {
            self.recorded += 1;
        }
    }

    /// Largest value currently stored, unwritten slots included.
    pub fn max_value(&self) -> f32 {
        self.slots.iter().copied().fold(self.slots[0], f32::max)
    }

    /// Most recent reading, if any.
    pub fn latest(&self) -> Option<f32> {
        (self.recorded > 0).then(|| self.slots[(self.next + N - 1) % N])
    }

    /// Iterate oldest to newest. Always yields `N` values.
    pub fn ordered(&self) -> Ordered<'_, N> {
        Ordered {
            buffer: self,
            offset: 0,
        }
    }

    /// Number of slots.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Readings written so far, saturating at the capacity.
    pub const fn recorded(&self) -> usize {
        self.recorded
    }

    /// `true` once every slot holds a real reading.
    pub const fn is_full(&self) -> bool {
        self.recorded == N
    }
}

impl<const N: usize> Default for HistoryBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Oldest-to-newest view over a [`HistoryBuffer`].
///
/// Call [`HistoryBuffer::ordered`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Ordered<'a, const N: usize> {
    buffer: &'a HistoryBuffer<N>,
    offset: usize,
}

impl<const N: usize> Iterator for Ordered<'_, N> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.offset == N {
            return None;
        }
        let value = self.buffer.slots[(self.buffer.next + self.offset) % N];
        self.offset += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = N - self.offset;
        (left, Some(left))
    }
}

impl<const N: usize> ExactSizeIterator for Ordered<'_, N> {}

impl<const N: usize> FusedIterator for Ordered<'_, N> {}
