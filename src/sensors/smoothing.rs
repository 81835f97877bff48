//! Fixed-window moving average for noisy ADC channels.

use heapless::HistoryBuffer;

/// Mean of the last `N` samples (fewer until the window fills).
pub struct MovingAverage<const N: usize> {
    window: HistoryBuffer<u16, N>,
}

impl<const N: usize> MovingAverage<N> {
    pub const fn new() -> Self {
        Self {
            window: HistoryBuffer::new(),
        }
    }

    /// Add a sample and return the updated average.
    pub fn push(&mut self, sample: u16) -> u16 {
        self.window.write(sample);
        self.average().unwrap_or(sample)
    }

    /// Truncating integer mean, `None` before the first sample.
    pub fn average(&self) -> Option<u16> {
        let samples = self.window.as_slice();
        if samples.is_empty() {
            return None;
        }
        let sum: u32 = samples.iter().map(|&s| u32::from(s)).sum();
        Some((sum / samples.len() as u32) as u16)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.len() == 0
    }
}

impl<const N: usize> Default for MovingAverage<N> {
    fn default() -> Self {
        Self::new()
    }
}
