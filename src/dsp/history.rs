//! Fixed-capacity history of recent values.
//!
//! Both smoothing windows in the pipeline (envelope and oscillator) keep the
//! last `N` values in a ring that is pre-filled with zeros, so a window always
//! holds exactly `N` entries and the first real value evicts a zero.

/// Ring buffer holding exactly `N` values, oldest evicted first.
///
/// `N` must be non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct History<const N: usize> {
    buffer: [f64; N],
    write_pos: usize, // next slot to overwrite; always the oldest entry
}

impl<const N: usize> History<N> {
    pub fn new() -> Self {
        debug_assert!(N > 0, "history needs at least one slot");
        Self {
            buffer: [0.0; N],
            write_pos: 0,
        }
    }

    /// Append a value, evicting the oldest one.
    pub fn push(&mut self, value: f64) {
        self.buffer[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % N;
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..N).map(move |i| self.buffer[(self.write_pos + i) % N])
    }

    /// The most recently pushed value (0.0 before any push).
    pub fn newest(&self) -> f64 {
        self.buffer[(self.write_pos + N - 1) % N]
    }

    /// The value that the next push will evict.
    pub fn oldest(&self) -> f64 {
        self.buffer[self.write_pos]
    }

    /// Unweighted arithmetic mean of the window.
    pub fn mean(&self) -> f64 {
        self.iter().sum::<f64>() / N as f64
    }

    /// Linearly recency-weighted mean.
    ///
    /// Slot `i` (0 = oldest) carries weight `i + 1`, so the newest value
    /// weighs `N` times as much as the oldest.
    pub fn weighted_mean(&self) -> f64 {
        let (weighted_sum, weight_total) = self
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(sum, total), (i, value)| {
                let weight = (i + 1) as f64;
                (sum + value * weight, total + weight)
            });
        weighted_sum / weight_total
    }

    /// Window maximum when the window trends upward, minimum otherwise.
    ///
    /// The sum of consecutive differences telescopes to `newest - oldest`.
    pub fn trend_extreme(&self) -> f64 {
        if self.newest() - self.oldest() > 0.0 {
            self.iter().fold(f64::NEG_INFINITY, f64::max)
        } else {
            self.iter().fold(f64::INFINITY, f64::min)
        }
    }

    /// Refill with zeros.
    pub fn reset(&mut self) {
        self.buffer = [0.0; N];
        self.write_pos = 0;
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for History<N> {
    fn default() -> Self {
        Self::new()
    }
}
