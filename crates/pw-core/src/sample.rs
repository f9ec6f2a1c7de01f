//! Buffered uniform sample source.
//!
//! The Monte Carlo loops draw one or two uniforms per pull, millions of times
//! per request. Values are generated in large batches and handed out one at
//! a time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default number of values generated per refill.
pub const DEFAULT_BATCH_SIZE: usize = 1 << 16;

/// A source of independent uniform values in `[0, 1)`.
///
/// Not shared between threads: every simulation worker owns its own.
#[derive(Debug)]
pub struct SampleSource {
    rng: StdRng,
    buffer: Vec<f64>,
    index: usize,
}

impl SampleSource {
    /// Create a source seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Create a deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            buffer: vec![0.0; DEFAULT_BATCH_SIZE],
            // Forces a fill on the first draw.
            index: DEFAULT_BATCH_SIZE,
        }
    }

    /// Change the refill batch size (at least 1). Buffered values are discarded.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        let size = size.max(1);
        self.buffer = vec![0.0; size];
        self.index = size;
        self
    }

    /// Number of values generated per refill.
    pub fn batch_size(&self) -> usize {
        self.buffer.len()
    }

    /// Next uniform value in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        if self.index >= self.buffer.len() {
            self.refill();
        }
        let value = self.buffer[self.index];
        self.index += 1;
        value
    }

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    #[inline]
    pub fn next_index(&mut self, len: u32) -> u32 {
        let idx = (self.next_f64() * f64::from(len)) as u32;
        idx.min(len.saturating_sub(1))
    }

    fn refill(&mut self) {
        for slot in &mut self.buffer {
            *slot = self.rng.random::<f64>();
        }
        self.index = 0;
    }
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::new()
    }
}
