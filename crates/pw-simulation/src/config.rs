use pw_core::sample::DEFAULT_BATCH_SIZE;

/// Default number of runs handed to one worker at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Configuration for a Monte Carlo distribution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of runs. `None` uses the variant default.
    pub simulation_count: Option<usize>,
    /// Seed for reproducible runs. `None` seeds every worker from the OS.
    pub seed: Option<u64>,
    /// Size of a dedicated worker pool. 0 = use the global rayon pool.
    pub threads: usize,
    /// Runs per worker chunk; each chunk owns one sample source.
    pub chunk_size: usize,
    /// Values generated per sample source refill.
    pub batch_size: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation_count: None,
            seed: None,
            threads: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SimConfig {
    /// Set the number of runs.
    pub fn with_simulation_count(mut self, count: usize) -> Self {
        self.simulation_count = Some(count);
        self
    }

    /// Set the RNG seed for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the dedicated worker pool size (0 = global pool).
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the number of runs per chunk (at least 1).
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Set the sample source refill size (at least 1).
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Runs to perform, falling back to `default` when none was chosen.
    pub fn runs_or(&self, default: usize) -> usize {
        self.simulation_count.unwrap_or(default)
    }

    /// Seed for the sample source of chunk `index`, if runs are seeded.
    ///
    /// Depends only on the chunk index, so results do not change with the
    /// thread count. Both the seed and the index go through a SplitMix64
    /// finalizer, so neighbouring seeds share no chunk streams.
    pub fn chunk_seed(&self, index: usize) -> Option<u64> {
        self.seed
            .map(|seed| splitmix64(splitmix64(seed).wrapping_add(index as u64)))
    }
}

/// SplitMix64 output function.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
