//! Many-run Monte Carlo driver.

use std::time::Instant;

use pw_core::{
    DistributionResult, GachaError, GachaResult, InitialState, SampleSource,
    compute_percentiles, compute_success_rate,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::SimConfig;
use crate::target::{TargetOutcome, TargetSimulator};

/// Parameters of a single run, shared by every worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunPlan {
    /// Starting banner state.
    pub initial: InitialState,
    /// Copies wanted. Values below 1 count as 1.
    pub target_count: u32,
    /// Pull budget for the success rate.
    pub budget: Option<u32>,
}

/// Pull and reward samples, one entry per run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    /// Total pulls of each run.
    pub pulls: Vec<f64>,
    /// Total byproduct currency of each run.
    pub returns: Vec<f64>,
}

impl SampleSet {
    fn with_capacity(n: usize) -> Self {
        Self {
            pulls: Vec::with_capacity(n),
            returns: Vec::with_capacity(n),
        }
    }

    fn push(&mut self, outcome: TargetOutcome) {
        self.pulls.push(f64::from(outcome.pulls));
        self.returns.push(f64::from(outcome.returns));
    }

    fn extend(&mut self, other: SampleSet) {
        self.pulls.extend(other.pulls);
        self.returns.extend(other.returns);
    }

    /// Number of runs collected.
    pub fn len(&self) -> usize {
        self.pulls.len()
    }

    /// Returns true if no runs were collected.
    pub fn is_empty(&self) -> bool {
        self.pulls.is_empty()
    }

    /// Reduce to pull and reward statistics.
    pub fn summarize(&self, budget: Option<u32>) -> DistributionResult {
        DistributionResult {
            pulls: compute_percentiles(&self.pulls),
            success_rate: budget.map(|b| compute_success_rate(&self.pulls, f64::from(b))),
            returns: (!self.returns.is_empty()).then(|| compute_percentiles(&self.returns)),
        }
    }
}

/// One full run: acquire every target in turn from a shared state.
pub fn simulate_run<S: TargetSimulator + ?Sized>(
    simulator: &S,
    plan: &RunPlan,
    source: &mut SampleSource,
) -> TargetOutcome {
    let mut state = simulator.initial_pull_state(&plan.initial);
    let mut total = TargetOutcome::default();
    for _ in 0..plan.target_count.max(1) {
        let outcome = simulator.simulate_target(&mut state, source);
        total.pulls += outcome.pulls;
        total.returns += outcome.returns;
    }
    total
}

/// Run `runs` independent runs and collect their samples.
///
/// Runs are split into chunks of `config.chunk_size`, each with its own
/// sample source, and the chunks are spread over a rayon pool. Samples come
/// back in chunk order.
pub fn collect_samples<S: TargetSimulator + ?Sized>(
    simulator: &S,
    plan: &RunPlan,
    runs: usize,
    config: &SimConfig,
) -> GachaResult<SampleSet> {
    let chunk_size = config.chunk_size.max(1);
    let chunks = runs.div_ceil(chunk_size);

    let work = || {
        (0..chunks)
            .into_par_iter()
            .map(|index| {
                let len = chunk_size.min(runs - index * chunk_size);
                let source = match config.chunk_seed(index) {
                    Some(seed) => SampleSource::seeded(seed),
                    None => SampleSource::new(),
                };
                let mut source = source.with_batch_size(config.batch_size);
                let mut samples = SampleSet::with_capacity(len);
                for _ in 0..len {
                    samples.push(simulate_run(simulator, plan, &mut source));
                }
                samples
            })
            .collect::<Vec<_>>()
    };

    let parts = if config.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .map_err(|e| GachaError::ThreadPool(e.to_string()))?;
        debug!(threads = config.threads, "running on a dedicated pool");
        pool.install(work)
    } else {
        work()
    };

    let mut samples = SampleSet::with_capacity(runs);
    for part in parts {
        samples.extend(part);
    }
    Ok(samples)
}

/// Simulate `runs` runs and reduce them to a distribution.
pub fn simulate_distribution<S: TargetSimulator + ?Sized>(
    simulator: &S,
    plan: &RunPlan,
    runs: usize,
    config: &SimConfig,
) -> GachaResult<DistributionResult> {
    let started = Instant::now();
    let samples = collect_samples(simulator, plan, runs, config)?;
    let result = samples.summarize(plan.budget);
    info!(
        runs,
        targets = plan.target_count.max(1),
        mean = result.pulls.mean,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "simulated distribution"
    );
    Ok(result)
}
