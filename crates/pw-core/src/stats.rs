//! Sample reduction: mean, nearest-rank percentiles, and budget success rate.

use crate::types::PullStats;

/// Reduce samples to their mean and the p25/p50/p75/p90/p95 percentiles.
///
/// Percentiles use nearest-rank selection on the sorted samples at index
/// `floor(p / 100 * n)`, clamped to the last sample. An empty input yields a
/// mean of 0 and no percentiles.
pub fn compute_percentiles(samples: &[f64]) -> PullStats {
    if samples.is_empty() {
        return PullStats::mean_only(0.0);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;

    let pick = |p: f64| {
        let idx = ((p / 100.0) * n as f64).floor() as usize;
        sorted[idx.min(n - 1)]
    };

    PullStats {
        mean,
        p25: Some(pick(25.0)),
        p50: Some(pick(50.0)),
        p75: Some(pick(75.0)),
        p90: Some(pick(90.0)),
        p95: Some(pick(95.0)),
    }
}

/// Percentage (0–100) of samples at or below `budget`.
///
/// Returns 0 for an empty input or a non-positive budget.
pub fn compute_success_rate(samples: &[f64], budget: f64) -> f64 {
    if samples.is_empty() || budget <= 0.0 {
        return 0.0;
    }
    let hits = samples.iter().filter(|&&v| v <= budget).count();
    hits as f64 / samples.len() as f64 * 100.0
}
