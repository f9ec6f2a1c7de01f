//! Monte Carlo pull simulation for Pitywise.
//!
//! Replays a banner pull by pull with the same drop curve and win rule the
//! exact models use, adding 4★ drops and byproduct-currency rewards. Runs
//! are spread over a rayon pool in fixed-size chunks; every chunk owns its
//! own [`pw_core::SampleSource`].

/// Configuration types for distribution runs.
pub mod config;
/// The many-run driver and sample reduction.
pub mod run;
/// Mutable state of one run.
pub mod state;
/// Acquisition of a single target.
pub mod target;

/// Re-export of [`config::SimConfig`].
pub use config::SimConfig;
/// Re-exports of the run driver.
pub use run::{RunPlan, SampleSet, collect_samples, simulate_distribution, simulate_run};
/// Re-exports of [`state::ItemKey`] and [`state::PullState`].
pub use state::{ItemKey, PullState};
/// Re-exports of the single-target loop.
pub use target::{PullRules, TargetOutcome, TargetSimulator, simulate_one_target};
