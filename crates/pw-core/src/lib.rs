//! Core types for Pitywise: gacha requests and results, the error taxonomy,
//! and the numeric building blocks shared by the expectation and simulation
//! engines.
//!
//! Nothing in this crate knows about specific games. Variant rules live in
//! `pw-mechanics`, the Monte Carlo loop in `pw-simulation`.

/// Error types used throughout the workspace.
pub mod error;
/// Dense linear system solver over a flat row-major matrix.
pub mod linalg;
/// Buffered uniform sample source for Monte Carlo runs.
pub mod sample;
/// Reduction of raw samples into mean, percentiles, and success rates.
pub mod stats;
/// Request, state, and result records exchanged with callers.
pub mod types;

/// Re-export error types.
pub use error::{GachaError, GachaResult};
/// Re-export the linear solver.
pub use linalg::{Matrix, solve_linear_columns, solve_linear_system};
/// Re-export the sample source.
pub use sample::SampleSource;
/// Re-export the statistics reducer.
pub use stats::{compute_percentiles, compute_success_rate};
/// Re-export request and result records.
pub use types::{
    DistributionResult, ExpectationResult, GachaRequest, GachaResponse, GameKey, InitialState,
    Mode, PoolKey, PullStats,
};
