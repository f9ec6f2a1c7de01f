//! Dispatch facade for Pitywise.
//!
//! Resolves a request's `(game, pool)` to a registered [`GachaModel`] and
//! either reads the exact expectation from the cached Markov chain or runs
//! the Monte Carlo simulation.

/// Request entry points.
pub mod facade;
/// Per-variant models and their registry.
pub mod model;

/// Re-exports of the entry points.
pub use facade::{
    run, run_distribution, run_distribution_with, run_expectation, run_with, warm_up,
};
/// Re-exports of the model registry.
pub use model::{BannerModel, GachaModel, model_for, models};
/// Re-export of the simulation config.
pub use pw_simulation::SimConfig;
/// Re-export of the request type.
pub use pw_core::GachaRequest;
