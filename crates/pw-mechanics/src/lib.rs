//! Banner rules and exact expectation models for Pitywise.
//!
//! Each of the six supported banners is a [`Variant`] with a drop curve, a
//! win rule, and a 4★ rule. The expectation side models a variant as an
//! absorbing Markov chain over `(pity, guarantee, secondary counter)` and
//! solves for the expected number of pulls until the featured 5★ drops.
//! Chain solutions are cached process-wide in a [`ChainCache`].

/// Process-wide cache of solved chains.
pub mod cache;
/// Absorbing Markov chain construction and solutions.
pub mod chain;
/// 5★ soft-pity drop curves.
pub mod curve;
/// Exact expected pull counts.
pub mod expectation;
/// Win rules and reward tables.
pub mod rules;
/// The six supported banners.
pub mod variant;

/// Re-exports of the chain cache.
pub use cache::{ChainCache, global_cache};
/// Re-exports of chain types.
pub use chain::{AbsorbingChain, AbsorptionTable, ChainSolution, ChainState};
/// Re-export of [`curve::DropCurve`].
pub use curve::DropCurve;
/// Re-exports of the expectation models.
pub use expectation::{ExpectationModel, expected_pulls};
/// Re-exports of rule types.
pub use rules::{FiveStarOutcome, FiveStarReturn, FourStarRule, TieredReturn, WinRule};
/// Re-exports of [`variant::ChainId`] and [`variant::Variant`].
pub use variant::{ChainId, Variant};
