//! Process-wide cache of chain solutions.
//!
//! Tables depend only on compile-time rule constants, so each is solved at
//! most once per process and never invalidated. Every slot is a `OnceLock`:
//! concurrent first requests block on a single solve. Solve errors are
//! cached as well, since a retry would fail the same way.

use pw_core::{GachaError, GachaResult};
use std::sync::OnceLock;
use tracing::trace;

use crate::chain::{AbsorbingChain, AbsorptionTable, ChainSolution};
use crate::variant::ChainId;

const SLOTS: usize = ChainId::ALL.len();

/// Lazily built expectation and absorption tables, one slot per [`ChainId`].
#[derive(Debug)]
pub struct ChainCache {
    solutions: [OnceLock<GachaResult<ChainSolution>>; SLOTS],
    absorptions: [OnceLock<GachaResult<AbsorptionTable>>; SLOTS],
}

static GLOBAL: ChainCache = ChainCache::new();

/// The cache shared by every request in the process.
pub fn global_cache() -> &'static ChainCache {
    &GLOBAL
}

impl ChainCache {
    /// An empty cache.
    pub const fn new() -> Self {
        Self {
            solutions: [const { OnceLock::new() }; SLOTS],
            absorptions: [const { OnceLock::new() }; SLOTS],
        }
    }

    /// Expectation table for `id`, solving it on first use.
    pub fn solution_or_build(&self, id: ChainId) -> GachaResult<&ChainSolution> {
        let slot = &self.solutions[id.slot()];
        if slot.get().is_some() {
            trace!(chain = %id, "expectation table cache hit");
        }
        slot.get_or_init(|| ChainSolution::solve(AbsorbingChain::new(id)))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Absorption table for `id`, solving it on first use.
    pub fn absorption_or_build(&self, id: ChainId) -> GachaResult<&AbsorptionTable> {
        let slot = &self.absorptions[id.slot()];
        if slot.get().is_some() {
            trace!(chain = %id, "absorption table cache hit");
        }
        slot.get_or_init(|| AbsorptionTable::solve(AbsorbingChain::new(id)))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Expectation table for `id` if it has already been built.
    pub fn solution(&self, id: ChainId) -> GachaResult<&ChainSolution> {
        match self.solutions[id.slot()].get() {
            Some(result) => result.as_ref().map_err(Clone::clone),
            None => Err(GachaError::Uninitialized(id.to_string())),
        }
    }

    /// Absorption table for `id` if it has already been built.
    pub fn absorption(&self, id: ChainId) -> GachaResult<&AbsorptionTable> {
        match self.absorptions[id.slot()].get() {
            Some(result) => result.as_ref().map_err(Clone::clone),
            None => Err(GachaError::Uninitialized(id.to_string())),
        }
    }

    /// Returns true if the expectation table for `id` is built.
    pub fn is_solved(&self, id: ChainId) -> bool {
        self.solutions[id.slot()].get().is_some()
    }

    /// Build every expectation table up front.
    pub fn warm_all(&self) -> GachaResult<()> {
        for id in ChainId::ALL {
            self.solution_or_build(id)?;
        }
        Ok(())
    }
}

impl Default for ChainCache {
    fn default() -> Self {
        Self::new()
    }
}
