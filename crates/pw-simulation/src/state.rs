//! Mutable state of one simulated run.

use std::collections::HashMap;

use pw_core::InitialState;
use pw_mechanics::{DropCurve, WinRule};

/// An item whose copies are counted to size duplicate rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey {
    /// The featured 5★.
    FeaturedFiveStar,
    /// One of the standard 5★ items, by slot.
    StandardFiveStar(u32),
    /// One of the standard 4★ characters, by slot.
    StandardFourStar(u32),
}

/// Banner state owned by a single run.
///
/// Carries over between targets of the same run, including the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullState {
    /// Pulls since the last 5★.
    pub pity: u32,
    /// Pulls since the last 4★ or 5★.
    pub pity4: u32,
    /// Next 5★ is guaranteed featured.
    pub guaranteed: bool,
    /// Next 4★ is guaranteed featured.
    pub guaranteed4: bool,
    /// Radiance streak or fate points; 0 for plain guarantee rules.
    pub secondary: u32,
    collection: HashMap<ItemKey, u32>,
}

impl PullState {
    /// Starting state for a run, with counters clamped into range.
    pub fn from_initial(initial: &InitialState, curve: &DropCurve, rule: &WinRule) -> Self {
        Self {
            pity: initial.pity.min(curve.pity_max() - 1),
            pity4: 0,
            guaranteed: initial.is_guaranteed,
            guaranteed4: false,
            secondary: rule.initial_secondary(initial),
            collection: HashMap::new(),
        }
    }

    /// Record one more copy of `item` and return how many are now owned.
    pub fn collect(&mut self, item: ItemKey) -> u32 {
        let count = self.collection.entry(item).or_insert(0);
        *count += 1;
        *count
    }

    /// Copies of `item` collected so far.
    pub fn copies(&self, item: ItemKey) -> u32 {
        self.collection.get(&item).copied().unwrap_or(0)
    }
}
