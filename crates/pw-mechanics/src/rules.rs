//! Win rules for 5★ drops and the 4★ / byproduct reward tables.

use pw_core::InitialState;
use serde::{Deserialize, Serialize};

/// How a 5★ drop is split between the featured item and everything else,
/// and how the guarantee and secondary counter move afterwards.
///
/// After a miss the guarantee flag is always set. The secondary counter
/// depends on the rule:
/// - `Guarantee` has none (it is always 0).
/// - `Radiance` counts consecutive lost 50/50s and forces a win at `streak_max`.
///   A guaranteed win leaves it unchanged; a won 50/50 resets it. A
///   caller-supplied guarantee has not been counted yet, so it starts one higher.
/// - `FatePath` counts fate points and forces a win at `fate_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WinRule {
    /// Plain 50/50 (or 75/25) with a guarantee after a miss.
    Guarantee {
        /// Chance a non-guaranteed 5★ is featured.
        win_rate: f64,
    },
    /// Genshin character banner with Capturing Radiance.
    Radiance {
        /// Combined chance a non-guaranteed 5★ is featured.
        win_rate: f64,
        /// Counter value at which the next 50/50 is always won.
        streak_max: u32,
    },
    /// Genshin weapon banner with Epitomized Path.
    FatePath {
        /// Chance a 5★ is the charted weapon without fate.
        win_rate: f64,
        /// Fate points at which the charted weapon is certain.
        fate_max: u32,
    },
}

/// What happened on a 5★ drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiveStarOutcome {
    /// The drop was the featured (target) item.
    pub featured: bool,
    /// Guarantee flag after the drop.
    pub guaranteed: bool,
    /// Secondary counter after the drop.
    pub secondary: u32,
}

impl WinRule {
    /// Number of distinct secondary-counter values.
    pub fn secondary_len(&self) -> u32 {
        match *self {
            Self::Guarantee { .. } => 1,
            Self::Radiance { streak_max, .. } => streak_max + 1,
            Self::FatePath { fate_max, .. } => fate_max + 1,
        }
    }

    /// Clamp a caller-supplied secondary counter into range.
    pub fn clamp_secondary(&self, secondary: u32) -> u32 {
        secondary.min(self.secondary_len() - 1)
    }

    /// The caller's secondary counter for this rule, clamped into range.
    ///
    /// A guaranteed radiance start counts the loss behind that guarantee, so
    /// the counter is bumped once before entering the chain.
    pub fn initial_secondary(&self, initial: &InitialState) -> u32 {
        match self {
            Self::Guarantee { .. } => 0,
            Self::Radiance { .. } => {
                let bump = u32::from(initial.is_guaranteed);
                self.clamp_secondary(initial.radiance_counter.saturating_add(bump))
            }
            Self::FatePath { .. } => self.clamp_secondary(initial.fate_point),
        }
    }

    /// Probability that a 5★ drop in this state is featured.
    pub fn win_probability(&self, guaranteed: bool, secondary: u32) -> f64 {
        if guaranteed {
            return 1.0;
        }
        match *self {
            Self::Guarantee { win_rate } => win_rate,
            Self::Radiance {
                win_rate,
                streak_max,
            } => {
                if secondary >= streak_max {
                    1.0
                } else {
                    win_rate
                }
            }
            Self::FatePath { win_rate, fate_max } => {
                if secondary >= fate_max {
                    1.0
                } else {
                    win_rate
                }
            }
        }
    }

    /// Secondary counter after the featured item drops.
    pub fn secondary_after_win(&self, guaranteed: bool, secondary: u32) -> u32 {
        match self {
            Self::Radiance { .. } if guaranteed => secondary,
            _ => 0,
        }
    }

    /// Secondary counter after an off-target 5★ drops.
    pub fn secondary_after_miss(&self, secondary: u32) -> u32 {
        match self {
            Self::Guarantee { .. } => 0,
            Self::Radiance { .. } | Self::FatePath { .. } => {
                self.clamp_secondary(secondary.saturating_add(1))
            }
        }
    }

    /// Resolve a 5★ drop given a uniform draw `u` in `[0, 1)`.
    pub fn resolve(&self, guaranteed: bool, secondary: u32, u: f64) -> FiveStarOutcome {
        if u < self.win_probability(guaranteed, secondary) {
            FiveStarOutcome {
                featured: true,
                guaranteed: false,
                secondary: self.secondary_after_win(guaranteed, secondary),
            }
        } else {
            FiveStarOutcome {
                featured: false,
                guaranteed: true,
                secondary: self.secondary_after_miss(secondary),
            }
        }
    }
}

/// A payout that grows with the number of copies already owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TieredReturn {
    /// Payout for the first copy.
    pub first: u32,
    /// Payout for copies 2 through `repeat_limit`.
    pub repeat: u32,
    /// Payout for every copy past `repeat_limit`.
    pub saturated: u32,
    /// Last copy count paid at the `repeat` rate.
    pub repeat_limit: u32,
}

impl TieredReturn {
    /// Build a tier with the usual limit of seven copies.
    pub const fn new(first: u32, repeat: u32, saturated: u32) -> Self {
        Self {
            first,
            repeat,
            saturated,
            repeat_limit: 7,
        }
    }

    /// Payout for the `count`-th copy (1-based).
    pub fn amount(&self, count: u32) -> u32 {
        if count <= 1 {
            self.first
        } else if count <= self.repeat_limit {
            self.repeat
        } else {
            self.saturated
        }
    }
}

/// Byproduct currency paid for a 5★ drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiveStarReturn {
    /// Same payout for every 5★.
    Fixed(u32),
    /// Payout depends on how many copies of that item were seen.
    Tiered {
        /// Tiers for the featured item.
        featured: TieredReturn,
        /// Tiers for each standard 5★.
        standard: TieredReturn,
        /// Number of standard 5★ items an off-target drop is chosen from.
        standard_pool: u32,
    },
}

/// 4★ drop rate, pity, split, and payouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourStarRule {
    /// Per-pull 4★ probability before the 5★ correction.
    pub base_rate: f64,
    /// Pull count at which a 4★ is certain.
    pub pity: u32,
    /// Chance a non-guaranteed 4★ is featured.
    pub featured_rate: f64,
    /// Payout for a featured 4★.
    pub featured_return: u32,
    /// Payout for a featured 4★ already at max copies.
    pub featured_return_maxed: u32,
    /// Share of off-banner 4★ drops that are characters.
    pub character_share: f64,
    /// Number of standard 4★ characters an off-banner drop is chosen from.
    pub standard_characters: u32,
    /// Payout tiers for standard 4★ characters.
    pub character_return: TieredReturn,
    /// Payout for any other off-banner 4★ (weapons, light cones, W-Engines).
    pub other_return: u32,
}

impl FourStarRule {
    /// Probability of a 4★ on a pull that did not produce a 5★.
    ///
    /// The published combined rate is split across the pulls left over
    /// after the 5★ roll.
    pub fn conditional_rate(&self, p5: f64) -> f64 {
        if p5 >= 1.0 {
            0.0
        } else {
            self.base_rate / (1.0 - p5)
        }
    }

    /// Payout for a featured 4★.
    pub fn featured_payout(&self, maxed: bool) -> u32 {
        if maxed {
            self.featured_return_maxed
        } else {
            self.featured_return
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RADIANCE: WinRule = WinRule::Radiance {
        win_rate: 0.55,
        streak_max: 3,
    };
    const FATE: WinRule = WinRule::FatePath {
        win_rate: 0.375,
        fate_max: 1,
    };
    const FIFTY: WinRule = WinRule::Guarantee { win_rate: 0.5 };

    #[test]
    fn secondary_lengths() {
        assert_eq!(FIFTY.secondary_len(), 1);
        assert_eq!(RADIANCE.secondary_len(), 4);
        assert_eq!(FATE.secondary_len(), 2);
    }

    #[test]
    fn guaranteed_always_wins() {
        for rule in [FIFTY, RADIANCE, FATE] {
            assert_eq!(rule.win_probability(true, 0), 1.0);
        }
    }

    #[test]
    fn charged_counters_force_a_win() {
        assert_eq!(RADIANCE.win_probability(false, 2), 0.55);
        assert_eq!(RADIANCE.win_probability(false, 3), 1.0);
        assert_eq!(FATE.win_probability(false, 0), 0.375);
        assert_eq!(FATE.win_probability(false, 1), 1.0);
    }

    #[test]
    fn radiance_counter_transitions() {
        // Lost 50/50 increments and sets the guarantee.
        let miss = RADIANCE.resolve(false, 1, 0.99);
        assert_eq!(
            miss,
            FiveStarOutcome {
                featured: false,
                guaranteed: true,
                secondary: 2
            }
        );
        // Guaranteed win keeps the counter.
        let g = RADIANCE.resolve(true, 2, 0.99);
        assert!(g.featured);
        assert!(!g.guaranteed);
        assert_eq!(g.secondary, 2);
        // Won 50/50 resets it.
        assert_eq!(RADIANCE.resolve(false, 2, 0.1).secondary, 0);
        // Forced win at the cap resets it too.
        assert_eq!(RADIANCE.resolve(false, 3, 0.99).secondary, 0);
        // Counter is capped.
        assert_eq!(RADIANCE.secondary_after_miss(3), 3);
    }

    #[test]
    fn fate_transitions() {
        let miss = FATE.resolve(false, 0, 0.5);
        assert!(!miss.featured);
        assert_eq!(miss.secondary, 1);
        let win = FATE.resolve(false, 1, 0.99);
        assert!(win.featured);
        assert_eq!(win.secondary, 0);
    }

    #[test]
    fn clamp_secondary() {
        assert_eq!(FIFTY.clamp_secondary(5), 0);
        assert_eq!(RADIANCE.clamp_secondary(9), 3);
        assert_eq!(FATE.clamp_secondary(2), 1);
    }

    #[test]
    fn initial_secondary_picks_the_right_counter() {
        let initial = InitialState {
            pity: 0,
            is_guaranteed: false,
            radiance_counter: 2,
            fate_point: 5,
        };
        assert_eq!(FIFTY.initial_secondary(&initial), 0);
        assert_eq!(RADIANCE.initial_secondary(&initial), 2);
        assert_eq!(FATE.initial_secondary(&initial), 1);
    }

    #[test]
    fn guaranteed_radiance_start_counts_its_loss() {
        let mut initial = InitialState {
            pity: 0,
            is_guaranteed: true,
            radiance_counter: 1,
            fate_point: 1,
        };
        assert_eq!(RADIANCE.initial_secondary(&initial), 2);
        assert_eq!(FATE.initial_secondary(&initial), 1);
        assert_eq!(FIFTY.initial_secondary(&initial), 0);
        initial.radiance_counter = 3;
        assert_eq!(RADIANCE.initial_secondary(&initial), 3);
    }

    #[test]
    fn tiered_amounts() {
        let t = TieredReturn::new(0, 40, 100);
        assert_eq!(t.amount(1), 0);
        assert_eq!(t.amount(2), 40);
        assert_eq!(t.amount(7), 40);
        assert_eq!(t.amount(8), 100);
    }

    #[test]
    fn four_star_conditional_rate() {
        let rule = FourStarRule {
            base_rate: 0.051,
            pity: 10,
            featured_rate: 0.5,
            featured_return: 2,
            featured_return_maxed: 5,
            character_share: 0.5,
            standard_characters: 10,
            character_return: TieredReturn::new(0, 2, 5),
            other_return: 2,
        };
        assert!((rule.conditional_rate(0.0) - 0.051).abs() < 1e-12);
        assert!(rule.conditional_rate(0.5) > 0.1);
        assert_eq!(rule.conditional_rate(1.0), 0.0);
        assert_eq!(rule.featured_payout(true), 5);
        assert_eq!(rule.featured_payout(false), 2);
    }

    proptest! {
        #[test]
        fn resolve_keeps_counters_in_range(
            rule_idx in 0usize..3,
            guaranteed in any::<bool>(),
            secondary in 0u32..8,
            u in 0.0f64..1.0,
        ) {
            let rule = [FIFTY, RADIANCE, FATE][rule_idx];
            let secondary = rule.clamp_secondary(secondary);
            let outcome = rule.resolve(guaranteed, secondary, u);
            prop_assert!(outcome.secondary < rule.secondary_len());
            prop_assert_eq!(outcome.guaranteed, !outcome.featured);
            if guaranteed {
                prop_assert!(outcome.featured);
            }
        }
    }
}
