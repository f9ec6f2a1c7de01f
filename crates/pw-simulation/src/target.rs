//! Pull-by-pull replay of one target acquisition.

use pw_core::{InitialState, SampleSource};
use pw_mechanics::{DropCurve, FiveStarReturn, FourStarRule, Variant, WinRule};

use crate::state::{ItemKey, PullState};

/// Pulls and byproduct currency spent on one target, or one whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TargetOutcome {
    /// Pulls made.
    pub pulls: u32,
    /// Byproduct currency earned.
    pub returns: u32,
}

/// Anything that can replay target acquisitions for the run driver.
pub trait TargetSimulator: Sync {
    /// Fresh run state from the caller's banner state.
    fn initial_pull_state(&self, initial: &InitialState) -> PullState;

    /// Pull until the featured 5★ drops, mutating `state`.
    fn simulate_target(&self, state: &mut PullState, source: &mut SampleSource) -> TargetOutcome;
}

/// Everything the simulator needs to know about a banner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullRules {
    /// 5★ drop curve.
    pub curve: DropCurve,
    /// 5★ win rule.
    pub win_rule: WinRule,
    /// 4★ rate, split, and payouts.
    pub four_star: FourStarRule,
    /// 5★ payouts.
    pub five_star: FiveStarReturn,
    /// Featured 4★ is maxed.
    pub up4_c6: bool,
}

impl PullRules {
    /// Rules of `variant`.
    pub fn for_variant(variant: Variant, up4_c6: bool) -> Self {
        Self {
            curve: variant.curve(),
            win_rule: variant.win_rule(),
            four_star: variant.four_star(),
            five_star: variant.five_star_return(),
            up4_c6,
        }
    }

    fn five_star_payout(
        &self,
        featured: bool,
        state: &mut PullState,
        source: &mut SampleSource,
    ) -> u32 {
        match self.five_star {
            FiveStarReturn::Fixed(amount) => amount,
            FiveStarReturn::Tiered {
                featured: tiers, ..
            } if featured => tiers.amount(state.collect(ItemKey::FeaturedFiveStar)),
            FiveStarReturn::Tiered {
                standard,
                standard_pool,
                ..
            } => {
                let slot = source.next_index(standard_pool);
                standard.amount(state.collect(ItemKey::StandardFiveStar(slot)))
            }
        }
    }

    fn four_star_payout(&self, state: &mut PullState, source: &mut SampleSource) -> u32 {
        let rule = &self.four_star;
        state.pity4 = 0;

        if state.guaranteed4 || source.next_f64() < rule.featured_rate {
            state.guaranteed4 = false;
            return rule.featured_payout(self.up4_c6);
        }

        state.guaranteed4 = true;
        if source.next_f64() < rule.character_share {
            let slot = source.next_index(rule.standard_characters);
            rule.character_return
                .amount(state.collect(ItemKey::StandardFourStar(slot)))
        } else {
            rule.other_return
        }
    }
}

/// Pull until the featured 5★ drops.
///
/// Each pull raises both pities and rolls the 5★ curve. A 5★ resets both
/// pities, resolves the win rule, and pays its reward; only a featured one
/// ends the loop. Otherwise a 4★ drops at 4★ pity or with the corrected
/// base rate, resolving its own featured split.
pub fn simulate_one_target(
    rules: &PullRules,
    state: &mut PullState,
    source: &mut SampleSource,
) -> TargetOutcome {
    let mut outcome = TargetOutcome::default();

    loop {
        outcome.pulls += 1;
        state.pity += 1;
        state.pity4 += 1;

        let p5 = rules.curve.probability(state.pity - 1);
        if source.next_f64() < p5 {
            let win = rules.win_rule.win_probability(state.guaranteed, state.secondary);
            let u = if win < 1.0 { source.next_f64() } else { 0.0 };
            let drop = rules.win_rule.resolve(state.guaranteed, state.secondary, u);

            state.pity = 0;
            state.pity4 = 0;
            state.guaranteed = drop.guaranteed;
            state.secondary = drop.secondary;
            outcome.returns += rules.five_star_payout(drop.featured, state, source);

            if drop.featured {
                return outcome;
            }
        } else {
            let four = &rules.four_star;
            if state.pity4 >= four.pity || source.next_f64() < four.conditional_rate(p5) {
                outcome.returns += rules.four_star_payout(state, source);
            }
        }
    }
}

impl TargetSimulator for PullRules {
    fn initial_pull_state(&self, initial: &InitialState) -> PullState {
        PullState::from_initial(initial, &self.curve, &self.win_rule)
    }

    fn simulate_target(&self, state: &mut PullState, source: &mut SampleSource) -> TargetOutcome {
        simulate_one_target(self, state, source)
    }
}
