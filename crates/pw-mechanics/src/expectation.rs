//! Exact expected pull counts.
//!
//! The first target is read straight from the expectation table at the
//! caller's starting state. Every later target starts from pity 0 without a
//! guarantee, so only the carried-over secondary counter is uncertain; its
//! distribution is pushed forward through the absorption table instead of
//! solving a new system per target.

use pw_core::{ExpectationResult, GachaRequest, GachaResult, InitialState};

use crate::cache::{ChainCache, global_cache};
use crate::variant::Variant;

/// Largest per-entry change at which the carried-over distribution counts as stationary.
const SETTLED_EPSILON: f64 = 1e-15;

/// Exact-expectation model for one variant.
#[derive(Debug, Clone, Copy)]
pub struct ExpectationModel<'a> {
    variant: Variant,
    cache: &'a ChainCache,
}

impl ExpectationModel<'static> {
    /// Model backed by the process-wide cache.
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            cache: global_cache(),
        }
    }
}

impl<'a> ExpectationModel<'a> {
    /// Model backed by a caller-owned cache.
    pub fn with_cache(variant: Variant, cache: &'a ChainCache) -> Self {
        Self { variant, cache }
    }

    /// The variant this model answers for.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Expected total pulls to collect `target_count` featured copies from `initial`.
    pub fn expected_pulls(&self, initial: &InitialState, target_count: u32) -> GachaResult<f64> {
        let id = self.variant.chain_id();
        self.cache.solution_or_build(id)?;
        let solution = self.cache.solution(id)?;
        let chain = solution.chain();

        let secondary = self.variant.win_rule().initial_secondary(initial);
        let start = chain.clamp(initial.pity, initial.is_guaranteed, secondary);
        let mut mean = solution.expected(start);

        let targets = target_count.max(1);
        if targets == 1 {
            return Ok(mean);
        }

        self.cache.absorption_or_build(id)?;
        let absorption = self.cache.absorption(id)?;
        let mut dist = absorption.distribution(start).to_vec();

        let mut remaining = targets - 1;
        while remaining > 0 {
            let mut step = 0.0;
            let mut next = vec![0.0; dist.len()];
            for (s, &p) in dist.iter().enumerate() {
                if p <= 0.0 {
                    continue;
                }
                let reset = chain.reset_state(s as u32);
                step += p * solution.expected(reset);
                for (n, q) in next.iter_mut().zip(absorption.distribution(reset)) {
                    *n += p * q;
                }
            }
            mean += step;
            remaining -= 1;

            // Once the counter distribution is stationary every later target costs `step`.
            let settled = dist
                .iter()
                .zip(&next)
                .all(|(a, b)| (a - b).abs() <= SETTLED_EPSILON);
            if settled {
                mean += f64::from(remaining) * step;
                break;
            }
            dist = next;
        }

        Ok(mean)
    }

    /// Answer a request for this variant.
    pub fn expectation(&self, request: &GachaRequest) -> GachaResult<ExpectationResult> {
        let mean = self.expected_pulls(&request.initial_state, request.target_count)?;
        Ok(ExpectationResult { mean })
    }
}

/// Resolve the request's variant and compute its expectation with the global cache.
pub fn expected_pulls(request: &GachaRequest) -> GachaResult<ExpectationResult> {
    let variant = Variant::from_keys(request.game, request.pool)?;
    ExpectationModel::new(variant).expectation(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::AbsorbingChain;
    use crate::curve::DropCurve;
    use pw_core::{GachaError, GameKey, PoolKey};

    fn state(pity: u32, guaranteed: bool, radiance: u32, fate: u32) -> InitialState {
        InitialState {
            pity,
            is_guaranteed: guaranteed,
            radiance_counter: radiance,
            fate_point: fate,
        }
    }

    fn mean(variant: Variant, initial: InitialState, n: u32) -> f64 {
        ExpectationModel::new(variant)
            .expected_pulls(&initial, n)
            .unwrap()
    }

    #[test]
    fn genshin_character_baseline() {
        let per_drop = DropCurve::CHARACTER.expected_pulls_per_drop();
        let e = mean(Variant::GenshinCharacter, InitialState::default(), 1);
        assert!((e - 1.45 * per_drop).abs() < 1e-6, "got {e}");
    }

    #[test]
    fn charged_radiance_is_a_plain_drop() {
        let per_drop = DropCurve::CHARACTER.expected_pulls_per_drop();
        let e = mean(Variant::GenshinCharacter, state(0, false, 3, 0), 1);
        assert!((e - per_drop).abs() < 1e-6);
        let g = mean(Variant::GenshinCharacter, state(0, true, 0, 0), 1);
        assert!((g - per_drop).abs() < 1e-6);
    }

    #[test]
    fn full_fate_matches_guarantee() {
        let fate = mean(Variant::GenshinWeapon, state(20, false, 0, 1), 1);
        let guaranteed = mean(Variant::GenshinWeapon, state(20, true, 0, 0), 1);
        assert!((fate - guaranteed).abs() < 1e-9);
    }

    #[test]
    fn collapsing_chains_are_additive() {
        for variant in [
            Variant::GenshinWeapon,
            Variant::HsrCharacter,
            Variant::HsrLightCone,
            Variant::ZzzCharacter,
            Variant::ZzzWeapon,
        ] {
            let cache = global_cache();
            let id = variant.chain_id();
            let chain = AbsorbingChain::new(id);
            let absorption = cache.absorption_or_build(id).unwrap();
            // Verify the collapse instead of assuming it.
            assert!((absorption.distribution(chain.reset_state(0))[0] - 1.0).abs() < 1e-9);

            let start = state(37, true, 0, 0);
            let one = mean(variant, start, 1);
            let reset = mean(variant, InitialState::default(), 1);
            for n in [2, 3, 6] {
                let many = mean(variant, start, n);
                let additive = one + f64::from(n - 1) * reset;
                assert!(
                    (many - additive).abs() < 1e-6,
                    "{variant} n={n}: {many} vs {additive}"
                );
            }
        }
    }

    #[test]
    fn radiance_propagates_the_counter() {
        let cache = global_cache();
        let solution = cache
            .solution_or_build(Variant::GenshinCharacter.chain_id())
            .unwrap();
        let chain = solution.chain();
        let e = |s: u32| solution.expected(chain.reset_state(s));

        // From (0, no guarantee, 0): win 55% -> counter 0, lose -> counter 1.
        let two = mean(Variant::GenshinCharacter, InitialState::default(), 2);
        let want = e(0) + 0.55 * e(0) + 0.45 * e(1);
        assert!((two - want).abs() < 1e-6, "{two} vs {want}");

        // Below the cap a lost 50/50 does not change the win rate.
        assert!((e(1) - e(0)).abs() < 1e-9);
        assert!((e(2) - e(0)).abs() < 1e-9);
        assert!(e(3) < e(0));

        // From counter 2 a loss charges the next target to a forced win.
        let from_two = mean(Variant::GenshinCharacter, state(0, false, 2, 0), 2);
        assert!(from_two < 2.0 * e(0));
    }

    #[test]
    fn guaranteed_start_counts_its_loss() {
        let cache = global_cache();
        let solution = cache
            .solution_or_build(Variant::GenshinCharacter.chain_id())
            .unwrap();
        let chain = solution.chain();
        let first = solution.expected(chain.clamp(10, true, 2));
        let two = mean(Variant::GenshinCharacter, state(10, true, 2, 0), 2);
        let want = first + solution.expected(chain.reset_state(3));
        assert!((two - want).abs() < 1e-6, "{two} vs {want}");

        // Both copies are then plain drops from pity 0.
        let per_drop = DropCurve::CHARACTER.expected_pulls_per_drop();
        let fresh = mean(Variant::GenshinCharacter, state(0, true, 2, 0), 2);
        assert!((fresh - 2.0 * per_drop).abs() < 1e-6, "{fresh}");

        // One loss earlier: the next target starts at counter 2, still a 55% roll.
        let once = mean(Variant::GenshinCharacter, state(0, true, 1, 0), 2);
        let want = per_drop + solution.expected(chain.reset_state(2));
        assert!((once - want).abs() < 1e-6);
    }

    #[test]
    fn huge_target_counts_finish() {
        let hsr = Variant::HsrCharacter;
        let start = state(5, false, 0, 0);
        let one = mean(hsr, start, 1);
        let reset = mean(hsr, InitialState::default(), 1);
        let many = mean(hsr, start, u32::MAX);
        let additive = one + f64::from(u32::MAX - 1) * reset;
        assert!(((many - additive) / additive).abs() < 1e-9);

        let genshin = Variant::GenshinCharacter;
        let start = InitialState::default();
        let huge = mean(genshin, start, u32::MAX);
        assert!(huge.is_finite());
        // Past the transient every copy costs the same.
        let a = mean(genshin, start, 400) - mean(genshin, start, 200);
        let b = mean(genshin, start, 600) - mean(genshin, start, 400);
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        let per_copy = (huge - mean(genshin, start, 600)) / f64::from(u32::MAX - 600);
        assert!((per_copy - a / 200.0).abs() < 1e-6);
    }

    #[test]
    fn target_zero_is_target_one() {
        for variant in Variant::ALL {
            let start = state(12, false, 1, 0);
            assert_eq!(mean(variant, start, 0), mean(variant, start, 1));
        }
    }

    #[test]
    fn pity_above_max_is_clamped() {
        for variant in Variant::ALL {
            let top = variant.curve().pity_max() - 1;
            assert_eq!(
                mean(variant, state(10_000, false, 0, 0), 1),
                mean(variant, state(top, false, 0, 0), 1)
            );
        }
        // At hard pity a guaranteed pull finishes in exactly one.
        let e = mean(Variant::HsrCharacter, state(500, true, 0, 0), 1);
        assert!((e - 1.0).abs() < 1e-12);
    }

    #[test]
    fn secondary_above_max_is_clamped() {
        assert_eq!(
            mean(Variant::GenshinCharacter, state(0, false, 99, 0), 1),
            mean(Variant::GenshinCharacter, state(0, false, 3, 0), 1)
        );
        assert_eq!(
            mean(Variant::GenshinWeapon, state(0, false, 0, 7), 1),
            mean(Variant::GenshinWeapon, state(0, false, 0, 1), 1)
        );
    }

    #[test]
    fn zzz_character_matches_hsr_character() {
        let start = state(45, false, 0, 0);
        assert_eq!(
            mean(Variant::ZzzCharacter, start, 3),
            mean(Variant::HsrCharacter, start, 3)
        );
    }

    #[test]
    fn more_pity_means_fewer_pulls() {
        for variant in Variant::ALL {
            let low = mean(variant, state(0, false, 0, 0), 1);
            let high = mean(variant, state(70, false, 0, 0), 1);
            assert!(high < low, "{variant}");
        }
    }

    #[test]
    fn request_entry_point() {
        let req = GachaRequest::new(GameKey::Hsr, PoolKey::LightCone);
        let result = expected_pulls(&req).unwrap();
        assert!(result.mean > 1.0);

        let bad = GachaRequest::new(GameKey::Hsr, PoolKey::Weapon);
        assert!(matches!(
            expected_pulls(&bad),
            Err(GachaError::UnsupportedCombination { .. })
        ));
    }
}
