//! 5★ drop-probability curves.

use serde::{Deserialize, Serialize};

/// A flat base rate that ramps linearly after soft pity and reaches
/// certainty at hard pity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DropCurve {
    /// Per-pull probability before soft pity.
    pub base: f64,
    /// First pull number (1-based) on the ramp.
    pub soft_pity: u32,
    /// Pull number (1-based) at which a 5★ is certain.
    pub hard_pity: u32,
    /// Probability added per pull past soft pity.
    pub step: f64,
}

impl DropCurve {
    /// Character banners of all three games: 0.6%, ramp from pull 74, certain at 90.
    pub const CHARACTER: DropCurve = DropCurve {
        base: 0.006,
        soft_pity: 74,
        hard_pity: 90,
        step: 0.06,
    };

    /// Genshin weapon banner: 0.7%, ramp from pull 64, certain at 80.
    pub const GENSHIN_WEAPON: DropCurve = DropCurve {
        base: 0.007,
        soft_pity: 64,
        hard_pity: 80,
        step: 0.07,
    };

    /// HSR light cone banner: 0.8%, ramp from pull 66, certain at 80.
    pub const HSR_LIGHT_CONE: DropCurve = DropCurve {
        base: 0.008,
        soft_pity: 66,
        hard_pity: 80,
        step: 0.08,
    };

    /// ZZZ W-Engine banner: 1%, ramp from pull 65, certain at 80.
    pub const ZZZ_WEAPON: DropCurve = DropCurve {
        base: 0.01,
        soft_pity: 65,
        hard_pity: 80,
        step: 0.061875,
    };

    /// Probability that the pull after `pity_index` misses is a 5★.
    ///
    /// `pity_index` is 0-based: index 0 is the first pull after a reset.
    pub fn probability(&self, pity_index: u32) -> f64 {
        let pull = pity_index + 1;
        if pull >= self.hard_pity {
            1.0
        } else if pull < self.soft_pity {
            self.base
        } else {
            let ramp = f64::from(pull - (self.soft_pity - 1));
            (self.base + ramp * self.step).min(1.0)
        }
    }

    /// Number of distinct pity values, i.e. the hard pity.
    pub fn pity_max(&self) -> u32 {
        self.hard_pity
    }

    /// Expected pulls for any 5★ from a reset counter.
    pub fn expected_pulls_per_drop(&self) -> f64 {
        let mut survival = 1.0;
        let mut expected = 0.0;
        for idx in 0..self.hard_pity {
            let p = self.probability(idx);
            expected += f64::from(idx + 1) * survival * p;
            survival *= 1.0 - p;
        }
        expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_curve_shape() {
        let c = DropCurve::CHARACTER;
        assert_eq!(c.probability(0), 0.006);
        assert_eq!(c.probability(72), 0.006);
        assert!((c.probability(73) - 0.066).abs() < 1e-12);
        assert!((c.probability(74) - 0.126).abs() < 1e-12);
        assert_eq!(c.probability(89), 1.0);
        assert_eq!(c.probability(200), 1.0);
    }

    #[test]
    fn weapon_curves_reach_certainty_at_80() {
        for c in [
            DropCurve::GENSHIN_WEAPON,
            DropCurve::HSR_LIGHT_CONE,
            DropCurve::ZZZ_WEAPON,
        ] {
            assert_eq!(c.pity_max(), 80);
            assert_eq!(c.probability(79), 1.0);
            assert!(c.probability(60) < 0.02);
        }
    }

    #[test]
    fn zzz_weapon_ramp() {
        let c = DropCurve::ZZZ_WEAPON;
        assert_eq!(c.probability(63), 0.01);
        assert!((c.probability(64) - 0.071875).abs() < 1e-12);
    }

    #[test]
    fn curves_are_monotone() {
        for c in [
            DropCurve::CHARACTER,
            DropCurve::GENSHIN_WEAPON,
            DropCurve::HSR_LIGHT_CONE,
            DropCurve::ZZZ_WEAPON,
        ] {
            for idx in 1..c.hard_pity {
                assert!(c.probability(idx) >= c.probability(idx - 1));
            }
        }
    }

    #[test]
    fn character_average_is_about_62() {
        let e = DropCurve::CHARACTER.expected_pulls_per_drop();
        assert!((e - 62.3).abs() < 0.5, "expected ~62.3, got {e}");
    }
}
