//! The six supported banners and their rule constants.

use std::fmt;

use pw_core::{GachaError, GachaResult, GameKey, PoolKey};
use serde::{Deserialize, Serialize};

use crate::curve::DropCurve;
use crate::rules::{FiveStarReturn, FourStarRule, TieredReturn, WinRule};

/// A supported `(game, pool)` combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Genshin Impact character event wish.
    GenshinCharacter,
    /// Genshin Impact weapon event wish.
    GenshinWeapon,
    /// Honkai: Star Rail character event warp.
    HsrCharacter,
    /// Honkai: Star Rail light cone event warp.
    HsrLightCone,
    /// Zenless Zone Zero exclusive channel.
    ZzzCharacter,
    /// Zenless Zone Zero W-Engine channel.
    ZzzWeapon,
}

/// Identity of a cached Markov chain.
///
/// Variants whose chains are identical in structure and parameters share
/// one id, so their tables are solved once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    /// Radiance chain of the Genshin character banner.
    GenshinCharacter,
    /// Fate chain of the Genshin weapon banner.
    GenshinWeapon,
    /// 50/50 guarantee chain on the character curve (HSR and ZZZ characters).
    HsrCharacter,
    /// 75/25 guarantee chain on the HSR light cone curve.
    HsrLightCone,
    /// 75/25 guarantee chain on the ZZZ W-Engine curve.
    ZzzWeapon,
}

impl ChainId {
    /// All chains, in cache slot order.
    pub const ALL: [ChainId; 5] = [
        ChainId::GenshinCharacter,
        ChainId::GenshinWeapon,
        ChainId::HsrCharacter,
        ChainId::HsrLightCone,
        ChainId::ZzzWeapon,
    ];

    /// Cache slot of this chain.
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Drop curve driving the chain.
    pub fn curve(self) -> DropCurve {
        match self {
            Self::GenshinCharacter | Self::HsrCharacter => DropCurve::CHARACTER,
            Self::GenshinWeapon => DropCurve::GENSHIN_WEAPON,
            Self::HsrLightCone => DropCurve::HSR_LIGHT_CONE,
            Self::ZzzWeapon => DropCurve::ZZZ_WEAPON,
        }
    }

    /// Win rule driving the chain.
    pub fn win_rule(self) -> WinRule {
        match self {
            Self::GenshinCharacter => WinRule::Radiance {
                win_rate: 0.55,
                streak_max: 3,
            },
            Self::GenshinWeapon => WinRule::FatePath {
                win_rate: 0.375,
                fate_max: 1,
            },
            Self::HsrCharacter => WinRule::Guarantee { win_rate: 0.5 },
            Self::HsrLightCone | Self::ZzzWeapon => WinRule::Guarantee { win_rate: 0.75 },
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GenshinCharacter => "genshin-character chain",
            Self::GenshinWeapon => "genshin-weapon chain",
            Self::HsrCharacter => "hsr-character chain",
            Self::HsrLightCone => "hsr-lightcone chain",
            Self::ZzzWeapon => "zzz-weapon chain",
        };
        f.write_str(name)
    }
}

impl Variant {
    /// All variants, in display order.
    pub const ALL: [Variant; 6] = [
        Variant::GenshinCharacter,
        Variant::GenshinWeapon,
        Variant::HsrCharacter,
        Variant::HsrLightCone,
        Variant::ZzzCharacter,
        Variant::ZzzWeapon,
    ];

    /// Resolve a `(game, pool)` pair.
    pub fn from_keys(game: GameKey, pool: PoolKey) -> GachaResult<Self> {
        match (game, pool) {
            (GameKey::Genshin, PoolKey::Character) => Ok(Self::GenshinCharacter),
            (GameKey::Genshin, PoolKey::Weapon) => Ok(Self::GenshinWeapon),
            (GameKey::Hsr, PoolKey::Character) => Ok(Self::HsrCharacter),
            (GameKey::Hsr, PoolKey::LightCone) => Ok(Self::HsrLightCone),
            (GameKey::Zzz, PoolKey::Character) => Ok(Self::ZzzCharacter),
            (GameKey::Zzz, PoolKey::Weapon) => Ok(Self::ZzzWeapon),
            _ => Err(GachaError::UnsupportedCombination {
                game: game.to_string(),
                pool: pool.to_string(),
            }),
        }
    }

    /// The game this banner belongs to.
    pub fn game(self) -> GameKey {
        match self {
            Self::GenshinCharacter | Self::GenshinWeapon => GameKey::Genshin,
            Self::HsrCharacter | Self::HsrLightCone => GameKey::Hsr,
            Self::ZzzCharacter | Self::ZzzWeapon => GameKey::Zzz,
        }
    }

    /// The pool key of this banner.
    pub fn pool(self) -> PoolKey {
        match self {
            Self::GenshinCharacter | Self::HsrCharacter | Self::ZzzCharacter => {
                PoolKey::Character
            }
            Self::GenshinWeapon | Self::ZzzWeapon => PoolKey::Weapon,
            Self::HsrLightCone => PoolKey::LightCone,
        }
    }

    /// The `game-pool` key.
    pub fn key(self) -> &'static str {
        match self {
            Self::GenshinCharacter => "genshin-character",
            Self::GenshinWeapon => "genshin-weapon",
            Self::HsrCharacter => "hsr-character",
            Self::HsrLightCone => "hsr-lightcone",
            Self::ZzzCharacter => "zzz-character",
            Self::ZzzWeapon => "zzz-weapon",
        }
    }

    /// The cached chain this variant's expectation reads from.
    pub fn chain_id(self) -> ChainId {
        match self {
            Self::GenshinCharacter => ChainId::GenshinCharacter,
            Self::GenshinWeapon => ChainId::GenshinWeapon,
            Self::HsrCharacter | Self::ZzzCharacter => ChainId::HsrCharacter,
            Self::HsrLightCone => ChainId::HsrLightCone,
            Self::ZzzWeapon => ChainId::ZzzWeapon,
        }
    }

    /// 5★ drop curve.
    pub fn curve(self) -> DropCurve {
        self.chain_id().curve()
    }

    /// 5★ win rule.
    pub fn win_rule(self) -> WinRule {
        self.chain_id().win_rule()
    }

    /// 4★ rate, split, and payouts.
    pub fn four_star(self) -> FourStarRule {
        match self {
            Self::GenshinCharacter => FourStarRule {
                base_rate: 0.051,
                pity: 10,
                featured_rate: 0.5,
                featured_return: 2,
                featured_return_maxed: 5,
                character_share: 44.0 / 62.0,
                standard_characters: 44,
                character_return: TieredReturn::new(0, 2, 5),
                other_return: 2,
            },
            Self::GenshinWeapon => FourStarRule {
                base_rate: 0.06,
                pity: 10,
                featured_rate: 0.75,
                featured_return: 2,
                featured_return_maxed: 2,
                character_share: 44.0 / 62.0,
                standard_characters: 44,
                character_return: TieredReturn::new(0, 2, 5),
                other_return: 2,
            },
            Self::HsrCharacter => FourStarRule {
                base_rate: 0.051,
                pity: 10,
                featured_rate: 0.5,
                featured_return: 8,
                featured_return_maxed: 20,
                character_share: 22.0 / 51.0,
                standard_characters: 22,
                character_return: TieredReturn::new(0, 8, 20),
                other_return: 8,
            },
            Self::HsrLightCone => FourStarRule {
                base_rate: 0.066,
                pity: 10,
                featured_rate: 0.75,
                featured_return: 8,
                featured_return_maxed: 8,
                character_share: 22.0 / 51.0,
                standard_characters: 22,
                character_return: TieredReturn::new(0, 8, 20),
                other_return: 8,
            },
            Self::ZzzCharacter => FourStarRule {
                base_rate: 0.094,
                pity: 10,
                featured_rate: 0.5,
                featured_return: 8,
                featured_return_maxed: 20,
                character_share: 7.05 / (7.05 + 2.35),
                standard_characters: 12,
                character_return: TieredReturn::new(0, 8, 20),
                other_return: 8,
            },
            Self::ZzzWeapon => FourStarRule {
                base_rate: 0.15,
                pity: 10,
                featured_rate: 0.75,
                featured_return: 8,
                featured_return_maxed: 8,
                character_share: 1.875 / (13.125 + 1.875),
                standard_characters: 12,
                character_return: TieredReturn::new(0, 8, 20),
                other_return: 8,
            },
        }
    }

    /// Byproduct currency paid per 5★.
    pub fn five_star_return(self) -> FiveStarReturn {
        match self {
            Self::GenshinCharacter => FiveStarReturn::Tiered {
                featured: TieredReturn::new(10, 10, 25),
                standard: TieredReturn::new(0, 10, 25),
                standard_pool: 7,
            },
            Self::GenshinWeapon => FiveStarReturn::Fixed(10),
            Self::HsrCharacter => FiveStarReturn::Tiered {
                featured: TieredReturn::new(0, 40, 100),
                standard: TieredReturn::new(0, 40, 100),
                standard_pool: 7,
            },
            Self::ZzzCharacter => FiveStarReturn::Tiered {
                featured: TieredReturn::new(0, 40, 100),
                standard: TieredReturn::new(0, 40, 100),
                standard_pool: 6,
            },
            Self::HsrLightCone | Self::ZzzWeapon => FiveStarReturn::Fixed(40),
        }
    }

    /// Monte Carlo runs used when the caller does not choose.
    pub fn default_simulation_count(self) -> usize {
        match self.pool() {
            PoolKey::Character => 100_000,
            PoolKey::Weapon | PoolKey::LightCone => 50_000,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
