//! Request and result records.
//!
//! Wire names follow the JSON bodies accepted by the request front end
//! (`targetCount`, `initialState`, `up4C6`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A supported game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKey {
    /// Genshin Impact.
    Genshin,
    /// Honkai: Star Rail.
    Hsr,
    /// Zenless Zone Zero.
    Zzz,
}

impl GameKey {
    /// All games, in display order.
    pub const ALL: [GameKey; 3] = [GameKey::Genshin, GameKey::Hsr, GameKey::Zzz];

    /// The lowercase key used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Genshin => "genshin",
            Self::Hsr => "hsr",
            Self::Zzz => "zzz",
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "genshin" => Ok(Self::Genshin),
            "hsr" => Ok(Self::Hsr),
            "zzz" => Ok(Self::Zzz),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

/// A banner pool within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolKey {
    /// Limited character banner.
    Character,
    /// Weapon banner (Genshin, ZZZ W-Engines).
    Weapon,
    /// Light cone banner (HSR).
    #[serde(rename = "lightcone")]
    LightCone,
}

impl PoolKey {
    /// The lowercase key used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Weapon => "weapon",
            Self::LightCone => "lightcone",
        }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "character" => Ok(Self::Character),
            "weapon" => Ok(Self::Weapon),
            "lightcone" | "light-cone" => Ok(Self::LightCone),
            other => Err(format!("unknown pool: {other}")),
        }
    }
}

/// Which computation a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Exact expected pull count from the Markov chain.
    #[default]
    Expectation,
    /// Monte Carlo distribution of pulls and byproduct currency.
    Distribution,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expectation => f.write_str("expectation"),
            Self::Distribution => f.write_str("distribution"),
        }
    }
}

/// The player's banner state when the request starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialState {
    /// Pulls since the last 5★.
    pub pity: u32,
    /// Whether the next 5★ is guaranteed to be featured.
    pub is_guaranteed: bool,
    /// Consecutive lost 50/50s (Genshin character "Capturing Radiance").
    #[serde(rename = "mingguangCounter", alias = "radianceCounter")]
    pub radiance_counter: u32,
    /// Epitomized Path fate points (Genshin weapon).
    pub fate_point: u32,
}

/// A validated request for one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GachaRequest {
    /// Game to model.
    pub game: GameKey,
    /// Pool within the game.
    pub pool: PoolKey,
    /// Exact expectation or simulated distribution.
    #[serde(default)]
    pub mode: Mode,
    /// How many copies of the featured item are wanted. Values below 1 count as 1.
    pub target_count: u32,
    /// Featured 4★ is already maxed, so its duplicates pay the higher rate.
    #[serde(default)]
    pub up4_c6: bool,
    /// Pull budget used for the success rate.
    #[serde(default)]
    pub budget: Option<u32>,
    /// Starting banner state.
    #[serde(default)]
    pub initial_state: InitialState,
}

impl GachaRequest {
    /// A request for one copy from a fresh banner state.
    pub fn new(game: GameKey, pool: PoolKey) -> Self {
        Self {
            game,
            pool,
            mode: Mode::default(),
            target_count: 1,
            up4_c6: false,
            budget: None,
            initial_state: InitialState::default(),
        }
    }

    /// Set the computation mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of wanted copies.
    pub fn with_target_count(mut self, count: u32) -> Self {
        self.target_count = count;
        self
    }

    /// Set the starting pity.
    pub fn with_pity(mut self, pity: u32) -> Self {
        self.initial_state.pity = pity;
        self
    }

    /// Set whether the next 5★ is guaranteed.
    pub fn with_guaranteed(mut self, guaranteed: bool) -> Self {
        self.initial_state.is_guaranteed = guaranteed;
        self
    }

    /// Set the Capturing Radiance counter.
    pub fn with_radiance_counter(mut self, counter: u32) -> Self {
        self.initial_state.radiance_counter = counter;
        self
    }

    /// Set the Epitomized Path fate points.
    pub fn with_fate_point(mut self, fate: u32) -> Self {
        self.initial_state.fate_point = fate;
        self
    }

    /// Set the pull budget.
    pub fn with_budget(mut self, budget: Option<u32>) -> Self {
        self.budget = budget;
        self
    }

    /// Set the maxed featured 4★ flag.
    pub fn with_up4_c6(mut self, up4_c6: bool) -> Self {
        self.up4_c6 = up4_c6;
        self
    }

    /// Target count with values below 1 clamped to 1.
    pub fn effective_target_count(&self) -> u32 {
        self.target_count.max(1)
    }

    /// The `game-pool` key, e.g. `genshin-character`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.game, self.pool)
    }
}

/// Mean and nearest-rank percentiles of a sample population.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PullStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// 25th percentile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p25: Option<f64>,
    /// Median.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p50: Option<f64>,
    /// 75th percentile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p75: Option<f64>,
    /// 90th percentile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p90: Option<f64>,
    /// 95th percentile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p95: Option<f64>,
}

impl PullStats {
    /// Stats carrying only a mean.
    pub fn mean_only(mean: f64) -> Self {
        Self {
            mean,
            ..Self::default()
        }
    }
}

/// Result of an exact-expectation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectationResult {
    /// Expected total pulls for all requested copies.
    pub mean: f64,
}

/// Result of a Monte Carlo request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionResult {
    /// Pull-count statistics.
    pub pulls: PullStats,
    /// Percentage of runs finishing within the budget, if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    /// Byproduct-currency statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<PullStats>,
}

/// The payload returned to a caller for either mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GachaResponse {
    /// Mode that produced the payload.
    pub mode: Mode,
    /// The normalized request.
    pub args: GachaRequest,
    /// Pull-count statistics (mean only in expectation mode).
    pub pulls: PullStats,
    /// Budget success rate (distribution mode with a budget).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    /// Byproduct-currency statistics (distribution mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<PullStats>,
}

impl GachaResponse {
    /// Wrap an expectation result.
    pub fn from_expectation(args: GachaRequest, result: ExpectationResult) -> Self {
        Self {
            mode: Mode::Expectation,
            args,
            pulls: PullStats::mean_only(result.mean),
            success_rate: None,
            returns: None,
        }
    }

    /// Wrap a distribution result.
    pub fn from_distribution(args: GachaRequest, result: DistributionResult) -> Self {
        Self {
            mode: Mode::Distribution,
            args,
            pulls: result.pulls,
            success_rate: result.success_rate,
            returns: result.returns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_case_insensitively() {
        assert_eq!("Genshin".parse::<GameKey>(), Ok(GameKey::Genshin));
        assert_eq!(" zzz ".parse::<GameKey>(), Ok(GameKey::Zzz));
        assert_eq!("lightcone".parse::<PoolKey>(), Ok(PoolKey::LightCone));
        assert_eq!("light-cone".parse::<PoolKey>(), Ok(PoolKey::LightCone));
        assert!("wuwa".parse::<GameKey>().is_err());
        assert!("banner".parse::<PoolKey>().is_err());
    }

    #[test]
    fn request_key() {
        let req = GachaRequest::new(GameKey::Hsr, PoolKey::LightCone);
        assert_eq!(req.key(), "hsr-lightcone");
    }

    #[test]
    fn target_count_below_one_is_one() {
        let req = GachaRequest::new(GameKey::Hsr, PoolKey::Character).with_target_count(0);
        assert_eq!(req.effective_target_count(), 1);
    }

    #[test]
    fn request_deserializes_from_wire_names() {
        let json = r#"{
            "game": "genshin",
            "pool": "character",
            "mode": "distribution",
            "targetCount": 2,
            "up4C6": true,
            "budget": 180,
            "initialState": {
                "pity": 10,
                "isGuaranteed": true,
                "mingguangCounter": 2,
                "fatePoint": 0
            }
        }"#;
        let req: GachaRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, Mode::Distribution);
        assert_eq!(req.target_count, 2);
        assert!(req.up4_c6);
        assert_eq!(req.budget, Some(180));
        assert_eq!(req.initial_state.radiance_counter, 2);
        assert!(req.initial_state.is_guaranteed);
    }

    #[test]
    fn initial_state_echoes_wire_counter_name() {
        let json = r#"{"pity": 3, "isGuaranteed": false, "radianceCounter": 1, "fatePoint": 0}"#;
        let state: InitialState = serde_json::from_str(json).unwrap();
        assert_eq!(state.radiance_counter, 1);
        let value = serde_json::to_value(state).unwrap();
        assert_eq!(value["mingguangCounter"], 1);
        assert!(value.get("radianceCounter").is_none());
    }

    #[test]
    fn request_defaults_optional_fields() {
        let json = r#"{"game": "zzz", "pool": "weapon", "targetCount": 1}"#;
        let req: GachaRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.mode, Mode::Expectation);
        assert_eq!(req.budget, None);
        assert_eq!(req.initial_state, InitialState::default());
    }

    #[test]
    fn pull_stats_omit_missing_percentiles() {
        let json = serde_json::to_string(&PullStats::mean_only(3.5)).unwrap();
        assert_eq!(json, r#"{"mean":3.5}"#);
    }

    #[test]
    fn response_uses_snake_case_success_rate() {
        let args = GachaRequest::new(GameKey::Zzz, PoolKey::Character);
        let resp = GachaResponse::from_distribution(
            args,
            DistributionResult {
                pulls: PullStats::mean_only(1.0),
                success_rate: Some(50.0),
                returns: None,
            },
        );
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["success_rate"], 50.0);
        assert_eq!(value["mode"], "distribution");
        assert!(value.get("returns").is_none());
    }
}
