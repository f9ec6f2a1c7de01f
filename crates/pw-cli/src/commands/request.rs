use std::io::Read;

use serde_json::{Map, Value, json};

use pw_core::{GachaError, GachaRequest, GachaResult, GameKey, InitialState, Mode, PoolKey};
use pw_engine::SimConfig;
use pw_mechanics::Variant;

use super::{CliError, CliResult};

pub fn run(path: &str, runs: Option<usize>, seed: Option<u64>) -> CliResult {
    let body = read_body(path)?;

    let config = SimConfig {
        simulation_count: runs,
        seed,
        ..SimConfig::default()
    };

    let outcome = serde_json::from_str::<Value>(&body)
        .map_err(|_| GachaError::InvalidRequest("request body is empty or malformed".into()))
        .and_then(|value| normalize(&value))
        .and_then(|request| pw_engine::run_with(&request, &config));

    match outcome {
        Ok(response) => {
            println!("{}", json!({ "ok": true, "data": response }));
            Ok(())
        }
        Err(e) => {
            println!("{}", json!({ "ok": false, "error": e.to_string() }));
            Err(e.into())
        }
    }
}

fn read_body(path: &str) -> Result<String, CliError> {
    let read = if path == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body).map(|_| body)
    } else {
        std::fs::read_to_string(path)
    };
    read.map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

fn invalid(message: &str) -> GachaError {
    GachaError::InvalidRequest(message.to_string())
}

/// Numeric value of a JSON number or numeric string.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => Some(0.0),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::Null => Some(0.0),
        _ => None,
    }
}

/// Non-negative whole counter, falling back to 0 for anything else.
fn counter(state: &Map<String, Value>, keys: &[&str]) -> u32 {
    let raw = keys.iter().find_map(|k| state.get(*k));
    match raw.and_then(number) {
        Some(v) if v.is_finite() && v >= 0.0 => v.floor() as u32,
        _ => 0,
    }
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Validate a raw request body and fill in defaults.
///
/// Game and pool must name a supported banner. The target count must be a
/// positive number and the budget positive or absent. Initial state values
/// that are missing, negative, or not numbers become 0.
pub fn normalize(body: &Value) -> GachaResult<GachaRequest> {
    let body = body
        .as_object()
        .ok_or_else(|| invalid("request body is empty or malformed"))?;

    let game: GameKey = body
        .get("game")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid("invalid game"))?;

    let pool: PoolKey = body
        .get("pool")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid("pool is invalid or does not match the game"))?;
    if Variant::from_keys(game, pool).is_err() {
        return Err(invalid("pool is invalid or does not match the game"));
    }

    let target_count = match body.get("targetCount") {
        None | Some(Value::Null) => Some(1.0),
        Some(v) => number(v),
    };
    let target_count = match target_count {
        Some(n) if n.is_finite() && n > 0.0 => (n.floor() as u32).max(1),
        _ => return Err(invalid("target count must be a positive integer")),
    };

    let budget = match body.get("budget") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => match number(v) {
            Some(b) if b.is_finite() && b > 0.0 => Some(b.floor() as u32),
            _ => return Err(invalid("budget must be a positive integer or empty")),
        },
    };

    let empty = Map::new();
    let state = body
        .get("initialState")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let initial_state = InitialState {
        pity: counter(state, &["pity"]),
        is_guaranteed: truthy(state.get("isGuaranteed")),
        radiance_counter: counter(state, &["mingguangCounter", "radianceCounter"]),
        fate_point: counter(state, &["fatePoint"]),
    };

    let mode = match body.get("mode").and_then(Value::as_str) {
        Some("distribution") => Mode::Distribution,
        _ => Mode::Expectation,
    };

    Ok(GachaRequest {
        game,
        pool,
        mode,
        target_count,
        up4_c6: truthy(body.get("up4C6")),
        budget,
        initial_state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(body: Value) -> String {
        normalize(&body).unwrap_err().to_string()
    }

    #[test]
    fn minimal_body_gets_defaults() {
        let req = normalize(&json!({ "game": "hsr", "pool": "lightcone" })).unwrap();
        assert_eq!(req, GachaRequest::new(GameKey::Hsr, PoolKey::LightCone));
    }

    #[test]
    fn full_body() {
        let req = normalize(&json!({
            "game": "genshin",
            "pool": "character",
            "mode": "distribution",
            "targetCount": "3",
            "up4C6": true,
            "budget": 240,
            "initialState": {
                "pity": 17.9,
                "isGuaranteed": "true",
                "mingguangCounter": 2,
                "fatePoint": -4
            }
        }))
        .unwrap();
        assert_eq!(req.mode, Mode::Distribution);
        assert_eq!(req.target_count, 3);
        assert!(req.up4_c6);
        assert_eq!(req.budget, Some(240));
        assert_eq!(
            req.initial_state,
            InitialState {
                pity: 17,
                is_guaranteed: true,
                radiance_counter: 2,
                fate_point: 0
            }
        );
    }

    #[test]
    fn rejects_bad_keys() {
        assert_eq!(err(json!([1, 2])), "invalid request: request body is empty or malformed");
        assert_eq!(err(json!({ "pool": "weapon" })), "invalid request: invalid game");
        assert_eq!(
            err(json!({ "game": "hsr", "pool": "weapon" })),
            "invalid request: pool is invalid or does not match the game"
        );
        assert_eq!(
            err(json!({ "game": "genshin", "pool": "banner" })),
            "invalid request: pool is invalid or does not match the game"
        );
    }

    #[test]
    fn rejects_bad_counts() {
        for count in [json!(0), json!(-2), json!("many")] {
            assert_eq!(
                err(json!({ "game": "zzz", "pool": "weapon", "targetCount": count })),
                "invalid request: target count must be a positive integer"
            );
        }
        for budget in [json!(0), json!(-10), json!("lots")] {
            assert_eq!(
                err(json!({ "game": "zzz", "pool": "weapon", "budget": budget })),
                "invalid request: budget must be a positive integer or empty"
            );
        }
    }

    #[test]
    fn empty_budget_means_none() {
        let req = normalize(&json!({ "game": "zzz", "pool": "character", "budget": "" })).unwrap();
        assert_eq!(req.budget, None);
    }

    #[test]
    fn guarantee_strings_other_than_true_are_false() {
        let req = normalize(&json!({
            "game": "hsr",
            "pool": "character",
            "initialState": { "isGuaranteed": "false" }
        }))
        .unwrap();
        assert!(!req.initial_state.is_guaranteed);
    }

    #[test]
    fn unknown_mode_falls_back_to_expectation() {
        let req = normalize(&json!({ "game": "hsr", "pool": "character", "mode": "fast" })).unwrap();
        assert_eq!(req.mode, Mode::Expectation);
    }
}
