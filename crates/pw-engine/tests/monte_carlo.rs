//! End-to-end engine checks: seeded distributions and response shape.

use pw_core::{GameKey, Mode, PoolKey};
use pw_engine::{GachaRequest, SimConfig, run_distribution_with, run_expectation, run_with};

#[test]
fn genshin_character_simulation_matches_exact_mean() {
    let req = GachaRequest::new(GameKey::Genshin, PoolKey::Character);
    let exact = run_expectation(&req).unwrap().mean;
    let config = SimConfig::default()
        .with_simulation_count(200_000)
        .with_seed(2024);
    let simulated = run_distribution_with(&req, &config).unwrap().pulls.mean;
    let tolerance = (exact * 0.01).max(0.5);
    assert!(
        (simulated - exact).abs() <= tolerance,
        "simulated {simulated}, exact {exact}"
    );
}

#[test]
fn zzz_character_and_hsr_character_agree_exactly() {
    for pity in [0, 30, 75] {
        let zzz = GachaRequest::new(GameKey::Zzz, PoolKey::Character)
            .with_pity(pity)
            .with_target_count(4);
        let hsr = GachaRequest::new(GameKey::Hsr, PoolKey::Character)
            .with_pity(pity)
            .with_target_count(4);
        assert_eq!(
            run_expectation(&zzz).unwrap(),
            run_expectation(&hsr).unwrap()
        );
    }
}

#[test]
fn response_payload_shape() {
    let req = GachaRequest::new(GameKey::Hsr, PoolKey::LightCone)
        .with_mode(Mode::Distribution)
        .with_budget(Some(160));
    let config = SimConfig::default().with_simulation_count(1_000).with_seed(9);
    let response = run_with(&req, &config).unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["mode"], "distribution");
    assert_eq!(json["args"]["targetCount"], 1);
    assert!(json["success_rate"].is_number());
    assert!(json["returns"]["p50"].is_number());
    assert!(json["pulls"]["p95"].is_number());
}
