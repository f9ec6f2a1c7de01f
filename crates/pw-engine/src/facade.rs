//! Request entry points.

use pw_core::{
    DistributionResult, ExpectationResult, GachaRequest, GachaResponse, GachaResult, Mode,
};
use pw_mechanics::{Variant, global_cache};
use pw_simulation::{RunPlan, SimConfig, simulate_distribution};
use tracing::debug;

use crate::model::{ModelSimulator, model_for};

/// Exact expected pulls for `request`.
pub fn run_expectation(request: &GachaRequest) -> GachaResult<ExpectationResult> {
    let variant = Variant::from_keys(request.game, request.pool)?;
    let result = model_for(variant).expectation(request)?;
    debug!(%variant, targets = request.effective_target_count(), mean = result.mean, "expectation");
    Ok(result)
}

/// Monte Carlo distribution for `request` with `simulation_count` runs, or
/// the variant default.
pub fn run_distribution(
    request: &GachaRequest,
    simulation_count: Option<usize>,
) -> GachaResult<DistributionResult> {
    let config = SimConfig {
        simulation_count,
        ..SimConfig::default()
    };
    run_distribution_with(request, &config)
}

/// Monte Carlo distribution for `request` under an explicit config.
pub fn run_distribution_with(
    request: &GachaRequest,
    config: &SimConfig,
) -> GachaResult<DistributionResult> {
    let variant = Variant::from_keys(request.game, request.pool)?;
    let model = model_for(variant);
    let runs = config.runs_or(model.default_simulation_count());
    let plan = RunPlan {
        initial: request.initial_state,
        target_count: request.effective_target_count(),
        budget: request.budget,
    };
    let simulator = ModelSimulator {
        model,
        up4_c6: request.up4_c6,
    };
    debug!(%variant, runs, seeded = config.seed.is_some(), "starting distribution");
    simulate_distribution(&simulator, &plan, runs, config)
}

/// Answer `request` in the mode it asks for, using the variant's default run count.
pub fn run(request: &GachaRequest) -> GachaResult<GachaResponse> {
    run_with(request, &SimConfig::default())
}

/// Answer `request` in the mode it asks for.
///
/// The response echoes the request with its target count clamped.
pub fn run_with(request: &GachaRequest, config: &SimConfig) -> GachaResult<GachaResponse> {
    let args = GachaRequest {
        target_count: request.effective_target_count(),
        ..request.clone()
    };
    match request.mode {
        Mode::Expectation => {
            let result = run_expectation(&args)?;
            Ok(GachaResponse::from_expectation(args, result))
        }
        Mode::Distribution => {
            let result = run_distribution_with(&args, config)?;
            Ok(GachaResponse::from_distribution(args, result))
        }
    }
}

/// Solve every chain up front so the first request does not pay for it.
pub fn warm_up() -> GachaResult<()> {
    global_cache().warm_all()
}
