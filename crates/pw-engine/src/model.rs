//! Per-variant models and their registry.

use pw_core::{ExpectationResult, GachaRequest, GachaResult, InitialState, SampleSource};
use pw_mechanics::{ExpectationModel, Variant};
use pw_simulation::{PullRules, PullState, TargetOutcome, TargetSimulator, simulate_one_target};

/// The operations every registered banner model provides.
pub trait GachaModel: Send + Sync {
    /// The banner this model answers for.
    fn variant(&self) -> Variant;

    /// Exact expected pulls for `request`.
    fn expectation(&self, request: &GachaRequest) -> GachaResult<ExpectationResult>;

    /// Starting state of one simulated run.
    fn initial_pull_state(&self, initial: &InitialState) -> PullState;

    /// Simulate one target acquisition.
    fn simulate_target(
        &self,
        state: &mut PullState,
        source: &mut SampleSource,
        up4_c6: bool,
    ) -> TargetOutcome;

    /// Monte Carlo runs used when the caller does not choose.
    fn default_simulation_count(&self) -> usize;
}

/// The model backing one [`Variant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerModel {
    variant: Variant,
}

impl BannerModel {
    /// Model for `variant`.
    pub const fn new(variant: Variant) -> Self {
        Self { variant }
    }
}

impl GachaModel for BannerModel {
    fn variant(&self) -> Variant {
        self.variant
    }

    fn expectation(&self, request: &GachaRequest) -> GachaResult<ExpectationResult> {
        ExpectationModel::new(self.variant).expectation(request)
    }

    fn initial_pull_state(&self, initial: &InitialState) -> PullState {
        PullRules::for_variant(self.variant, false).initial_pull_state(initial)
    }

    fn simulate_target(
        &self,
        state: &mut PullState,
        source: &mut SampleSource,
        up4_c6: bool,
    ) -> TargetOutcome {
        simulate_one_target(&PullRules::for_variant(self.variant, up4_c6), state, source)
    }

    fn default_simulation_count(&self) -> usize {
        self.variant.default_simulation_count()
    }
}

static REGISTRY: [BannerModel; 6] = [
    BannerModel::new(Variant::GenshinCharacter),
    BannerModel::new(Variant::GenshinWeapon),
    BannerModel::new(Variant::HsrCharacter),
    BannerModel::new(Variant::HsrLightCone),
    BannerModel::new(Variant::ZzzCharacter),
    BannerModel::new(Variant::ZzzWeapon),
];

/// The registered model for `variant`.
pub fn model_for(variant: Variant) -> &'static dyn GachaModel {
    // Registry order matches the declaration order of `Variant`.
    &REGISTRY[variant as usize]
}

/// Every registered model, in display order.
pub fn models() -> impl Iterator<Item = &'static dyn GachaModel> {
    REGISTRY.iter().map(|m| m as &'static dyn GachaModel)
}

/// Adapts a model to the simulation driver with a fixed 4★ flag.
pub(crate) struct ModelSimulator<'a> {
    pub(crate) model: &'a dyn GachaModel,
    pub(crate) up4_c6: bool,
}

impl TargetSimulator for ModelSimulator<'_> {
    fn initial_pull_state(&self, initial: &InitialState) -> PullState {
        self.model.initial_pull_state(initial)
    }

    fn simulate_target(&self, state: &mut PullState, source: &mut SampleSource) -> TargetOutcome {
        self.model.simulate_target(state, source, self.up4_c6)
    }
}
