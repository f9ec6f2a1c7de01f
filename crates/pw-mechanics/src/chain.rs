//! Absorbing Markov chains over banner states.
//!
//! A transient state is `(pity, guarantee, secondary)`. From each state one
//! pull either advances pity, drops an off-target 5★ (moving to the
//! guaranteed state at pity 0), or drops the featured 5★ and absorbs.
//! Absorption is labelled by the secondary counter the next target starts
//! with, which is all that carries over: pity and guarantee always reset.
//!
//! States are linearized as `pity + PITY_MAX * (secondary + SECONDARY_LEN * guarantee)`.

use std::time::Instant;

use pw_core::{GachaResult, Matrix, solve_linear_columns, solve_linear_system};
use tracing::debug;

use crate::curve::DropCurve;
use crate::rules::WinRule;
use crate::variant::ChainId;

/// One transient state of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainState {
    /// Pulls since the last 5★, in `[0, PITY_MAX)`.
    pub pity: u32,
    /// Next 5★ is guaranteed featured.
    pub guaranteed: bool,
    /// Radiance streak or fate points; always 0 for plain guarantee chains.
    pub secondary: u32,
}

/// Outgoing probability mass of one transient state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transitions {
    /// No 5★: move to the next pity value.
    pub advance: Option<(usize, f64)>,
    /// Off-target 5★: move to the guaranteed state at pity 0.
    pub miss: Option<(usize, f64)>,
    /// Featured 5★: absorb with the given secondary counter.
    pub absorb: Option<(u32, f64)>,
}

impl Transitions {
    /// Total outgoing mass (1 for every well-formed state).
    pub fn total(&self) -> f64 {
        self.advance.map_or(0.0, |(_, p)| p)
            + self.miss.map_or(0.0, |(_, p)| p)
            + self.absorb.map_or(0.0, |(_, p)| p)
    }
}

/// The state space and transition rule of one chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorbingChain {
    id: ChainId,
    curve: DropCurve,
    rule: WinRule,
    pity_max: u32,
    secondary_len: u32,
}

impl AbsorbingChain {
    /// Build the chain registered under `id`.
    pub fn new(id: ChainId) -> Self {
        let curve = id.curve();
        let rule = id.win_rule();
        Self {
            id,
            curve,
            rule,
            pity_max: curve.pity_max(),
            secondary_len: rule.secondary_len(),
        }
    }

    /// Identity of the chain.
    pub fn id(&self) -> ChainId {
        self.id
    }

    /// Number of pity values.
    pub fn pity_max(&self) -> u32 {
        self.pity_max
    }

    /// Number of secondary-counter values.
    pub fn secondary_len(&self) -> u32 {
        self.secondary_len
    }

    /// Number of transient states, the dimension of the linear system.
    pub fn state_count(&self) -> usize {
        (self.pity_max * self.secondary_len * 2) as usize
    }

    /// Flat index of a state.
    pub fn index(&self, state: ChainState) -> usize {
        let g = u32::from(state.guaranteed);
        (state.pity + self.pity_max * (state.secondary + self.secondary_len * g)) as usize
    }

    /// State at a flat index.
    pub fn state(&self, index: usize) -> ChainState {
        let index = index as u32;
        let pity = index % self.pity_max;
        let rest = index / self.pity_max;
        ChainState {
            pity,
            guaranteed: rest / self.secondary_len == 1,
            secondary: rest % self.secondary_len,
        }
    }

    /// Clamp caller-supplied counters into the state space.
    pub fn clamp(&self, pity: u32, guaranteed: bool, secondary: u32) -> ChainState {
        ChainState {
            pity: pity.min(self.pity_max - 1),
            guaranteed,
            secondary: self.rule.clamp_secondary(secondary),
        }
    }

    /// The state every later target starts from, given the carried-over counter.
    pub fn reset_state(&self, secondary: u32) -> ChainState {
        ChainState {
            pity: 0,
            guaranteed: false,
            secondary,
        }
    }

    /// Outgoing mass of `state`.
    pub fn transitions(&self, state: ChainState) -> Transitions {
        let drop = self.curve.probability(state.pity);
        let win = self.rule.win_probability(state.guaranteed, state.secondary);

        let advance = (drop < 1.0 && state.pity + 1 < self.pity_max).then(|| {
            let next = ChainState {
                pity: state.pity + 1,
                ..state
            };
            (self.index(next), 1.0 - drop)
        });
        let miss = (win < 1.0).then(|| {
            let next = ChainState {
                pity: 0,
                guaranteed: true,
                secondary: self.rule.secondary_after_miss(state.secondary),
            };
            (self.index(next), drop * (1.0 - win))
        });
        let absorb = Some((
            self.rule
                .secondary_after_win(state.guaranteed, state.secondary),
            drop * win,
        ));

        Transitions {
            advance,
            miss,
            absorb,
        }
    }

    /// The `(I - Q)` matrix of the transient sub-chain.
    pub fn fundamental_system(&self) -> Matrix {
        let n = self.state_count();
        let mut a = Matrix::identity(n);
        for i in 0..n {
            let t = self.transitions(self.state(i));
            if let Some((j, p)) = t.advance {
                a[(i, j)] -= p;
            }
            if let Some((j, p)) = t.miss {
                a[(i, j)] -= p;
            }
        }
        a
    }

    /// One-step absorption mass `R[state][secondary]`.
    pub fn absorption_matrix(&self) -> Matrix {
        let n = self.state_count();
        let mut r = Matrix::zeros(n, self.secondary_len as usize);
        for i in 0..n {
            if let Some((s, p)) = self.transitions(self.state(i)).absorb {
                r[(i, s as usize)] += p;
            }
        }
        r
    }
}

/// Expected pulls to absorption from every state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSolution {
    chain: AbsorbingChain,
    expectations: Vec<f64>,
}

impl ChainSolution {
    /// Solve `(I - Q) · E = 1`.
    pub fn solve(chain: AbsorbingChain) -> GachaResult<Self> {
        let started = Instant::now();
        let n = chain.state_count();
        let expectations = solve_linear_system(&chain.fundamental_system(), &vec![1.0; n])?;
        debug!(
            chain = %chain.id(),
            states = n,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "solved expectation table"
        );
        Ok(Self {
            chain,
            expectations,
        })
    }

    /// The chain this table belongs to.
    pub fn chain(&self) -> &AbsorbingChain {
        &self.chain
    }

    /// Expected remaining pulls from `state`.
    pub fn expected(&self, state: ChainState) -> f64 {
        self.expectations[self.chain.index(state)]
    }

    /// Expected remaining pulls for every state, by flat index.
    pub fn values(&self) -> &[f64] {
        &self.expectations
    }
}

/// Distribution of the carried-over secondary counter at absorption.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsorptionTable {
    chain: AbsorbingChain,
    table: Matrix,
}

impl AbsorptionTable {
    /// Solve `(I - Q) · X = R` for every absorption column at once.
    pub fn solve(chain: AbsorbingChain) -> GachaResult<Self> {
        let started = Instant::now();
        let table = solve_linear_columns(&chain.fundamental_system(), &chain.absorption_matrix())?;
        debug!(
            chain = %chain.id(),
            states = chain.state_count(),
            columns = table.cols(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "solved absorption table"
        );
        Ok(Self { chain, table })
    }

    /// Probability of absorbing with each secondary value, starting from `state`.
    pub fn distribution(&self, state: ChainState) -> &[f64] {
        self.table.row(self.chain.index(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_counts() {
        assert_eq!(AbsorbingChain::new(ChainId::GenshinCharacter).state_count(), 720);
        assert_eq!(AbsorbingChain::new(ChainId::GenshinWeapon).state_count(), 320);
        assert_eq!(AbsorbingChain::new(ChainId::HsrCharacter).state_count(), 180);
        assert_eq!(AbsorbingChain::new(ChainId::HsrLightCone).state_count(), 160);
        assert_eq!(AbsorbingChain::new(ChainId::ZzzWeapon).state_count(), 160);
    }

    #[test]
    fn index_round_trips() {
        for id in ChainId::ALL {
            let chain = AbsorbingChain::new(id);
            for i in 0..chain.state_count() {
                assert_eq!(chain.index(chain.state(i)), i);
            }
        }
    }

    #[test]
    fn outgoing_mass_sums_to_one() {
        for id in ChainId::ALL {
            let chain = AbsorbingChain::new(id);
            for i in 0..chain.state_count() {
                let total = chain.transitions(chain.state(i)).total();
                assert!((total - 1.0).abs() < 1e-12, "{id} state {i}: {total}");
            }
        }
    }

    #[test]
    fn hard_pity_never_advances() {
        let chain = AbsorbingChain::new(ChainId::HsrLightCone);
        let last = chain.clamp(999, false, 0);
        assert_eq!(last.pity, 79);
        assert!(chain.transitions(last).advance.is_none());
    }

    #[test]
    fn guaranteed_state_absorbs_with_probability_one() {
        let chain = AbsorbingChain::new(ChainId::GenshinCharacter);
        let absorption = AbsorptionTable::solve(chain).unwrap();
        // A guaranteed win keeps the radiance counter.
        let dist = absorption.distribution(chain.clamp(0, true, 2));
        assert!((dist[2] - 1.0).abs() < 1e-9);

        // A caller's guaranteed start enters one counter higher.
        let initial = pw_core::InitialState {
            pity: 0,
            is_guaranteed: true,
            radiance_counter: 2,
            fate_point: 0,
        };
        let secondary = ChainId::GenshinCharacter.win_rule().initial_secondary(&initial);
        let dist = absorption.distribution(chain.clamp(0, true, secondary));
        assert!((dist[3] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn absorption_rows_are_distributions() {
        for id in ChainId::ALL {
            let chain = AbsorbingChain::new(id);
            let absorption = AbsorptionTable::solve(chain).unwrap();
            for i in 0..chain.state_count() {
                let sum: f64 = absorption.distribution(chain.state(i)).iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "{id} state {i}: {sum}");
            }
        }
    }

    #[test]
    fn expectations_are_at_least_one_and_finite() {
        for id in ChainId::ALL {
            let solution = ChainSolution::solve(AbsorbingChain::new(id)).unwrap();
            for (i, e) in solution.values().iter().enumerate() {
                assert!(e.is_finite(), "{id} state {i} not finite");
                assert!(*e >= 1.0 - 1e-9, "{id} state {i}: {e}");
            }
        }
    }

    #[test]
    fn guaranteed_expectation_matches_curve_average() {
        let chain = AbsorbingChain::new(ChainId::HsrCharacter);
        let solution = ChainSolution::solve(chain).unwrap();
        let e = solution.expected(chain.clamp(0, true, 0));
        let direct = DropCurve::CHARACTER.expected_pulls_per_drop();
        assert!((e - direct).abs() < 1e-9);
    }
}
