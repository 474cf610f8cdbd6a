//! The logistic reroute/no-reroute decision.

use pw_core::{AgentRng, Scenario};

use crate::Weights;

/// Inputs to one decision evaluation, all resolved by the caller.
#[derive(Copy, Clone, Debug)]
pub struct DecisionInputs {
    /// Length delta of the alternative versus the intended route.  Negative
    /// for second-opinion evaluations (the alternative is the baseline then).
    pub detour: f64,
    /// Distance the agent has already walked on this route.
    pub len_traversed: f64,
    /// Remaining length of the intended route.
    pub remaining_length: f64,
    /// Next edge is a forbidden one-way in the walking direction.
    pub one_way: bool,
    /// Density of the evaluated edge as of the last tick boundary.
    pub edge_density: f64,
}

/// Outcome of a decision evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Decision {
    /// `true`: leave the intended route for the alternative.
    pub deviate: bool,
    /// `P(stay on route)` — populated only for recorded one-way evaluations,
    /// for statistical aggregation (this equals the non-compliance
    /// probability when the agent faces a restriction).
    pub stay_probability: Option<f64>,
}

/// Population-level compliance model: scenario policy plus the shared
/// density weight.  Per-agent heterogeneity enters through [`Weights`].
#[derive(Copy, Clone, Debug)]
pub struct ComplianceModel {
    pub scenario: Scenario,
    /// Weight on local edge density; zero disables crowding feedback.
    pub density_weight: f64,
}

impl ComplianceModel {
    pub fn new(scenario: Scenario, density_weight: f64) -> Self {
        Self {
            scenario,
            density_weight,
        }
    }

    /// `P(no deviation)` under the logistic model:
    ///
    /// `z = c + w_rtd · detour/(traversed + remaining) + w_ows · ows
    ///      + w_density · density`,  `P = 1 / (1 + e^(−z))`.
    pub fn stay_probability(&self, weights: &Weights, inputs: &DecisionInputs) -> f64 {
        let total = inputs.len_traversed + inputs.remaining_length;
        let rel_total_detour = if total > 0.0 { inputs.detour / total } else { 0.0 };
        let ows = if inputs.one_way { 1.0 } else { 0.0 };

        let z = weights.constant
            + rel_total_detour * weights.rel_total_detour
            + ows * weights.one_way
            + inputs.edge_density * self.density_weight;
        1.0 / (1.0 + (-z).exp())
    }

    /// Evaluate one reroute decision.
    ///
    /// Draws `x ~ U(0,1)` from the agent's private decision stream and
    /// deviates iff `x > P(no deviation)`.  Under `simple_compliance` a
    /// forbidden one-way forces deviation without a draw (and without a
    /// recorded probability — there is no stochastic quantity to report).
    ///
    /// `record_probability` gates the probability report for one-way
    /// evaluations; second opinions pass the configured flag here.
    pub fn decide(
        &self,
        weights: &Weights,
        inputs: &DecisionInputs,
        rng: &mut AgentRng,
        record_probability: bool,
    ) -> Decision {
        if self.scenario == Scenario::SimpleCompliance && inputs.one_way {
            return Decision {
                deviate: true,
                stay_probability: None,
            };
        }

        let p_stay = self.stay_probability(weights, inputs);
        let x = rng.uniform();
        Decision {
            deviate: x > p_stay,
            stay_probability: (inputs.one_way && record_probability).then_some(p_stay),
        }
    }
}
