//! Per-agent regression weights.

use rand_distr::{Distribution, Normal};

use pw_core::{AgentRng, ModelConfig, NormalParams};

/// Draw from a normal distribution, treating `sd == 0` as a point mass.
///
/// Config validation guarantees finite parameters and non-negative sd.
pub fn sample_normal(params: NormalParams, rng: &mut AgentRng) -> f64 {
    if params.sd <= 0.0 {
        return params.mean;
    }
    Normal::new(params.mean, params.sd)
        .expect("validated distribution parameters")
        .sample(rng.inner())
}

/// One agent's logistic-regression weights, drawn once at creation and kept
/// across route recycles.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    /// Constant term.
    pub constant: f64,
    /// Weight on relative total detour (detour / total route length).
    pub rel_total_detour: f64,
    /// Weight on the one-way-street indicator.
    pub one_way: f64,
}

impl Weights {
    /// Draw a weight triple from the population distributions in `config`,
    /// consuming the agent's attribute stream.
    pub fn sample(config: &ModelConfig, rng: &mut AgentRng) -> Self {
        Self {
            constant: sample_normal(config.constant_weight, rng),
            rel_total_detour: sample_normal(config.rtd_weight, rng),
            one_way: sample_normal(config.ows_weight, rng),
        }
    }
}
