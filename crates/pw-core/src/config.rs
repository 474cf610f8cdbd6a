//! Model configuration.
//!
//! A `ModelConfig` is built by the experiment harness (typically from a TOML
//! or JSON file — hence the optional serde derives) and handed to the model
//! builder, which validates it once up front.  Defaults reproduce the study
//! parameterization the model was calibrated with.

use crate::{CoreError, CoreResult, NodeId};

// ── Scenario ──────────────────────────────────────────────────────────────────

/// Intervention / compliance regime for a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Scenario {
    /// One-way flags are cleared at graph construction; agents never meet a
    /// restriction.
    NoInterventions,
    /// Agents always comply with a one-way restriction (no stochastic draw),
    /// unless the only alternative is itself restricted.
    SimpleCompliance,
    /// Full stochastic logistic compliance model.
    #[default]
    ComplexCompliance,
}

impl Scenario {
    /// `true` when one-way attributes should be erased from the graph.
    #[inline]
    pub fn clears_interventions(self) -> bool {
        matches!(self, Scenario::NoInterventions)
    }
}

// ── Distribution parameters ───────────────────────────────────────────────────

/// Mean / standard deviation of a normal distribution, used for per-agent
/// attribute draws.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalParams {
    pub mean: f64,
    pub sd: f64,
}

impl NormalParams {
    pub fn new(mean: f64, sd: f64) -> Self {
        Self { mean, sd }
    }
}

// ── ModelConfig ───────────────────────────────────────────────────────────────

/// Top-level run configuration.
///
/// Distribution defaults are the calibrated estimates from the underlying
/// route-choice survey; walking speed defaults follow Chandra & Bharti's
/// pedestrian speed distribution (1.25 ± 0.21 m/s).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelConfig {
    /// Number of pedestrians in the population.
    pub agents: usize,

    /// Step budget: the run ends after this many ticks (or earlier if
    /// recycling is disabled and every agent has finished).
    pub steps: u64,

    /// Seconds of walking simulated per tick.
    pub tick_seconds: f64,

    /// Master RNG seed; same seed → identical run.
    pub seed: u64,

    /// Intervention / compliance regime.
    pub scenario: Scenario,

    // ── Per-agent attribute distributions ─────────────────────────────────
    /// Logistic regression constant term.
    pub constant_weight: NormalParams,
    /// Weight on relative total detour.
    pub rtd_weight: NormalParams,
    /// Weight on the one-way-street indicator.
    pub ows_weight: NormalParams,
    /// Walking speed in m/s.
    pub walking_speed: NormalParams,

    /// Population-wide weight on local edge density in the logistic model.
    /// Zero disables the crowding feedback term.
    pub density_weight: f64,

    // ── Origin/destination sampling ───────────────────────────────────────
    /// Minimum Euclidean separation between a sampled origin and destination.
    pub min_od_distance: f64,
    /// Resampling cap; past it the farthest candidate seen is accepted.
    pub max_od_attempts: u32,
    /// Fixed origin/destination node pairs.  When non-empty, agents draw a
    /// pair from this list instead of sampling points on edges.
    pub origin_destination_pairs: Vec<(NodeId, NodeId)>,

    // ── Lifecycle flags ───────────────────────────────────────────────────
    /// Recycle an arrived agent in place with a fresh origin/destination
    /// (constant population under continuous exposure).  When `false` agents
    /// finish after one route.
    pub assign_new_destinations: bool,
    /// Keep the previous destination as the next origin when recycling.
    pub reuse_previous_dest_as_orig: bool,
    /// When `false`, compliance decisions are evaluated and recorded but the
    /// path is never actually replaced (decision-model calibration mode).
    pub rerouting_allowed: bool,
    /// Record compliance probabilities from second-opinion evaluations
    /// (when the first alternative is itself restricted).
    pub record_second_opinion_probs: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            agents: 100,
            steps: 720,
            tick_seconds: 5.0,
            seed: 42,
            scenario: Scenario::ComplexCompliance,
            constant_weight: NormalParams::new(0.342, 0.404),
            rtd_weight: NormalParams::new(4.063, 1.798),
            ows_weight: NormalParams::new(-1.687, 0.454),
            walking_speed: NormalParams::new(1.25, 0.21),
            density_weight: 0.0,
            min_od_distance: 250.0,
            max_od_attempts: 1_000,
            origin_destination_pairs: Vec::new(),
            assign_new_destinations: true,
            reuse_previous_dest_as_orig: false,
            rerouting_allowed: true,
            record_second_opinion_probs: true,
        }
    }
}

impl ModelConfig {
    /// Check the configuration for shape errors the builder must reject.
    pub fn validate(&self) -> CoreResult<()> {
        fn bad(msg: impl Into<String>) -> CoreResult<()> {
            Err(CoreError::Config(msg.into()))
        }

        if self.agents == 0 {
            return bad("agent count must be positive");
        }
        if self.tick_seconds <= 0.0 {
            return bad("tick_seconds must be positive");
        }
        if self.walking_speed.mean <= 0.0 {
            return bad("mean walking speed must be positive");
        }
        for (name, p) in [
            ("constant_weight", self.constant_weight),
            ("rtd_weight", self.rtd_weight),
            ("ows_weight", self.ows_weight),
            ("walking_speed", self.walking_speed),
        ] {
            if p.sd < 0.0 {
                return bad(format!("{name}: standard deviation must be non-negative"));
            }
            if !p.mean.is_finite() || !p.sd.is_finite() {
                return bad(format!("{name}: parameters must be finite"));
            }
        }
        if self.min_od_distance < 0.0 {
            return bad("min_od_distance must be non-negative");
        }
        if self.max_od_attempts == 0 {
            return bad("max_od_attempts must be positive");
        }
        Ok(())
    }
}
