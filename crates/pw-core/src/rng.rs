//! Deterministic per-agent and model-level RNG wrappers.
//!
//! # Determinism strategy
//!
//! Each agent owns three independent `SmallRng` streams — decision draws,
//! personal-attribute draws, and destination draws — seeded by:
//!
//!   seed = model_seed XOR (agent_id * MIX_A) XOR (stream_tag * MIX_B)
//!
//! The mixing constants are 64-bit fractional parts of the golden ratio and
//! √2, which spread consecutive agent IDs and stream tags uniformly across
//! the seed space.  This means:
//!
//! - Agents never share RNG state, so results are invariant to the order in
//!   which the scheduler processes agents within a tick.
//! - A recycled agent keeps its streams: route N+1 continues the same
//!   deterministic sequences, independent of what other agents did.
//! - Destination sampling, attribute draws, and compliance draws cannot
//!   perturb each other — adding one draw to one stream leaves the other two
//!   sequences untouched.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for agent-id seed mixing.
const MIX_A: u64 = 0x9e37_79b9_7f4a_7c15;
/// 64-bit fractional √2 constant for stream-tag seed mixing.
const MIX_B: u64 = 0x6a09_e667_f3bc_c909;

/// Which of an agent's independent random streams to derive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RngStream {
    /// Uniform draws consumed by compliance decisions.
    Decision,
    /// Normal draws for regression weights and walking speed.
    Attributes,
    /// Origin/destination sampling.
    Destination,
}

impl RngStream {
    fn tag(self) -> u64 {
        match self {
            RngStream::Decision => 1,
            RngStream::Attributes => 2,
            RngStream::Destination => 3,
        }
    }
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// One deterministic random stream belonging to one agent.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the model seed, an agent ID, and a stream
    /// tag.
    pub fn new(model_seed: u64, agent: AgentId, stream: RngStream) -> Self {
        let seed = model_seed
            ^ (agent.0 as u64).wrapping_mul(MIX_A)
            ^ stream.tag().wrapping_mul(MIX_B);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand_distr` distribution
    /// types (`dist.sample(rng.inner())`).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}

// ── MasterRng ─────────────────────────────────────────────────────────────────

/// Model-level RNG: the root of the seed hierarchy.
///
/// Holds the run seed and derives per-agent streams on demand.  It is also a
/// usable generator in its own right for the rare model-level draw, but agent
/// code must never touch it — agents own their derived streams.
pub struct MasterRng {
    seed: u64,
    inner: SmallRng,
}

impl MasterRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: SmallRng::seed_from_u64(seed),
        }
    }

    /// The run seed this generator was created with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive one of `agent`'s private streams.
    ///
    /// Pure function of `(seed, agent, stream)` — calling it twice yields
    /// streams that produce identical sequences.
    pub fn agent_stream(&self, agent: AgentId, stream: RngStream) -> AgentRng {
        AgentRng::new(self.seed, agent, stream)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.inner
    }
}
