//! `pw-behavior` — the per-agent route-choice compliance model.
//!
//! At every decision node an agent asks: *the next street is (maybe) a
//! forbidden one-way — do I deviate onto the alternative?*  The answer is a
//! stochastic logistic regression over the relative total detour, a one-way
//! indicator, and local crowding, with per-agent weights drawn once at agent
//! creation.  Scenario policy can bypass the draw entirely
//! (`simple_compliance`) or make the question moot (`no_interventions`).
//!
//! The model is a pure function of its inputs and the agent's private RNG
//! stream — it holds no per-agent state and performs no graph access, which
//! keeps the decision logic unit-testable in isolation.

pub mod model;
pub mod outcome;
pub mod weights;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use model::{ComplianceModel, Decision, DecisionInputs};
pub use outcome::{DecisionOutcome, OutcomeFlags};
pub use weights::{Weights, sample_normal};
