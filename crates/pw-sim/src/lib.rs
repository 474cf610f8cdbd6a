//! `pw-sim` — the step scheduler that drives a pedway run.
//!
//! A [`Model`] owns the street graph, the staged counter table, and the
//! agent population, and advances them through the fixed per-tick phase
//! order (reset → decide → enter legs → walk → finalize arrivals → fold
//! counters).  Phases are batched across the whole population, never
//! interleaved per agent, so counter reads within a tick are
//! order-independent.
//!
//! Reporting is push-based: per-tick position records and the density
//! snapshot go to a [`SimObserver`]; run-level statistics accumulate in
//! [`RunAggregates`] and condense into a [`RunSummary`] when the run ends.

pub mod aggregates;
pub mod builder;
pub mod model;
pub mod observer;

mod error;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use aggregates::{NodeTally, RunAggregates, RunSummary};
pub use builder::ModelBuilder;
pub use error::{ModelError, ModelResult};
pub use model::Model;
pub use observer::{NoopObserver, SimObserver};
