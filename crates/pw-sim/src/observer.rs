//! Observer trait for progress reporting and data collection.

use pw_agent::PositionRecord;
use pw_graph::{EdgeLoads, StreetGraph};

use crate::{RunAggregates, RunSummary};

/// Callbacks invoked by [`Model::run`][crate::Model::run] at tick and run
/// boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Records are borrowed — copy out what
/// must outlive the call.
pub trait SimObserver {
    /// Called before the first phase of each tick.
    fn on_tick_start(&mut self, _tick: u64) {}

    /// Called after the tick's counters have been folded.
    ///
    /// `records` holds one entry per active (non-finished) agent;
    /// `loads.densities()` is the fresh per-edge density snapshot.
    fn on_tick_end(
        &mut self,
        _tick: u64,
        _records: &[PositionRecord],
        _graph: &StreetGraph,
        _loads: &EdgeLoads,
    ) {
    }

    /// Called once when the run ends (step budget exhausted or every agent
    /// finished).
    fn on_run_end(
        &mut self,
        _summary: &RunSummary,
        _aggregates: &RunAggregates,
        _graph: &StreetGraph,
        _loads: &EdgeLoads,
    ) {
    }
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
