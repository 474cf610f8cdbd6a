//! The backend abstraction.

use pw_agent::PositionRecord;
use pw_graph::{EdgeLoads, StreetGraph};
use pw_sim::{RunAggregates, RunSummary};

use crate::OutputResult;

/// An output backend.
///
/// [`RecordingObserver`](crate::RecordingObserver) calls the per-tick methods
/// every tick and the run-level methods once; `finish` flushes and must be
/// idempotent.
pub trait OutputWriter {
    /// Append one tick's position records.
    fn write_positions(&mut self, records: &[PositionRecord]) -> OutputResult<()>;

    /// Append one tick's per-edge density snapshot.
    fn write_densities(
        &mut self,
        tick: u64,
        graph: &StreetGraph,
        loads: &EdgeLoads,
    ) -> OutputResult<()>;

    /// Write the per-edge maximum densities observed over the run.
    fn write_max_densities(&mut self, graph: &StreetGraph, loads: &EdgeLoads)
    -> OutputResult<()>;

    /// Write the per-node decision-outcome tallies.
    fn write_node_tallies(&mut self, aggregates: &RunAggregates) -> OutputResult<()>;

    /// Write the end-of-run evaluation measures.
    fn write_summary(&mut self, summary: &RunSummary) -> OutputResult<()>;

    /// Flush all files.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
