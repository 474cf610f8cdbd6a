//! `RecordingObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use pw_agent::PositionRecord;
use pw_graph::{EdgeLoads, StreetGraph};
use pw_sim::{RunAggregates, RunSummary, SimObserver};

use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that streams ticks and the run summary into any
/// [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After the run, check for errors with
/// [`take_error`][Self::take_error].
pub struct RecordingObserver<W: OutputWriter> {
    writer: W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> RecordingObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        // Keep only the first error.
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for RecordingObserver<W> {
    fn on_tick_end(
        &mut self,
        tick: u64,
        records: &[PositionRecord],
        graph: &StreetGraph,
        loads: &EdgeLoads,
    ) {
        let r = self.writer.write_positions(records);
        self.store_err(r);
        let r = self.writer.write_densities(tick, graph, loads);
        self.store_err(r);
    }

    fn on_run_end(
        &mut self,
        summary: &RunSummary,
        aggregates: &RunAggregates,
        graph: &StreetGraph,
        loads: &EdgeLoads,
    ) {
        let r = self.writer.write_max_densities(graph, loads);
        self.store_err(r);
        let r = self.writer.write_node_tallies(aggregates);
        self.store_err(r);
        let r = self.writer.write_summary(summary);
        self.store_err(r);
        let r = self.writer.finish();
        self.store_err(r);
    }
}
