//! `pw-output` — plain-format export of simulation output.
//!
//! The core emits structured records ([`PositionRecord`](pw_agent::PositionRecord),
//! density snapshots, [`RunSummary`](pw_sim::RunSummary)); this crate turns
//! them into files.  Geospatial formats and plotting belong to the external
//! analysis layer — the only backend here is CSV.
//!
//! Wiring: [`RecordingObserver`] implements `pw_sim::SimObserver` over any
//! [`OutputWriter`].  Observer hooks cannot return errors, so the first write
//! error is stored and retrieved after the run via
//! [`RecordingObserver::take_error`].

pub mod csv;
pub mod observer;
pub mod writer;

mod error;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RecordingObserver;
pub use writer::OutputWriter;
