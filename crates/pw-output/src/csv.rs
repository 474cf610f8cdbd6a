//! CSV output backend.
//!
//! Creates five files in the configured output directory:
//! - `positions.csv`      — one row per agent per tick
//! - `edge_densities.csv` — one row per edge per tick
//! - `max_densities.csv`  — one row per edge, written at run end
//! - `node_outcomes.csv`  — one row per node, written at run end
//! - `run_summary.csv`    — key/value rows, written at run end

use std::fs::File;
use std::path::Path;

use csv::Writer;

use pw_agent::PositionRecord;
use pw_graph::{EdgeLoads, StreetGraph};
use pw_sim::{RunAggregates, RunSummary};

use crate::writer::OutputWriter;
use crate::OutputResult;

/// Writes simulation output to CSV files.
pub struct CsvWriter {
    positions: Writer<File>,
    densities: Writer<File>,
    max_densities: Writer<File>,
    node_outcomes: Writer<File>,
    summary: Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the output files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut positions = Writer::from_path(dir.join("positions.csv"))?;
        positions.write_record([
            "tick",
            "agent_id",
            "route",
            "x",
            "y",
            "latest_node",
            "compliance",
            "non_compliance",
            "random_rerouting",
            "no_route_change",
        ])?;

        let mut densities = Writer::from_path(dir.join("edge_densities.csv"))?;
        densities.write_record(["tick", "edge_id", "density", "ppl_count"])?;

        let mut max_densities = Writer::from_path(dir.join("max_densities.csv"))?;
        max_densities.write_record(["edge_id", "max_density"])?;

        let mut node_outcomes = Writer::from_path(dir.join("node_outcomes.csv"))?;
        node_outcomes.write_record([
            "node_id",
            "compliances",
            "non_compliances",
            "random_reroutings",
            "no_route_changes",
        ])?;

        let mut summary = Writer::from_path(dir.join("run_summary.csv"))?;
        summary.write_record(["measure", "value"])?;

        Ok(Self {
            positions,
            densities,
            max_densities,
            node_outcomes,
            summary,
            finished: false,
        })
    }

    fn summary_row(&mut self, key: &str, value: Option<f64>) -> OutputResult<()> {
        let rendered = value.map(|v| v.to_string()).unwrap_or_default();
        self.summary.write_record([key, &rendered])?;
        Ok(())
    }
}

impl OutputWriter for CsvWriter {
    fn write_positions(&mut self, records: &[PositionRecord]) -> OutputResult<()> {
        for r in records {
            self.positions.write_record(&[
                r.tick.to_string(),
                r.agent.0.to_string(),
                r.route.to_string(),
                r.position.x.to_string(),
                r.position.y.to_string(),
                r.latest_node.0.to_string(),
                (r.flags.compliance as u8).to_string(),
                (r.flags.non_compliance as u8).to_string(),
                (r.flags.random_rerouting as u8).to_string(),
                (r.flags.no_route_change as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_densities(
        &mut self,
        tick: u64,
        graph: &StreetGraph,
        loads: &EdgeLoads,
    ) -> OutputResult<()> {
        for (id, _) in graph.edges() {
            self.densities.write_record(&[
                tick.to_string(),
                id.0.to_string(),
                loads.density(id).to_string(),
                loads.ppl_count(id).to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_max_densities(
        &mut self,
        graph: &StreetGraph,
        loads: &EdgeLoads,
    ) -> OutputResult<()> {
        for (id, _) in graph.edges() {
            self.max_densities
                .write_record(&[id.0.to_string(), loads.max_density(id).to_string()])?;
        }
        Ok(())
    }

    fn write_node_tallies(&mut self, aggregates: &RunAggregates) -> OutputResult<()> {
        for (node, tally) in aggregates.node_tallies().iter().enumerate() {
            self.node_outcomes.write_record(&[
                node.to_string(),
                tally.compliances.to_string(),
                tally.non_compliances.to_string(),
                tally.random_reroutings.to_string(),
                tally.no_route_changes.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, s: &RunSummary) -> OutputResult<()> {
        self.summary_row("ticks", Some(s.ticks as f64))?;
        self.summary_row("routes_completed", Some(s.routes_completed as f64))?;
        self.summary_row("compliances", Some(s.compliances as f64))?;
        self.summary_row("non_compliances", Some(s.non_compliances as f64))?;
        self.summary_row("random_reroutings", Some(s.random_reroutings as f64))?;
        self.summary_row("no_route_changes", Some(s.no_route_changes as f64))?;
        self.summary_row("mean_nod", s.mean_nod)?;
        self.summary_row("std_nod", s.std_nod)?;
        self.summary_row("var_nod", s.var_nod)?;
        self.summary_row("mean_non_comp_prob", s.mean_non_comp_prob)?;
        self.summary_row("std_non_comp_prob", s.std_non_comp_prob)?;
        self.summary_row("var_non_comp_prob", s.var_non_comp_prob)?;
        self.summary_row("mean_comp_prob", s.mean_comp_prob)?;
        self.summary_row("std_comp_prob", s.std_comp_prob)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.densities.flush()?;
        self.max_densities.flush()?;
        self.node_outcomes.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
