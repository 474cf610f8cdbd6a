//! The `Model` struct and its tick loop.

use pw_agent::{Pedestrian, PositionRecord};
use pw_behavior::ComplianceModel;
use pw_core::ModelConfig;
use pw_graph::{EdgeLoads, PointSampler, StreetGraph};

use crate::{ModelResult, RunAggregates, RunSummary, SimObserver};

/// The simulation runner: graph, counters, population, and aggregates.
///
/// Create via [`ModelBuilder`][crate::ModelBuilder], then call [`run`] or
/// drive single ticks with [`step`].
///
/// [`run`]: Self::run
/// [`step`]: Self::step
pub struct Model {
    pub config: ModelConfig,
    /// Immutable street topology (one-way flags resolved per scenario).
    pub graph: StreetGraph,
    /// Staged per-edge counters, folded at every tick boundary.
    pub loads: EdgeLoads,
    /// The population; `AgentId` equals the index.
    pub agents: Vec<Pedestrian>,
    /// Run-level statistics, written at route completions.
    pub aggregates: RunAggregates,
    pub(crate) compliance: ComplianceModel,
    /// Present unless fixed origin/destination pairs are configured.
    pub(crate) sampler: Option<PointSampler>,
    tick: u64,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("config", &self.config)
            .field("node_count", &self.graph.node_count())
            .field("edge_count", &self.graph.edge_count())
            .field("agents", &self.agents.len())
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl Model {
    pub(crate) fn new(
        config: ModelConfig,
        graph: StreetGraph,
        loads: EdgeLoads,
        agents: Vec<Pedestrian>,
        compliance: ComplianceModel,
        sampler: Option<PointSampler>,
    ) -> Self {
        let aggregates = RunAggregates::new(graph.node_count());
        Self {
            config,
            graph,
            loads,
            agents,
            aggregates,
            compliance,
            sampler,
            tick: 0,
        }
    }

    /// Ticks processed so far.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// `true` once every agent has completed its route (only reachable when
    /// recycling is disabled).
    pub fn all_finished(&self) -> bool {
        self.agents.iter().all(|a| a.finished)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run until the step budget is exhausted or every agent has finished,
    /// then produce the run summary.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> ModelResult<RunSummary> {
        while self.tick < self.config.steps {
            self.step(observer)?;
            if !self.config.assign_new_destinations && self.all_finished() {
                break;
            }
        }
        let summary = self.aggregates.summarize(self.config.scenario, self.tick);
        observer.on_run_end(&summary, &self.aggregates, &self.graph, &self.loads);
        Ok(summary)
    }

    /// Process one tick through the batched phase order.
    ///
    /// Phases run across the whole population before the next phase starts,
    /// so all decisions in a tick read the same settled densities and the
    /// counter stage commits exactly once, at the end.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> ModelResult<()> {
        let tick = self.tick;
        observer.on_tick_start(tick);

        // Explicit field borrows so the borrow checker sees disjoint access.
        let Model {
            config,
            graph,
            loads,
            agents,
            aggregates,
            compliance,
            sampler,
            ..
        } = self;

        // ── Phase 1: reset decision flags of agents standing on a node ────
        for a in agents.iter_mut().filter(|a| !a.finished) {
            if a.is_at_node() {
                a.reset_outcome();
            }
        }

        // ── Phase 2: decisions at real decision points ────────────────────
        //
        // Agents on their penultimate node have no decision left — only the
        // destination leg remains.
        for a in agents.iter_mut().filter(|a| !a.finished) {
            if a.is_at_node() && !a.on_penultimate_node() {
                a.decide_at_node(graph, loads, compliance, config);
            }
        }

        // ── Phases 3–4: enter the next leg and count the entry ────────────
        for a in agents.iter_mut().filter(|a| !a.finished) {
            if a.is_at_node() {
                a.start_next_leg(graph, loads);
            }
        }

        // ── Phase 5: walk ─────────────────────────────────────────────────
        for a in agents.iter_mut().filter(|a| !a.finished) {
            a.walk(graph, loads);
        }

        // ── Phase 6: finalize arrivals (recycle or finish) ────────────────
        for a in agents.iter_mut().filter(|a| !a.finished) {
            if a.has_arrived() {
                let summary = a.finish_route(graph, sampler.as_ref(), config, loads)?;
                aggregates.absorb(summary);
            }
        }

        // ── Tick boundary: commit counters, emit records ──────────────────
        self.loads.fold_tick(&self.graph);
        let records = self.position_records();
        observer.on_tick_end(tick, &records, &self.graph, &self.loads);

        self.tick += 1;
        Ok(())
    }

    /// Snapshot every active agent for the reporting layer.
    pub fn position_records(&self) -> Vec<PositionRecord> {
        self.agents
            .iter()
            .filter(|a| !a.finished)
            .map(|a| a.position_record(self.tick))
            .collect()
    }
}
