//! Run-level statistics.
//!
//! Agents flush a [`RouteSummary`](pw_agent::RouteSummary) on every route
//! completion; [`RunAggregates`] accumulates them and [`RunSummary`]
//! condenses everything at run end (means, standard deviations, variances).
//! Probability statistics are only meaningful under the stochastic
//! `complex_compliance` scenario and stay `None` otherwise.

use pw_agent::RouteSummary;
use pw_behavior::DecisionOutcome;
use pw_core::{NodeId, Scenario};

/// Per-node decision-outcome counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeTally {
    pub compliances: u64,
    pub non_compliances: u64,
    pub random_reroutings: u64,
    pub no_route_changes: u64,
}

impl NodeTally {
    fn bump(&mut self, outcome: DecisionOutcome) {
        match outcome {
            DecisionOutcome::Compliance => self.compliances += 1,
            DecisionOutcome::NonCompliance => self.non_compliances += 1,
            DecisionOutcome::RandomRerouting => self.random_reroutings += 1,
            DecisionOutcome::NoRouteChange => self.no_route_changes += 1,
        }
    }
}

/// Everything the scheduler accumulates over a run.
pub struct RunAggregates {
    pub compliances: u64,
    pub non_compliances: u64,
    pub random_reroutings: u64,
    pub no_route_changes: u64,
    /// Normalized observed detour per completed route.
    pub nods: Vec<f64>,
    /// Initially planned shortest length per completed route.
    pub spls: Vec<f64>,
    /// Total walked length per completed route.
    pub tpls: Vec<f64>,
    /// `P(comply)` per recorded one-way evaluation.
    pub comp_probs: Vec<f64>,
    /// `P(stay)` per recorded one-way evaluation.
    pub non_comp_probs: Vec<f64>,
    /// Outcome counters per node, indexed by `NodeId`.
    node_tallies: Vec<NodeTally>,
}

impl RunAggregates {
    pub fn new(node_count: usize) -> Self {
        Self {
            compliances: 0,
            non_compliances: 0,
            random_reroutings: 0,
            no_route_changes: 0,
            nods: Vec::new(),
            spls: Vec::new(),
            tpls: Vec::new(),
            comp_probs: Vec::new(),
            non_comp_probs: Vec::new(),
            node_tallies: vec![NodeTally::default(); node_count],
        }
    }

    /// Fold one completed route into the run totals.
    pub fn absorb(&mut self, summary: RouteSummary) {
        self.tpls.push(summary.total_length);
        self.spls.push(summary.shortest_length);
        self.nods.push(summary.nod);
        self.comp_probs.extend(summary.comp_probs);
        self.non_comp_probs.extend(summary.non_comp_probs);
        for (node, outcome) in summary.outcome_nodes {
            match outcome {
                DecisionOutcome::Compliance => self.compliances += 1,
                DecisionOutcome::NonCompliance => self.non_compliances += 1,
                DecisionOutcome::RandomRerouting => self.random_reroutings += 1,
                DecisionOutcome::NoRouteChange => self.no_route_changes += 1,
            }
            self.node_tallies[node.index()].bump(outcome);
        }
    }

    pub fn node_tally(&self, node: NodeId) -> NodeTally {
        self.node_tallies[node.index()]
    }

    /// Per-node outcome counters, indexed by `NodeId`.
    pub fn node_tallies(&self) -> &[NodeTally] {
        &self.node_tallies
    }

    pub fn routes_completed(&self) -> usize {
        self.nods.len()
    }

    /// Condense into end-of-run evaluation measures.
    pub fn summarize(&self, scenario: Scenario, ticks: u64) -> RunSummary {
        let probs_relevant = scenario == Scenario::ComplexCompliance;
        RunSummary {
            ticks,
            routes_completed: self.routes_completed(),
            compliances: self.compliances,
            non_compliances: self.non_compliances,
            random_reroutings: self.random_reroutings,
            no_route_changes: self.no_route_changes,
            mean_nod: mean(&self.nods),
            std_nod: std_dev(&self.nods),
            var_nod: variance(&self.nods),
            mean_non_comp_prob: probs_relevant.then(|| mean(&self.non_comp_probs)).flatten(),
            std_non_comp_prob: probs_relevant.then(|| std_dev(&self.non_comp_probs)).flatten(),
            var_non_comp_prob: probs_relevant.then(|| variance(&self.non_comp_probs)).flatten(),
            mean_comp_prob: probs_relevant.then(|| mean(&self.comp_probs)).flatten(),
            std_comp_prob: probs_relevant.then(|| std_dev(&self.comp_probs)).flatten(),
        }
    }
}

/// End-of-run evaluation measures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub ticks: u64,
    pub routes_completed: usize,
    pub compliances: u64,
    pub non_compliances: u64,
    pub random_reroutings: u64,
    pub no_route_changes: u64,
    pub mean_nod: Option<f64>,
    pub std_nod: Option<f64>,
    pub var_nod: Option<f64>,
    /// Probability statistics; `None` outside `complex_compliance`.
    pub mean_non_comp_prob: Option<f64>,
    pub std_non_comp_prob: Option<f64>,
    pub var_non_comp_prob: Option<f64>,
    pub mean_comp_prob: Option<f64>,
    pub std_comp_prob: Option<f64>,
}

// ── Statistics helpers (population moments, matching the reference outputs) ──

fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

fn variance(xs: &[f64]) -> Option<f64> {
    let m = mean(xs)?;
    Some(xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / xs.len() as f64)
}

fn std_dev(xs: &[f64]) -> Option<f64> {
    variance(xs).map(f64::sqrt)
}
