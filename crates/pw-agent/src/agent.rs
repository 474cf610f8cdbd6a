//! The `Pedestrian` — per-agent state and per-tick operations.

use log::debug;

use pw_behavior::{ComplianceModel, Decision, DecisionInputs, DecisionOutcome, Weights, sample_normal};
use pw_core::{AgentId, EdgeId, MasterRng, ModelConfig, NodeId, Point2, RngStream};
use pw_graph::{
    EdgeBlocks, EdgeLoads, PointSampler, RouteTarget, StreetGraph, alternative_path,
};

use crate::route::{RoutePlan, StartState, plan_between_nodes, plan_between_points};
use crate::{AgentError, AgentResult};

/// Statistics of one completed route, flushed to the model aggregates.
#[derive(Debug, Clone)]
pub struct RouteSummary {
    pub agent: AgentId,
    pub route: u32,
    /// Total distance walked (TPL).
    pub total_length: f64,
    /// Length of the initially planned shortest route (SPL).
    pub shortest_length: f64,
    /// Normalized observed detour: total detour / SPL.
    pub nod: f64,
    /// `P(comply)` per recorded one-way evaluation.
    pub comp_probs: Vec<f64>,
    /// `P(stay)` per recorded one-way evaluation.
    pub non_comp_probs: Vec<f64>,
    /// Decision outcomes with the node they occurred at, in route order.
    pub outcome_nodes: Vec<(NodeId, DecisionOutcome)>,
}

/// One simulated pedestrian.
///
/// Construct with [`spawn`](Self::spawn), then call
/// [`begin_route`](Self::begin_route) before the first tick.  All per-tick
/// methods take the shared graph and counter table by reference — the agent
/// holds nothing shared.
pub struct Pedestrian {
    pub id: AgentId,

    // ── Private random streams ────────────────────────────────────────────
    rng_decision: pw_core::AgentRng,
    rng_destination: pw_core::AgentRng,

    // ── Persistent attributes (survive recycling) ─────────────────────────
    pub weights: Weights,
    pub walking_speed: f64,
    /// Metres walked per tick: `walking_speed × tick_seconds`.
    pub walking_distance: f64,

    // ── Route state ───────────────────────────────────────────────────────
    /// `path[0]` = current / most recently departed node.
    pub path: Vec<NodeId>,
    /// Remaining walkable length of the current route.
    pub remaining_length: f64,
    /// Length of the route as initially planned (NOD denominator).
    pub init_shortest_length: f64,
    /// Distance from the penultimate node to the destination point.
    pub dest_leg: f64,
    target: RouteTarget,
    /// Metres left on the current leg; `0` means "at a node".
    pub remaining_on_edge: f64,
    /// Offset (from the leg's start node, along the street edge) at which
    /// the current leg ends — the full edge length for interior legs, the
    /// destination-leg offset on the final leg.
    leg_end_offset: f64,
    /// Street edge under the current leg.
    current_edge: EdgeId,
    previous_edge: Option<EdgeId>,

    // ── Route bookkeeping ─────────────────────────────────────────────────
    pub len_traversed: f64,
    pub total_detour: f64,
    pub num_detours: u32,
    pub route_counter: u32,
    pub finished: bool,
    pub position: Point2,
    pub latest_node: NodeId,
    /// Outcome of the latest node-crossing decision; cleared at the next
    /// at-node phase.
    pub outcome: Option<DecisionOutcome>,

    // ── Per-route records, flushed at route completion ────────────────────
    comp_probs: Vec<f64>,
    non_comp_probs: Vec<f64>,
    outcome_nodes: Vec<(NodeId, DecisionOutcome)>,

    /// Transient blocked-edge set; empty between searches.
    blocks: EdgeBlocks,
}

impl Pedestrian {
    // ── Construction ──────────────────────────────────────────────────────

    /// Create an agent with freshly drawn weights and walking speed.
    ///
    /// The attribute stream is consumed here in a fixed order (constant,
    /// rtd, ows, speed) and never used again; decision and destination
    /// streams live for the whole run.
    pub fn spawn(id: AgentId, config: &ModelConfig, master: &MasterRng) -> Self {
        let mut attrs = master.agent_stream(id, RngStream::Attributes);
        let weights = Weights::sample(config, &mut attrs);
        // The distribution tail can produce non-positive speeds; floor keeps
        // every agent moving.
        let walking_speed = sample_normal(config.walking_speed, &mut attrs).max(0.1);

        Self {
            id,
            rng_decision: master.agent_stream(id, RngStream::Decision),
            rng_destination: master.agent_stream(id, RngStream::Destination),
            weights,
            walking_speed,
            walking_distance: walking_speed * config.tick_seconds,
            path: Vec::new(),
            remaining_length: 0.0,
            init_shortest_length: 0.0,
            dest_leg: 0.0,
            target: RouteTarget::Node(NodeId::INVALID),
            remaining_on_edge: 0.0,
            leg_end_offset: 0.0,
            current_edge: EdgeId::INVALID,
            previous_edge: None,
            len_traversed: 0.0,
            total_detour: 0.0,
            num_detours: 0,
            route_counter: 0,
            finished: false,
            position: Point2::default(),
            latest_node: NodeId::INVALID,
            outcome: None,
            comp_probs: Vec::new(),
            non_comp_probs: Vec::new(),
            outcome_nodes: Vec::new(),
            blocks: EdgeBlocks::new(),
        }
    }

    // ── State predicates ──────────────────────────────────────────────────

    /// `true` when the agent stands on a node (no distance left on a leg).
    #[inline]
    pub fn is_at_node(&self) -> bool {
        self.remaining_on_edge == 0.0
    }

    /// `true` when only the destination leg remains.
    #[inline]
    pub fn on_penultimate_node(&self) -> bool {
        self.path.len() == 2
    }

    /// `true` once the path has collapsed onto the destination.
    #[inline]
    pub fn has_arrived(&self) -> bool {
        self.path.len() <= 1
    }

    // ── Route lifecycle ───────────────────────────────────────────────────

    /// Assign a new origin/destination and route.
    ///
    /// Fixed pairs (when configured) are drawn from the pair list; otherwise
    /// endpoints are sampled on edges, optionally reusing the previous
    /// destination as the next origin.
    pub fn begin_route(
        &mut self,
        graph: &StreetGraph,
        sampler: Option<&PointSampler>,
        config: &ModelConfig,
        loads: &mut EdgeLoads,
    ) -> AgentResult<()> {
        let plan = if config.origin_destination_pairs.is_empty() {
            let sampler = sampler.ok_or(AgentError::MissingSampler)?;
            let reuse = config.reuse_previous_dest_as_orig && self.route_counter > 0;
            let (orig, dest) = match (&self.target, reuse) {
                (RouteTarget::Point(prev_dest), true) => {
                    let orig = prev_dest.clone();
                    let dest = sampler.sample_destination(
                        graph,
                        &mut self.rng_destination,
                        &orig,
                        config.min_od_distance,
                        config.max_od_attempts,
                    )?;
                    (orig, dest)
                }
                _ => sampler.sample_pair(
                    graph,
                    &mut self.rng_destination,
                    config.min_od_distance,
                    config.max_od_attempts,
                )?,
            };
            plan_between_points(graph, orig, dest)?
        } else {
            let i = self
                .rng_destination
                .gen_range(0..config.origin_destination_pairs.len());
            let (origin, dest) = config.origin_destination_pairs[i];
            plan_between_nodes(graph, origin, dest)?
        };

        self.begin_route_from_plan(graph, loads, plan);
        Ok(())
    }

    /// Install a prepared route (also the test seam).
    pub fn begin_route_from_plan(
        &mut self,
        graph: &StreetGraph,
        loads: &mut EdgeLoads,
        plan: RoutePlan,
    ) {
        self.path = plan.nodes;
        self.remaining_length = plan.length;
        self.init_shortest_length = plan.length;
        self.dest_leg = plan.dest_leg;
        self.target = plan.target;
        self.len_traversed = 0.0;
        self.total_detour = 0.0;
        self.outcome = None;
        self.previous_edge = None;
        self.latest_node = self.path[0];

        match plan.start {
            StartState::AtNode { node } => {
                self.remaining_on_edge = 0.0;
                self.leg_end_offset = 0.0;
                self.current_edge = EdgeId::INVALID;
                self.position = graph.node_pos(node);
            }
            StartState::OnEdge {
                position,
                remaining,
            } => {
                let edge = graph
                    .directed_edge(self.path[0], self.path[1])
                    .expect("consecutive path nodes are adjacent");
                self.remaining_on_edge = remaining;
                self.leg_end_offset = edge.length;
                self.current_edge = edge.id;
                self.position = position;
                // The agent occupies the origin street from the start; the
                // previous edge is that same street until the first node.
                self.previous_edge = Some(edge.id);
                loads.increase(edge.id, 1);
            }
        }
    }

    // ── Tick phases ───────────────────────────────────────────────────────

    /// Phase 1: clear the decision flags from the previous node crossing.
    pub fn reset_outcome(&mut self) {
        self.outcome = None;
    }

    /// Phase 2 (at-node, not penultimate): evaluate the next street and
    /// possibly swap the route for an alternative.
    pub fn decide_at_node(
        &mut self,
        graph: &StreetGraph,
        loads: &EdgeLoads,
        model: &ComplianceModel,
        config: &ModelConfig,
    ) {
        let current = self.path[0];
        let next_edge = graph
            .directed_edge(current, self.path[1])
            .expect("consecutive path nodes are adjacent");
        let one_way = next_edge.one_way_reversed;

        // Degree 2 = corridor: there is no real alternative at this node.
        if graph.degree(current) == 2 {
            let outcome = if one_way {
                DecisionOutcome::NonCompliance
            } else {
                DecisionOutcome::NoRouteChange
            };
            self.record_outcome(current, outcome);
            return;
        }

        let alt = alternative_path(
            graph,
            &mut self.blocks,
            &self.path,
            self.remaining_length,
            self.dest_leg,
            &self.target,
            self.previous_edge,
            one_way,
            self.id,
        );

        let first = model.decide(
            &self.weights,
            &DecisionInputs {
                detour: alt.detour,
                len_traversed: self.len_traversed,
                remaining_length: self.remaining_length,
                one_way,
                edge_density: loads.density(next_edge.id),
            },
            &mut self.rng_decision,
            true,
        );
        self.push_probability(&first);
        let mut deviate = first.deviate;

        // Second opinion when the chosen alternative is itself restricted:
        // evaluate the *alternative* as the baseline (detour sign inverted,
        // one-way forced) and only keep deviating if that evaluation says to
        // leave it again is not worth it.
        let alt_first = graph
            .directed_edge(alt.nodes[0], alt.nodes[1])
            .expect("consecutive path nodes are adjacent");
        let alt_forbidden = alt_first.one_way_reversed;
        if alt_forbidden && deviate {
            if model.scenario == pw_core::Scenario::SimpleCompliance {
                deviate = false;
            } else {
                let second = model.decide(
                    &self.weights,
                    &DecisionInputs {
                        detour: -alt.detour,
                        len_traversed: self.len_traversed,
                        remaining_length: self.remaining_length,
                        one_way: true,
                        edge_density: loads.density(alt_first.id),
                    },
                    &mut self.rng_decision,
                    config.record_second_opinion_probs,
                );
                self.push_probability(&second);
                deviate = !second.deviate;
            }
        }

        let outcome = DecisionOutcome::classify(deviate, one_way, alt_forbidden);
        self.record_outcome(current, outcome);

        if deviate && config.rerouting_allowed {
            self.path = alt.nodes;
            self.dest_leg = alt.dest_leg;
            self.remaining_length += alt.detour;
            self.total_detour += alt.detour;
            self.num_detours += 1;
        }
    }

    /// Phases 2–4 (at-node): enter the next leg and count the entry.
    ///
    /// Interior legs run the full edge; on the penultimate node only the
    /// exact offset to the destination point remains.
    pub fn start_next_leg(&mut self, graph: &StreetGraph, loads: &mut EdgeLoads) {
        let edge = graph
            .directed_edge(self.path[0], self.path[1])
            .expect("consecutive path nodes are adjacent");
        self.current_edge = edge.id;
        if self.on_penultimate_node() {
            self.remaining_on_edge = self.dest_leg;
            self.leg_end_offset = self.dest_leg;
        } else {
            self.remaining_on_edge = edge.length;
            self.leg_end_offset = edge.length;
        }
        loads.increase(edge.id, 1);
    }

    /// Phase 5: walk one tick — to the next node, or along the current leg.
    ///
    /// A tick that reaches a node stops there; leftover walking budget is
    /// dropped, never carried into the next edge.
    pub fn walk(&mut self, graph: &StreetGraph, loads: &mut EdgeLoads) {
        if self.walking_distance >= self.remaining_on_edge {
            self.stop_at_node(graph, loads);
        } else {
            self.advance_along_leg(graph);
        }
    }

    fn advance_along_leg(&mut self, graph: &StreetGraph) {
        self.len_traversed += self.walking_distance;
        self.remaining_length -= self.walking_distance;
        self.remaining_on_edge -= self.walking_distance;
        let edge = graph
            .directed_edge(self.path[0], self.path[1])
            .expect("consecutive path nodes are adjacent");
        self.position = edge.point_at(self.leg_end_offset - self.remaining_on_edge);
    }

    fn stop_at_node(&mut self, graph: &StreetGraph, loads: &mut EdgeLoads) {
        self.len_traversed += self.remaining_on_edge;
        self.remaining_length -= self.remaining_on_edge;
        self.remaining_on_edge = 0.0;
        loads.decrease(self.current_edge, 1);

        self.path.remove(0);
        self.previous_edge = Some(self.current_edge);
        self.current_edge = EdgeId::INVALID;
        self.latest_node = self.path[0];

        if self.has_arrived() {
            // The final leg ends on the exact destination point, which for
            // sampled destinations is *not* the stand-in node's position.
            self.position = match &self.target {
                RouteTarget::Point(p) => p.point,
                RouteTarget::Node(_) => graph.node_pos(self.path[0]),
            };
        } else {
            self.position = graph.node_pos(self.path[0]);
        }
    }

    /// Phase 6: flush route statistics, then recycle or finish.
    ///
    /// Returns the completed route's summary for the model aggregates.
    pub fn finish_route(
        &mut self,
        graph: &StreetGraph,
        sampler: Option<&PointSampler>,
        config: &ModelConfig,
        loads: &mut EdgeLoads,
    ) -> AgentResult<RouteSummary> {
        let nod = if self.init_shortest_length > 0.0 {
            self.total_detour / self.init_shortest_length
        } else {
            0.0
        };
        let summary = RouteSummary {
            agent: self.id,
            route: self.route_counter,
            total_length: self.len_traversed,
            shortest_length: self.init_shortest_length,
            nod,
            comp_probs: std::mem::take(&mut self.comp_probs),
            non_comp_probs: std::mem::take(&mut self.non_comp_probs),
            outcome_nodes: std::mem::take(&mut self.outcome_nodes),
        };

        if config.assign_new_destinations {
            self.route_counter += 1;
            self.begin_route(graph, sampler, config, loads)?;
        } else {
            self.finished = true;
        }
        Ok(summary)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn record_outcome(&mut self, node: NodeId, outcome: DecisionOutcome) {
        if outcome == DecisionOutcome::NonCompliance {
            debug!("non-compliance by agent {} at node {node}", self.id);
        }
        self.outcome = Some(outcome);
        self.outcome_nodes.push((node, outcome));
    }

    fn push_probability(&mut self, decision: &Decision) {
        if let Some(p_stay) = decision.stay_probability {
            self.non_comp_probs.push(p_stay);
            self.comp_probs.push(1.0 - p_stay);
        }
    }
}
