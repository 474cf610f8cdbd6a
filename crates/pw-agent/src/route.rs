//! Route assembly: from endpoints to a walkable plan.
//!
//! A [`RoutePlan`] is everything an agent needs to start a route: the spliced
//! node path, its exact walkable length, the destination-leg offset, the
//! search target for later replanning, and the starting state (mid-edge on
//! the origin street for sampled points, on the origin node for fixed pairs).

use pw_core::{NodeId, Point2};
use pw_graph::{
    GraphError, RouteTarget, SampledPoint, StreetGraph, shortest_path, splice_route,
};

use crate::AgentResult;

/// How a route begins.
#[derive(Debug, Clone, PartialEq)]
pub enum StartState {
    /// Standing exactly on a node; the first leg is assigned at the first
    /// at-node phase.
    AtNode { node: NodeId },
    /// Standing mid-edge on the origin street (`nodes[0]` → `nodes[1]`),
    /// `remaining` metres from `nodes[1]`.
    OnEdge { position: Point2, remaining: f64 },
}

/// A fully assembled route, ready to hand to an agent.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    /// `nodes[0]` = departed stand-in / origin node; `nodes[last]` = approach
    /// stand-in / destination node.
    pub nodes: Vec<NodeId>,
    /// Exact walkable length from the start position to the destination.
    pub length: f64,
    /// Distance from the penultimate node to the destination point.
    pub dest_leg: f64,
    pub start: StartState,
    /// Replanning target for alternative-path searches.
    pub target: RouteTarget,
}

/// Plan a route between two sampled mid-edge points.
pub fn plan_between_points(
    graph: &StreetGraph,
    orig: SampledPoint,
    dest: SampledPoint,
) -> AgentResult<RoutePlan> {
    let base = shortest_path(graph, orig.nearer, dest.nearer)?;
    let spliced = splice_route(graph, base, &orig, &dest)?;
    Ok(RoutePlan {
        start: StartState::OnEdge {
            position: orig.point,
            remaining: spliced.first_leg,
        },
        length: spliced.length,
        dest_leg: spliced.dest_leg,
        nodes: spliced.nodes,
        target: RouteTarget::Point(dest),
    })
}

/// Plan a route between two fixed nodes (no splicing; the agent starts and
/// arrives exactly on nodes).
pub fn plan_between_nodes(
    graph: &StreetGraph,
    origin: NodeId,
    dest: NodeId,
) -> AgentResult<RoutePlan> {
    let path = shortest_path(graph, origin, dest)?;
    let dest_leg = match path.nodes.len() {
        0 | 1 => 0.0,
        n => graph
            .edge_between(path.nodes[n - 2], path.nodes[n - 1])
            .map(|e| graph.edge(e).length)
            .ok_or(GraphError::UnknownEdge {
                a: path.nodes[n - 2],
                b: path.nodes[n - 1],
            })?,
    };
    Ok(RoutePlan {
        start: StartState::AtNode { node: origin },
        length: path.length,
        dest_leg,
        nodes: path.nodes,
        target: RouteTarget::Node(dest),
    })
}
