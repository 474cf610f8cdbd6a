//! Node paths and exact endpoint splicing.
//!
//! Routes are ordered node lists over the real graph.  Sampled origins and
//! destinations sit *on* edges, not on nodes, so after Dijkstra between the
//! two nearer nodes the route is spliced: the sampled point's farther node is
//! inserted as a terminal stand-in unless the path already continues through
//! it, and the walked length is recomputed from the partial first leg, the
//! interior edges, and the partial destination leg.  This makes walked
//! distances reflect the exact sampled points rather than node-to-node
//! distances only.
//!
//! The final path node is never physically reached: when two nodes remain the
//! agent stands on the penultimate node and the remaining distance is the
//! destination-leg offset, not a full edge length.

use pw_core::NodeId;

use crate::sample::SampledPoint;
use crate::{GraphError, GraphResult, StreetGraph};

/// A node-to-node path with its total edge length in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath {
    pub nodes: Vec<NodeId>,
    pub length: f64,
}

/// Where a route ends: exactly on a node (fixed origin/destination pairs) or
/// on a sampled mid-edge point.
#[derive(Debug, Clone)]
pub enum RouteTarget {
    Node(NodeId),
    Point(SampledPoint),
}

impl RouteTarget {
    /// The Dijkstra target: the route's current terminal node.
    ///
    /// For a point target this is whichever endpoint the current path ends
    /// at, so callers pass the terminal of the path being replaced.
    pub fn point(&self) -> Option<&SampledPoint> {
        match self {
            RouteTarget::Node(_) => None,
            RouteTarget::Point(p) => Some(p),
        }
    }
}

/// A route with spliced endpoints, ready to hand to an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct SplicedRoute {
    /// `nodes[0]` is the departed stand-in; `nodes[last]` the approach
    /// stand-in.
    pub nodes: Vec<NodeId>,
    /// Exact walkable length: first leg + interior edges + destination leg.
    pub length: f64,
    /// Distance from the origin point to `nodes[1]`.
    pub first_leg: f64,
    /// Distance from `nodes[len-2]` to the destination point.
    pub dest_leg: f64,
}

// ── Destination splicing ──────────────────────────────────────────────────────

/// Splice a destination onto a path that ends at one of the target's nodes.
///
/// Returns `(nodes, total_length, dest_leg)`:
///
/// - **Node target** — nothing to splice; the destination leg is the full
///   final edge.
/// - **Point target** — the path ends at one endpoint of the destination
///   edge.  If it already arrives along that edge the existing offset is
///   reused (the full final-edge length is replaced by the partial leg);
///   otherwise the farther endpoint is appended as the new terminal and the
///   partial leg is added.
pub fn splice_destination(
    graph: &StreetGraph,
    raw: NodePath,
    target: &RouteTarget,
) -> GraphResult<(Vec<NodeId>, f64, f64)> {
    let m = raw.nodes.len();
    match target {
        RouteTarget::Node(_) => {
            let dest_leg = if m >= 2 {
                edge_length(graph, raw.nodes[m - 2], raw.nodes[m - 1])?
            } else {
                0.0
            };
            Ok((raw.nodes, raw.length, dest_leg))
        }
        RouteTarget::Point(p) => {
            let terminal = *raw.nodes.last().expect("path is never empty");
            let Some(other) = p.other_endpoint(terminal) else {
                return Err(GraphError::UnknownEdge {
                    a: terminal,
                    b: terminal,
                });
            };
            if m >= 2 && raw.nodes[m - 2] == other {
                // Arrives along the destination edge: swap the full final
                // edge for the exact offset from the approach node.
                let dest_leg = p.leg_from(other).expect("other is an endpoint");
                let full = graph.edge(p.edge).length;
                Ok((raw.nodes, raw.length - full + dest_leg, dest_leg))
            } else {
                // Arrives from elsewhere: walk partially onto the
                // destination edge towards the farther endpoint.
                let dest_leg = p.leg_from(terminal).expect("terminal is an endpoint");
                let mut nodes = raw.nodes;
                nodes.push(other);
                Ok((nodes, raw.length + dest_leg, dest_leg))
            }
        }
    }
}

// ── Full route splicing ───────────────────────────────────────────────────────

/// Splice both sampled endpoints onto a nearer-node-to-nearer-node path and
/// recompute the exact walkable length.
///
/// Origin rule (mirrored by the destination rule in
/// [`splice_destination`]): if the path's second node is already the origin
/// point's farther node, the route heads out along the origin edge and the
/// partial first leg is the offset towards it; otherwise the farther node is
/// prepended as the departed stand-in and the first leg is the offset towards
/// the nearer node.
pub fn splice_route(
    graph: &StreetGraph,
    path: NodePath,
    orig: &SampledPoint,
    dest: &SampledPoint,
) -> GraphResult<SplicedRoute> {
    // Origin side.
    let (nodes, first_leg) = if path.nodes.len() >= 2 && path.nodes[1] == orig.remote {
        (path.nodes, orig.dist_from_remote)
    } else {
        let mut nodes = Vec::with_capacity(path.nodes.len() + 2);
        nodes.push(orig.remote);
        nodes.extend_from_slice(&path.nodes);
        (nodes, orig.dist_from_nearer)
    };

    // Destination side (the length is recomputed exactly below).
    let raw = NodePath { nodes, length: 0.0 };
    let (nodes, _, dest_leg) =
        splice_destination(graph, raw, &RouteTarget::Point(dest.clone()))?;

    // Exact length: partial first leg, full interior edges, partial
    // destination leg.
    debug_assert!(nodes.len() >= 3, "spliced route has at least three nodes");
    let mut length = first_leg + dest_leg;
    for w in nodes[1..nodes.len() - 1].windows(2) {
        length += edge_length(graph, w[0], w[1])?;
    }

    Ok(SplicedRoute {
        nodes,
        length,
        first_leg,
        dest_leg,
    })
}

fn edge_length(graph: &StreetGraph, a: NodeId, b: NodeId) -> GraphResult<f64> {
    graph
        .edge_between(a, b)
        .map(|e| graph.edge(e).length)
        .ok_or(GraphError::UnknownEdge { a, b })
}
