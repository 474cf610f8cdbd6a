//! Shortest paths by edge length.
//!
//! Plain binary-heap Dijkstra over the undirected street graph.  One-way
//! flags are deliberately **not** respected here: directional restrictions
//! are behavioral (the compliance model decides whether an agent honors
//! them), so the planner sees the full walkable network minus whatever a
//! caller has marked in its [`EdgeBlocks`].
//!
//! Costs are f64 metres.  Heap ordering uses `f64::total_cmp` with the node
//! id as a secondary key, so ties break deterministically and runs are
//! reproducible.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use pw_core::NodeId;

use crate::alternate::EdgeBlocks;
use crate::path::NodePath;
use crate::{GraphError, GraphResult, StreetGraph};

/// Total-ordered f64 cost for heap storage.
#[derive(Copy, Clone, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Shortest path from `from` to `to` on the full graph.
pub fn shortest_path(graph: &StreetGraph, from: NodeId, to: NodeId) -> GraphResult<NodePath> {
    shortest_path_filtered(graph, from, to, &EdgeBlocks::new())
}

/// Shortest path from `from` to `to`, skipping every edge in `blocked`.
///
/// `from == to` yields a trivial single-node path of length zero.  Returns
/// [`GraphError::NoPath`] when the (filtered) graph disconnects the pair.
pub fn shortest_path_filtered(
    graph: &StreetGraph,
    from: NodeId,
    to: NodeId,
    blocked: &EdgeBlocks,
) -> GraphResult<NodePath> {
    if from == to {
        return Ok(NodePath {
            nodes: vec![from],
            length: 0.0,
        });
    }

    let n = graph.node_count();
    // dist[v] = best known cost (metres) to reach v.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = predecessor node on the best path; INVALID for unreached.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(prev, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, edge) in graph.neighbors(node) {
            if blocked.contains(edge) {
                continue;
            }
            let new_cost = cost + graph.edge(edge).length;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    Err(GraphError::NoPath { from, to })
}

fn reconstruct(prev: Vec<NodeId>, from: NodeId, to: NodeId, length: f64) -> NodePath {
    let mut nodes = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    NodePath { nodes, length }
}
