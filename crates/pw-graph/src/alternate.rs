//! Alternative-path search with scoped edge blocking.
//!
//! When an agent weighs deviating at a decision node, the search must see the
//! graph *minus* the edge it is trying to avoid (and usually minus the edge it
//! came from — U-turns are only allowed to escape a one-way restriction).
//! Those markings are strictly transient: a leaked marking would silently
//! corrupt every later query on the same agent's view.
//!
//! [`BlockScope`] makes the mark/search/unmark sequence structural.  A scope
//! inserts its edges into the agent's [`EdgeBlocks`] on creation and removes
//! exactly the ones it inserted when dropped — on success, on recursion, and
//! on the no-path error path alike.

use log::warn;
use rustc_hash::FxHashSet;

use pw_core::{AgentId, EdgeId, NodeId};

use crate::path::{RouteTarget, splice_destination};
use crate::router::shortest_path_filtered;
use crate::{GraphError, GraphResult, StreetGraph};

// ── EdgeBlocks ────────────────────────────────────────────────────────────────

/// A per-agent set of temporarily untraversable edges.
///
/// Owned by one agent and only ever populated through a [`BlockScope`]; the
/// set is empty between searches.
#[derive(Default)]
pub struct EdgeBlocks {
    set: FxHashSet<EdgeId>,
}

impl EdgeBlocks {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, edge: EdgeId) -> bool {
        self.set.contains(&edge)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }
}

// ── BlockScope ────────────────────────────────────────────────────────────────

/// RAII guard over a set of blocked edges.
///
/// Records which edges it actually inserted, so nested scopes blocking an
/// already-blocked edge do not unblock it early.
pub struct BlockScope<'a> {
    blocks: &'a mut EdgeBlocks,
    added: Vec<EdgeId>,
}

impl<'a> BlockScope<'a> {
    /// Block `edges`, remembering which were newly inserted.
    pub fn block(blocks: &'a mut EdgeBlocks, edges: impl IntoIterator<Item = EdgeId>) -> Self {
        let mut added = Vec::new();
        for e in edges {
            if blocks.set.insert(e) {
                added.push(e);
            }
        }
        Self { blocks, added }
    }

    /// Read view for path queries.
    #[inline]
    pub fn blocks(&self) -> &EdgeBlocks {
        self.blocks
    }

    /// Reborrow for a nested scope (recursive search).
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut EdgeBlocks {
        self.blocks
    }
}

impl Drop for BlockScope<'_> {
    fn drop(&mut self) {
        for e in &self.added {
            self.blocks.set.remove(e);
        }
    }
}

// ── Alternative path ──────────────────────────────────────────────────────────

/// Result of an alternative-path search.
///
/// On total failure this is the original path with zero detour — the agent
/// waits in place / continues as before rather than aborting.
#[derive(Debug, Clone)]
pub struct Alternative {
    /// Replacement route, same representation as the agent's path.
    pub nodes: Vec<NodeId>,
    /// Distance from the replacement's penultimate node to the destination
    /// point.
    pub dest_leg: f64,
    /// Length delta versus the originally intended route (from the current
    /// node to the destination).
    pub detour: f64,
}

/// Compute an alternative route from `path[0]` to the destination that avoids
/// the next intended edge.
///
/// Rules, in order:
///
/// 1. The next edge (`path[0]`–`path[1]`) is blocked.
/// 2. The previous edge is blocked too, *unless* the next edge is a forbidden
///    one-way — turning around is only allowed to escape a restriction.
/// 3. If the best alternative's own first edge is itself a forbidden one-way,
///    the search recurses with that alternative as the new base while the
///    current blocks stay in place.  Each level blocks at least one new edge,
///    so the recursion is bounded by connectivity and terminates in a no-path
///    error when the graph runs out of options; the innermost reachable
///    alternative is then handed back for the caller's second-opinion
///    evaluation.
/// 4. Detours are always measured against `path_length`, the remaining length
///    of the originally intended route.
///
/// Every blocked edge is unblocked before this returns, on all exit paths.
pub fn alternative_path(
    graph: &StreetGraph,
    blocks: &mut EdgeBlocks,
    path: &[NodeId],
    path_length: f64,
    current_dest_leg: f64,
    target: &RouteTarget,
    previous_edge: Option<EdgeId>,
    next_is_forbidden: bool,
    agent: AgentId,
) -> Alternative {
    debug_assert!(path.len() >= 2, "no next edge to avoid");
    debug_assert!(blocks.is_empty(), "markings leaked from an earlier search");

    let result = search(
        graph,
        blocks,
        path,
        target,
        previous_edge,
        next_is_forbidden,
    );
    debug_assert!(blocks.is_empty(), "scope failed to restore markings");

    match result {
        Ok((nodes, length, dest_leg)) => Alternative {
            nodes,
            dest_leg,
            detour: length - path_length,
        },
        Err(e) => {
            // Wait-in-place fallback: keep the intended route, zero detour.
            warn!("no alternative for agent {agent} at node {}: {e}", path[0]);
            Alternative {
                nodes: path.to_vec(),
                dest_leg: current_dest_leg,
                detour: 0.0,
            }
        }
    }
}

/// Recursive core: returns `(nodes, spliced length, dest leg)` of the chosen
/// alternative.  Blocks accumulate down the recursion and unwind with it.
fn search(
    graph: &StreetGraph,
    blocks: &mut EdgeBlocks,
    path: &[NodeId],
    target: &RouteTarget,
    previous_edge: Option<EdgeId>,
    next_is_forbidden: bool,
) -> GraphResult<(Vec<NodeId>, f64, f64)> {
    let current = path[0];
    let next = path[1];
    let next_edge = graph
        .edge_between(current, next)
        .ok_or(GraphError::UnknownEdge { a: current, b: next })?;

    let mut to_block = vec![next_edge];
    if !next_is_forbidden {
        if let Some(prev) = previous_edge {
            to_block.push(prev);
        }
    }
    let mut scope = BlockScope::block(blocks, to_block);

    let terminal = *path.last().expect("path is never empty");
    let raw = shortest_path_filtered(graph, current, terminal, scope.blocks())?;
    let (nodes, length, dest_leg) = splice_destination(graph, raw, target)?;

    if nodes.len() >= 2 && graph.is_forbidden_entry(nodes[0], nodes[1]) {
        // The alternative starts with a forbidden one-way as well: derive an
        // alternative to the alternative.  A dead end here is not fatal —
        // this level's route is still the best candidate.
        return match search(graph, scope.blocks_mut(), &nodes, target, previous_edge, true) {
            Ok(found) => Ok(found),
            Err(GraphError::NoPath { .. }) => Ok((nodes, length, dest_leg)),
            Err(e) => Err(e),
        };
    }

    Ok((nodes, length, dest_leg))
}
