//! Street network representation and builder.
//!
//! # Data layout
//!
//! Storage is undirected: each street is one [`EdgeId`] with a canonical
//! geometry direction (`a` → `b`, first polyline vertex at `a`).  Node
//! adjacency lists carry `(neighbor, edge)` pairs for both endpoints, so a
//! node's degree is its adjacency length and Dijkstra's inner loop is a
//! contiguous scan.
//!
//! # One-way semantics
//!
//! Flags are stored relative to the canonical direction:
//!
//! - `one_way`           — traversal is only allowed `a` → `b`.
//! - `one_way_reversed`  — traversal is only allowed `b` → `a`.
//!
//! A directed query swaps the pair when the traversal runs against the
//! canonical geometry, so callers always read `one_way_reversed` as "entering
//! this edge in my direction is forbidden".  Restrictions are *behavioral* —
//! the router ignores them; the compliance model decides whether an agent
//! respects them.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps projected-metre points to the nearest node.
//! Used by external harnesses to snap survey points or fixed origins onto the
//! network.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use pw_core::{EdgeId, NodeId, Point2, Polyline};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D point with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Edge storage ──────────────────────────────────────────────────────────────

/// Immutable per-street attributes in canonical orientation.
#[derive(Clone, Debug)]
pub struct StreetEdge {
    /// Canonical start node (first polyline vertex).
    pub a: NodeId,
    /// Canonical end node (last polyline vertex).
    pub b: NodeId,
    /// Geometric length in metres, derived from the polyline at build time.
    pub length: f64,
    /// Edge geometry, canonical direction `a` → `b`.
    pub geometry: Polyline,
    /// Only traversable `a` → `b`.
    pub one_way: bool,
    /// Only traversable `b` → `a`.
    pub one_way_reversed: bool,
    /// Sidewalk width in metres; density divisor together with length.
    pub width: f64,
}

impl StreetEdge {
    /// The endpoint opposite `node`, or `None` if `node` is not an endpoint.
    pub fn other_endpoint(&self, node: NodeId) -> Option<NodeId> {
        if node == self.a {
            Some(self.b)
        } else if node == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

// ── DirectedEdge ──────────────────────────────────────────────────────────────

/// A read-only view of a street oriented for one traversal direction.
///
/// Repeated queries in either direction always return the same view for that
/// direction — the underlying storage is never touched.
#[derive(Clone, Copy, Debug)]
pub struct DirectedEdge<'g> {
    pub id: EdgeId,
    /// Traversal start node.
    pub from: NodeId,
    /// Traversal end node.
    pub to: NodeId,
    pub length: f64,
    pub width: f64,
    /// One-way in the traversal direction (entering is allowed).
    pub one_way: bool,
    /// One-way against the traversal direction: entering this edge from
    /// `from` is forbidden.
    pub one_way_reversed: bool,
    geometry: &'g Polyline,
    /// `true` when the traversal follows the canonical geometry direction.
    forward: bool,
}

impl<'g> DirectedEdge<'g> {
    /// Point at `offset` metres from the traversal start node.
    ///
    /// Inverts the stored coordinate order when the traversal runs against
    /// the canonical direction, per the §4.1 directed-edge contract.
    #[inline]
    pub fn point_at(&self, offset: f64) -> Point2 {
        self.geometry.point_at_directed(offset, self.forward)
    }
}

// ── StreetGraph ───────────────────────────────────────────────────────────────

/// Immutable street topology plus a spatial index.
///
/// Build with [`StreetGraphBuilder`].  All mutable per-edge state lives in
/// [`EdgeLoads`](crate::EdgeLoads), keyed by `EdgeId`.
pub struct StreetGraph {
    node_pos: Vec<Point2>,
    /// Per-node `(neighbor, edge)` pairs; `adjacency[n].len()` is the degree.
    adjacency: Vec<Vec<(NodeId, EdgeId)>>,
    edges: Vec<StreetEdge>,
    spatial_idx: RTree<NodeEntry>,
}

impl StreetGraph {
    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Node queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn node_pos(&self, node: NodeId) -> Point2 {
        self.node_pos[node.index()]
    }

    /// Number of streets incident to `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.adjacency[node.index()].len()
    }

    /// Iterator over `(neighbor, edge)` pairs of `node`.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        self.adjacency[node.index()].iter().copied()
    }

    // ── Edge queries ──────────────────────────────────────────────────────

    #[inline]
    pub fn edge(&self, edge: EdgeId) -> &StreetEdge {
        &self.edges[edge.index()]
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &StreetEdge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    /// The edge joining `a` and `b`, if any.  The graph is simple: at most
    /// one street per node pair.
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        self.adjacency[a.index()]
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, e)| *e)
    }

    /// View of the edge joining `start` and `end`, oriented `start` → `end`.
    ///
    /// Swap-and-negate: when the canonical geometry runs `end` → `start`, the
    /// one-way flags are exchanged and interpolation inverts the coordinate
    /// order.  Returns `None` when the nodes are not adjacent.
    pub fn directed_edge(&self, start: NodeId, end: NodeId) -> Option<DirectedEdge<'_>> {
        let id = self.edge_between(start, end)?;
        let e = &self.edges[id.index()];
        let forward = e.a == start;
        let (one_way, one_way_reversed) = if forward {
            (e.one_way, e.one_way_reversed)
        } else {
            (e.one_way_reversed, e.one_way)
        };
        Some(DirectedEdge {
            id,
            from: start,
            to: end,
            length: e.length,
            width: e.width,
            one_way,
            one_way_reversed,
            geometry: &e.geometry,
            forward,
        })
    }

    /// `true` if entering the edge `start` → `end` runs against a one-way
    /// restriction.
    pub fn is_forbidden_entry(&self, start: NodeId, end: NodeId) -> bool {
        self.directed_edge(start, end)
            .is_some_and(|e| e.one_way_reversed)
    }

    // ── Interventions ─────────────────────────────────────────────────────

    /// Erase every one-way restriction (the `no_interventions` scenario).
    ///
    /// Called once at model construction, before any agent exists.
    pub fn clear_interventions(&mut self) {
        for e in &mut self.edges {
            e.one_way = false;
            e.one_way_reversed = false;
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `point`, or `None` for an empty graph.
    pub fn nearest_node(&self, point: Point2) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[point.x, point.y])
            .map(|e| e.id)
    }
}

// ── StreetGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`StreetGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use pw_core::Point2;
/// use pw_graph::StreetGraphBuilder;
///
/// let mut b = StreetGraphBuilder::new();
/// let n0 = b.add_node(Point2::new(0.0, 0.0));
/// let n1 = b.add_node(Point2::new(100.0, 0.0));
/// let e = b.add_street(n0, n1, 3.0);
/// b.set_one_way(e, true, false); // only traversable n0 → n1
/// let g = b.build();
/// assert_eq!(g.edge_count(), 1);
/// assert!(g.is_forbidden_entry(n1, n0));
/// ```
pub struct StreetGraphBuilder {
    nodes: Vec<Point2>,
    edges: Vec<StreetEdge>,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point2) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a straight street between two existing nodes.
    ///
    /// Geometry is the segment `a` → `b`; length is its Euclidean distance.
    pub fn add_street(&mut self, a: NodeId, b: NodeId, width: f64) -> EdgeId {
        let geometry = Polyline::segment(self.nodes[a.index()], self.nodes[b.index()]);
        self.add_street_geometry(a, b, width, geometry)
    }

    /// Add a street with an explicit polyline geometry.
    ///
    /// The polyline's first vertex must sit at `a` and its last at `b`; its
    /// measured length becomes the edge length.
    pub fn add_street_geometry(
        &mut self,
        a: NodeId,
        b: NodeId,
        width: f64,
        geometry: Polyline,
    ) -> EdgeId {
        debug_assert!(geometry.0.len() >= 2, "polyline needs at least two vertices");
        debug_assert!(
            geometry.first().distance(self.nodes[a.index()]) < 1e-6
                && geometry.last().distance(self.nodes[b.index()]) < 1e-6,
            "polyline endpoints must coincide with the edge's nodes"
        );
        let id = EdgeId(self.edges.len() as u32);
        let length = geometry.length();
        self.edges.push(StreetEdge {
            a,
            b,
            length,
            geometry,
            one_way: false,
            one_way_reversed: false,
            width,
        });
        id
    }

    /// Set the one-way flags of an edge, relative to its canonical direction.
    pub fn set_one_way(&mut self, edge: EdgeId, one_way: bool, one_way_reversed: bool) {
        let e = &mut self.edges[edge.index()];
        e.one_way = one_way;
        e.one_way_reversed = one_way_reversed;
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Consume the builder: derive adjacency lists and bulk-load the R-tree.
    pub fn build(self) -> StreetGraph {
        let mut adjacency: Vec<Vec<(NodeId, EdgeId)>> = vec![Vec::new(); self.nodes.len()];
        for (i, e) in self.edges.iter().enumerate() {
            let id = EdgeId(i as u32);
            adjacency[e.a.index()].push((e.b, id));
            adjacency[e.b.index()].push((e.a, id));
        }

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry {
                point: [p.x, p.y],
                id: NodeId(i as u32),
            })
            .collect();

        StreetGraph {
            node_pos: self.nodes,
            adjacency,
            edges: self.edges,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}

impl Default for StreetGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
