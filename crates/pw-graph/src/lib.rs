//! `pw-graph` — street network, staged pedestrian counters, and routing.
//!
//! # Ownership model
//!
//! The crate deliberately splits what a naive port would hold in one mutable
//! graph into three separately-owned structures:
//!
//! | Structure      | Mutability                | Owner                       |
//! |----------------|---------------------------|-----------------------------|
//! | [`StreetGraph`]| immutable after build     | the model, shared by all    |
//! | [`EdgeLoads`]  | staged per-tick counters  | the model, folded at tick end |
//! | [`EdgeBlocks`] | transient search markings | one agent, scoped per search |
//!
//! Directionality is a *query-time* concept: storage is undirected with a
//! canonical geometry direction, and [`StreetGraph::directed_edge`] resolves
//! one-way flags and interpolation for the traversal direction asked for.

pub mod alternate;
pub mod loads;
pub mod network;
pub mod path;
pub mod router;
pub mod sample;

mod error;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use alternate::{Alternative, BlockScope, EdgeBlocks, alternative_path};
pub use error::{GraphError, GraphResult};
pub use loads::EdgeLoads;
pub use network::{DirectedEdge, StreetGraph, StreetGraphBuilder};
pub use path::{NodePath, RouteTarget, SplicedRoute, splice_route};
pub use router::{shortest_path, shortest_path_filtered};
pub use sample::{PointSampler, SampleError, SampledPoint};
