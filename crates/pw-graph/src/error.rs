use pw_core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    /// No path exists between the two nodes (on the possibly-filtered view).
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    /// The two nodes are not joined by an edge.  Consecutive path nodes are
    /// always adjacent by construction, so hitting this is a caller bug.
    #[error("no edge between {a} and {b}")]
    UnknownEdge { a: NodeId, b: NodeId },
}

pub type GraphResult<T> = Result<T, GraphError>;
