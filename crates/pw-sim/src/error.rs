use thiserror::Error;

use pw_agent::AgentError;
use pw_core::{CoreError, NodeId};
use pw_graph::SampleError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("a street graph is required to build a model")]
    MissingGraph,

    #[error("origin/destination pair ({0}, {1}) is invalid")]
    BadOdPair(NodeId, NodeId),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Sampling(#[from] SampleError),
}

pub type ModelResult<T> = Result<T, ModelError>;
