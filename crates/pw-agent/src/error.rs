use thiserror::Error;

use pw_graph::{GraphError, SampleError};

#[derive(Debug, Error)]
pub enum AgentError {
    /// Route planning failed — for sampled endpoints this means the graph is
    /// disconnected between the sampled edges; for fixed pairs it is a
    /// configuration mistake.
    #[error("route planning failed: {0}")]
    Routing(#[from] GraphError),

    #[error("origin/destination sampling failed: {0}")]
    Sampling(#[from] SampleError),

    /// Sampled-endpoint routes need a sampler; fixed-pair configs do not.
    #[error("no point sampler available for random origin/destination routes")]
    MissingSampler,
}

pub type AgentResult<T> = Result<T, AgentError>;
