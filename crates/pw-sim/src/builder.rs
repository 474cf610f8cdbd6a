//! Validating builder for [`Model`].

use pw_agent::Pedestrian;
use pw_behavior::ComplianceModel;
use pw_core::{AgentId, MasterRng, ModelConfig};
use pw_graph::{EdgeLoads, PointSampler, StreetGraph};

use crate::{Model, ModelError, ModelResult};

/// Builds a ready-to-run [`Model`].
///
/// # Example
///
/// ```rust,ignore
/// let model = ModelBuilder::new(config)
///     .graph(graph)
///     .build()?;
/// let summary = model.run(&mut NoopObserver)?;
/// ```
pub struct ModelBuilder {
    config: ModelConfig,
    graph: Option<StreetGraph>,
}

impl ModelBuilder {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            graph: None,
        }
    }

    /// Supply the street network (required).
    pub fn graph(mut self, graph: StreetGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Validate the configuration, resolve the scenario's interventions,
    /// spawn the population, and assign every agent its first route.
    pub fn build(self) -> ModelResult<Model> {
        let config = self.config;
        config.validate()?;

        let mut graph = self.graph.ok_or(ModelError::MissingGraph)?;
        if config.scenario.clears_interventions() {
            graph.clear_interventions();
        }

        // Fixed pairs must reference existing, distinct nodes.
        for &(o, d) in &config.origin_destination_pairs {
            if o == d || o.index() >= graph.node_count() || d.index() >= graph.node_count() {
                return Err(ModelError::BadOdPair(o, d));
            }
        }

        let sampler = if config.origin_destination_pairs.is_empty() {
            Some(PointSampler::new(&graph)?)
        } else {
            None
        };

        let mut loads = EdgeLoads::for_graph(&graph);
        let compliance = ComplianceModel::new(config.scenario, config.density_weight);
        let master = MasterRng::new(config.seed);

        let mut agents = Vec::with_capacity(config.agents);
        for i in 0..config.agents {
            let mut agent = Pedestrian::spawn(AgentId(i as u32), &config, &master);
            agent.begin_route(&graph, sampler.as_ref(), &config, &mut loads)?;
            agents.push(agent);
        }

        Ok(Model::new(config, graph, loads, agents, compliance, sampler))
    }
}
