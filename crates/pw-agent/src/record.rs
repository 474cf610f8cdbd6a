//! Per-tick position records.

use pw_behavior::OutcomeFlags;
use pw_core::{AgentId, NodeId, Point2};

use crate::Pedestrian;

/// One agent's state at one tick, as handed to the reporting layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionRecord {
    pub tick: u64,
    pub agent: AgentId,
    pub route: u32,
    pub position: Point2,
    pub latest_node: NodeId,
    /// At most one flag set; all clear between decisions.
    pub flags: OutcomeFlags,
}

impl Pedestrian {
    /// Snapshot this agent for the reporting layer.
    pub fn position_record(&self, tick: u64) -> PositionRecord {
        PositionRecord {
            tick,
            agent: self.id,
            route: self.route_counter,
            position: self.position,
            latest_node: self.latest_node,
            flags: self.outcome.map(|o| o.flags()).unwrap_or_default(),
        }
    }
}
