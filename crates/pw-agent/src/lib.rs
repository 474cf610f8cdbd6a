//! `pw-agent` — the pedestrian agent state machine.
//!
//! A [`Pedestrian`] owns everything that belongs to one simulated walker:
//! its private RNG streams, regression weights, walking speed, the current
//! route (a spliced node path plus exact partial first/last legs), route
//! bookkeeping, and its transient blocked-edge set for alternate-path
//! searches.
//!
//! The agent is *driven* — it holds no reference to shared state.  The
//! scheduler in `pw-sim` passes the street graph and the counter table into
//! each phase call, which keeps ownership flat and the borrow story trivial:
//!
//! | Phase call                | Mutates                         |
//! |---------------------------|---------------------------------|
//! | [`Pedestrian::reset_outcome`]    | agent                     |
//! | [`Pedestrian::decide_at_node`]   | agent (path swap)         |
//! | [`Pedestrian::start_next_leg`]   | agent + edge counters     |
//! | [`Pedestrian::walk`]             | agent + edge counters     |
//! | [`Pedestrian::finish_route`]     | agent (+ counters when recycling) |

pub mod agent;
pub mod record;
pub mod route;

mod error;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Pedestrian, RouteSummary};
pub use error::{AgentError, AgentResult};
pub use record::PositionRecord;
pub use route::{RoutePlan, StartState, plan_between_nodes, plan_between_points};
