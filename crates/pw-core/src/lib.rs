//! `pw-core` — foundational types for the `pedway` pedestrian street ABM.
//!
//! This crate is a dependency of every other `pw-*` crate.  It intentionally
//! has no `pw-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `NodeId`, `EdgeId`                         |
//! | [`geom`]    | `Point2`, `Polyline` (projected-metre geometry)       |
//! | [`rng`]     | `MasterRng`, per-agent `AgentRng` streams             |
//! | [`config`]  | `Scenario`, `ModelConfig`, distribution parameters    |
//! | [`error`]   | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod config;
pub mod error;
pub mod geom;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ModelConfig, NormalParams, Scenario};
pub use error::{CoreError, CoreResult};
pub use geom::{Point2, Polyline};
pub use ids::{AgentId, EdgeId, NodeId};
pub use rng::{AgentRng, MasterRng, RngStream};
