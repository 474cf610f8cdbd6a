//! Random origin/destination sampling on the street network.
//!
//! Points are drawn *on edges*: an edge is chosen with probability
//! proportional to its length, then a uniform offset along it.  The sampled
//! point carries everything route assembly needs — the nearer and farther
//! ("remote") endpoint and both offset distances — so it can be spliced into
//! a node path exactly (see [`crate::path`]).

use log::warn;
use thiserror::Error;

use pw_core::{AgentRng, EdgeId, NodeId, Point2};

use crate::StreetGraph;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("graph has no edges with positive length")]
    NoEdges,

    /// Not even one candidate pair on distinct edges was found within the
    /// attempt budget — the graph is degenerate (e.g. a single street).
    #[error("no viable origin/destination pair after {attempts} attempts")]
    NoViablePair { attempts: u32 },
}

// ── SampledPoint ──────────────────────────────────────────────────────────────

/// A random point on a street edge, with the node context needed to splice
/// it into a path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampledPoint {
    pub edge: EdgeId,
    pub point: Point2,
    /// The closer edge endpoint.
    pub nearer: NodeId,
    /// The farther edge endpoint.
    pub remote: NodeId,
    /// Distance along the edge from `nearer` to the point.
    pub dist_from_nearer: f64,
    /// Distance along the edge from `remote` to the point.
    pub dist_from_remote: f64,
}

impl SampledPoint {
    /// Offset from `node` to the point, if `node` is an endpoint of the
    /// sampled edge.
    pub fn leg_from(&self, node: NodeId) -> Option<f64> {
        if node == self.nearer {
            Some(self.dist_from_nearer)
        } else if node == self.remote {
            Some(self.dist_from_remote)
        } else {
            None
        }
    }

    /// The endpoint opposite `node`, if `node` is an endpoint.
    pub fn other_endpoint(&self, node: NodeId) -> Option<NodeId> {
        if node == self.nearer {
            Some(self.remote)
        } else if node == self.remote {
            Some(self.nearer)
        } else {
            None
        }
    }
}

// ── PointSampler ──────────────────────────────────────────────────────────────

/// Length-weighted edge sampler with a precomputed cumulative table.
pub struct PointSampler {
    edges: Vec<EdgeId>,
    /// `cumulative[i]` = total length of `edges[..=i]`.
    cumulative: Vec<f64>,
    total: f64,
}

impl PointSampler {
    /// Index every positive-length edge of `graph`.
    pub fn new(graph: &StreetGraph) -> Result<Self, SampleError> {
        let mut edges = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0;
        for (id, e) in graph.edges() {
            if e.length > 0.0 {
                total += e.length;
                edges.push(id);
                cumulative.push(total);
            }
        }
        if edges.is_empty() {
            return Err(SampleError::NoEdges);
        }
        Ok(Self {
            edges,
            cumulative,
            total,
        })
    }

    /// Draw a point: edge ∝ length, offset ~ U(0, length).
    pub fn sample_point(&self, graph: &StreetGraph, rng: &mut AgentRng) -> SampledPoint {
        let u = rng.uniform() * self.total;
        let idx = self.cumulative.partition_point(|&c| c < u);
        let edge = self.edges[idx.min(self.edges.len() - 1)];

        let e = graph.edge(edge);
        let offset = rng.gen_range(0.0..e.length);
        let point = e.geometry.point_at(offset);

        let (nearer, remote, dist_from_nearer, dist_from_remote) = if offset <= e.length / 2.0 {
            (e.a, e.b, offset, e.length - offset)
        } else {
            (e.b, e.a, e.length - offset, offset)
        };

        SampledPoint {
            edge,
            point,
            nearer,
            remote,
            dist_from_nearer,
            dist_from_remote,
        }
    }

    /// Draw an origin/destination pair at least `min_dist` apart (Euclidean)
    /// and on distinct edges.
    ///
    /// The origin is drawn once; the destination is resampled.  The retry
    /// loop is bounded: past `max_attempts` the farthest viable candidate is
    /// accepted with a warning rather than spinning forever on a graph where
    /// the separation is unreachable.
    pub fn sample_pair(
        &self,
        graph: &StreetGraph,
        rng: &mut AgentRng,
        min_dist: f64,
        max_attempts: u32,
    ) -> Result<(SampledPoint, SampledPoint), SampleError> {
        let orig = self.sample_point(graph, rng);
        let dest = self.sample_destination(graph, rng, &orig, min_dist, max_attempts)?;
        Ok((orig, dest))
    }

    /// Draw a destination for an existing origin, same constraints as
    /// [`sample_pair`].  Used when the previous destination is reused as the
    /// next origin.
    pub fn sample_destination(
        &self,
        graph: &StreetGraph,
        rng: &mut AgentRng,
        orig: &SampledPoint,
        min_dist: f64,
        max_attempts: u32,
    ) -> Result<SampledPoint, SampleError> {
        let mut best: Option<(f64, SampledPoint)> = None;
        for _ in 0..max_attempts {
            let cand = self.sample_point(graph, rng);
            if cand.edge == orig.edge {
                continue;
            }
            let d = orig.point.distance(cand.point);
            if d >= min_dist {
                return Ok(cand);
            }
            if best.as_ref().is_none_or(|(bd, _)| d > *bd) {
                best = Some((d, cand));
            }
        }
        match best {
            Some((d, cand)) => {
                warn!(
                    "origin/destination separation {min_dist} m unreachable after \
                     {max_attempts} attempts; accepting pair {d:.1} m apart"
                );
                Ok(cand)
            }
            None => Err(SampleError::NoViablePair {
                attempts: max_attempts,
            }),
        }
    }
}
