//! Staged per-edge pedestrian counters and density.
//!
//! # Staged-commit discipline
//!
//! During a tick, agents never touch the settled count.  Entering an edge
//! bumps `temp_increase` (and the monotonic `ppl_total`); leaving bumps
//! `temp_decrease`.  Decision-making reads the `density` computed at the
//! previous tick boundary, so outcomes cannot depend on the order agents are
//! processed within a tick.
//!
//! At the tick boundary [`EdgeLoads::fold_tick`] commits the stage:
//!
//! 1. `density ← (ppl_count + temp_increase) / (length × width)` — everyone
//!    who was on the edge at any point during the tick counts, including a
//!    pedestrian who entered and left within the same tick.
//! 2. `max_density ← max(max_density, density)`.
//! 3. `ppl_count ← ppl_count + temp_increase − temp_decrease`; both stages
//!    reset to zero.
//!
//! Callers must only decrement an edge they previously incremented; the fold
//! debug-asserts that the settled count never goes negative.

use pw_core::EdgeId;

use crate::StreetGraph;

/// Mutable per-edge counter table, indexed by `EdgeId`.
pub struct EdgeLoads {
    /// Settled pedestrian count as of the last tick boundary.
    ppl_count: Vec<u32>,
    /// Entries accrued during the current tick.
    temp_increase: Vec<u32>,
    /// Exits accrued during the current tick.
    temp_decrease: Vec<u32>,
    /// Monotonic total throughput (never decremented).
    ppl_total: Vec<u64>,
    /// Density as of the last tick boundary, in pedestrians / m².
    density: Vec<f64>,
    /// Running maximum of `density` over the run.
    max_density: Vec<f64>,
}

impl EdgeLoads {
    /// All-zero counters for every edge of `graph`.
    pub fn for_graph(graph: &StreetGraph) -> Self {
        let n = graph.edge_count();
        Self {
            ppl_count: vec![0; n],
            temp_increase: vec![0; n],
            temp_decrease: vec![0; n],
            ppl_total: vec![0; n],
            density: vec![0.0; n],
            max_density: vec![0.0; n],
        }
    }

    // ── Staged mutation ───────────────────────────────────────────────────

    /// Record `amount` pedestrians entering `edge` this tick.
    pub fn increase(&mut self, edge: EdgeId, amount: u32) {
        self.temp_increase[edge.index()] += amount;
        self.ppl_total[edge.index()] += amount as u64;
    }

    /// Record `amount` pedestrians leaving `edge` this tick.
    ///
    /// Caller contract: only decrement what was previously incremented.
    pub fn decrease(&mut self, edge: EdgeId, amount: u32) {
        self.temp_decrease[edge.index()] += amount;
    }

    // ── Tick boundary ─────────────────────────────────────────────────────

    /// Commit the staged counts and recompute densities; see module docs.
    pub fn fold_tick(&mut self, graph: &StreetGraph) {
        for i in 0..self.ppl_count.len() {
            let present = self.ppl_count[i] + self.temp_increase[i];
            let e = graph.edge(EdgeId(i as u32));
            let area = e.length * e.width;
            let density = if area > 0.0 { present as f64 / area } else { 0.0 };
            self.density[i] = density;
            if density > self.max_density[i] {
                self.max_density[i] = density;
            }

            debug_assert!(
                self.temp_decrease[i] <= present,
                "edge {i}: more exits ({}) than pedestrians present ({present})",
                self.temp_decrease[i],
            );
            self.ppl_count[i] = present.saturating_sub(self.temp_decrease[i]);
            self.temp_increase[i] = 0;
            self.temp_decrease[i] = 0;
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    /// Settled count as of the last tick boundary.
    #[inline]
    pub fn ppl_count(&self, edge: EdgeId) -> u32 {
        self.ppl_count[edge.index()]
    }

    #[inline]
    pub fn ppl_total(&self, edge: EdgeId) -> u64 {
        self.ppl_total[edge.index()]
    }

    /// Density as of the last tick boundary (the decision-model input).
    #[inline]
    pub fn density(&self, edge: EdgeId) -> f64 {
        self.density[edge.index()]
    }

    #[inline]
    pub fn max_density(&self, edge: EdgeId) -> f64 {
        self.max_density[edge.index()]
    }

    /// Per-edge density snapshot, indexed by `EdgeId`.
    pub fn densities(&self) -> &[f64] {
        &self.density
    }

    /// Per-edge maximum densities over the run so far, indexed by `EdgeId`.
    pub fn max_densities(&self) -> &[f64] {
        &self.max_density
    }
}
