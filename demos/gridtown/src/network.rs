//! Synthetic street grid for the demo.

use pw_core::{EdgeId, NodeId, Point2};
use pw_graph::{StreetGraph, StreetGraphBuilder};

/// Build a 5×5 block grid (120 m blocks) with narrow sidewalks on the inner
/// streets and a handful of one-way designations on the central east–west
/// corridor.
///
/// Returns the graph and the edges carrying a one-way restriction, so the
/// caller can report on them.
pub fn build_grid() -> (StreetGraph, Vec<EdgeId>) {
    const N: usize = 5;
    const BLOCK: f64 = 120.0;

    let mut b = StreetGraphBuilder::new();

    let mut nodes = Vec::with_capacity(N * N);
    for row in 0..N {
        for col in 0..N {
            nodes.push(b.add_node(Point2::new(col as f64 * BLOCK, row as f64 * BLOCK)));
        }
    }
    let at = |row: usize, col: usize| -> NodeId { nodes[row * N + col] };

    // Wider sidewalks on the boundary ring, narrow inside.
    let width = |row: usize, col: usize, row2: usize, col2: usize| -> f64 {
        let boundary = row == 0 && row2 == 0
            || row == N - 1 && row2 == N - 1
            || col == 0 && col2 == 0
            || col == N - 1 && col2 == N - 1;
        if boundary { 3.0 } else { 1.5 }
    };

    let mut one_way = Vec::new();
    for row in 0..N {
        for col in 0..N {
            // East-west streets.
            if col + 1 < N {
                let e = b.add_street(at(row, col), at(row, col + 1), width(row, col, row, col + 1));
                // Central corridor: eastbound only (westbound entry is the
                // restricted direction).
                if row == N / 2 {
                    b.set_one_way(e, true, false);
                    one_way.push(e);
                }
            }
            // North-south streets.
            if row + 1 < N {
                b.add_street(at(row, col), at(row + 1, col), width(row, col, row + 1, col));
            }
        }
    }

    (b.build(), one_way)
}
