//! Wireframe edge extraction.

use std::collections::HashSet;

/// Collects the unique edges of a triangle list.
///
/// Edges are normalized to `[low, high]` and emitted in first-occurrence
/// order, so an edge shared by two triangles appears exactly once.
pub fn unique_edges(triangles: &[[u32; 3]]) -> Vec<[u32; 2]> {
    let mut seen: HashSet<[u32; 2]> = HashSet::with_capacity(triangles.len() * 3 / 2 + 1);
    let mut edges = Vec::with_capacity(seen.capacity());

    for &[a, b, c] in triangles {
        for (p, q) in [(a, b), (b, c), (c, a)] {
            let edge = [p.min(q), p.max(q)];
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }

    edges
}
