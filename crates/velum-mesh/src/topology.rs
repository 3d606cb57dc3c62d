//! Mesh topology queries.
//!
//! Builds the de-duplicated undirected edge set from the triangle index
//! buffer. The spring network derives one spring per unique edge, so the
//! canonical ordering here (smaller vertex index first) is load-bearing:
//! it guarantees each physical edge appears exactly once no matter how
//! many triangles share it or in which winding.

use std::collections::BTreeSet;

use crate::mesh::TriangleMesh;

/// Precomputed topology information for a triangle mesh.
///
/// Built once when a mesh is loaded; the edge set is immutable afterward
/// (no topology change after solver setup).
#[derive(Debug, Clone)]
pub struct Topology {
    /// Unique undirected edges as `[v_min, v_max]` pairs, sorted.
    pub edges: Vec<[u32; 2]>,
}

impl Topology {
    /// Build topology from a triangle mesh.
    pub fn build(mesh: &TriangleMesh) -> Self {
        // BTreeSet both de-duplicates and leaves the edges in a stable,
        // deterministic order.
        let mut edge_set: BTreeSet<(u32, u32)> = BTreeSet::new();

        for t in 0..mesh.triangle_count() {
            let [a, b, c] = mesh.triangle(t);
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                edge_set.insert(key);
            }
        }

        let edges = edge_set.into_iter().map(|(a, b)| [a, b]).collect();
        Self { edges }
    }

    /// Returns the number of unique edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
