//! Vertex classification: isolated / non-manifold / regular, plus pole class.

use crate::category::{PoleClass, VertexManifold, VertexTags};
use crate::topology::MeshTopology;

/// How the vertex manifold test is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ManifoldTest {
    /// Walk incident faces across shared edges; all must be reachable.
    FanWalk,
    /// Only look at incident edge face counts.
    EdgeCounts,
}

/// Classifies one vertex.
pub(crate) fn classify_vertex(topology: &MeshTopology, v: u32, test: ManifoldTest) -> VertexTags {
    let edges = topology.edges_for_vertex(v);
    let pole = PoleClass::from_edge_count(edges.len());

    let manifold = if edges.is_empty() {
        VertexManifold::Isolated
    } else if edges.iter().any(|&e| topology.face_count(e) == 0) {
        // Dangling wire edge
        VertexManifold::NonManifold
    } else {
        let manifold = match test {
            ManifoldTest::FanWalk => is_single_fan(topology, v),
            ManifoldTest::EdgeCounts => edges.iter().all(|&e| topology.face_count(e) <= 2),
        };
        if manifold {
            VertexManifold::Regular
        } else {
            VertexManifold::NonManifold
        }
    };

    VertexTags { manifold, pole }
}

/// Returns true if every face around `v` can be reached from the first one
/// by stepping across edges that contain `v`.
fn is_single_fan(topology: &MeshTopology, v: u32) -> bool {
    let faces = topology.faces_for_vertex(v);
    if faces.len() <= 1 {
        return true;
    }

    let mut visited = vec![false; faces.len()];
    let mut stack = vec![0usize];
    visited[0] = true;
    let mut reached = 1;

    while let Some(local) = stack.pop() {
        for &e in topology.edges_for_face(faces[local]) {
            if !topology.edge(e).vertices.contains(&v) {
                continue;
            }
            for &neighbor in topology.faces_for_edge(e) {
                // Incident faces are stored ascending
                let Ok(idx) = faces.binary_search(&neighbor) else {
                    continue;
                };
                if !visited[idx] {
                    visited[idx] = true;
                    reached += 1;
                    stack.push(idx);
                }
            }
        }
    }

    reached == faces.len()
}
