//! Topology indexing.
//!
//! Builds the adjacency tables the classifiers query: vertex to edges,
//! vertex to faces, edge to faces and face to edges. Edges are discovered
//! from face loops as well as from the snapshot's authored edges, so meshes
//! that only store polygons still get a full edge set.

use std::collections::HashMap;

use crate::snapshot::MeshSnapshot;

/// An indexed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopoEdge {
    /// Endpoint vertex ids, `vertices[0] < vertices[1]`.
    pub vertices: [u32; 2],
    /// Authored sharp flag (false for edges implied by faces).
    pub sharp: bool,
    /// Authored seam flag (false for edges implied by faces).
    pub seam: bool,
}

impl TopoEdge {
    /// Returns the endpoint opposite `v`.
    pub fn other(&self, v: u32) -> u32 {
        if self.vertices[0] == v {
            self.vertices[1]
        } else {
            self.vertices[0]
        }
    }
}

/// Adjacency tables for one snapshot.
///
/// Edge ids are assigned in a fixed order: authored edges first, in snapshot
/// order, then face-implied edges in order of first appearance while walking
/// the faces. Indexing the same snapshot twice gives the same ids.
#[derive(Debug, Clone)]
pub struct MeshTopology {
    edges: Vec<TopoEdge>,
    /// Edge id -> one entry per (face, edge) incidence.
    edge_faces: Vec<Vec<u32>>,
    /// Face id -> edge ids in loop order (edge `i` joins corners `i` and `i + 1`).
    face_edges: Vec<Vec<u32>>,
    vertex_edges: Vec<Vec<u32>>,
    vertex_faces: Vec<Vec<u32>>,
}

/// Normalize edge direction so v0 < v1.
#[inline]
fn edge_key(v0: u32, v1: u32) -> [u32; 2] {
    if v0 < v1 {
        [v0, v1]
    } else {
        [v1, v0]
    }
}

impl MeshTopology {
    /// Indexes a snapshot in a single pass over its faces.
    pub fn build(snapshot: &MeshSnapshot) -> Self {
        let num_vertices = snapshot.num_vertices();
        let mut edges: Vec<TopoEdge> = Vec::with_capacity(snapshot.edges().len());
        let mut edge_faces: Vec<Vec<u32>> = Vec::with_capacity(snapshot.edges().len());
        let mut lookup: HashMap<[u32; 2], u32> = HashMap::new();

        for edge in snapshot.edges() {
            lookup.insert(edge.vertices, edges.len() as u32);
            edges.push(TopoEdge {
                vertices: edge.vertices,
                sharp: edge.sharp,
                seam: edge.seam,
            });
            edge_faces.push(Vec::new());
        }

        let mut face_edges: Vec<Vec<u32>> = Vec::with_capacity(snapshot.num_faces());
        let mut vertex_faces: Vec<Vec<u32>> = vec![Vec::new(); num_vertices];

        for (face_idx, face) in snapshot.faces().iter().enumerate() {
            let face_id = face_idx as u32;
            let n = face.len();
            let mut loop_edges = Vec::with_capacity(n);

            for i in 0..n {
                let key = edge_key(face[i], face[(i + 1) % n]);
                let edge_id = *lookup.entry(key).or_insert_with(|| {
                    edges.push(TopoEdge {
                        vertices: key,
                        sharp: false,
                        seam: false,
                    });
                    edge_faces.push(Vec::new());
                    (edges.len() - 1) as u32
                });
                edge_faces[edge_id as usize].push(face_id);
                loop_edges.push(edge_id);

                // A vertex repeated in a loop is still one incidence; faces are
                // walked in id order, so a repeat can only be the last entry
                let incident = &mut vertex_faces[face[i] as usize];
                if incident.last() != Some(&face_id) {
                    incident.push(face_id);
                }
            }
            face_edges.push(loop_edges);
        }

        let mut vertex_edges: Vec<Vec<u32>> = vec![Vec::new(); num_vertices];
        for (edge_id, edge) in edges.iter().enumerate() {
            for v in edge.vertices {
                vertex_edges[v as usize].push(edge_id as u32);
            }
        }

        log::debug!(
            "indexed '{}': {} vertices, {} edges, {} faces",
            snapshot.name(),
            num_vertices,
            edges.len(),
            face_edges.len()
        );

        Self {
            edges,
            edge_faces,
            face_edges,
            vertex_edges,
            vertex_faces,
        }
    }

    /// Returns the number of indexed vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertex_edges.len()
    }

    /// Returns the number of edges, authored and implied.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of faces.
    pub fn num_faces(&self) -> usize {
        self.face_edges.len()
    }

    /// Returns all edges.
    pub fn edges(&self) -> &[TopoEdge] {
        &self.edges
    }

    /// Returns the edge with the given id.
    pub fn edge(&self, edge: u32) -> &TopoEdge {
        &self.edges[edge as usize]
    }

    /// Looks up the edge joining two vertices.
    pub fn find_edge(&self, a: u32, b: u32) -> Option<u32> {
        let key = edge_key(a, b);
        self.vertex_edges
            .get(a as usize)?
            .iter()
            .copied()
            .find(|&e| self.edges[e as usize].vertices == key)
    }

    /// Faces using an edge, one entry per use.
    pub fn faces_for_edge(&self, edge: u32) -> &[u32] {
        &self.edge_faces[edge as usize]
    }

    /// Number of (face, edge) incidences on an edge.
    pub fn face_count(&self, edge: u32) -> usize {
        self.edge_faces[edge as usize].len()
    }

    /// Edges of a face in loop order.
    pub fn edges_for_face(&self, face: u32) -> &[u32] {
        &self.face_edges[face as usize]
    }

    /// Edges incident to a vertex.
    pub fn edges_for_vertex(&self, v: u32) -> &[u32] {
        &self.vertex_edges[v as usize]
    }

    /// Faces incident to a vertex, each listed once, ascending.
    pub fn faces_for_vertex(&self, v: u32) -> &[u32] {
        &self.vertex_faces[v as usize]
    }

    /// Total number of (face, edge) incidences.
    pub fn num_incidences(&self) -> usize {
        self.face_edges.iter().map(Vec::len).sum()
    }
}
