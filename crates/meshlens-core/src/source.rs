//! Host mesh abstraction.
//!
//! A [`MeshSource`] is whatever the host application hands the engine at
//! refresh time. The engine only reads from it.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// An edge authored on the host mesh, carrying its sharp/seam attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredEdge {
    /// The two endpoint vertex indices (unordered).
    pub vertices: [u32; 2],
    /// Whether the edge is marked sharp.
    pub sharp: bool,
    /// Whether the edge is marked as a UV seam.
    pub seam: bool,
}

impl AuthoredEdge {
    /// Creates an authored edge without any flags.
    pub fn new(a: u32, b: u32) -> Self {
        Self {
            vertices: [a, b],
            sharp: false,
            seam: false,
        }
    }

    /// Marks the edge sharp.
    #[must_use]
    pub fn sharp(mut self) -> Self {
        self.sharp = true;
        self
    }

    /// Marks the edge as a seam.
    #[must_use]
    pub fn seam(mut self) -> Self {
        self.seam = true;
        self
    }
}

/// A host mesh object that can be analyzed.
///
/// Implementors expose geometry in the object's local space; [`transform`]
/// maps it to world space for overlay output.
///
/// [`transform`]: MeshSource::transform
pub trait MeshSource {
    /// Identity of the object, stable for its lifetime. Used as the cache key.
    fn name(&self) -> &str;

    /// Vertex positions in local space.
    fn positions(&self) -> &[Vec3];

    /// Polygon vertex loops.
    fn face_loops(&self) -> &[Vec<u32>];

    /// Explicitly stored edges with their authored attributes.
    ///
    /// Edges implied by face loops do not need to be listed.
    fn edges(&self) -> &[AuthoredEdge] {
        &[]
    }

    /// Object-to-world transform.
    fn transform(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}

/// An owned, in-memory mesh object.
#[derive(Debug, Clone)]
pub struct MeshData {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Vec<u32>>,
    edges: Vec<AuthoredEdge>,
    transform: Mat4,
}

impl MeshData {
    /// Creates a mesh from vertices and polygon faces.
    ///
    /// Each face is a variable-length list of vertex indices forming a polygon.
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        Self {
            name: name.into(),
            vertices,
            faces,
            edges: Vec::new(),
            transform: Mat4::IDENTITY,
        }
    }

    /// Creates a mesh from triangles (convenience method).
    pub fn from_triangles(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        let faces: Vec<Vec<u32>> = triangles.into_iter().map(|t| t.to_vec()).collect();
        Self::new(name, vertices, faces)
    }

    /// Adds authored edges.
    #[must_use]
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = AuthoredEdge>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Sets the object-to-world transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    /// Sets the sharp/seam flags of the edge between `a` and `b`, authoring it if needed.
    pub fn set_edge_flags(&mut self, a: u32, b: u32, sharp: bool, seam: bool) {
        let key = if a < b { [a, b] } else { [b, a] };
        let existing = self.edges.iter_mut().find(|e| {
            let [x, y] = e.vertices;
            (if x < y { [x, y] } else { [y, x] }) == key
        });
        match existing {
            Some(edge) => {
                edge.sharp = sharp;
                edge.seam = seam;
            }
            None => self.edges.push(AuthoredEdge {
                vertices: [a, b],
                sharp,
                seam,
            }),
        }
    }

    /// Replaces the vertex positions.
    pub fn update_vertices(&mut self, vertices: Vec<Vec3>) {
        self.vertices = vertices;
    }

    /// Replaces the face loops.
    pub fn update_faces(&mut self, faces: Vec<Vec<u32>>) {
        self.faces = faces;
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }
}

impl MeshSource for MeshData {
    fn name(&self) -> &str {
        &self.name
    }

    fn positions(&self) -> &[Vec3] {
        &self.vertices
    }

    fn face_loops(&self) -> &[Vec<u32>] {
        &self.faces
    }

    fn edges(&self) -> &[AuthoredEdge] {
        &self.edges
    }

    fn transform(&self) -> Mat4 {
        self.transform
    }
}
