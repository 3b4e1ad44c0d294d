//! Mesh snapshot extraction.
//!
//! Converts a host [`MeshSource`] into an immutable [`MeshSnapshot`] with dense
//! ids and validated connectivity. Malformed faces and edges are dropped and
//! counted instead of failing the whole extraction, so a partially broken
//! mesh still produces a partial overlay.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{MeshLensError, Result};
use crate::source::MeshSource;

/// Counts of source elements that extraction had to repair or drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarnings {
    /// Faces dropped for referencing missing vertices or having fewer than 3 corners.
    pub dropped_faces: usize,
    /// Face corners removed as repeats (`a, a`) or backtracks (`a, b, a`).
    pub collapsed_corners: usize,
    /// Authored edges dropped for missing or identical endpoints.
    pub dropped_edges: usize,
    /// Duplicate authored edges merged into an earlier one.
    pub merged_edges: usize,
}

impl ExtractionWarnings {
    /// Total number of warnings.
    pub fn total(&self) -> usize {
        self.dropped_faces + self.collapsed_corners + self.dropped_edges + self.merged_edges
    }

    /// Returns true if extraction was clean.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// An authored edge after validation. Endpoints are stored sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEdge {
    /// Endpoint vertex ids, `vertices[0] < vertices[1]`.
    pub vertices: [u32; 2],
    /// Authored sharp flag.
    pub sharp: bool,
    /// Authored seam flag.
    pub seam: bool,
}

/// Immutable, analysis-ready copy of a host mesh.
#[derive(Debug, Clone)]
pub struct MeshSnapshot {
    name: String,
    vertices: Vec<Vec3>,
    edges: Vec<SnapshotEdge>,
    faces: Vec<Vec<u32>>,
    transform: Mat4,
    warnings: ExtractionWarnings,
}

impl MeshSnapshot {
    /// Returns the source object's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the vertex positions (local space).
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Returns the validated authored edges.
    pub fn edges(&self) -> &[SnapshotEdge] {
        &self.edges
    }

    /// Returns the validated face loops.
    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    /// Returns the object-to-world transform captured at extraction.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Returns what extraction had to repair.
    pub fn warnings(&self) -> ExtractionWarnings {
        self.warnings
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

/// Extracts a snapshot from a host mesh.
///
/// Fails with [`MeshLensError::EmptyMesh`] if the mesh has no vertices and
/// with [`MeshLensError::Extraction`] if a position is not finite.
pub fn extract(source: &dyn MeshSource) -> Result<MeshSnapshot> {
    let name = source.name().to_string();
    let positions = source.positions();

    if positions.is_empty() {
        return Err(MeshLensError::EmptyMesh(name));
    }
    if let Some(bad) = positions.iter().position(|p| !p.is_finite()) {
        return Err(MeshLensError::Extraction(format!(
            "vertex {bad} of '{name}' has a non-finite position"
        )));
    }
    let num_vertices = u32::try_from(positions.len()).map_err(|_| {
        MeshLensError::Extraction(format!(
            "'{name}' has {} vertices, more than 32-bit ids allow",
            positions.len()
        ))
    })?;

    let mut warnings = ExtractionWarnings::default();

    // Authored edges: validate, sort endpoints, merge duplicates
    let mut edges: Vec<SnapshotEdge> = Vec::with_capacity(source.edges().len());
    let mut edge_lookup: HashMap<[u32; 2], usize> = HashMap::new();
    for edge in source.edges() {
        let [a, b] = edge.vertices;
        if a >= num_vertices || b >= num_vertices || a == b {
            warnings.dropped_edges += 1;
            continue;
        }
        let key = if a < b { [a, b] } else { [b, a] };
        if let Some(&idx) = edge_lookup.get(&key) {
            let merged: &mut SnapshotEdge = &mut edges[idx];
            merged.sharp |= edge.sharp;
            merged.seam |= edge.seam;
            warnings.merged_edges += 1;
        } else {
            edge_lookup.insert(key, edges.len());
            edges.push(SnapshotEdge {
                vertices: key,
                sharp: edge.sharp,
                seam: edge.seam,
            });
        }
    }

    // Face loops: drop out-of-range, collapse repeats and backtracks
    let mut faces: Vec<Vec<u32>> = Vec::with_capacity(source.face_loops().len());
    for face in source.face_loops() {
        if face.iter().any(|&v| v >= num_vertices) {
            warnings.dropped_faces += 1;
            continue;
        }

        let corners = simplify_loop(face);
        warnings.collapsed_corners += face.len() - corners.len();

        if corners.len() < 3 {
            warnings.dropped_faces += 1;
            continue;
        }
        faces.push(corners);
    }

    if !warnings.is_empty() {
        log::warn!(
            "'{}': dropped {} faces and {} edges, collapsed {} corners, merged {} edges",
            name,
            warnings.dropped_faces,
            warnings.dropped_edges,
            warnings.collapsed_corners,
            warnings.merged_edges
        );
    }

    Ok(MeshSnapshot {
        name,
        vertices: positions.to_vec(),
        edges,
        faces,
        transform: source.transform(),
        warnings,
    })
}

/// Removes repeated corners (`a, a`) and backtracks (`a, b, a`) from a face
/// loop, including ones that wrap around its start.
fn simplify_loop(face: &[u32]) -> Vec<u32> {
    let mut corners: Vec<u32> = Vec::with_capacity(face.len());
    for &v in face {
        let n = corners.len();
        if n >= 1 && corners[n - 1] == v {
            continue;
        }
        if n >= 2 && corners[n - 2] == v {
            corners.pop();
            continue;
        }
        corners.push(v);
    }

    loop {
        let n = corners.len();
        if n < 3 {
            if n == 2 && corners[0] == corners[1] {
                corners.pop();
            }
            break;
        }
        if corners[n - 1] == corners[0] || corners[n - 2] == corners[0] {
            corners.pop();
        } else if corners[n - 1] == corners[1] {
            corners.remove(0);
        } else {
            break;
        }
    }
    corners
}

/// Cheap summary of a mesh's content, used to tell whether a cached
/// analysis is out of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometrySignature {
    /// Number of vertices.
    pub vertices: usize,
    /// Number of authored edges.
    pub edges: usize,
    /// Number of face loops.
    pub faces: usize,
    /// Hash over positions, loops and edge attributes.
    pub fingerprint: u64,
}

impl GeometrySignature {
    /// Computes the signature of a host mesh without extracting it.
    pub fn of(source: &dyn MeshSource) -> Self {
        let mut hasher = DefaultHasher::new();
        for p in source.positions() {
            p.to_array().map(f32::to_bits).hash(&mut hasher);
        }
        for face in source.face_loops() {
            face.hash(&mut hasher);
        }
        for edge in source.edges() {
            (edge.vertices, edge.sharp, edge.seam).hash(&mut hasher);
        }

        Self {
            vertices: source.positions().len(),
            edges: source.edges().len(),
            faces: source.face_loops().len(),
            fingerprint: hasher.finish(),
        }
    }
}
