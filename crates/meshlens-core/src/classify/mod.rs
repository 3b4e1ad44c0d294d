//! Classification passes.
//!
//! Three independent, stateless passes (vertices, edges, faces) read the
//! indexed topology and snapshot geometry and produce tags. Aggregate
//! statistics are accumulated in the same pass.

mod edge;
mod face;
mod vertex;

use std::time::Instant;

use crate::category::{
    Category, EdgeFlags, EdgeManifold, FaceFlags, FaceShape, PoleClass, VertexManifold,
};
use crate::error::{MeshLensError, Result};
use crate::options::AnalysisOptions;
use crate::result::{
    ClassificationResult, DegradedPasses, Statistics, TaggedEdge, TaggedFace, TaggedVertex,
};
use crate::snapshot::{extract, MeshSnapshot};
use crate::source::MeshSource;
use crate::topology::MeshTopology;

pub(crate) use face::{centroid, newell_normal};
use vertex::ManifoldTest;

/// Runs the full pipeline on a host mesh: extract, index, classify.
pub fn analyze(source: &dyn MeshSource, options: &AnalysisOptions) -> Result<ClassificationResult> {
    let start = Instant::now();
    let snapshot = extract(source)?;
    let topology = MeshTopology::build(&snapshot);
    let result = classify(&snapshot, &topology, options)?;
    log::debug!(
        "analyzed '{}' in {:.2?} ({} vertices, {} edges, {} faces)",
        result.name(),
        start.elapsed(),
        result.vertices().len(),
        result.edges().len(),
        result.faces().len()
    );
    Ok(result)
}

/// Classifies every element of an indexed snapshot.
///
/// Fails with [`MeshLensError::Inconsistent`] if the topology does not match
/// the snapshot it was built from.
pub fn classify(
    snapshot: &MeshSnapshot,
    topology: &MeshTopology,
    options: &AnalysisOptions,
) -> Result<ClassificationResult> {
    check_consistency(snapshot, topology)?;

    let degraded = degraded_passes(topology, options);
    if !degraded.is_empty() {
        log::debug!(
            "'{}' exceeds the element limit, running {:?} in degraded mode",
            snapshot.name(),
            degraded
        );
    }
    let manifold_test = if degraded.contains(DegradedPasses::FAN_CONNECTIVITY) {
        ManifoldTest::EdgeCounts
    } else {
        ManifoldTest::FanWalk
    };
    let test_planarity = !degraded.contains(DegradedPasses::PLANARITY);

    let mut stats = Statistics::default();
    let positions = snapshot.vertices();

    let vertices: Vec<TaggedVertex> = (0..topology.num_vertices() as u32)
        .map(|v| {
            let tags = vertex::classify_vertex(topology, v, manifold_test);
            stats.record(match tags.manifold {
                VertexManifold::Isolated => Category::Isolated,
                VertexManifold::NonManifold => Category::NonManifoldVertex,
                VertexManifold::Regular => Category::Regular,
            });
            match tags.pole {
                PoleClass::NPole => stats.record(Category::NPole),
                PoleClass::EPole => stats.record(Category::EPole),
                PoleClass::HighPole => stats.record(Category::HighPole),
                PoleClass::None => {}
            }
            TaggedVertex {
                position: positions[v as usize],
                edge_count: topology.edges_for_vertex(v).len() as u32,
                tags,
            }
        })
        .collect();

    let edges: Vec<TaggedEdge> = (0..topology.num_edges() as u32)
        .map(|e| {
            let tags = edge::classify_edge(topology, e);
            stats.record(match tags.manifold {
                EdgeManifold::NonManifold => Category::NonManifoldEdge,
                EdgeManifold::Boundary => Category::Boundary,
                EdgeManifold::Interior => Category::ManifoldInterior,
            });
            if tags.flags.contains(EdgeFlags::SHARP) {
                stats.record(Category::Sharp);
            }
            if tags.flags.contains(EdgeFlags::SEAM) {
                stats.record(Category::Seam);
            }
            TaggedEdge {
                vertices: topology.edge(e).vertices,
                face_count: topology.face_count(e) as u32,
                tags,
            }
        })
        .collect();

    let faces: Vec<TaggedFace> = snapshot
        .faces()
        .iter()
        .enumerate()
        .map(|(f, corners)| {
            let analysis = face::classify_face(positions, corners, options, test_planarity);
            stats.record(match analysis.tags.shape {
                FaceShape::Triangle => Category::Triangle,
                FaceShape::Quad => Category::Quad,
                FaceShape::NGon => Category::NGon,
            });
            if analysis.tags.flags.contains(FaceFlags::DEGENERATE) {
                stats.record(Category::Degenerate);
            }
            if analysis.tags.flags.contains(FaceFlags::NON_PLANAR) {
                stats.record(Category::NonPlanar);
            }
            TaggedFace {
                vertices: corners.clone(),
                edges: topology.edges_for_face(f as u32).to_vec(),
                normal: analysis.normal,
                planarity_deviation: analysis.deviation,
                tags: analysis.tags,
            }
        })
        .collect();

    Ok(ClassificationResult {
        name: snapshot.name().to_string(),
        vertices,
        edges,
        faces,
        stats,
        warnings: snapshot.warnings(),
        degraded,
        transform: snapshot.transform(),
    })
}

fn degraded_passes(topology: &MeshTopology, options: &AnalysisOptions) -> DegradedPasses {
    let elements = topology.num_vertices() + topology.num_edges() + topology.num_faces();
    match options.large_mesh_element_limit {
        Some(limit) if elements > limit => DegradedPasses::all(),
        _ => DegradedPasses::empty(),
    }
}

/// Verifies the edge accounting the classifiers rely on.
fn check_consistency(snapshot: &MeshSnapshot, topology: &MeshTopology) -> Result<()> {
    if topology.num_vertices() != snapshot.num_vertices()
        || topology.num_faces() != snapshot.num_faces()
    {
        return Err(MeshLensError::Inconsistent(format!(
            "topology has {} vertices and {} faces, snapshot has {} and {}",
            topology.num_vertices(),
            topology.num_faces(),
            snapshot.num_vertices(),
            snapshot.num_faces()
        )));
    }

    let counted: usize = (0..topology.num_edges() as u32).map(|e| topology.face_count(e)).sum();
    if counted != topology.num_incidences() {
        return Err(MeshLensError::Inconsistent(format!(
            "edges claim {counted} face incidences, faces have {}",
            topology.num_incidences()
        )));
    }

    for (f, corners) in snapshot.faces().iter().enumerate() {
        let loop_edges = topology.edges_for_face(f as u32);
        if loop_edges.len() != corners.len() {
            return Err(MeshLensError::Inconsistent(format!(
                "face {f} has {} corners but {} edges",
                corners.len(),
                loop_edges.len()
            )));
        }
        if let Some(&e) = loop_edges
            .iter()
            .find(|&&e| !topology.faces_for_edge(e).contains(&(f as u32)))
        {
            return Err(MeshLensError::Inconsistent(format!(
                "edge {e} is on face {f} but does not list it"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::ElementKind;
    use crate::options::PlanarityThreshold;
    use crate::source::MeshData;
    use glam::Vec3;

    fn cube() -> MeshData {
        MeshData::new(
            "cube",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(1.0, 0.0, 1.0),
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
            ],
            vec![
                vec![0, 3, 2, 1],
                vec![4, 5, 6, 7],
                vec![0, 1, 5, 4],
                vec![1, 2, 6, 5],
                vec![2, 3, 7, 6],
                vec![3, 0, 4, 7],
            ],
        )
    }

    #[test]
    fn test_single_triangle() {
        let verts = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let mesh = MeshData::from_triangles("tri", verts, vec![[0, 1, 2]]);
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();

        for v in result.vertices() {
            assert_eq!(v.edge_count, 2);
            assert_eq!(v.tags.manifold, VertexManifold::Regular);
            assert_eq!(v.tags.pole, PoleClass::None);
        }
        for e in result.edges() {
            assert_eq!(e.face_count, 1);
            assert_eq!(e.tags.manifold, EdgeManifold::Boundary);
        }
        assert_eq!(result.faces()[0].tags.shape, FaceShape::Triangle);

        let stats = result.stats();
        assert_eq!(stats.get(Category::Regular), 3);
        assert_eq!(stats.get(Category::Boundary), 3);
        assert_eq!(stats.get(Category::Triangle), 1);
        assert_eq!(stats.get(Category::NPole), 0);
    }

    #[test]
    fn test_closed_cube() {
        let result = analyze(&cube(), &AnalysisOptions::default()).unwrap();
        assert_eq!(result.num_elements(ElementKind::Vertex), 8);
        assert_eq!(result.num_elements(ElementKind::Edge), 12);
        assert_eq!(result.num_elements(ElementKind::Face), 6);

        assert!(result.vertices().iter().all(|v| v.tags.pole == PoleClass::NPole));
        assert!(result.vertices().iter().all(|v| v.tags.manifold == VertexManifold::Regular));
        assert!(result.edges().iter().all(|e| e.tags.manifold == EdgeManifold::Interior));
        assert!(result.faces().iter().all(|f| f.tags.shape == FaceShape::Quad));
        assert!(result.faces().iter().all(|f| f.tags.flags.is_empty()));

        let stats = result.stats();
        assert_eq!(stats.get(Category::NPole), 8);
        assert_eq!(stats.get(Category::ManifoldInterior), 12);
        assert_eq!(stats.get(Category::Quad), 6);
        assert_eq!(stats.get(Category::NonPlanar), 0);
        assert!(result.degraded().is_empty());
    }

    #[test]
    fn test_backtracking_face_is_a_plain_triangle() {
        let verts = vec![Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        let mesh = MeshData::new("spike", verts, vec![vec![0, 1, 2, 3, 2]]);
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();

        assert_eq!(result.faces()[0].vertices, vec![0, 1, 2]);
        assert_eq!(result.faces()[0].tags.shape, FaceShape::Triangle);
        assert_eq!(result.num_elements(ElementKind::Edge), 3);
        assert!(result.edges().iter().all(|e| e.tags.manifold == EdgeManifold::Boundary));

        let stats = result.stats();
        assert_eq!(stats.get(Category::Isolated), 1);
        assert_eq!(stats.get(Category::NonManifoldEdge), 0);
        assert_eq!(stats.get(Category::Quad), 0);
    }

    #[test]
    fn test_cube_is_planar_even_at_zero_threshold() {
        let options = AnalysisOptions::default().with_planarity(PlanarityThreshold::distance(0.0));
        let result = analyze(&cube(), &options).unwrap();
        assert_eq!(result.stats().get(Category::NonPlanar), 0);
    }

    #[test]
    fn test_non_manifold_fin() {
        let mesh = MeshData::new(
            "fin",
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.5, 1.0, 0.0),
                Vec3::new(0.5, -1.0, 0.0),
                Vec3::new(0.5, 0.0, 1.0),
            ],
            vec![vec![0, 1, 2], vec![1, 0, 3], vec![0, 1, 4]],
        );
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();

        let fin = result
            .edges()
            .iter()
            .find(|e| e.vertices == [0, 1])
            .unwrap();
        assert_eq!(fin.face_count, 3);
        assert_eq!(fin.tags.manifold, EdgeManifold::NonManifold);
        assert_eq!(result.stats().get(Category::NonManifoldEdge), 1);
        assert_eq!(result.vertices()[0].tags.manifold, VertexManifold::Regular);
        assert_eq!(result.vertices()[1].tags.manifold, VertexManifold::Regular);
    }

    #[test]
    fn test_element_limit_degrades_passes() {
        let mut verts = cube().positions().to_vec();
        verts[6].z = 1.5;
        let mut mesh = cube();
        mesh.update_vertices(verts);

        let strict = AnalysisOptions::default().with_planarity(PlanarityThreshold::distance(0.0));
        let full = analyze(&mesh, &strict).unwrap();
        assert!(full.stats().get(Category::NonPlanar) > 0);

        let limited = analyze(&mesh, &strict.clone().with_element_limit(10)).unwrap();
        assert_eq!(limited.degraded(), DegradedPasses::all());
        assert_eq!(limited.stats().get(Category::NonPlanar), 0);
        assert_eq!(limited.stats().get(Category::Quad), 6);
    }

    #[test]
    fn test_inconsistent_topology_is_rejected() {
        let snapshot = extract(&cube()).unwrap();
        let verts = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let other = MeshData::from_triangles("tri", verts, vec![[0, 1, 2]]);
        let topology = MeshTopology::build(&extract(&other).unwrap());
        assert!(matches!(
            classify(&snapshot, &topology, &AnalysisOptions::default()),
            Err(MeshLensError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let options = AnalysisOptions::default();
        let a = analyze(&cube(), &options).unwrap();
        let b = analyze(&cube(), &options).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
