//! Property-based tests for the analysis pipeline.
//!
//! These tests use proptest to generate random polygon soups and verify that
//! classification stays consistent no matter how broken the input is.
//!
//! Run with: cargo test -p meshlens-core -- proptest

use meshlens_core::{
    analyze, select, AnalysisOptions, AuthoredEdge, Category, ElementKind, MeshData, PoleClass,
    SelectMode, Selection,
};
use glam::Vec3;
use proptest::prelude::*;

// =============================================================================
// Strategies for generating random meshes
// =============================================================================

/// Generate a random vertex position in a bounded range.
fn arb_position() -> impl Strategy<Value = Vec3> {
    prop::array::uniform3(-10.0..10.0f32).prop_map(Vec3::from_array)
}

/// Generate a mesh with in-range face indices and some authored edges.
///
/// Faces may repeat corners and edges may be self loops; extraction is
/// expected to clean both up.
fn arb_mesh(max_vertices: usize, max_faces: usize) -> impl Strategy<Value = MeshData> {
    (1..=max_vertices).prop_flat_map(move |num_vertices| {
        let n = num_vertices as u32;
        let vertices = prop::collection::vec(arb_position(), num_vertices);
        let faces = prop::collection::vec(prop::collection::vec(0..n, 3..=6), 0..=max_faces);
        let edges = prop::collection::vec((0..n, 0..n, any::<bool>(), any::<bool>()), 0..=4);

        (vertices, faces, edges).prop_map(|(verts, faces, edges)| {
            MeshData::new("random", verts, faces).with_edges(edges.into_iter().map(
                |(a, b, sharp, seam)| AuthoredEdge {
                    vertices: [a, b],
                    sharp,
                    seam,
                },
            ))
        })
    })
}

fn arb_category() -> impl Strategy<Value = Category> {
    (0..Category::COUNT).prop_map(|i| Category::ALL[i])
}

// =============================================================================
// Classification properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Analyzing the same mesh twice gives identical results.
    #[test]
    fn proptest_analysis_is_deterministic(mesh in arb_mesh(16, 12)) {
        let options = AnalysisOptions::default();
        let first = analyze(&mesh, &options).unwrap();
        let second = analyze(&mesh, &options).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every element lands in exactly one of its mutually exclusive classes.
    #[test]
    fn proptest_classes_partition_elements(mesh in arb_mesh(16, 12)) {
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();
        let stats = result.stats();

        let vertex_classes = stats.get(Category::Isolated)
            + stats.get(Category::NonManifoldVertex)
            + stats.get(Category::Regular);
        prop_assert_eq!(vertex_classes, result.vertices().len());

        let edge_classes = stats.get(Category::NonManifoldEdge)
            + stats.get(Category::Boundary)
            + stats.get(Category::ManifoldInterior);
        prop_assert_eq!(edge_classes, result.edges().len());
        prop_assert_eq!(
            stats.get(Category::Triangle) + stats.get(Category::Quad) + stats.get(Category::NGon),
            result.faces().len()
        );
    }

    /// Statistics agree with the element lists they summarize.
    #[test]
    fn proptest_stats_match_element_ids(mesh in arb_mesh(16, 12)) {
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();
        for category in Category::ALL {
            prop_assert_eq!(result.stats().get(category), result.element_ids(category).len());
        }
    }

    /// Edge face counts add up to the face corner count.
    #[test]
    fn proptest_edge_incidences_balance(mesh in arb_mesh(16, 12)) {
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();
        let from_edges: usize = result.edges().iter().map(|e| e.face_count as usize).sum();
        let from_faces: usize = result.faces().iter().map(|f| f.edges.len()).sum();
        prop_assert_eq!(from_edges, from_faces);

        for face in result.faces() {
            prop_assert!(face.vertices.len() >= 3);
            prop_assert_eq!(face.vertices.len(), face.edges.len());
        }
    }

    /// Pole class follows the incident edge count.
    #[test]
    fn proptest_pole_class_follows_edge_count(mesh in arb_mesh(16, 12)) {
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();
        for vertex in result.vertices() {
            let expected = PoleClass::from_edge_count(vertex.edge_count as usize);
            prop_assert_eq!(vertex.tags.pole, expected);
        }
    }

    /// Adding then subtracting a category restores a disjoint selection.
    #[test]
    fn proptest_add_then_subtract_restores_selection(
        mesh in arb_mesh(16, 12),
        category in arb_category(),
        extra in prop::collection::btree_set(0u32..64, 0..8),
    ) {
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();
        let kind = category.element();
        let members = result.element_ids(category);
        let outside = extra.into_iter().filter(|id| !members.contains(id));
        let current = Selection::from_ids(kind, outside);

        let added = select(&result, category, SelectMode::Add, &current);
        prop_assert_eq!(added.ids(kind).len(), current.ids(kind).len() + members.len());

        let restored = select(&result, category, SelectMode::Subtract, &added);
        prop_assert_eq!(restored, current);
    }

    /// Replace yields exactly the category's elements.
    #[test]
    fn proptest_replace_selects_category(mesh in arb_mesh(16, 12), category in arb_category()) {
        let result = analyze(&mesh, &AnalysisOptions::default()).unwrap();
        let current = Selection::from_ids(ElementKind::Vertex, [0, 1, 2]);
        let replaced = select(&result, category, SelectMode::Replace, &current);

        let ids: Vec<u32> = replaced.ids(category.element()).iter().copied().collect();
        prop_assert_eq!(ids, result.element_ids(category));
        prop_assert_eq!(replaced.len(), result.stats().get(category));
    }
}
