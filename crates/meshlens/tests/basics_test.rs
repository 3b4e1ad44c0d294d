//! Basic integration tests for meshlens.
//!
//! Note: Due to meshlens using global state that can only be initialized once
//! per process (OnceLock), all tests are combined into a single test function.

use std::sync::Arc;

use meshlens::*;

fn cube(name: &str) -> MeshData {
    MeshData::new(
        name,
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

/// Moves the (1, 1, 1) corner up so only the top face bends.
fn lift_top_corner(mesh: &mut MeshData) {
    let mut verts = mesh.positions().to_vec();
    verts[6].z = 1.5;
    mesh.update_vertices(verts);
}

/// Main integration test that runs all basic tests in sequence.
///
/// This is structured as a single test because meshlens uses global state
/// that cannot be re-initialized after shutdown within the same process.
#[test]
fn test_basics() {
    // Test 0: Nothing works before init
    {
        assert!(!is_initialized());
        let failure = refresh(&cube("early"), false).unwrap_err();
        assert!(matches!(failure.error, MeshLensError::NotInitialized));
        assert!(failure.stale.is_none());
        assert!(get_result("early").is_none());
        assert!(matches!(options(), Err(MeshLensError::NotInitialized)));
    }

    init().expect("init failed");
    assert!(is_initialized());

    // Test 1: Analyze a cube
    {
        let mut mesh = cube("cube");
        mesh.set_edge_flags(0, 1, false, true);
        let result = refresh(&mesh, false).expect("refresh failed");

        let counts = stats("cube").unwrap();
        assert_eq!(counts.len(), Category::COUNT);
        assert_eq!(counts[&Category::NPole], 8);
        assert_eq!(counts[&Category::Regular], 8);
        assert_eq!(counts[&Category::ManifoldInterior], 12);
        assert_eq!(counts[&Category::Boundary], 0);
        assert_eq!(counts[&Category::Seam], 1);
        assert_eq!(counts[&Category::Quad], 6);
        assert_eq!(counts[&Category::NonPlanar], 0);

        assert!(Arc::ptr_eq(&get_result("cube").unwrap(), &result));
        assert_eq!(is_stale(&mesh), Some(false));
    }

    // Test 2: Edits are not picked up until a forced refresh
    {
        let mut mesh = cube("cube");
        mesh.set_edge_flags(0, 1, false, true);
        let before = get_result("cube").unwrap();

        lift_top_corner(&mut mesh);
        assert_eq!(is_stale(&mesh), Some(true));
        let cached = refresh(&mesh, false).unwrap();
        assert!(Arc::ptr_eq(&cached, &before));
        assert_eq!(stats("cube").unwrap()[&Category::NonPlanar], 0);

        let forced = refresh(&mesh, true).unwrap();
        assert!(!Arc::ptr_eq(&forced, &before));
        assert_eq!(stats("cube").unwrap()[&Category::NonPlanar], 1);
        assert_eq!(forced.element_ids(Category::NonPlanar), vec![1]);
    }

    // Test 3: Invalidate defers the recompute to the next refresh
    {
        let mut mesh = cube("cube");
        mesh.set_edge_flags(0, 1, false, true);
        assert!(invalidate("cube"));
        assert!(!invalidate("nonexistent"));
        assert_eq!(is_stale(&mesh), Some(true));

        refresh(&mesh, false).unwrap();
        assert_eq!(stats("cube").unwrap()[&Category::NonPlanar], 0);
    }

    // Test 4: Selection
    {
        let faces = select("cube", Category::Quad, SelectMode::Replace, &Selection::new()).unwrap();
        assert_eq!(faces.ids(ElementKind::Face).len(), 6);

        let current = Selection::from_ids(ElementKind::Edge, [100]);
        let added = select("cube", Category::Seam, SelectMode::Add, &current).unwrap();
        assert_eq!(added.ids(ElementKind::Edge).len(), 2);
        let back = select("cube", Category::Seam, SelectMode::Subtract, &added).unwrap();
        assert_eq!(back, current);

        let none = select("cube", Category::NGon, SelectMode::Replace, &current).unwrap();
        assert!(none.is_empty());

        assert!(matches!(
            select("nonexistent", Category::Quad, SelectMode::Add, &current),
            Err(MeshLensError::ObjectNotFound(_))
        ));
    }

    // Test 5: Options
    {
        let strict = AnalysisOptions::default().with_planarity(PlanarityThreshold::distance(0.0));
        set_options(strict.clone()).unwrap();
        assert_eq!(options().unwrap(), strict);

        let bad = AnalysisOptions::default().with_planarity(PlanarityThreshold::relative(-0.5));
        assert!(matches!(
            set_options(bad),
            Err(MeshLensError::InvalidConfiguration(_))
        ));
        assert_eq!(options().unwrap(), strict);

        set_options(AnalysisOptions::default()).unwrap();
    }

    // Test 6: Overlay batches
    {
        let batches = overlay_batches("cube").unwrap();
        let poles = batches
            .iter()
            .find(|b| b.category == Category::NPole)
            .expect("n-pole batch");
        assert_eq!(poles.primitive, Primitive::Points);
        assert_eq!(poles.vertices.len(), 8);

        let quads = batches
            .iter()
            .find(|b| b.category == Category::Quad)
            .expect("quad batch");
        assert_eq!(quads.primitive, Primitive::Triangles);
        assert_eq!(quads.vertices.len(), 6 * 2 * 3);

        assert!(batches.iter().all(|b| b.category != Category::Regular));

        let mut settings = overlay_settings().unwrap();
        settings.set_enabled(Category::Quad, false);
        set_overlay_settings(settings).unwrap();
        let batches = overlay_batches("cube").unwrap();
        assert!(batches.iter().all(|b| b.category != Category::Quad));
    }

    // Test 7: A failed refresh keeps the previous result
    {
        let mut mesh = cube("broken");
        let good = refresh(&mesh, false).unwrap();

        mesh.update_vertices(Vec::new());
        let failure = refresh(&mesh, true).unwrap_err();
        assert!(matches!(failure.error, MeshLensError::EmptyMesh(_)));
        assert!(Arc::ptr_eq(failure.stale.as_ref().unwrap(), &good));
        assert!(Arc::ptr_eq(&get_result("broken").unwrap(), &good));
    }

    // Test 8: Deleted objects are dropped
    {
        remove_object("broken");
        assert!(get_result("broken").is_none());
        assert!(matches!(stats("broken"), Err(MeshLensError::ObjectNotFound(_))));

        clear_cache();
        assert!(get_result("cube").is_none());
    }

    shutdown();
    assert!(!is_initialized());
    assert!(matches!(init(), Err(MeshLensError::AlreadyInitialized)));
}
