//! meshlens: mesh topology and geometry analysis overlays.
//!
//! meshlens inspects polygon meshes and reports what a modeler usually has
//! to hunt for by hand: poles, non-manifold vertices and edges, boundaries,
//! sharp and seam edges, triangles, quads, n-gons, degenerate and non-planar
//! faces. Results are cached per object and only recomputed when asked.
//!
//! # Quick Start
//!
//! ```no_run
//! use meshlens::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     let cube = MeshData::new(
//!         "cube",
//!         vec![
//!             Vec3::new(0.0, 0.0, 0.0),
//!             Vec3::new(1.0, 0.0, 0.0),
//!             Vec3::new(1.0, 1.0, 0.0),
//!             Vec3::new(0.0, 1.0, 0.0),
//!             Vec3::new(0.0, 0.0, 1.0),
//!             Vec3::new(1.0, 0.0, 1.0),
//!             Vec3::new(1.0, 1.0, 1.0),
//!             Vec3::new(0.0, 1.0, 1.0),
//!         ],
//!         vec![
//!             vec![0, 3, 2, 1],
//!             vec![4, 5, 6, 7],
//!             vec![0, 1, 5, 4],
//!             vec![1, 2, 6, 5],
//!             vec![2, 3, 7, 6],
//!             vec![3, 0, 4, 7],
//!         ],
//!     );
//!
//!     refresh(&cube, false).map_err(|failure| failure.error)?;
//!     println!("{:?}", stats("cube")?);
//!
//!     let faces = select("cube", Category::Quad, SelectMode::Replace, &Selection::new())?;
//!     assert_eq!(faces.ids(ElementKind::Face).len(), 6);
//!     Ok(())
//! }
//! ```
//!
//! # Refresh contract
//!
//! [`refresh`] without `force` returns the cached result whenever one
//! exists, even if the mesh was edited since. Hosts call it with
//! `force = true` on explicit events (overlay toggled on, edit mode left),
//! use [`invalidate`] to defer a recompute, and [`remove_object`] when an
//! object is deleted.

use std::collections::BTreeMap;
use std::sync::Arc;

// Re-export core types
pub use meshlens_core::{
    cache::{AnalysisCache, CacheEntry},
    category::{
        Category, EdgeFlags, EdgeManifold, EdgeTags, ElementKind, FaceFlags, FaceShape, FaceTags,
        PoleClass, VertexManifold, VertexTags,
    },
    error::{MeshLensError, RefreshFailure, Result},
    options::{AnalysisOptions, PlanarityMetric, PlanarityThreshold},
    overlay::{OverlayBatch, OverlaySettings, OverlayStyle, OverlayVertex, Primitive},
    result::{
        ClassificationResult, DegradedPasses, Statistics, TaggedEdge, TaggedFace, TaggedVertex,
    },
    selection::{SelectMode, Selection},
    snapshot::{ExtractionWarnings, GeometrySignature},
    source::{AuthoredEdge, MeshData, MeshSource},
    state::{with_context, with_context_mut, Context},
    Mat4, Vec3, Vec4,
};

/// Initializes meshlens with default settings.
///
/// This must be called before any other meshlens functions.
pub fn init() -> Result<()> {
    let _ = env_logger::try_init();
    meshlens_core::state::init_context()?;
    log::info!("meshlens initialized");
    Ok(())
}

/// Returns whether meshlens has been initialized.
pub fn is_initialized() -> bool {
    meshlens_core::state::is_initialized()
}

/// Shuts down meshlens and drops every cached analysis.
pub fn shutdown() {
    meshlens_core::state::shutdown_context();
    log::info!("meshlens shut down");
}

/// Returns the analysis of `source`, computing it if needed.
///
/// A cached result is returned as is unless `force_refresh` is set or the
/// entry was invalidated. On failure the previous result, if any, is carried
/// in [`RefreshFailure::stale`].
pub fn refresh(
    source: &dyn MeshSource,
    force_refresh: bool,
) -> std::result::Result<Arc<ClassificationResult>, RefreshFailure> {
    let outcome = with_context_mut(|ctx| {
        let options = ctx.options().clone();
        ctx.cache.get_or_refresh(source, &options, force_refresh)
    });

    outcome.unwrap_or_else(|error| {
        Err(RefreshFailure {
            object: source.name().to_string(),
            error,
            stale: None,
        })
    })
}

/// Gets the cached analysis of an object without recomputing.
pub fn get_result(name: &str) -> Option<Arc<ClassificationResult>> {
    meshlens_core::state::try_with_context(|ctx| ctx.cache.get(name)).flatten()
}

/// Returns whether the cached analysis of `source` no longer matches it.
///
/// Returns `None` if the object has no cached analysis.
pub fn is_stale(source: &dyn MeshSource) -> Option<bool> {
    meshlens_core::state::try_with_context(|ctx| ctx.cache.is_stale(source)).flatten()
}

/// Marks an object so its next [`refresh`] recomputes.
pub fn invalidate(name: &str) -> bool {
    meshlens_core::state::try_with_context_mut(|ctx| ctx.cache.invalidate(name)).unwrap_or(false)
}

/// Drops the cached analysis of a deleted object.
pub fn remove_object(name: &str) {
    let removed =
        meshlens_core::state::try_with_context_mut(|ctx| ctx.cache.remove(name).is_some());
    if removed == Some(true) {
        log::debug!("dropped cached analysis of '{name}'");
    }
}

/// Drops every cached analysis.
pub fn clear_cache() {
    if meshlens_core::state::try_with_context_mut(|ctx| ctx.cache.clear()).is_some() {
        log::info!("analysis cache cleared");
    }
}

/// Returns the current analysis options.
pub fn options() -> Result<AnalysisOptions> {
    with_context(|ctx| ctx.options().clone())
}

/// Replaces the analysis options.
///
/// Invalid options are rejected and the previous ones stay in effect.
pub fn set_options(options: AnalysisOptions) -> Result<()> {
    with_context_mut(|ctx| ctx.set_options(options))?
}

/// Returns the current overlay settings.
pub fn overlay_settings() -> Result<OverlaySettings> {
    with_context(|ctx| ctx.overlay.clone())
}

/// Replaces the overlay settings.
pub fn set_overlay_settings(settings: OverlaySettings) -> Result<()> {
    with_context_mut(|ctx| ctx.overlay = settings)
}

/// Element counts per category for a cached object.
pub fn stats(name: &str) -> Result<BTreeMap<Category, usize>> {
    let result = cached(name)?;
    Ok(meshlens_core::selection::stats(&result))
}

/// Applies a category to `current` and returns the resulting selection.
pub fn select(
    name: &str,
    category: Category,
    mode: SelectMode,
    current: &Selection,
) -> Result<Selection> {
    let result = cached(name)?;
    Ok(meshlens_core::selection::select(&result, category, mode, current))
}

/// Builds overlay batches for a cached object with the current settings.
pub fn overlay_batches(name: &str) -> Result<Vec<OverlayBatch>> {
    let result = cached(name)?;
    with_context(|ctx| meshlens_core::overlay::overlay_batches(&result, &ctx.overlay))
}

fn cached(name: &str) -> Result<Arc<ClassificationResult>> {
    with_context(|ctx| ctx.cache.get(name))?
        .ok_or_else(|| MeshLensError::ObjectNotFound(name.to_string()))
}
