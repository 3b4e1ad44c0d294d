//! Core analysis engine for meshlens.
//!
//! This crate provides the pipeline behind the meshlens overlays:
//! - [`MeshSource`] trait and [`MeshData`] for handing meshes to the engine
//! - Snapshot extraction and topology indexing
//! - Vertex, edge and face classification into overlay [`Category`]s
//! - The per-object [`AnalysisCache`] with explicit refresh
//! - Category selection, statistics and overlay batch generation
//! - Global state management and configuration options

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Element ids are u32 and mesh sizes fit comfortably
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod category;
pub mod classify;
pub mod error;
pub mod options;
pub mod overlay;
pub mod result;
pub mod selection;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod topology;

pub use cache::{AnalysisCache, CacheEntry};
pub use category::{
    Category, EdgeFlags, EdgeManifold, EdgeTags, ElementKind, FaceFlags, FaceShape, FaceTags,
    PoleClass, VertexManifold, VertexTags,
};
pub use classify::{analyze, classify};
pub use error::{MeshLensError, RefreshFailure, Result};
pub use options::{AnalysisOptions, PlanarityMetric, PlanarityThreshold};
pub use overlay::{
    build_overlay, overlay_batches, OverlayBatch, OverlaySettings, OverlayStyle, OverlayVertex,
    Primitive,
};
pub use result::{
    ClassificationResult, DegradedPasses, Statistics, TaggedEdge, TaggedFace, TaggedVertex,
};
pub use selection::{select, stats, SelectMode, Selection};
pub use snapshot::{extract, ExtractionWarnings, GeometrySignature, MeshSnapshot};
pub use source::{AuthoredEdge, MeshData, MeshSource};
pub use state::{with_context, with_context_mut, Context};
pub use topology::MeshTopology;

// Re-export glam types for convenience
pub use glam::{Mat4, Vec3, Vec4};
