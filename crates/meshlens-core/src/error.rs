//! Error types for meshlens.

use std::sync::Arc;

use thiserror::Error;

use crate::result::ClassificationResult;

/// The main error type for meshlens operations.
#[derive(Error, Debug)]
pub enum MeshLensError {
    /// meshlens has not been initialized.
    #[error("meshlens not initialized - call meshlens::init() first")]
    NotInitialized,

    /// meshlens has already been initialized.
    #[error("meshlens already initialized")]
    AlreadyInitialized,

    /// The source mesh has no vertices.
    #[error("extraction failed: mesh '{0}' has no vertices")]
    EmptyMesh(String),

    /// The source mesh could not be turned into a snapshot.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// A threshold or limit was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Indexed topology disagrees with itself.
    #[error("inconsistent topology: {0}")]
    Inconsistent(String),

    /// A panic escaped the analysis pipeline.
    #[error("internal analysis failure: {0}")]
    Internal(String),

    /// No cached analysis exists for the object.
    #[error("object '{0}' has no cached analysis")]
    ObjectNotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for meshlens operations.
pub type Result<T> = std::result::Result<T, MeshLensError>;

/// A refresh that did not produce a new result.
///
/// The last good result for the object, if there was one, is handed back
/// untouched so the overlay can keep drawing it.
#[derive(Error, Debug)]
#[error("refresh of '{object}' failed: {error}")]
pub struct RefreshFailure {
    /// Name of the object whose refresh failed.
    pub object: String,
    /// Why the refresh failed.
    #[source]
    pub error: MeshLensError,
    /// The previously cached result, still valid for display.
    pub stale: Option<Arc<ClassificationResult>>,
}
