//! Per-object analysis cache.
//!
//! Holds the last classification of every analyzed object. Entries are never
//! refreshed implicitly: a hit returns the stored result even if the mesh was
//! edited since. Callers force a refresh on explicit events (overlay toggled,
//! edit mode left) and evict entries when objects are deleted.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::classify::analyze;
use crate::error::{MeshLensError, RefreshFailure};
use crate::options::AnalysisOptions;
use crate::result::ClassificationResult;
use crate::snapshot::GeometrySignature;
use crate::source::MeshSource;

/// The cached analysis of one object.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    result: Arc<ClassificationResult>,
    fresh: bool,
    signature: GeometrySignature,
}

impl CacheEntry {
    /// The stored result.
    pub fn result(&self) -> &Arc<ClassificationResult> {
        &self.result
    }

    /// Whether the entry may be served without recomputing.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Signature of the mesh the result was computed from.
    pub fn signature(&self) -> GeometrySignature {
        self.signature
    }
}

/// Cache of classification results keyed by object name.
///
/// There is no size or age based eviction; memory is bounded by the number
/// of distinct objects analyzed.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: HashMap<String, CacheEntry>,
}

impl AnalysisCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached result for `source`, computing it on a miss, when
    /// the entry was invalidated, or when `force_refresh` is set.
    ///
    /// On failure the existing entry is kept and handed back in the error as
    /// the stale result.
    pub fn get_or_refresh(
        &mut self,
        source: &dyn MeshSource,
        options: &AnalysisOptions,
        force_refresh: bool,
    ) -> Result<Arc<ClassificationResult>, RefreshFailure> {
        let name = source.name();

        if !force_refresh {
            if let Some(entry) = self.entries.get(name).filter(|e| e.fresh) {
                return Ok(Arc::clone(&entry.result));
            }
        }

        match run_pipeline(source, options) {
            Ok((result, signature)) => {
                let result = Arc::new(result);
                self.entries.insert(
                    name.to_string(),
                    CacheEntry {
                        result: Arc::clone(&result),
                        fresh: true,
                        signature,
                    },
                );
                Ok(result)
            }
            Err(error) => {
                let stale = self.entries.get_mut(name).map(|entry| {
                    entry.fresh = false;
                    Arc::clone(&entry.result)
                });
                log::warn!(
                    "refresh of '{}' failed ({}); {}",
                    name,
                    error,
                    if stale.is_some() {
                        "keeping the previous analysis"
                    } else {
                        "no previous analysis to show"
                    }
                );
                Err(RefreshFailure {
                    object: name.to_string(),
                    error,
                    stale,
                })
            }
        }
    }

    /// Gets the stored result for an object, fresh or not.
    pub fn get(&self, name: &str) -> Option<Arc<ClassificationResult>> {
        self.entries.get(name).map(|e| Arc::clone(&e.result))
    }

    /// Gets the entry for an object.
    pub fn entry(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    /// Checks if an object has a cached result.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Marks an entry so the next `get_or_refresh` recomputes it.
    ///
    /// Returns false if the object has no entry.
    pub fn invalidate(&mut self, name: &str) -> bool {
        match self.entries.get_mut(name) {
            Some(entry) => {
                entry.fresh = false;
                true
            }
            None => false,
        }
    }

    /// Compares the stored signature with the mesh's current one.
    ///
    /// Returns `None` if the object has no entry. Never recomputes. A source
    /// that panics while being read counts as stale.
    pub fn is_stale(&self, source: &dyn MeshSource) -> Option<bool> {
        let entry = self.entries.get(source.name())?;
        if !entry.fresh {
            return Some(true);
        }
        let current = panic::catch_unwind(AssertUnwindSafe(|| GeometrySignature::of(source)));
        Some(!current.is_ok_and(|signature| signature == entry.signature))
    }

    /// Removes an object's entry, e.g. when the object is deleted.
    pub fn remove(&mut self, name: &str) -> Option<CacheEntry> {
        self.entries.remove(name)
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the names of all cached objects.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of cached objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Validates options and runs the analysis, turning panics into errors.
///
/// The signature is taken inside the same guard since it reads the source too.
fn run_pipeline(
    source: &dyn MeshSource,
    options: &AnalysisOptions,
) -> Result<(ClassificationResult, GeometrySignature), MeshLensError> {
    options.validate()?;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let result = analyze(source, options)?;
        Ok((result, GeometrySignature::of(source)))
    }));
    outcome.unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(MeshLensError::Internal(message))
    })
}
