//! Global state management for meshlens.

use std::sync::{OnceLock, RwLock};

use crate::cache::AnalysisCache;
use crate::error::{MeshLensError, Result};
use crate::options::AnalysisOptions;
use crate::overlay::OverlaySettings;

/// Global context singleton.
static CONTEXT: OnceLock<RwLock<Context>> = OnceLock::new();

/// The global context containing all meshlens state.
#[derive(Debug, Default)]
pub struct Context {
    /// Whether meshlens has been initialized.
    pub initialized: bool,

    /// Per-object analysis cache.
    pub cache: AnalysisCache,

    /// Analysis options used by every refresh.
    options: AnalysisOptions,

    /// Overlay display settings.
    pub overlay: OverlaySettings,
}

impl Context {
    /// Returns the current analysis options.
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Replaces the analysis options.
    ///
    /// Invalid options are rejected and the previous ones stay in effect.
    /// Cached results are not recomputed; they pick up new options on their
    /// next refresh.
    pub fn set_options(&mut self, options: AnalysisOptions) -> Result<()> {
        options.validate()?;
        log::debug!("analysis options updated: {options:?}");
        self.options = options;
        Ok(())
    }
}

/// Initializes the global context.
///
/// This should be called once at the start of the program.
pub fn init_context() -> Result<()> {
    let context = RwLock::new(Context::default());

    CONTEXT
        .set(context)
        .map_err(|_| MeshLensError::AlreadyInitialized)?;

    with_context_mut(|ctx| {
        ctx.initialized = true;
    })
}

/// Returns whether the context has been initialized.
pub fn is_initialized() -> bool {
    CONTEXT
        .get()
        .and_then(|lock| lock.read().ok())
        .is_some_and(|ctx| ctx.initialized)
}

/// Access the global context for reading.
///
/// Fails with [`MeshLensError::NotInitialized`] before [`init_context`].
pub fn with_context<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&Context) -> R,
{
    let lock = CONTEXT.get().ok_or(MeshLensError::NotInitialized)?;
    let guard = lock
        .read()
        .map_err(|_| MeshLensError::Internal("context lock poisoned".into()))?;
    Ok(f(&guard))
}

/// Access the global context for writing.
///
/// Fails with [`MeshLensError::NotInitialized`] before [`init_context`].
pub fn with_context_mut<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&mut Context) -> R,
{
    let lock = CONTEXT.get().ok_or(MeshLensError::NotInitialized)?;
    let mut guard = lock
        .write()
        .map_err(|_| MeshLensError::Internal("context lock poisoned".into()))?;
    Ok(f(&mut guard))
}

/// Try to access the global context for reading.
///
/// Returns `None` if meshlens has not been initialized.
pub fn try_with_context<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&Context) -> R,
{
    let lock = CONTEXT.get()?;
    let guard = lock.read().ok()?;
    Some(f(&guard))
}

/// Try to access the global context for writing.
///
/// Returns `None` if meshlens has not been initialized.
pub fn try_with_context_mut<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut Context) -> R,
{
    let lock = CONTEXT.get()?;
    let mut guard = lock.write().ok()?;
    Some(f(&mut guard))
}

/// Shuts down the global context.
///
/// Note: Due to `OnceLock` semantics, the context cannot be re-initialized
/// after shutdown in the same process.
pub fn shutdown_context() {
    if let Some(lock) = CONTEXT.get() {
        if let Ok(mut ctx) = lock.write() {
            ctx.initialized = false;
            ctx.cache.clear();
        }
    }
}
