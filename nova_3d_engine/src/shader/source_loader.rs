//! Source loading collaborators.
//!
//! Programs never read sources themselves: a [`ShaderSourceLoader`] resolves
//! a source identifier (file path, logical key) to raw source text or
//! bytecode, and reports a revision number used for hot-reload detection.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::UNIX_EPOCH;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::shader::ShaderStage;

/// Resolves source identifiers to raw source bytes
pub trait ShaderSourceLoader: Send + Sync {
    /// Read the source behind `identifier`
    ///
    /// # Errors
    ///
    /// `Error::SourceUnavailable` when the identifier cannot be resolved.
    fn load(&self, identifier: &str) -> Result<Vec<u8>>;

    /// Revision of the source, changes whenever the source changes
    ///
    /// `None` when the source is unknown or the loader cannot tell.
    fn revision(&self, identifier: &str) -> Option<u64>;

    /// `load` with the stage recorded in the error
    fn load_stage(&self, stage: ShaderStage, identifier: &str) -> Result<Vec<u8>> {
        self.load(identifier).map_err(|error| match error {
            Error::SourceUnavailable { identifier, reason, .. } => Error::SourceUnavailable {
                stage: Some(stage),
                identifier,
                reason,
            },
            other => other,
        })
    }
}

// ===== FILE LOADER =====

/// Loads sources from the filesystem
///
/// Relative identifiers are resolved against the loader root; the revision is
/// the file modification time in nanoseconds.
#[derive(Debug, Clone)]
pub struct FileSourceLoader {
    root: PathBuf,
}

impl FileSourceLoader {
    /// Create a loader resolving identifiers against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the loader
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an identifier resolves to
    pub fn resolve(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ShaderSourceLoader for FileSourceLoader {
    fn load(&self, identifier: &str) -> Result<Vec<u8>> {
        let path = self.resolve(identifier);
        std::fs::read(&path).map_err(|e| Error::SourceUnavailable {
            stage: None,
            identifier: identifier.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })
    }

    fn revision(&self, identifier: &str) -> Option<u64> {
        let modified = std::fs::metadata(self.resolve(identifier)).ok()?.modified().ok()?;
        let since_epoch = modified.duration_since(UNIX_EPOCH).ok()?;
        Some(since_epoch.as_nanos() as u64)
    }
}

// ===== MEMORY LOADER =====

/// In-memory sources keyed by identifier
///
/// Every `insert` gives the source a new revision, so replacing a source is
/// seen as a change by hot reload.
#[derive(Default)]
pub struct MemorySourceLoader {
    sources: RwLock<FxHashMap<String, (Vec<u8>, u64)>>,
    next_revision: AtomicU64,
}

impl MemorySourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a source, returns its new revision
    pub fn insert(&self, identifier: impl Into<String>, source: impl Into<Vec<u8>>) -> u64 {
        let revision = self.next_revision.fetch_add(1, Ordering::Relaxed) + 1;
        self.write().insert(identifier.into(), (source.into(), revision));
        revision
    }

    /// Remove a source, returns whether it existed
    pub fn remove(&self, identifier: &str) -> bool {
        self.write().remove(identifier).is_some()
    }

    /// Number of stored sources
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Entries are replaced whole, a poisoned map is still consistent
    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<String, (Vec<u8>, u64)>> {
        self.sources.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<String, (Vec<u8>, u64)>> {
        self.sources.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ShaderSourceLoader for MemorySourceLoader {
    fn load(&self, identifier: &str) -> Result<Vec<u8>> {
        self.read()
            .get(identifier)
            .map(|(source, _)| source.clone())
            .ok_or_else(|| Error::SourceUnavailable {
                stage: None,
                identifier: identifier.to_string(),
                reason: "not registered".to_string(),
            })
    }

    fn revision(&self, identifier: &str) -> Option<u64> {
        self.read().get(identifier).map(|(_, revision)| *revision)
    }
}

#[cfg(test)]
#[path = "source_loader_tests.rs"]
mod tests;
