/// Shader program cache with reload and hot-reload support.
///
/// The library exclusively owns its programs. Removing a program (or dropping
/// the library) drops it, which releases its backend resources.
///
/// Hot reload polls a [`ShaderSourceLoader`] for the revision of every
/// populated stage and reloads the programs whose sources changed since their
/// last reload attempt. A failed reload is logged and reported, never fatal;
/// the same revision is not retried until the source changes again.
///
/// Explicit reloads record revisions too when the library knows its loader
/// (see [`ShaderLibrary::with_source_loader`]), so a poll right after
/// [`ShaderLibrary::reload_all`] does not rebuild unchanged programs.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::shader::{ShaderProgram, ShaderSourceLoader, ShaderStage};

new_key_type! {
    /// Stable key of a program stored in a [`ShaderLibrary`]
    pub struct ShaderProgramKey;
}

/// Outcome of a batch reload
#[derive(Debug, Default)]
pub struct ReloadReport {
    /// Programs reloaded successfully
    pub reloaded: Vec<ShaderProgramKey>,
    /// Programs whose reload failed, with the error
    pub failed: Vec<(ShaderProgramKey, Error)>,
}

impl ReloadReport {
    /// Whether every attempted reload succeeded
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of programs a reload was attempted on
    pub fn attempted(&self) -> usize {
        self.reloaded.len() + self.failed.len()
    }
}

struct ProgramEntry {
    name: String,
    program: Box<dyn ShaderProgram>,
    /// Source revision per stage seen at the last reload attempt
    revisions: Option<[Option<u64>; ShaderStage::MAX_SIZE]>,
}

/// Named shader program cache
pub struct ShaderLibrary {
    programs: SlotMap<ShaderProgramKey, ProgramEntry>,
    names: FxHashMap<String, ShaderProgramKey>,
    source_loader: Option<Arc<dyn ShaderSourceLoader>>,
}

impl ShaderLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self {
            programs: SlotMap::with_key(),
            names: FxHashMap::default(),
            source_loader: None,
        }
    }

    /// Create an empty library whose explicit reloads record source revisions
    pub fn with_source_loader(loader: Arc<dyn ShaderSourceLoader>) -> Self {
        Self {
            source_loader: Some(loader),
            ..Self::new()
        }
    }

    /// Set or clear the loader used to record revisions on explicit reloads
    pub fn set_source_loader(&mut self, loader: Option<Arc<dyn ShaderSourceLoader>>) {
        self.source_loader = loader;
    }

    pub fn source_loader(&self) -> Option<&Arc<dyn ShaderSourceLoader>> {
        self.source_loader.as_ref()
    }

    // ===== STORAGE =====

    /// Store a program under a unique name
    ///
    /// The program is stored as given; call [`ShaderLibrary::reload`] to build
    /// its backend state.
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` if the name is already taken.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        program: Box<dyn ShaderProgram>,
    ) -> Result<ShaderProgramKey> {
        let name = name.into();
        if self.names.contains_key(&name) {
            crate::engine_error!("nova3d::ShaderLibrary",
                "Program '{}' already exists", name);
            return Err(Error::InvalidResource(format!("Program '{}' already exists", name)));
        }

        let key = self.programs.insert(ProgramEntry {
            name: name.clone(),
            program,
            revisions: None,
        });
        crate::engine_debug!("nova3d::ShaderLibrary", "Inserted program '{}'", name);
        self.names.insert(name, key);
        Ok(key)
    }

    /// Remove a program and hand it back to the caller
    ///
    /// Dropping the returned program releases its backend resources.
    pub fn remove(&mut self, key: ShaderProgramKey) -> Option<Box<dyn ShaderProgram>> {
        let entry = self.programs.remove(key)?;
        self.names.remove(&entry.name);
        crate::engine_debug!("nova3d::ShaderLibrary", "Removed program '{}'", entry.name);
        Some(entry.program)
    }

    /// Get a program by key
    pub fn get(&self, key: ShaderProgramKey) -> Option<&dyn ShaderProgram> {
        self.programs.get(key).map(|entry| entry.program.as_ref())
    }

    /// Get a mutable program by key
    pub fn get_mut(&mut self, key: ShaderProgramKey) -> Option<&mut (dyn ShaderProgram + 'static)> {
        self.programs.get_mut(key).map(|entry| entry.program.as_mut())
    }

    /// Get a program by name
    pub fn get_by_name(&self, name: &str) -> Option<&dyn ShaderProgram> {
        self.get(self.key_by_name(name)?)
    }

    /// Key of a named program
    pub fn key_by_name(&self, name: &str) -> Option<ShaderProgramKey> {
        self.names.get(name).copied()
    }

    /// Name of a program
    pub fn name(&self, key: ShaderProgramKey) -> Option<&str> {
        self.programs.get(key).map(|entry| entry.name.as_str())
    }

    /// Names of all stored programs (unordered)
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    // ===== RELOAD =====

    /// Reload one program
    ///
    /// # Errors
    ///
    /// `Error::InvalidResource` for an unknown key, otherwise whatever the
    /// program's backend reports. Failures are logged.
    pub fn reload(&mut self, key: ShaderProgramKey) -> Result<()> {
        let entry = self.programs.get_mut(key).ok_or_else(|| {
            Error::InvalidResource("Unknown shader program key".to_string())
        })?;
        Self::reload_recorded(entry, self.source_loader.as_deref())
    }

    /// Reload every program
    pub fn reload_all(&mut self) -> ReloadReport {
        let mut report = ReloadReport::default();
        let loader = self.source_loader.as_deref();
        for (key, entry) in self.programs.iter_mut() {
            match Self::reload_recorded(entry, loader) {
                Ok(()) => report.reloaded.push(key),
                Err(error) => report.failed.push((key, error)),
            }
        }
        report
    }

    /// Reload the programs whose sources changed since their last reload
    ///
    /// A program seen for the first time is always reloaded and its current
    /// revisions recorded.
    pub fn reload_changed(&mut self, loader: &dyn ShaderSourceLoader) -> ReloadReport {
        let mut report = ReloadReport::default();
        for (key, entry) in self.programs.iter_mut() {
            let current = Self::current_revisions(entry.program.as_ref(), loader);
            if entry.revisions == Some(current) {
                continue;
            }

            crate::engine_debug!("nova3d::ShaderLibrary",
                "Sources of program '{}' changed", entry.name);
            for (stage, identifier) in entry.program.sources().iter_used() {
                if current[stage.index()].is_none() {
                    crate::engine_warn!("nova3d::ShaderLibrary",
                        "Program '{}': {} source '{}' has no revision",
                        entry.name, stage, identifier);
                }
            }
            let result = Self::reload_entry(entry);
            entry.revisions = Some(current);
            match result {
                Ok(()) => report.reloaded.push(key),
                Err(error) => report.failed.push((key, error)),
            }
        }
        report
    }

    /// Reload an entry, recording the revisions seen before the attempt
    fn reload_recorded(
        entry: &mut ProgramEntry,
        loader: Option<&dyn ShaderSourceLoader>,
    ) -> Result<()> {
        if let Some(loader) = loader {
            entry.revisions = Some(Self::current_revisions(entry.program.as_ref(), loader));
        }
        Self::reload_entry(entry)
    }

    fn current_revisions(
        program: &dyn ShaderProgram,
        loader: &dyn ShaderSourceLoader,
    ) -> [Option<u64>; ShaderStage::MAX_SIZE] {
        let mut revisions = [None; ShaderStage::MAX_SIZE];
        for (stage, identifier) in program.sources().iter_used() {
            revisions[stage.index()] = loader.revision(identifier);
        }
        revisions
    }

    fn reload_entry(entry: &mut ProgramEntry) -> Result<()> {
        match entry.program.reload_shader() {
            Ok(()) => {
                crate::engine_info!("nova3d::ShaderLibrary",
                    "Program '{}' reloaded", entry.name);
                Ok(())
            }
            Err(error) => {
                crate::engine_error!("nova3d::ShaderLibrary",
                    "Reload of program '{}' failed: {} (state: {:?})",
                    entry.name, error, entry.program.state());
                Err(error)
            }
        }
    }
}

impl Default for ShaderLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "shader_library_tests.rs"]
mod tests;
