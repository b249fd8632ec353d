/// Nova3D Engine - Singleton manager for engine subsystems
///
/// This module provides global singleton management for the shader library
/// and the engine logger. It uses thread-safe static storage with RwLock for
/// safe concurrent access.

use std::sync::{OnceLock, RwLock, Arc, Mutex};
use std::time::SystemTime;
use crate::shader::ShaderLibrary;
use crate::error::{Result, Error};
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Internal state structure holding all engine singletons
struct EngineState {
    /// Shader library singleton (Mutex serializes reloads)
    shader_library: RwLock<Option<Arc<Mutex<ShaderLibrary>>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            shader_library: RwLock::new(None),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```no_run
/// use nova_3d_engine::nova3d::Engine;
///
/// Engine::initialize()?;
/// Engine::create_shader_library()?;
///
/// let library = Engine::shader_library()?;
/// let report = library.lock().unwrap().reload_all();
///
/// Engine::shutdown();
/// # Ok::<(), nova_3d_engine::nova3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Helper to log errors before returning them (internal use)
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::InitializationFailed(msg) => {
                crate::engine_error!("nova3d::Engine", "Initialization failed: {}", msg);
            }
            Error::BackendError(msg) => {
                crate::engine_error!("nova3d::Engine", "Backend error: {}", msg);
            }
            _ => {
                crate::engine_error!("nova3d::Engine", "Engine error: {}", error);
            }
        }
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
            ))
    }

    /// Initialize the engine
    ///
    /// Must be called once before creating any subsystem. Calling it again is
    /// harmless.
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Shutdown the engine and destroy all singletons
    ///
    /// Dropping the shader library drops every program it owns, releasing
    /// their backend resources.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut library) = state.shader_library.write() {
                *library = None;
            }
        }
    }

    // ===== SHADER LIBRARY API =====

    /// Create and register the shader library singleton
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is not initialized
    /// - A shader library already exists
    /// - The library lock is poisoned
    pub fn create_shader_library() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.shader_library.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("ShaderLibrary lock poisoned".to_string())
            ))?;

        if lock.is_some() {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed("ShaderLibrary already exists. Call Engine::destroy_shader_library() first.".to_string())
            ));
        }

        *lock = Some(Arc::new(Mutex::new(ShaderLibrary::new())));

        crate::engine_info!("nova3d::Engine", "ShaderLibrary singleton created successfully");

        Ok(())
    }

    /// Get the shader library singleton
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized or the library has
    /// not been created.
    pub fn shader_library() -> Result<Arc<Mutex<ShaderLibrary>>> {
        let state = Self::state()?;

        let lock = state.shader_library.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("ShaderLibrary lock poisoned".to_string())
            ))?;

        lock.clone()
            .ok_or_else(|| Self::log_and_return_error(
                Error::InitializationFailed("ShaderLibrary not created. Call Engine::create_shader_library() first.".to_string())
            ))
    }

    /// Destroy the shader library singleton
    ///
    /// Outstanding `Arc` handles keep the library (and its programs) alive
    /// until they are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is not initialized
    pub fn destroy_shader_library() -> Result<()> {
        let state = Self::state()?;

        let mut lock = state.shader_library.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("ShaderLibrary lock poisoned".to_string())
            ))?;

        *lock = None;

        crate::engine_info!("nova3d::Engine", "ShaderLibrary singleton destroyed");

        Ok(())
    }

    /// Reset all singletons for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    ///
    /// Replace the default logger with a custom implementation (file logger,
    /// test capture, etc.)
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(mut lock) = logger_lock.write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by the engine_error! macro to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        let logger_lock = LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)));
        if let Ok(lock) = logger_lock.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
