//! Error types for the Nova3D engine
//!
//! This module defines the error types used throughout the engine,
//! including shader program binding/reload, source loading, value-type
//! precondition checks and engine singleton management.

use std::fmt;
use crate::shader::ShaderStage;

/// Result type for Nova3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Nova3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A stage required by the program has no source bound to it
    BindingError {
        stage: ShaderStage,
    },

    /// The source identifier could not be resolved by the loader
    SourceUnavailable {
        stage: Option<ShaderStage>,
        identifier: String,
        reason: String,
    },

    /// Backend compilation rejected a stage source
    CompileFailed {
        stage: ShaderStage,
        message: String,
    },

    /// Backend linking of the compiled stages failed
    LinkFailed(String),

    /// Component index outside of 0..len
    IndexOutOfRange {
        index: usize,
        len: usize,
    },

    /// Integer division with a zero divisor component
    DivisionByZero {
        component: usize,
    },

    /// Invalid resource (unknown key, duplicate name, etc.)
    InvalidResource(String),

    /// Backend-specific error
    BackendError(String),

    /// Initialization failed (engine, subsystems)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BindingError { stage } => {
                write!(f, "Binding error: required {} stage has no source", stage)
            }
            Error::SourceUnavailable { stage: Some(stage), identifier, reason } => {
                write!(f, "Source unavailable for {} stage '{}': {}", stage, identifier, reason)
            }
            Error::SourceUnavailable { stage: None, identifier, reason } => {
                write!(f, "Source unavailable '{}': {}", identifier, reason)
            }
            Error::CompileFailed { stage, message } => {
                write!(f, "Compilation of {} stage failed: {}", stage, message)
            }
            Error::LinkFailed(msg) => write!(f, "Link failed: {}", msg),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: {} (len {})", index, len)
            }
            Error::DivisionByZero { component } => {
                write!(f, "Division by zero in component {}", component)
            }
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
