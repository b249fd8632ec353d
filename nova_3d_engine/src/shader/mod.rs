//! Shader module — pipeline stages, multi-stage programs and their cache.
//!
//! The engine defines the program contract only. Compilation, linking and GPU
//! resource management belong to the backend implementing [`ShaderProgram`].

mod shader_stage;
mod shader_program;
mod source_loader;
mod shader_library;

pub use shader_stage::{ShaderStage, ShaderStageFlags};
pub use shader_program::{ShaderProgram, ShaderProgramDesc, ShaderSources, ProgramState};
pub use source_loader::{ShaderSourceLoader, FileSourceLoader, MemorySourceLoader};
pub use shader_library::{ShaderLibrary, ShaderProgramKey, ReloadReport};

// Mock backend for tests (no GPU required)
#[cfg(test)]
pub mod mock_shader_program;
