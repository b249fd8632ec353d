/*!
# Nova3D Engine

Core traits and types for multi-stage shader programs in the Nova3D engine.

The crate defines the platform-agnostic program contract using trait-based
dynamic polymorphism. Backend implementations (OpenGL, Vulkan, etc.) provide
concrete program types that compile, link and release GPU objects.

## Architecture

- **ShaderStage**: Pipeline stages with legacy tessellation aliases
- **ShaderSources**: Per-stage table of source identifiers
- **ShaderProgram**: Backend program trait with the `reload_shader` contract
- **ShaderSourceLoader**: Collaborator resolving identifiers to source bytes
- **ShaderLibrary**: Program cache with reload and hot reload
- **Vector4i**: Integer 4-vector value type
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod math;
pub mod shader;

// Main nova3d namespace module
pub mod nova3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }
}

// Re-export math library at crate root
pub use glam;
