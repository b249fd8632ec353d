/// Programmable pipeline stages a shader program can bind sources to.
///
/// The declaration order is the stage ordinal used to index the per-program
/// stage table. Tessellation stages are also reachable through their legacy
/// names [`ShaderStage::TESS_CONTROL`] and [`ShaderStage::TESS_EVAL`]; those are
/// aliases of `Domain` and `Hull`, not extra slots.

use std::fmt;
use bitflags::bitflags;

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
    /// Geometry shader
    Geometry,
    /// Tessellation domain shader (alias: TessControl)
    Domain,
    /// Tessellation hull shader (alias: TessEval)
    Hull,
    /// Mesh shader
    Mesh,
    /// Task/amplification shader
    Task,
}

impl ShaderStage {
    /// Number of real stages, i.e. the size of a stage table
    pub const MAX_SIZE: usize = 7;

    /// Legacy name for [`ShaderStage::Domain`]
    pub const TESS_CONTROL: ShaderStage = ShaderStage::Domain;

    /// Legacy name for [`ShaderStage::Hull`]
    pub const TESS_EVAL: ShaderStage = ShaderStage::Hull;

    /// Every stage, in ordinal order
    pub const ALL: [ShaderStage; Self::MAX_SIZE] = [
        ShaderStage::Vertex,
        ShaderStage::Fragment,
        ShaderStage::Geometry,
        ShaderStage::Domain,
        ShaderStage::Hull,
        ShaderStage::Mesh,
        ShaderStage::Task,
    ];

    /// Ordinal of the stage, usable as a stage table index
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Stage for a table index, `None` for indices >= `MAX_SIZE`
    pub fn from_index(index: usize) -> Option<ShaderStage> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable stage name
    pub const fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "Vertex",
            ShaderStage::Fragment => "Fragment",
            ShaderStage::Geometry => "Geometry",
            ShaderStage::Domain => "Domain",
            ShaderStage::Hull => "Hull",
            ShaderStage::Mesh => "Mesh",
            ShaderStage::Task => "Task",
        }
    }

    /// Single-stage flag for this stage
    pub const fn flag(self) -> ShaderStageFlags {
        match self {
            ShaderStage::Vertex => ShaderStageFlags::VERTEX,
            ShaderStage::Fragment => ShaderStageFlags::FRAGMENT,
            ShaderStage::Geometry => ShaderStageFlags::GEOMETRY,
            ShaderStage::Domain => ShaderStageFlags::DOMAIN,
            ShaderStage::Hull => ShaderStageFlags::HULL,
            ShaderStage::Mesh => ShaderStageFlags::MESH,
            ShaderStage::Task => ShaderStageFlags::TASK,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Set of shader stages, e.g. the stages a program has sources for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
        const GEOMETRY = 1 << 2;
        const DOMAIN = 1 << 3;
        const HULL = 1 << 4;
        const MESH = 1 << 5;
        const TASK = 1 << 6;

        const TESS_CONTROL = Self::DOMAIN.bits();
        const TESS_EVAL = Self::HULL.bits();
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
    }
}

impl ShaderStageFlags {
    /// Build a flag set from a list of stages
    pub fn from_stages(stages: &[ShaderStage]) -> Self {
        stages.iter().fold(Self::empty(), |flags, stage| flags | stage.flag())
    }

    /// Whether `stage` is part of the set
    pub fn has_stage(self, stage: ShaderStage) -> bool {
        self.contains(stage.flag())
    }

    /// Stages of the set in ordinal order
    pub fn stages(self) -> impl Iterator<Item = ShaderStage> {
        ShaderStage::ALL.into_iter().filter(move |stage| self.has_stage(*stage))
    }
}

#[cfg(test)]
#[path = "shader_stage_tests.rs"]
mod tests;
