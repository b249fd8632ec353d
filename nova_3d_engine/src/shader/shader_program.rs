//! Multi-stage shader program abstraction.
//!
//! A program records, per pipeline stage, the identifier of the source bound
//! to that stage ([`ShaderSources`]) and exposes a single backend operation,
//! [`ShaderProgram::reload_shader`], that (re)builds backend state for every
//! populated stage.
//!
//! Backends (OpenGL, Vulkan, ...) implement [`ShaderProgram`] on their own
//! type. Backend resources are released when that type is dropped.
//!
//! # Example
//!
//! ```no_run
//! use nova_3d_engine::nova3d::Result;
//! use nova_3d_engine::nova3d::shader::{ShaderProgram, ShaderSources, ProgramState};
//!
//! struct GlProgram {
//!     sources: ShaderSources,
//!     state: ProgramState,
//! }
//!
//! impl ShaderProgram for GlProgram {
//!     fn sources(&self) -> &ShaderSources { &self.sources }
//!     fn state(&self) -> ProgramState { self.state }
//!     fn reload_shader(&mut self) -> Result<()> {
//!         self.sources.require_vertex_fragment()?;
//!         // compile + link every used stage...
//!         self.state = ProgramState::Linked;
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::{Error, Result};
use crate::shader::{ShaderStage, ShaderStageFlags};

// ===== DESCRIPTOR =====

/// Program construction descriptor
///
/// An empty string means "stage unused". Mesh and task stages cannot be bound
/// through this descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramDesc {
    pub vertex: String,
    pub fragment: String,
    pub geometry: String,
    pub domain: String,
    pub hull: String,
}

// ===== STAGE TABLE =====

/// Fixed stage-indexed table of source identifiers
///
/// One slot per [`ShaderStage`]; an empty identifier marks an unused stage.
/// The table cannot be changed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSources {
    slots: [String; ShaderStage::MAX_SIZE],
}

impl ShaderSources {
    /// Bind a vertex and a fragment source, every other stage unused
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::from_desc(ShaderProgramDesc {
            vertex: vertex.into(),
            fragment: fragment.into(),
            ..Default::default()
        })
    }

    /// Bind the five constructor-settable stages from a descriptor
    ///
    /// No source is read here, this only records which identifier feeds
    /// which stage.
    pub fn from_desc(desc: ShaderProgramDesc) -> Self {
        let mut slots: [String; ShaderStage::MAX_SIZE] = Default::default();
        slots[ShaderStage::Vertex.index()] = desc.vertex;
        slots[ShaderStage::Fragment.index()] = desc.fragment;
        slots[ShaderStage::Geometry.index()] = desc.geometry;
        slots[ShaderStage::Domain.index()] = desc.domain;
        slots[ShaderStage::Hull.index()] = desc.hull;
        Self { slots }
    }

    /// Identifier bound to `stage`, empty when unused
    pub fn get(&self, stage: ShaderStage) -> &str {
        &self.slots[stage.index()]
    }

    /// Whether a source is bound to `stage`
    pub fn is_used(&self, stage: ShaderStage) -> bool {
        !self.slots[stage.index()].is_empty()
    }

    /// Flags of every populated stage
    pub fn used_stages(&self) -> ShaderStageFlags {
        self.iter_used()
            .fold(ShaderStageFlags::empty(), |flags, (stage, _)| flags | stage.flag())
    }

    /// Populated stages with their identifier, in stage order
    pub fn iter_used(&self) -> impl Iterator<Item = (ShaderStage, &str)> {
        ShaderStage::ALL
            .into_iter()
            .zip(self.slots.iter())
            .filter(|(_, identifier)| !identifier.is_empty())
            .map(|(stage, identifier)| (stage, identifier.as_str()))
    }

    /// Fails with `BindingError` on the first required stage left empty
    pub fn require(&self, stages: &[ShaderStage]) -> Result<()> {
        match stages.iter().find(|stage| !self.is_used(**stage)) {
            Some(&stage) => Err(Error::BindingError { stage }),
            None => Ok(()),
        }
    }

    /// `require` for the vertex + fragment pair every raster program needs
    pub fn require_vertex_fragment(&self) -> Result<()> {
        self.require(&[ShaderStage::Vertex, ShaderStage::Fragment])
    }
}

// ===== PROGRAM STATE =====

/// Backend state of a program
///
/// ```text
/// Unlinked --reload ok--> Linked --reload ok--> Linked
///     |                     |
///     +--reload err--> Invalid <--reload err (nothing to keep)
///                         |
///                         +--reload ok--> Linked
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramState {
    /// Constructed, no backend resources yet
    #[default]
    Unlinked,
    /// Backend resources built from the current sources
    Linked,
    /// Last reload failed and no working backend state is held
    Invalid,
}

// ===== PROGRAM TRAIT =====

/// Backend shader program
///
/// A conforming `reload_shader` (re)acquires or recompiles backend resources
/// for every populated stage of [`ShaderProgram::sources`]. On failure it
/// returns the error and either keeps the previous working backend state
/// (state stays `Linked`) or drops it and reports `Invalid`; it never keeps
/// references to freed resources.
///
/// Reloads are synchronous. Implementations are not required to be
/// reentrant: callers serialize access (the [`ShaderLibrary`] is shared
/// behind a mutex).
///
/// [`ShaderLibrary`]: crate::shader::ShaderLibrary
pub trait ShaderProgram: Send {
    /// Stage table of the program
    fn sources(&self) -> &ShaderSources;

    /// Rebuild backend state for every populated stage
    fn reload_shader(&mut self) -> Result<()>;

    /// Current backend state
    fn state(&self) -> ProgramState;

    /// Whether the program can be used for drawing
    fn is_usable(&self) -> bool {
        self.state() == ProgramState::Linked
    }
}

#[cfg(test)]
#[path = "shader_program_tests.rs"]
mod tests;
