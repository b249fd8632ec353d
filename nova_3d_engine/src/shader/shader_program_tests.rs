//! Unit tests for the stage table and the reload contract
//!
//! Uses MockShaderProgram as backend, no GPU required.

use std::sync::Arc;
use super::*;
use crate::shader::MemorySourceLoader;
use crate::shader::mock_shader_program::MockShaderProgram;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn loader_with(sources: &[(&str, &str)]) -> Arc<MemorySourceLoader> {
    let loader = Arc::new(MemorySourceLoader::new());
    for (identifier, source) in sources {
        loader.insert(*identifier, *source);
    }
    loader
}

// ============================================================================
// ShaderSources construction
// ============================================================================

#[test]
fn test_vertex_fragment_only_leaves_other_slots_empty() {
    let sources = ShaderSources::new("vs.glsl", "fs.glsl");

    assert_eq!(sources.get(ShaderStage::Vertex), "vs.glsl");
    assert_eq!(sources.get(ShaderStage::Fragment), "fs.glsl");
    for stage in [
        ShaderStage::Geometry,
        ShaderStage::Domain,
        ShaderStage::Hull,
        ShaderStage::Mesh,
        ShaderStage::Task,
    ] {
        assert_eq!(sources.get(stage), "");
        assert!(!sources.is_used(stage));
    }
}

#[test]
fn test_geometry_stage_binding() {
    let sources = ShaderSources::from_desc(ShaderProgramDesc {
        vertex: "vs.glsl".to_string(),
        fragment: "fs.glsl".to_string(),
        geometry: "gs.glsl".to_string(),
        ..Default::default()
    });

    assert_eq!(sources.get(ShaderStage::Geometry), "gs.glsl");
    assert_eq!(sources.get(ShaderStage::Domain), "");
    assert_eq!(sources.get(ShaderStage::Hull), "");
    assert_eq!(sources.get(ShaderStage::Mesh), "");
    assert_eq!(sources.get(ShaderStage::Task), "");
}

#[test]
fn test_all_five_constructor_stages() {
    let sources = ShaderSources::from_desc(ShaderProgramDesc {
        vertex: "a.vert".to_string(),
        fragment: "a.frag".to_string(),
        geometry: "a.geom".to_string(),
        domain: "a.tesc".to_string(),
        hull: "a.tese".to_string(),
    });

    assert_eq!(sources.get(ShaderStage::TESS_CONTROL), "a.tesc");
    assert_eq!(sources.get(ShaderStage::TESS_EVAL), "a.tese");
    assert_eq!(
        sources.used_stages(),
        ShaderStageFlags::VERTEX_FRAGMENT
            | ShaderStageFlags::GEOMETRY
            | ShaderStageFlags::DOMAIN
            | ShaderStageFlags::HULL
    );
    assert!(!sources.is_used(ShaderStage::Mesh));
    assert!(!sources.is_used(ShaderStage::Task));
}

#[test]
fn test_empty_arguments_leave_slots_empty() {
    let sources = ShaderSources::from_desc(ShaderProgramDesc {
        vertex: "v".to_string(),
        fragment: "f".to_string(),
        geometry: String::new(),
        domain: "d".to_string(),
        hull: String::new(),
    });

    let used: Vec<ShaderStage> = sources.iter_used().map(|(stage, _)| stage).collect();
    assert_eq!(used, vec![ShaderStage::Vertex, ShaderStage::Fragment, ShaderStage::Domain]);
}

#[test]
fn test_degenerate_program_is_not_rejected_at_construction() {
    let sources = ShaderSources::default();
    assert!(sources.used_stages().is_empty());
    assert_eq!(sources.iter_used().count(), 0);
}

// ============================================================================
// Required stage checks
// ============================================================================

#[test]
fn test_require_reports_first_missing_stage() {
    let sources = ShaderSources::new("", "fs.glsl");
    assert_eq!(
        sources.require_vertex_fragment(),
        Err(Error::BindingError { stage: ShaderStage::Vertex })
    );

    let sources = ShaderSources::new("vs.glsl", "");
    assert_eq!(
        sources.require(&[ShaderStage::Vertex, ShaderStage::Fragment, ShaderStage::Geometry]),
        Err(Error::BindingError { stage: ShaderStage::Fragment })
    );
}

#[test]
fn test_require_passes_when_bound() {
    let sources = ShaderSources::new("vs.glsl", "fs.glsl");
    assert!(sources.require_vertex_fragment().is_ok());
    assert!(sources.require(&[]).is_ok());
}

// ============================================================================
// Reload lifecycle (MockShaderProgram backend)
// ============================================================================

#[test]
fn test_new_program_is_unlinked() {
    let program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader_with(&[]));
    assert_eq!(program.state(), ProgramState::Unlinked);
    assert!(!program.is_usable());
}

#[test]
fn test_reload_links_program() {
    let loader = loader_with(&[("a.vert", "void main() {}"), ("a.frag", "void main() {}")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader);

    program.reload_shader().unwrap();

    assert_eq!(program.state(), ProgramState::Linked);
    assert!(program.is_usable());
    let linked = program.linked().unwrap();
    assert_eq!(linked.stages, ShaderStageFlags::VERTEX_FRAGMENT);
    assert_eq!(linked.compiled.len(), 2);
}

#[test]
fn test_reload_with_missing_required_stage_is_binding_error() {
    let loader = loader_with(&[("a.frag", "void main() {}")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("", "a.frag"), loader);

    let result = program.reload_shader();

    assert_eq!(result, Err(Error::BindingError { stage: ShaderStage::Vertex }));
    assert_eq!(program.state(), ProgramState::Invalid);
}

#[test]
fn test_reload_with_unavailable_source() {
    let loader = loader_with(&[("a.vert", "void main() {}")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader);

    let result = program.reload_shader();

    assert!(matches!(
        result,
        Err(Error::SourceUnavailable { stage: Some(ShaderStage::Fragment), .. })
    ));
    assert_eq!(program.state(), ProgramState::Invalid);
}

#[test]
fn test_second_reload_replaces_and_releases_resources() {
    let loader = loader_with(&[("a.vert", "v"), ("a.frag", "f")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader);

    program.reload_shader().unwrap();
    let first = program.linked().unwrap().handle;
    program.reload_shader().unwrap();
    let second = program.linked().unwrap().handle;

    assert_ne!(first, second);
    assert_eq!(*program.release_log().lock().unwrap(), vec![first]);
    assert_eq!(program.state(), ProgramState::Linked);
}

#[test]
fn test_failed_reload_keeps_previous_working_state() {
    let loader = loader_with(&[("a.vert", "v"), ("a.frag", "f")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader.clone());
    program.reload_shader().unwrap();
    let handle = program.linked().unwrap().handle;

    loader.insert("a.frag", "#error missing semicolon");
    let result = program.reload_shader();

    assert_eq!(
        result,
        Err(Error::CompileFailed {
            stage: ShaderStage::Fragment,
            message: "missing semicolon".to_string(),
        })
    );
    assert_eq!(program.state(), ProgramState::Linked);
    assert_eq!(program.linked().unwrap().handle, handle);
    assert!(program.release_log().lock().unwrap().is_empty());
}

#[test]
fn test_invalid_program_recovers_on_retry() {
    let loader = loader_with(&[("a.vert", "#error nope"), ("a.frag", "f")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader.clone());

    assert!(program.reload_shader().is_err());
    assert_eq!(program.state(), ProgramState::Invalid);

    loader.insert("a.vert", "void main() {}");
    program.reload_shader().unwrap();
    assert_eq!(program.state(), ProgramState::Linked);
    assert_eq!(program.reload_count, 2);
}

#[test]
fn test_reload_does_not_change_populated_slots() {
    let loader = loader_with(&[("a.vert", "v"), ("a.frag", "f")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader);
    let before = program.sources().clone();

    program.reload_shader().unwrap();

    assert_eq!(program.sources(), &before);
}

#[test]
fn test_drop_releases_backend_resources() {
    let loader = loader_with(&[("a.vert", "v"), ("a.frag", "f")]);
    let mut program = MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader);
    program.reload_shader().unwrap();
    let handle = program.linked().unwrap().handle;
    let released = program.release_log();

    drop(program);

    assert_eq!(*released.lock().unwrap(), vec![handle]);
}

#[test]
fn test_program_is_usable_as_trait_object() {
    let loader = loader_with(&[("a.vert", "v"), ("a.frag", "f")]);
    let mut program: Box<dyn ShaderProgram> =
        Box::new(MockShaderProgram::new(ShaderSources::new("a.vert", "a.frag"), loader));

    program.reload_shader().unwrap();
    assert!(program.is_usable());
}
