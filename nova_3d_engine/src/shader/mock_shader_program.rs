/// Mock shader program backend for unit tests (no GPU required)
///
/// "Compiles" each populated stage by reading it through the loader; a source
/// containing `#error` fails compilation. Every successful reload allocates a
/// new program handle, and replaced or dropped handles are recorded in a
/// shared release log so tests can verify resource teardown.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};
use crate::error::{Error, Result};
use crate::shader::{
    ShaderProgram, ShaderSources, ShaderSourceLoader, ShaderStage, ShaderStageFlags,
    ProgramState,
};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Backend objects built by a successful reload
#[derive(Debug)]
pub struct MockLinkedProgram {
    pub handle: u64,
    pub stages: ShaderStageFlags,
    pub compiled: Vec<(ShaderStage, Vec<u8>)>,
}

pub struct MockShaderProgram {
    sources: ShaderSources,
    loader: Arc<dyn ShaderSourceLoader>,
    state: ProgramState,
    linked: Option<MockLinkedProgram>,
    released: Arc<Mutex<Vec<u64>>>,
    pub reload_count: usize,
}

impl MockShaderProgram {
    pub fn new(sources: ShaderSources, loader: Arc<dyn ShaderSourceLoader>) -> Self {
        Self {
            sources,
            loader,
            state: ProgramState::Unlinked,
            linked: None,
            released: Arc::new(Mutex::new(Vec::new())),
            reload_count: 0,
        }
    }

    /// Share a release log with other programs
    pub fn with_release_log(mut self, released: Arc<Mutex<Vec<u64>>>) -> Self {
        self.released = released;
        self
    }

    pub fn release_log(&self) -> Arc<Mutex<Vec<u64>>> {
        self.released.clone()
    }

    pub fn linked(&self) -> Option<&MockLinkedProgram> {
        self.linked.as_ref()
    }

    fn build(&self) -> Result<MockLinkedProgram> {
        self.sources.require_vertex_fragment()?;

        let mut compiled = Vec::new();
        for (stage, identifier) in self.sources.iter_used() {
            let code = self.loader.load_stage(stage, identifier)?;
            let text = String::from_utf8_lossy(&code);
            if let Some(pos) = text.find("#error") {
                return Err(Error::CompileFailed {
                    stage,
                    message: text[pos + "#error".len()..].trim().to_string(),
                });
            }
            compiled.push((stage, code));
        }

        Ok(MockLinkedProgram {
            handle: NEXT_HANDLE.fetch_add(1, Ordering::Relaxed),
            stages: self.sources.used_stages(),
            compiled,
        })
    }

    fn release(&self, linked: MockLinkedProgram) {
        self.released.lock().unwrap().push(linked.handle);
    }
}

impl ShaderProgram for MockShaderProgram {
    fn sources(&self) -> &ShaderSources {
        &self.sources
    }

    fn reload_shader(&mut self) -> Result<()> {
        self.reload_count += 1;
        match self.build() {
            Ok(linked) => {
                if let Some(previous) = self.linked.replace(linked) {
                    self.release(previous);
                }
                self.state = ProgramState::Linked;
                Ok(())
            }
            Err(error) => {
                // Keep the previous program when there is one
                if self.linked.is_none() {
                    self.state = ProgramState::Invalid;
                }
                Err(error)
            }
        }
    }

    fn state(&self) -> ProgramState {
        self.state
    }
}

impl Drop for MockShaderProgram {
    fn drop(&mut self) {
        if let Some(linked) = self.linked.take() {
            self.release(linked);
        }
    }
}
