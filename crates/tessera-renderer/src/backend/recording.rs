//! Backend that draws nothing and logs every call
//!
//! Useful wherever a real device is unavailable or beside the point: the
//! command log shows exactly what the renderer core asked the backend to do,
//! and a [`FailurePlan`] lets a caller make any step fail on demand.

use super::{Backend, DrawCall};
use crate::error::BackendError;
use crate::loader::{ImageData, ShaderSource};
use std::cell::RefCell;
use std::rc::Rc;
use tessera_core::{Color, SurfaceTarget};

/// One call received by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    CreateSurface { width: u32, height: u32 },
    DestroySurface,
    Resize { width: u32, height: u32 },
    BeginFrame { clear: Color },
    Draw {
        vertex_count: usize,
        texture: Option<u32>,
        shader: Option<u32>,
    },
    Present,
    UploadTexture { id: u32, width: u32, height: u32 },
    ReleaseTexture { id: u32 },
    CompileShader { id: u32 },
    ReleaseShader { id: u32 },
}

/// Which steps should fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailurePlan {
    pub create_surface: bool,
    pub resize: bool,
    pub begin_frame: bool,
    pub present: bool,
    pub upload_texture: bool,
    pub compile_shader: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedTexture(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedShader(pub u32);

#[derive(Debug, Default)]
struct Shared {
    commands: Vec<BackendCommand>,
    failures: FailurePlan,
    has_surface: bool,
    live_textures: usize,
    live_shaders: usize,
}

/// Shared view of a [`RecordingBackend`] that outlives moving the backend
/// into a renderer.
#[derive(Debug, Clone)]
pub struct RecordingHandle {
    shared: Rc<RefCell<Shared>>,
}

impl RecordingHandle {
    /// Commands received so far
    pub fn commands(&self) -> Vec<BackendCommand> {
        self.shared.borrow().commands.clone()
    }

    /// Return and forget the commands received so far
    pub fn take_commands(&self) -> Vec<BackendCommand> {
        std::mem::take(&mut self.shared.borrow_mut().commands)
    }

    pub fn set_failures(&self, plan: FailurePlan) {
        self.shared.borrow_mut().failures = plan;
    }

    pub fn update_failures(&self, f: impl FnOnce(&mut FailurePlan)) {
        f(&mut self.shared.borrow_mut().failures);
    }

    pub fn has_surface(&self) -> bool {
        self.shared.borrow().has_surface
    }

    pub fn live_textures(&self) -> usize {
        self.shared.borrow().live_textures
    }

    pub fn live_shaders(&self) -> usize {
        self.shared.borrow().live_shaders
    }
}

#[derive(Debug)]
pub struct RecordingBackend {
    shared: Rc<RefCell<Shared>>,
    next_object: u32,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared::default())),
            next_object: 1,
        }
    }

    pub fn with_failures(plan: FailurePlan) -> Self {
        let backend = Self::new();
        backend.shared.borrow_mut().failures = plan;
        backend
    }

    pub fn handle(&self) -> RecordingHandle {
        RecordingHandle {
            shared: Rc::clone(&self.shared),
        }
    }

    fn record(&self, command: BackendCommand) {
        self.shared.borrow_mut().commands.push(command);
    }

    fn failures(&self) -> FailurePlan {
        self.shared.borrow().failures
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_object;
        self.next_object += 1;
        id
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for RecordingBackend {
    type Texture = RecordedTexture;
    type Shader = RecordedShader;

    fn name(&self) -> &'static str {
        "recording"
    }

    fn create_surface(&mut self, target: SurfaceTarget) -> Result<(), BackendError> {
        if self.failures().create_surface {
            return Err(BackendError::SurfaceCreation("scripted failure".to_string()));
        }
        self.record(BackendCommand::CreateSurface {
            width: target.width,
            height: target.height,
        });
        self.shared.borrow_mut().has_surface = true;
        Ok(())
    }

    fn destroy_surface(&mut self) {
        self.record(BackendCommand::DestroySurface);
        self.shared.borrow_mut().has_surface = false;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        // Old target goes first, whatever happens next
        self.shared.borrow_mut().has_surface = false;
        if self.failures().resize {
            return Err(BackendError::SurfaceCreation("scripted failure".to_string()));
        }
        self.record(BackendCommand::Resize { width, height });
        self.shared.borrow_mut().has_surface = true;
        Ok(())
    }

    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError> {
        if self.failures().begin_frame {
            return Err(BackendError::Frame("scripted failure".to_string()));
        }
        self.record(BackendCommand::BeginFrame { clear });
        Ok(())
    }

    fn draw(
        &mut self,
        call: DrawCall<'_, RecordedTexture, RecordedShader>,
    ) -> Result<(), BackendError> {
        self.record(BackendCommand::Draw {
            vertex_count: call.vertices.len(),
            texture: call.texture.map(|t| t.0),
            shader: call.shader.map(|s| s.0),
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        if self.failures().present {
            return Err(BackendError::Present("scripted failure".to_string()));
        }
        self.record(BackendCommand::Present);
        Ok(())
    }

    fn upload_texture(&mut self, image: &ImageData) -> Result<RecordedTexture, BackendError> {
        if self.failures().upload_texture {
            return Err(BackendError::TextureUpload("scripted failure".to_string()));
        }
        let id = self.next_id();
        self.record(BackendCommand::UploadTexture {
            id,
            width: image.width,
            height: image.height,
        });
        self.shared.borrow_mut().live_textures += 1;
        Ok(RecordedTexture(id))
    }

    fn release_texture(&mut self, texture: RecordedTexture) {
        self.record(BackendCommand::ReleaseTexture { id: texture.0 });
        let mut shared = self.shared.borrow_mut();
        shared.live_textures = shared.live_textures.saturating_sub(1);
    }

    fn compile_shader_pair(
        &mut self,
        _vertex: &ShaderSource,
        _fragment: &ShaderSource,
    ) -> Result<RecordedShader, BackendError> {
        if self.failures().compile_shader {
            return Err(BackendError::ShaderCompilation("scripted failure".to_string()));
        }
        let id = self.next_id();
        self.record(BackendCommand::CompileShader { id });
        self.shared.borrow_mut().live_shaders += 1;
        Ok(RecordedShader(id))
    }

    fn release_shader(&mut self, shader: RecordedShader) {
        self.record(BackendCommand::ReleaseShader { id: shader.0 });
        let mut shared = self.shared.borrow_mut();
        shared.live_shaders = shared.live_shaders.saturating_sub(1);
    }
}
