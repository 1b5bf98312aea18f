use crate::error::BackendError;
use crate::loader::{ImageData, ShaderSource};
use crate::vertex::Vertex;
use tessera_core::{Color, SurfaceTarget};

pub mod recording;
pub mod software;
pub mod wgpu;

pub use self::recording::{BackendCommand, FailurePlan, RecordingBackend, RecordingHandle};
pub use self::software::SoftwareBackend;
pub use self::wgpu::WgpuBackend;

/// One batch of tessellated geometry with its resolved resources.
///
/// `texture` and `shader` are `None` when nothing is bound or the bound
/// handle no longer resolves; backends then use their defaults.
#[derive(Debug)]
pub struct DrawCall<'a, T, S> {
    pub vertices: &'a [Vertex],
    pub texture: Option<&'a T>,
    pub shader: Option<&'a S>,
}

/// The narrow capability set a graphics API has to provide.
///
/// Handle tables, lifecycle checks and tessellation all live in
/// [`Renderer`](crate::Renderer); a backend only materializes resources and
/// moves pixels.
pub trait Backend {
    /// Backend-resident texture
    type Texture;
    /// Compiled vertex + fragment program
    type Shader;

    fn name(&self) -> &'static str;

    /// Acquire the device and the output target for `target`.
    fn create_surface(&mut self, target: SurfaceTarget) -> Result<(), BackendError>;

    /// Release the output target and device. Safe to call with nothing acquired.
    fn destroy_surface(&mut self);

    /// Replace the output target. The old target is released before the new
    /// one is created; on failure no target remains.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError>;

    /// Start a frame cleared to `clear`.
    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError>;

    /// Rasterize or queue a triangle list.
    fn draw(&mut self, call: DrawCall<'_, Self::Texture, Self::Shader>) -> Result<(), BackendError>;

    /// Finish the frame and make it visible.
    fn present(&mut self) -> Result<(), BackendError>;

    fn upload_texture(&mut self, image: &ImageData) -> Result<Self::Texture, BackendError>;

    fn release_texture(&mut self, texture: Self::Texture);

    fn compile_shader_pair(
        &mut self,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<Self::Shader, BackendError>;

    fn release_shader(&mut self, shader: Self::Shader);
}
