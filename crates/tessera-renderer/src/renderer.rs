//! Backend-independent renderer core
//!
//! [`Renderer`] owns everything that is the same for every graphics API: the
//! lifecycle state machine, the texture and shader handle tables, the drawing
//! state and tessellation. A [`Backend`] only creates surfaces, uploads,
//! compiles and moves pixels.
//!
//! [`RenderDevice`] is the object-safe face of a renderer, so callers can hold
//! a `Box<dyn RenderDevice>` without knowing the backend.

use crate::backend::{Backend, DrawCall};
use crate::error::RenderError;
use crate::loader::{self, ImageData};
use crate::resources::{ResourceHandle, ResourceTable, ShaderRecord, TextureRecord};
use crate::state::{FrameStats, Lifecycle, RendererState};
use crate::tessellation::{self, DEFAULT_CIRCLE_SEGMENTS};
use crate::vertex::Vertex;
use std::path::Path;
use tessera_core::logging::targets;
use tessera_core::{Color, NativeHandle, SurfaceTarget, Transform};
use tracing::{debug, info, trace, warn};

/// The full renderer API, independent of the backend behind it.
pub trait RenderDevice {
    /// Name of the backend doing the work
    fn backend_name(&self) -> &'static str;

    /// Bind to a drawing surface. Valid from `Uninitialized`, `Destroyed`, or
    /// while disabled by a failed `set_surface` (resources are kept then).
    fn initialize(&mut self, target: SurfaceTarget) -> Result<(), RenderError>;

    /// Release every resource and the surface. Idempotent.
    fn cleanup(&mut self);

    fn begin_frame(&mut self) -> Result<(), RenderError>;
    fn end_frame(&mut self) -> Result<(), RenderError>;

    /// Applied at the next `begin_frame`.
    fn set_clear_color(&mut self, color: Color);
    /// Color given to every vertex of later draw calls.
    fn set_draw_color(&mut self, color: Color);
    fn set_transform(&mut self, transform: Transform);

    fn draw_quad(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), RenderError>;
    fn draw_triangle(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Result<(), RenderError>;
    /// `segments` must be in `1..=MAX_CIRCLE_SEGMENTS`.
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, segments: u32)
        -> Result<(), RenderError>;

    /// Load an image file. Returns [`ResourceHandle::NONE`] on any failure.
    fn load_texture(&mut self, path: &Path) -> ResourceHandle;
    fn try_load_texture(&mut self, path: &Path) -> Result<ResourceHandle, RenderError>;
    /// Upload already decoded pixels.
    fn create_texture(&mut self, label: &str, image: &ImageData) -> Result<ResourceHandle, RenderError>;
    /// Bind a texture for later draws. 0 or an unknown handle unbinds.
    fn use_texture(&mut self, handle: ResourceHandle);
    /// Release one texture. Unknown or already released handles are ignored.
    fn release_texture(&mut self, handle: ResourceHandle);

    /// Load and compile a shader pair. Returns [`ResourceHandle::NONE`] on any failure.
    fn load_shader(&mut self, vertex: &Path, fragment: &Path) -> ResourceHandle;
    fn try_load_shader(&mut self, vertex: &Path, fragment: &Path)
        -> Result<ResourceHandle, RenderError>;
    /// Bind a shader for later draws. 0 or an unknown handle unbinds.
    fn use_shader(&mut self, handle: ResourceHandle);
    /// Release one shader. Unknown or already released handles are ignored.
    fn release_shader(&mut self, handle: ResourceHandle);

    /// Replace the output target. On failure the renderer stays disabled
    /// until a later `set_surface` or `initialize` succeeds.
    fn set_surface(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    fn lifecycle(&self) -> Lifecycle;
    fn state(&self) -> &RendererState;
    fn stats(&self) -> FrameStats;
    /// Texture actually applied to draws, if the current handle resolves.
    fn bound_texture(&self) -> Option<ResourceHandle>;
    /// Shader actually applied to draws, if the current handle resolves.
    fn bound_shader(&self) -> Option<ResourceHandle>;
    fn texture_count(&self) -> usize;
    fn shader_count(&self) -> usize;
    fn surface_available(&self) -> bool;

    fn is_initialized(&self) -> bool {
        self.lifecycle().is_live()
    }

    /// `draw_circle` with [`DEFAULT_CIRCLE_SEGMENTS`]
    fn draw_circle_default(&mut self, cx: f32, cy: f32, radius: f32) -> Result<(), RenderError> {
        self.draw_circle(cx, cy, radius, DEFAULT_CIRCLE_SEGMENTS)
    }
}

/// Renderer over a concrete backend.
pub struct Renderer<B: Backend> {
    backend: B,
    lifecycle: Lifecycle,
    state: RendererState,
    textures: ResourceTable<TextureRecord<B::Texture>>,
    shaders: ResourceTable<ShaderRecord<B::Shader>>,
    surface: Option<SurfaceTarget>,
    /// Window bound by the last `initialize`; survives a disabled surface.
    native: NativeHandle,
    stats: FrameStats,
}

impl<B: Backend> Renderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            lifecycle: Lifecycle::Uninitialized,
            state: RendererState::default(),
            textures: ResourceTable::new("texture"),
            shaders: ResourceTable::new("shader"),
            surface: None,
            native: NativeHandle::NULL,
            stats: FrameStats::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn textures(&self) -> &ResourceTable<TextureRecord<B::Texture>> {
        &self.textures
    }

    pub fn shaders(&self) -> &ResourceTable<ShaderRecord<B::Shader>> {
        &self.shaders
    }

    /// Current output target, `None` while disabled or not initialized.
    pub fn surface(&self) -> Option<SurfaceTarget> {
        self.surface
    }

    fn ensure_live(&self) -> Result<(), RenderError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => Err(RenderError::NotInitialized),
            Lifecycle::Destroyed => Err(RenderError::Destroyed),
            Lifecycle::Initialized | Lifecycle::FrameBegun => Ok(()),
        }
    }

    fn ensure_capacity<T>(table: &ResourceTable<T>) -> Result<(), RenderError> {
        if table.is_exhausted() {
            return Err(RenderError::HandlesExhausted(table.kind()));
        }
        Ok(())
    }

    fn submit(&mut self, vertices: &[Vertex]) -> Result<(), RenderError> {
        self.ensure_live()?;
        if self.surface.is_none() {
            trace!(target: targets::RENDERER, "draw skipped, no surface");
            return Err(RenderError::SurfaceUnavailable);
        }

        let texture = self
            .textures
            .get(self.state.current_texture)
            .map(|record| &record.resource);
        let shader = self
            .shaders
            .get(self.state.current_shader)
            .map(|record| &record.resource);
        self.backend.draw(DrawCall {
            vertices,
            texture,
            shader,
        })?;

        self.stats.draw_calls_this_frame += 1;
        self.stats.vertices_this_frame += vertices.len() as u32;
        Ok(())
    }

    fn release_all(&mut self) {
        for (_, record) in self.textures.drain() {
            self.backend.release_texture(record.resource);
        }
        for (_, record) in self.shaders.drain() {
            self.backend.release_shader(record.resource);
        }
        self.state.current_texture = ResourceHandle::NONE;
        self.state.current_shader = ResourceHandle::NONE;
    }
}

impl<B: Backend> RenderDevice for Renderer<B> {
    fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    fn initialize(&mut self, target: SurfaceTarget) -> Result<(), RenderError> {
        // A renderer disabled by a failed set_surface may be initialized again
        let recovering = self.lifecycle.is_live() && self.surface.is_none();
        if self.lifecycle.is_live() && !recovering {
            return Err(RenderError::AlreadyInitialized);
        }
        if target.width == 0 || target.height == 0 {
            return Err(RenderError::InvalidInput(format!(
                "surface must be non-empty, got {}x{}",
                target.width, target.height
            )));
        }

        if let Err(err) = self.backend.create_surface(target) {
            warn!(
                target: targets::RENDERER,
                backend = self.backend.name(),
                error = %err,
                "renderer initialization failed"
            );
            return Err(err.into());
        }

        if recovering {
            self.state.surface_width = target.width;
            self.state.surface_height = target.height;
        } else {
            self.state = RendererState::new(target.width, target.height);
            self.stats = FrameStats::default();
        }
        self.surface = Some(target);
        self.native = target.handle;
        self.lifecycle = Lifecycle::Initialized;
        info!(
            target: targets::RENDERER,
            backend = self.backend.name(),
            handle = %target.handle,
            width = target.width,
            height = target.height,
            "renderer initialized"
        );
        Ok(())
    }

    fn cleanup(&mut self) {
        if !self.lifecycle.is_live() {
            return;
        }
        let textures = self.textures.len();
        let shaders = self.shaders.len();
        self.release_all();
        self.backend.destroy_surface();
        self.surface = None;
        self.native = NativeHandle::NULL;
        self.lifecycle = Lifecycle::Destroyed;
        info!(
            target: targets::RENDERER,
            backend = self.backend.name(),
            textures,
            shaders,
            "renderer cleaned up"
        );
    }

    fn begin_frame(&mut self) -> Result<(), RenderError> {
        self.ensure_live()?;
        if self.lifecycle == Lifecycle::FrameBegun {
            return Err(RenderError::FrameAlreadyBegun);
        }
        if self.surface.is_none() {
            return Err(RenderError::SurfaceUnavailable);
        }
        self.backend.begin_frame(self.state.clear_color)?;
        self.stats.draw_calls_this_frame = 0;
        self.stats.vertices_this_frame = 0;
        self.lifecycle = Lifecycle::FrameBegun;
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        self.ensure_live()?;
        if self.lifecycle != Lifecycle::FrameBegun {
            return Err(RenderError::NoActiveFrame);
        }
        // The frame is over whether or not present succeeds
        self.lifecycle = Lifecycle::Initialized;
        if let Err(err) = self.backend.present() {
            warn!(target: targets::RENDERER, error = %err, "present failed");
            return Err(err.into());
        }
        self.stats.frames_presented += 1;
        Ok(())
    }

    fn set_clear_color(&mut self, color: Color) {
        self.state.clear_color = color;
    }

    fn set_draw_color(&mut self, color: Color) {
        self.state.draw_color = color;
    }

    fn set_transform(&mut self, transform: Transform) {
        self.state.transform = transform;
    }

    fn draw_quad(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<(), RenderError> {
        let vertices = tessellation::quad(
            x,
            y,
            width,
            height,
            &self.state.transform,
            self.state.draw_color,
        );
        self.submit(&vertices)
    }

    fn draw_triangle(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Result<(), RenderError> {
        let vertices = tessellation::triangle(
            [[x1, y1], [x2, y2], [x3, y3]],
            &self.state.transform,
            self.state.draw_color,
        );
        self.submit(&vertices)
    }

    fn draw_circle(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        segments: u32,
    ) -> Result<(), RenderError> {
        let vertices = tessellation::circle(
            cx,
            cy,
            radius,
            segments,
            &self.state.transform,
            self.state.draw_color,
        )?;
        self.submit(&vertices)
    }

    fn load_texture(&mut self, path: &Path) -> ResourceHandle {
        match self.try_load_texture(path) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(
                    target: targets::RESOURCES,
                    path = %path.display(),
                    error = %err,
                    "texture load failed"
                );
                ResourceHandle::NONE
            }
        }
    }

    fn try_load_texture(&mut self, path: &Path) -> Result<ResourceHandle, RenderError> {
        self.ensure_live()?;
        Self::ensure_capacity(&self.textures)?;
        let image = loader::load_image(path)?;
        let resource = self.backend.upload_texture(&image)?;
        let handle = self.textures.insert(TextureRecord {
            source: path.to_path_buf(),
            width: image.width,
            height: image.height,
            resource,
        });
        debug!(
            target: targets::RESOURCES,
            %handle,
            path = %path.display(),
            width = image.width,
            height = image.height,
            "texture loaded"
        );
        Ok(handle)
    }

    fn create_texture(&mut self, label: &str, image: &ImageData) -> Result<ResourceHandle, RenderError> {
        self.ensure_live()?;
        Self::ensure_capacity(&self.textures)?;
        let resource = self.backend.upload_texture(image)?;
        let handle = self.textures.insert(TextureRecord {
            source: label.into(),
            width: image.width,
            height: image.height,
            resource,
        });
        debug!(target: targets::RESOURCES, %handle, label, "texture created");
        Ok(handle)
    }

    fn use_texture(&mut self, handle: ResourceHandle) {
        if handle.is_some() && !self.textures.contains(handle) {
            debug!(target: targets::RESOURCES, %handle, "unknown texture, drawing untextured");
        }
        self.state.current_texture = handle;
    }

    fn release_texture(&mut self, handle: ResourceHandle) {
        if let Some(record) = self.textures.remove(handle) {
            self.backend.release_texture(record.resource);
            if self.state.current_texture == handle {
                self.state.current_texture = ResourceHandle::NONE;
            }
            debug!(target: targets::RESOURCES, %handle, "texture released");
        }
    }

    fn load_shader(&mut self, vertex: &Path, fragment: &Path) -> ResourceHandle {
        match self.try_load_shader(vertex, fragment) {
            Ok(handle) => handle,
            Err(err) => {
                warn!(
                    target: targets::RESOURCES,
                    vertex = %vertex.display(),
                    fragment = %fragment.display(),
                    error = %err,
                    "shader load failed"
                );
                ResourceHandle::NONE
            }
        }
    }

    fn try_load_shader(
        &mut self,
        vertex: &Path,
        fragment: &Path,
    ) -> Result<ResourceHandle, RenderError> {
        self.ensure_live()?;
        Self::ensure_capacity(&self.shaders)?;
        let vs = loader::read_shader_source(vertex)?;
        let fs = loader::read_shader_source(fragment)?;
        let resource = self.backend.compile_shader_pair(&vs, &fs)?;
        let handle = self.shaders.insert(ShaderRecord {
            vertex_source: vs.path,
            fragment_source: fs.path,
            resource,
        });
        debug!(target: targets::RESOURCES, %handle, "shader compiled");
        Ok(handle)
    }

    fn use_shader(&mut self, handle: ResourceHandle) {
        if handle.is_some() && !self.shaders.contains(handle) {
            debug!(target: targets::RESOURCES, %handle, "unknown shader, using default pipeline");
        }
        self.state.current_shader = handle;
    }

    fn release_shader(&mut self, handle: ResourceHandle) {
        if let Some(record) = self.shaders.remove(handle) {
            self.backend.release_shader(record.resource);
            if self.state.current_shader == handle {
                self.state.current_shader = ResourceHandle::NONE;
            }
            debug!(target: targets::RESOURCES, %handle, "shader released");
        }
    }

    fn set_surface(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.ensure_live()?;
        if self.lifecycle == Lifecycle::FrameBegun {
            return Err(RenderError::FrameInProgress("set_surface"));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidInput(format!(
                "surface must be non-empty, got {}x{}",
                width, height
            )));
        }

        // The backend drops the old target before building the new one
        self.surface = None;
        if let Err(err) = self.backend.resize(width, height) {
            warn!(
                target: targets::RENDERER,
                width,
                height,
                error = %err,
                "surface recreation failed, renderer disabled"
            );
            return Err(err.into());
        }

        self.surface = Some(SurfaceTarget::new(self.native, width, height));
        self.state.surface_width = width;
        self.state.surface_height = height;
        debug!(target: targets::RENDERER, width, height, "surface resized");
        Ok(())
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn state(&self) -> &RendererState {
        &self.state
    }

    fn stats(&self) -> FrameStats {
        self.stats
    }

    fn bound_texture(&self) -> Option<ResourceHandle> {
        let handle = self.state.current_texture;
        self.textures.contains(handle).then_some(handle)
    }

    fn bound_shader(&self) -> Option<ResourceHandle> {
        let handle = self.state.current_shader;
        self.shaders.contains(handle).then_some(handle)
    }

    fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    fn surface_available(&self) -> bool {
        self.lifecycle.is_live() && self.surface.is_some()
    }
}

impl<B: Backend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCommand, RecordingBackend};

    fn live() -> (Renderer<RecordingBackend>, crate::backend::RecordingHandle) {
        let backend = RecordingBackend::new();
        let handle = backend.handle();
        let mut renderer = Renderer::new(backend);
        renderer
            .initialize(SurfaceTarget::offscreen(320, 240))
            .unwrap();
        (renderer, handle)
    }

    #[test]
    fn test_lifecycle_transitions() {
        let (mut r, _) = live();
        assert_eq!(r.lifecycle(), Lifecycle::Initialized);
        r.begin_frame().unwrap();
        assert_eq!(r.lifecycle(), Lifecycle::FrameBegun);
        r.end_frame().unwrap();
        assert_eq!(r.lifecycle(), Lifecycle::Initialized);
        r.cleanup();
        assert_eq!(r.lifecycle(), Lifecycle::Destroyed);
    }

    #[test]
    fn test_double_begin_is_invalid_usage() {
        let (mut r, _) = live();
        r.begin_frame().unwrap();
        let err = r.begin_frame().unwrap_err();
        assert!(matches!(err, RenderError::FrameAlreadyBegun));
        assert!(err.is_invalid_usage());
        // still inside the first frame
        r.end_frame().unwrap();
        assert!(matches!(r.end_frame(), Err(RenderError::NoActiveFrame)));
    }

    #[test]
    fn test_draw_records_state_at_call_time() {
        let (mut r, log) = live();
        log.take_commands();
        r.begin_frame().unwrap();
        r.draw_quad(0.0, 0.0, 10.0, 10.0).unwrap();
        r.draw_circle(5.0, 5.0, 3.0, 8).unwrap();
        r.end_frame().unwrap();

        let commands = log.take_commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[1],
            BackendCommand::Draw {
                vertex_count: 6,
                texture: None,
                shader: None
            }
        );
        assert_eq!(
            commands[2],
            BackendCommand::Draw {
                vertex_count: 24,
                texture: None,
                shader: None
            }
        );
        assert_eq!(r.stats().draw_calls_this_frame, 2);
        assert_eq!(r.stats().frames_presented, 1);
    }

    #[test]
    fn test_clear_color_applies_at_next_frame() {
        let (mut r, log) = live();
        log.take_commands();
        r.set_clear_color(Color::rgba(0.2, 0.3, 0.4, 1.0));
        r.begin_frame().unwrap();
        assert_eq!(
            log.commands()[0],
            BackendCommand::BeginFrame {
                clear: Color::rgba(0.2, 0.3, 0.4, 1.0)
            }
        );
    }

    #[test]
    fn test_zero_segments_rejected_without_backend_call() {
        let (mut r, log) = live();
        log.take_commands();
        assert!(matches!(
            r.draw_circle(0.0, 0.0, 5.0, 0),
            Err(RenderError::InvalidInput(_))
        ));
        assert!(log.commands().is_empty());
    }

    #[test]
    fn test_operations_before_initialize() {
        let mut r = Renderer::new(RecordingBackend::new());
        assert!(matches!(r.begin_frame(), Err(RenderError::NotInitialized)));
        assert!(matches!(
            r.draw_quad(0.0, 0.0, 1.0, 1.0),
            Err(RenderError::NotInitialized)
        ));
        assert!(matches!(r.set_surface(10, 10), Err(RenderError::NotInitialized)));
        r.cleanup();
        assert_eq!(r.lifecycle(), Lifecycle::Uninitialized);
    }

    #[test]
    fn test_surface_keeps_window_after_failed_resize() {
        let backend = RecordingBackend::new();
        let log = backend.handle();
        let mut r = Renderer::new(backend);
        r.initialize(SurfaceTarget::new(NativeHandle(7), 320, 240))
            .unwrap();

        log.update_failures(|plan| plan.resize = true);
        assert!(r.set_surface(640, 480).is_err());
        assert_eq!(r.surface(), None);

        log.update_failures(|plan| plan.resize = false);
        r.set_surface(640, 480).unwrap();
        assert_eq!(
            r.surface(),
            Some(SurfaceTarget::new(NativeHandle(7), 640, 480))
        );
    }

    #[test]
    fn test_initialize_twice_rejected() {
        let (mut r, _) = live();
        assert!(matches!(
            r.initialize(SurfaceTarget::offscreen(10, 10)),
            Err(RenderError::AlreadyInitialized)
        ));
    }
}
