//! wgpu backend
//!
//! One implementation serves the Vulkan, DirectX and OpenGL renderer kinds by
//! restricting which wgpu backends the adapter may come from. Frames are
//! rendered into an offscreen [`RenderTarget`]: draws are queued during the
//! frame and replayed in one render pass at present.

use super::{Backend, DrawCall};
use crate::error::BackendError;
use crate::gpu::{validated, DeviceManager, GpuTexture, PipelineManager, RenderTarget};
use crate::loader::{ImageData, ShaderSource};
use crate::vertex::Vertex;
use std::rc::Rc;
use tessera_core::logging::targets;
use tessera_core::{Color, SurfaceTarget};
use wgpu::util::DeviceExt;

/// Compiled shader pair
pub struct WgpuShader {
    pipeline: Rc<wgpu::RenderPipeline>,
}

struct GpuContext {
    devices: DeviceManager,
    pipelines: PipelineManager,
    white: GpuTexture,
}

struct PendingDraw {
    buffer: wgpu::Buffer,
    vertex_count: u32,
    pipeline: Rc<wgpu::RenderPipeline>,
    bind_group: Rc<wgpu::BindGroup>,
}

pub struct WgpuBackend {
    backends: wgpu::Backends,
    name: &'static str,
    gpu: Option<GpuContext>,
    target: Option<RenderTarget>,
    pending: Vec<PendingDraw>,
    clear: Color,
    frames_presented: u64,
}

impl WgpuBackend {
    pub fn new(backends: wgpu::Backends, name: &'static str) -> Self {
        Self {
            backends,
            name,
            gpu: None,
            target: None,
            pending: Vec::new(),
            clear: Color::BLACK,
            frames_presented: 0,
        }
    }

    pub fn vulkan() -> Self {
        Self::new(wgpu::Backends::VULKAN, "vulkan")
    }

    pub fn directx() -> Self {
        Self::new(wgpu::Backends::DX12, "directx")
    }

    pub fn opengl() -> Self {
        Self::new(wgpu::Backends::GL, "opengl")
    }

    /// Any backend wgpu can find on this machine
    pub fn any() -> Self {
        Self::new(wgpu::Backends::all(), "wgpu")
    }

    pub fn backends(&self) -> wgpu::Backends {
        self.backends
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn adapter_info(&self) -> Option<wgpu::AdapterInfo> {
        self.gpu.as_ref().map(|gpu| gpu.devices.adapter_info())
    }

    /// Read the last presented frame as RGBA8 rows.
    pub fn read_pixels(&self) -> Result<Vec<u8>, BackendError> {
        let gpu = self.context()?;
        let target = self.output()?;
        target.read_pixels(gpu.devices.device(), gpu.devices.queue())
    }

    fn context(&self) -> Result<&GpuContext, BackendError> {
        self.gpu
            .as_ref()
            .ok_or_else(|| BackendError::DeviceUnavailable("device not acquired".to_string()))
    }

    fn output(&self) -> Result<&RenderTarget, BackendError> {
        self.target
            .as_ref()
            .ok_or_else(|| BackendError::Frame("no render target".to_string()))
    }

    fn acquire(&self) -> Result<GpuContext, BackendError> {
        let devices = DeviceManager::new_blocking(self.backends)?;
        let pipelines = PipelineManager::new(devices.device())?;
        let white = GpuTexture::upload(
            devices.device(),
            devices.queue(),
            &pipelines,
            &ImageData::solid(1, 1, Color::WHITE),
        )?;
        Ok(GpuContext {
            devices,
            pipelines,
            white,
        })
    }
}

impl Backend for WgpuBackend {
    type Texture = GpuTexture;
    type Shader = WgpuShader;

    fn name(&self) -> &'static str {
        self.name
    }

    fn create_surface(&mut self, target: SurfaceTarget) -> Result<(), BackendError> {
        self.pending.clear();
        self.target = None;
        if self.gpu.is_none() {
            self.gpu = Some(self.acquire()?);
        }
        let gpu = self.context()?;
        match RenderTarget::new(gpu.devices.device(), target.width, target.height) {
            Ok(output) => {
                tracing::debug!(
                    target: targets::RENDERER,
                    backend = self.name,
                    handle = %target.handle,
                    width = target.width,
                    height = target.height,
                    "offscreen target created"
                );
                self.target = Some(output);
                Ok(())
            }
            Err(err) => {
                self.gpu = None;
                Err(err)
            }
        }
    }

    fn destroy_surface(&mut self) {
        self.pending.clear();
        self.target = None;
        self.gpu = None;
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), BackendError> {
        self.pending.clear();
        self.target = None;
        let output = RenderTarget::new(self.context()?.devices.device(), width, height)?;
        self.target = Some(output);
        Ok(())
    }

    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError> {
        self.output()?;
        self.pending.clear();
        self.clear = clear;
        Ok(())
    }

    fn draw(&mut self, call: DrawCall<'_, GpuTexture, WgpuShader>) -> Result<(), BackendError> {
        if call.vertices.is_empty() {
            return Ok(());
        }
        let gpu = self.context()?;
        let (width, height) = self.output()?.size();

        let clip: Vec<Vertex> = call
            .vertices
            .iter()
            .map(|v| v.to_clip_space(width, height))
            .collect();
        let buffer = gpu
            .devices
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Tessera Vertex Buffer"),
                contents: bytemuck::cast_slice(&clip),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let pipeline = match call.shader {
            Some(shader) => Rc::clone(&shader.pipeline),
            None => gpu.pipelines.default_pipeline(),
        };
        let bind_group = match call.texture {
            Some(texture) => texture.bind_group(),
            None => gpu.white.bind_group(),
        };

        self.pending.push(PendingDraw {
            buffer,
            vertex_count: clip.len() as u32,
            pipeline,
            bind_group,
        });
        Ok(())
    }

    fn present(&mut self) -> Result<(), BackendError> {
        let pending = std::mem::take(&mut self.pending);
        let gpu = self.context()?;
        let target = self.output()?;
        let device = gpu.devices.device();
        let clear = wgpu::Color {
            r: self.clear.r as f64,
            g: self.clear.g as f64,
            b: self.clear.b as f64,
            a: self.clear.a as f64,
        };

        validated(device, || {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Tessera Frame Encoder"),
            });
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Tessera Frame Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.view(),
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(clear),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                for draw in &pending {
                    pass.set_pipeline(&draw.pipeline);
                    pass.set_bind_group(0, &draw.bind_group, &[]);
                    pass.set_vertex_buffer(0, draw.buffer.slice(..));
                    pass.draw(0..draw.vertex_count, 0..1);
                }
            }
            gpu.devices.queue().submit(Some(encoder.finish()));
        })
        .map_err(BackendError::Present)?;

        self.frames_presented += 1;
        Ok(())
    }

    fn upload_texture(&mut self, image: &ImageData) -> Result<GpuTexture, BackendError> {
        let gpu = self.context()?;
        GpuTexture::upload(gpu.devices.device(), gpu.devices.queue(), &gpu.pipelines, image)
    }

    fn release_texture(&mut self, texture: GpuTexture) {
        // wgpu keeps the texture alive until queued work using it completes
        drop(texture);
    }

    fn compile_shader_pair(
        &mut self,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
    ) -> Result<WgpuShader, BackendError> {
        let gpu = self.context()?;
        let pipeline = gpu
            .pipelines
            .compile_pair(gpu.devices.device(), &vertex.code, &fragment.code)
            .map_err(|e| match e {
                BackendError::ShaderCompilation(msg) => BackendError::ShaderCompilation(format!(
                    "{} + {}: {}",
                    vertex.path.display(),
                    fragment.path.display(),
                    msg
                )),
                other => other,
            })?;
        Ok(WgpuShader {
            pipeline: Rc::new(pipeline),
        })
    }

    fn release_shader(&mut self, shader: WgpuShader) {
        drop(shader);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tessellation;
    use tessera_core::Transform;

    #[test]
    fn test_backend_selection() {
        assert_eq!(WgpuBackend::vulkan().backends(), wgpu::Backends::VULKAN);
        assert_eq!(WgpuBackend::directx().backends(), wgpu::Backends::DX12);
        assert_eq!(WgpuBackend::opengl().backends(), wgpu::Backends::GL);
        assert_eq!(WgpuBackend::opengl().name(), "opengl");
    }

    #[test]
    fn test_operations_without_device_fail_cleanly() {
        let mut backend = WgpuBackend::any();
        assert!(backend.begin_frame(Color::BLACK).is_err());
        assert!(backend.resize(64, 64).is_err());
        assert!(backend
            .upload_texture(&ImageData::solid(1, 1, Color::RED))
            .is_err());
        backend.destroy_surface();
    }

    #[test]
    #[ignore] // Requires a GPU adapter
    fn test_offscreen_frame_readback() {
        let mut backend = WgpuBackend::any();
        backend
            .create_surface(SurfaceTarget::offscreen(8, 8))
            .expect("GPU required");
        backend.begin_frame(Color::BLUE).unwrap();
        let quad = tessellation::quad(0.0, 0.0, 4.0, 8.0, &Transform::IDENTITY, Color::RED);
        backend
            .draw(DrawCall {
                vertices: &quad,
                texture: None,
                shader: None,
            })
            .unwrap();
        backend.present().unwrap();

        let pixels = backend.read_pixels().unwrap();
        assert_eq!(pixels.len(), 8 * 8 * 4);
        assert_eq!(&pixels[0..4], &[255, 0, 0, 255]);
        assert_eq!(&pixels[7 * 4..8 * 4], &[0, 0, 255, 255]);
    }
}
