//! Render pipeline management
//!
//! All pipelines share one layout: group 0 holds a sampled 2D texture at
//! binding 0 and its sampler at binding 1. Custom shader pairs must follow it.

use super::{validated, TARGET_FORMAT};
use crate::error::BackendError;
use crate::vertex::Vertex;
use std::rc::Rc;
use wgpu::{
    BindGroup, BindGroupLayout, BlendState, ColorTargetState, ColorWrites, Device, FragmentState,
    FrontFace, MultisampleState, PipelineCompilationOptions, PolygonMode, PrimitiveState,
    PrimitiveTopology, RenderPipeline, Sampler, ShaderModule, TextureView, VertexState,
};

/// Entry point expected in vertex stage sources
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point expected in fragment stage sources
pub const FRAGMENT_ENTRY: &str = "fs_main";

const DEFAULT_SHADER: &str = include_str!("../../shaders/default.wgsl");

pub struct PipelineManager {
    bind_group_layout: BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: Sampler,
    default_pipeline: Rc<RenderPipeline>,
}

impl PipelineManager {
    pub fn new(device: &Device) -> Result<Self, BackendError> {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Tessera Texture Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Tessera Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Tessera Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let module = compile_module(device, DEFAULT_SHADER, "Tessera Default Shader")?;
        let default_pipeline =
            build_pipeline(device, &pipeline_layout, &module, &module, "Tessera Default Pipeline")?;

        Ok(Self {
            bind_group_layout,
            pipeline_layout,
            sampler,
            default_pipeline: Rc::new(default_pipeline),
        })
    }

    pub fn default_pipeline(&self) -> Rc<RenderPipeline> {
        Rc::clone(&self.default_pipeline)
    }

    /// Compile a vertex/fragment source pair into a pipeline.
    pub fn compile_pair(
        &self,
        device: &Device,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<RenderPipeline, BackendError> {
        let vs = compile_module(device, vertex_source, "Tessera Vertex Stage")?;
        let fs = compile_module(device, fragment_source, "Tessera Fragment Stage")?;
        build_pipeline(device, &self.pipeline_layout, &vs, &fs, "Tessera Custom Pipeline")
    }

    /// Bind group sampling `view`
    pub fn bind_texture(&self, device: &Device, view: &TextureView) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Tessera Texture Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }
}

fn compile_module(device: &Device, source: &str, label: &str) -> Result<ShaderModule, BackendError> {
    validated(device, || {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    })
    .map_err(BackendError::ShaderCompilation)
}

fn build_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    vs: &ShaderModule,
    fs: &ShaderModule,
    label: &str,
) -> Result<RenderPipeline, BackendError> {
    validated(device, || {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: VertexState {
                module: vs,
                entry_point: VERTEX_ENTRY,
                buffers: &[Vertex::desc()],
                compilation_options: PipelineCompilationOptions::default(),
            },
            fragment: Some(FragmentState {
                module: fs,
                entry_point: FRAGMENT_ENTRY,
                targets: &[Some(ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(BlendState::ALPHA_BLENDING),
                    write_mask: ColorWrites::ALL,
                })],
                compilation_options: PipelineCompilationOptions::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        })
    })
    .map_err(BackendError::ShaderCompilation)
}
