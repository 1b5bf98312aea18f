//! Vertex format shared by every backend

use bytemuck::{Pod, Zeroable};
use tessera_core::Color;

/// One tessellated vertex. Positions are in surface pixels (origin top-left,
/// y down) until a GPU backend maps them to clip space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 2], tex_coords: [f32; 2], color: Color) -> Self {
        Self {
            position,
            tex_coords,
            color: color.to_array(),
        }
    }

    /// Vertex buffer layout descriptor
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }

    /// Map a pixel-space vertex into clip space for a `width` x `height` target.
    pub fn to_clip_space(&self, width: u32, height: u32) -> Vertex {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        Vertex {
            position: [
                self.position[0] / w * 2.0 - 1.0,
                1.0 - self.position[1] / h * 2.0,
            ],
            ..*self
        }
    }
}
