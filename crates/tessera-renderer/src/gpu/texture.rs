//! Sampled textures

use super::{validated, PipelineManager, TARGET_FORMAT};
use crate::error::BackendError;
use crate::loader::ImageData;
use std::rc::Rc;
use wgpu::{BindGroup, Device, Extent3d, Queue, Texture};

/// A texture uploaded to the device with its bind group.
pub struct GpuTexture {
    _texture: Texture,
    bind_group: Rc<BindGroup>,
    width: u32,
    height: u32,
}

impl GpuTexture {
    /// Upload an RGBA8 image.
    pub fn upload(
        device: &Device,
        queue: &Queue,
        pipelines: &PipelineManager,
        image: &ImageData,
    ) -> Result<Self, BackendError> {
        let max = device.limits().max_texture_dimension_2d;
        if image.width > max || image.height > max {
            return Err(BackendError::TextureUpload(format!(
                "{}x{} exceeds device limit {}",
                image.width, image.height, max
            )));
        }

        let size = Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };
        let texture = validated(device, || {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Tessera Texture"),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            })
        })
        .map_err(BackendError::TextureUpload)?;

        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = Rc::new(pipelines.bind_texture(device, &view));

        Ok(Self {
            _texture: texture,
            bind_group,
            width: image.width,
            height: image.height,
        })
    }

    pub fn bind_group(&self) -> Rc<BindGroup> {
        Rc::clone(&self.bind_group)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
