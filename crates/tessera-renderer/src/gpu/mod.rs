//! wgpu building blocks used by [`WgpuBackend`](crate::backend::WgpuBackend)
//!
//! Each manager owns one concern: device acquisition, the offscreen output
//! target, the shared pipeline layout, and sampled textures.

pub mod device;
pub mod pipeline;
pub mod target;
pub mod texture;

pub use device::DeviceManager;
pub use pipeline::PipelineManager;
pub use target::RenderTarget;
pub use texture::GpuTexture;

/// Color format of the output target and of uploaded textures.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Run `f` inside a validation error scope and report what it raised.
///
/// Validation failures would otherwise reach wgpu's uncaptured error
/// handler, which panics.
pub(crate) fn validated<T>(device: &wgpu::Device, f: impl FnOnce() -> T) -> Result<T, String> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = f();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(err.to_string()),
        None => Ok(value),
    }
}
