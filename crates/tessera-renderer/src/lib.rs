//! Tessera Renderer
//!
//! A backend-agnostic 2D renderer. Client code issues draw calls (quads,
//! triangles, circles) and binds textures and shaders through integer
//! handles; one shared core tracks the lifecycle and the handle tables and
//! forwards the work to a pluggable [`Backend`].
//!
//! ## Backends
//! - [`SoftwareBackend`]: CPU scanline rasterizer, no device needed
//! - [`WgpuBackend`]: wgpu, restricted to Vulkan, DirectX 12 or OpenGL
//! - [`RecordingBackend`]: logs backend calls, for tests and dry runs

pub mod backend;
pub mod error;
pub mod factory;
pub mod gpu;
pub mod loader;
pub mod renderer;
pub mod resources;
pub mod state;
pub mod tessellation;
pub mod vertex;

// Re-export commonly used types
pub use backend::{
    Backend, BackendCommand, DrawCall, FailurePlan, RecordingBackend, RecordingHandle,
    SoftwareBackend, WgpuBackend,
};
pub use error::{BackendError, RenderError};
pub use factory::{create_renderer, RendererType};
pub use loader::{ImageData, ShaderSource};
pub use renderer::{RenderDevice, Renderer};
pub use resources::{ResourceHandle, ResourceTable};
pub use state::{FrameStats, Lifecycle, RendererState};
pub use tessellation::{DEFAULT_CIRCLE_SEGMENTS, MAX_CIRCLE_SEGMENTS};
pub use vertex::Vertex;

use tessera_core::config::RendererSettings;
use tessera_core::{Color, SurfaceTarget};

/// Renderer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    pub renderer_type: RendererType,
    pub clear_color: Color,
    pub circle_segments: u32,
    pub default_surface: (u32, u32),
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            renderer_type: RendererType::Software,
            clear_color: Color::BLACK,
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
            default_surface: (800, 600),
        }
    }
}

impl RendererConfig {
    /// Read the `renderer` section of the global configuration.
    pub fn from_settings(settings: &RendererSettings) -> Result<Self, RenderError> {
        Ok(Self {
            renderer_type: settings.backend.parse()?,
            clear_color: Color::from_array(settings.clear_color),
            circle_segments: settings.circle_segments.clamp(1, MAX_CIRCLE_SEGMENTS),
            default_surface: settings.default_surface,
        })
    }

    /// Create the configured renderer, not yet initialized.
    pub fn create(&self) -> Box<dyn RenderDevice> {
        let mut renderer = create_renderer(self.renderer_type);
        renderer.set_clear_color(self.clear_color);
        renderer
    }

    /// Create the configured renderer and initialize it offscreen at the
    /// default surface size.
    pub fn create_offscreen(&self) -> Result<Box<dyn RenderDevice>, RenderError> {
        let mut renderer = create_renderer(self.renderer_type);
        let (width, height) = self.default_surface;
        renderer.initialize(SurfaceTarget::offscreen(width, height))?;
        renderer.set_clear_color(self.clear_color);
        Ok(renderer)
    }
}

/// Initialize the renderer subsystem
pub fn init(config: &RendererConfig) -> anyhow::Result<()> {
    tracing::info!(
        target: tessera_core::logging::targets::RENDERER,
        renderer = %config.renderer_type,
        "Initializing Tessera renderer"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert_eq!(config.renderer_type, RendererType::Software);
        assert_eq!(config.circle_segments, 32);
    }

    #[test]
    fn test_config_from_settings() {
        let mut settings = RendererSettings::default();
        settings.backend = "recording".to_string();
        settings.clear_color = [0.5, 0.5, 0.5, 1.0];
        let config = RendererConfig::from_settings(&settings).unwrap();
        assert_eq!(config.renderer_type, RendererType::Recording);

        let renderer = config.create_offscreen().unwrap();
        assert!(renderer.is_initialized());
        assert_eq!(renderer.state().clear_color, Color::rgba(0.5, 0.5, 0.5, 1.0));
        assert_eq!(renderer.state().surface_width, 800);

        settings.backend = "glide".to_string();
        assert!(RendererConfig::from_settings(&settings).is_err());
    }
}
