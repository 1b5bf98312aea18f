//! Choosing a renderer at runtime

use crate::backend::{RecordingBackend, SoftwareBackend, WgpuBackend};
use crate::error::RenderError;
use crate::renderer::{RenderDevice, Renderer};
use std::fmt;
use std::str::FromStr;

/// The renderer kinds a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererType {
    /// CPU rasterizer
    Software,
    /// wgpu restricted to Vulkan
    Vulkan,
    /// wgpu restricted to Direct3D 12
    DirectX,
    /// wgpu restricted to OpenGL / GLES
    OpenGL,
    /// Draws nothing, records every backend call
    Recording,
}

impl RendererType {
    pub const ALL: [RendererType; 5] = [
        RendererType::Software,
        RendererType::Vulkan,
        RendererType::DirectX,
        RendererType::OpenGL,
        RendererType::Recording,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            RendererType::Software => "software",
            RendererType::Vulkan => "vulkan",
            RendererType::DirectX => "directx",
            RendererType::OpenGL => "opengl",
            RendererType::Recording => "recording",
        }
    }

    /// Whether this kind needs a GPU adapter to initialize
    pub const fn requires_gpu(&self) -> bool {
        matches!(
            self,
            RendererType::Vulkan | RendererType::DirectX | RendererType::OpenGL
        )
    }
}

impl fmt::Display for RendererType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererType {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "software" | "cpu" => Ok(RendererType::Software),
            "vulkan" => Ok(RendererType::Vulkan),
            "directx" | "dx12" | "d3d12" => Ok(RendererType::DirectX),
            "opengl" | "gl" => Ok(RendererType::OpenGL),
            "recording" => Ok(RendererType::Recording),
            _ => Err(RenderError::InvalidInput(format!(
                "unknown renderer type '{}'",
                s
            ))),
        }
    }
}

/// Build an uninitialized renderer of the requested kind.
pub fn create_renderer(kind: RendererType) -> Box<dyn RenderDevice> {
    tracing::debug!(
        target: tessera_core::logging::targets::RENDERER,
        kind = %kind,
        "creating renderer"
    );
    match kind {
        RendererType::Software => Box::new(Renderer::new(SoftwareBackend::new())),
        RendererType::Vulkan => Box::new(Renderer::new(WgpuBackend::vulkan())),
        RendererType::DirectX => Box::new(Renderer::new(WgpuBackend::directx())),
        RendererType::OpenGL => Box::new(Renderer::new(WgpuBackend::opengl())),
        RendererType::Recording => Box::new(Renderer::new(RecordingBackend::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Lifecycle;

    #[test]
    fn test_parse_names() {
        for kind in RendererType::ALL {
            assert_eq!(kind.as_str().parse::<RendererType>().unwrap(), kind);
        }
        assert_eq!("DX12".parse::<RendererType>().unwrap(), RendererType::DirectX);
        assert!("metal".parse::<RendererType>().is_err());
    }

    #[test]
    fn test_factory_backends() {
        for kind in RendererType::ALL {
            let renderer = create_renderer(kind);
            assert_eq!(renderer.backend_name(), kind.as_str());
            assert_eq!(renderer.lifecycle(), Lifecycle::Uninitialized);
        }
    }
}
