//! Tessera - multi-backend 2D rendering with an overlap-aware window manager
//!
//! Tessera draws quads, triangles, circles and textures through one renderer
//! API backed by a CPU rasterizer or wgpu, and manages named native windows
//! that are rendered back to front with the regions where they overlap.
//!
//! ```rust
//! use tessera_sdk::prelude::*;
//!
//! let (mut wm, _controller) = WindowManager::headless();
//! wm.create_window("a", "A", 0, 0, 400, 300).unwrap();
//! wm.create_window("b", "B", 300, 200, 400, 300).unwrap();
//! wm.show_all_windows();
//!
//! let report = wm.render_all_windows();
//! assert_eq!(report.pass("a").unwrap().overlaps[0], Rect::new(300, 200, 100, 100));
//! ```

pub use tessera_core;
pub use tessera_platform;
pub use tessera_renderer;

use tessera_core::{ErrorContext, Result, TesseraError};
use tessera_renderer::RendererConfig;

/// Unified prelude module that exports all commonly used types
pub mod prelude {
    pub use tessera_core::prelude::*;
    pub use tessera_platform::{
        FrameReport, RenderWindow, Window, WindowManager, WindowPass, WindowSystem,
    };
    pub use tessera_renderer::{
        create_renderer, RenderDevice, RenderError, Renderer, RendererType, ResourceHandle,
    };
}

/// Initialize every layer: configuration and logging, then renderer and
/// platform, using the global configuration.
pub fn init() -> Result<()> {
    tessera_core::init()?;

    let settings = tessera_core::config::init_config().get_renderer_settings();
    let renderer_config = RendererConfig::from_settings(&settings)?;
    tessera_renderer::init(&renderer_config).map_err(|e| {
        TesseraError::initialization(e.to_string())
            .with_context(ErrorContext::new("init", "renderer"))
    })?;

    tessera_platform::init()?;
    tracing::info!(target: tessera_core::logging::targets::CORE, version = VERSION, "Tessera initialized");
    Ok(())
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_init_twice() {
        assert!(init().is_ok());
        assert!(init().is_ok());
    }
}
