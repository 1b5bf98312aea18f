//! Platform layer for Tessera
//!
//! Native windows live behind the [`NativePlatform`] trait; [`WindowSystem`]
//! owns the platform and the process-wide window class, [`Window`] is one
//! native window, and [`WindowManager`] keeps a named collection of them and
//! renders it back to front with the overlap regions of every window.

pub mod compositor;
pub mod headless;
pub mod manager;
pub mod native;
pub mod render_window;
pub mod system;
pub mod window;

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub mod desktop;

pub use compositor::{merge_overlaps, overlapping_areas, pairwise_overlaps, z_order, OverlapRegions};
pub use headless::{HeadlessController, HeadlessPlatform};
pub use manager::{FrameReport, WindowManager, WindowPass};
pub use native::{NativeEvent, NativePlatform, NativeWindowDesc};
pub use render_window::RenderWindow;
pub use system::{SharedWindowSystem, WindowSystem};
pub use window::{Window, WindowError, WindowId};

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use desktop::DesktopPlatform;

use tessera_core::config::WindowingConfig;
use tessera_core::{ErrorContext, TesseraError};

/// Platform-specific error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    #[error("Window class registration failed: {0}")]
    ClassRegistration(String),

    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("Platform not supported: {0}")]
    Unsupported(String),
}

impl From<PlatformError> for TesseraError {
    fn from(err: PlatformError) -> Self {
        TesseraError::platform_with_context(
            err.to_string(),
            ErrorContext::new("native", "platform"),
        )
    }
}

/// Build the window system named by `config.platform`.
pub fn create_window_system(config: &WindowingConfig) -> Result<SharedWindowSystem, PlatformError> {
    match config.platform.as_str() {
        "headless" => Ok(WindowSystem::shared(Box::new(HeadlessPlatform::new()))),
        #[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
        "desktop" => Ok(WindowSystem::shared(Box::new(DesktopPlatform::new()?))),
        other => Err(PlatformError::Unsupported(format!(
            "unknown platform '{}'",
            other
        ))),
    }
}

/// Initialize the platform layer
pub fn init() -> Result<(), PlatformError> {
    tracing::info!(
        target: tessera_core::logging::targets::PLATFORM,
        "Tessera platform initialized"
    );
    Ok(())
}
