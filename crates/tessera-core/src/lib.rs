//! Tessera Core - shared building blocks for the Tessera renderer and window manager
//!
//! This crate carries the pure value types (rectangles, colors, transforms,
//! native surface descriptors) along with the ambient services every other
//! crate leans on: error types, configuration and logging.

pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod types;

pub use error::{ErrorContext, Result, TesseraError};
pub use geometry::Rect;
pub use types::{Color, NativeHandle, SurfaceTarget, Transform};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConfigManager, TesseraConfig};
    pub use crate::error::{ErrorContext, Result, TesseraError};
    pub use crate::geometry::Rect;
    pub use crate::logging::LogCategory;
    pub use crate::types::{Color, NativeHandle, SurfaceTarget, Transform};
}

/// Initialize the core services: configuration first, then logging driven by it.
pub fn init() -> Result<()> {
    let manager = config::init_config();
    logging::init_with_config(&manager.get_logging_config())?;
    tracing::info!(target: logging::targets::CORE, "Tessera core initialized");
    Ok(())
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
