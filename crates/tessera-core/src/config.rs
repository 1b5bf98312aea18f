//! Configuration system for Tessera

use crate::error::{ErrorContext, Result, TesseraError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Global configuration for Tessera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TesseraConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Renderer selection and defaults
    pub renderer: RendererSettings,
    /// Window system settings
    pub windowing: WindowingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for everything not covered by a category
    pub level: String,
    /// Category-specific log levels (category name -> level string)
    pub category_levels: HashMap<String, String>,
    /// Colored output
    pub ansi: bool,
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Backend name: "software", "vulkan", "directx", "opengl" or "recording"
    pub backend: String,
    /// Initial clear color (RGBA)
    pub clear_color: [f32; 4],
    /// Tessellation used when a circle is drawn with the default segment count
    pub circle_segments: u32,
    /// Surface size used when a renderer is initialized without a window
    pub default_surface: (u32, u32),
}

/// Window system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowingConfig {
    /// Native platform: "headless" or "desktop"
    pub platform: String,
    /// Delay between frames of the main loop
    pub frame_interval_ms: u64,
    /// Stop the main loop after this many frames (0 = run until quit)
    pub max_frames: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut category_levels = HashMap::new();
        category_levels.insert("core".to_string(), "info".to_string());
        category_levels.insert("renderer".to_string(), "info".to_string());
        category_levels.insert("resources".to_string(), "info".to_string());
        category_levels.insert("platform".to_string(), "info".to_string());
        category_levels.insert("window".to_string(), "info".to_string());
        category_levels.insert("compositor".to_string(), "warn".to_string()); // Per-frame noise

        Self {
            level: "info".to_string(),
            category_levels,
            ansi: true,
        }
    }
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            backend: "software".to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            circle_segments: 32,
            default_surface: (800, 600),
        }
    }
}

impl Default for WindowingConfig {
    fn default() -> Self {
        Self {
            platform: "headless".to_string(),
            frame_interval_ms: 16,
            max_frames: 0,
        }
    }
}

impl TesseraConfig {
    /// Parse a configuration from JSON. Missing sections fall back to defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TesseraConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(|e| match e {
            TesseraError::Json(inner) => TesseraError::configuration(inner.to_string())
                .with_context(
                    ErrorContext::new("load", "config")
                        .with_metadata("path", path.display().to_string()),
                ),
            other => other,
        })
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.renderer.circle_segments == 0 {
            return Err(TesseraError::configuration(
                "renderer.circle_segments must be at least 1",
            ));
        }
        let (w, h) = self.renderer.default_surface;
        if w == 0 || h == 0 {
            return Err(TesseraError::configuration(format!(
                "renderer.default_surface must be non-zero, got {}x{}",
                w, h
            )));
        }
        Ok(())
    }
}

/// Global configuration manager
pub struct ConfigManager {
    config: Arc<RwLock<TesseraConfig>>,
}

impl ConfigManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::with_config(TesseraConfig::default())
    }

    /// Create a configuration manager with custom config
    pub fn with_config(config: TesseraConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Get the global configuration manager instance
    pub fn instance() -> Option<&'static ConfigManager> {
        CONFIG_MANAGER.get()
    }

    /// Get a copy of the current configuration
    pub fn get_config(&self) -> TesseraConfig {
        self.config.read().clone()
    }

    /// Update the configuration
    pub fn update_config<F>(&self, updater: F)
    where
        F: FnOnce(&mut TesseraConfig),
    {
        let mut config = self.config.write();
        updater(&mut config);
    }

    /// Get the current logging configuration
    pub fn get_logging_config(&self) -> LoggingConfig {
        self.config.read().logging.clone()
    }

    pub fn get_renderer_settings(&self) -> RendererSettings {
        self.config.read().renderer.clone()
    }

    pub fn get_windowing_config(&self) -> WindowingConfig {
        self.config.read().windowing.clone()
    }

    /// Set log level for a specific category
    pub fn set_category_level(&self, category: &str, level: &str) {
        self.update_config(|config| {
            config
                .logging
                .category_levels
                .insert(category.to_string(), level.to_string());
        });
    }

    /// Get log level for a specific category
    pub fn get_category_level(&self, category: &str) -> Option<String> {
        self.config
            .read()
            .logging
            .category_levels
            .get(category)
            .cloned()
    }

    /// Select the renderer backend by name
    pub fn set_backend(&self, backend: &str) {
        self.update_config(|config| config.renderer.backend = backend.to_string());
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Global configuration instance
static CONFIG_MANAGER: OnceLock<ConfigManager> = OnceLock::new();

/// Initialize the global configuration manager
pub fn init_config() -> &'static ConfigManager {
    CONFIG_MANAGER.get_or_init(ConfigManager::new)
}

/// Initialize the global configuration manager with custom config.
///
/// Has no effect if the manager already exists.
pub fn init_config_with(config: TesseraConfig) -> &'static ConfigManager {
    CONFIG_MANAGER.get_or_init(|| ConfigManager::with_config(config))
}

/// Get the global configuration manager
pub fn get_config_manager() -> Option<&'static ConfigManager> {
    CONFIG_MANAGER.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = TesseraConfig::default();

        assert_eq!(config.renderer.backend, "software");
        assert_eq!(config.renderer.circle_segments, 32);
        assert_eq!(config.windowing.platform, "headless");
        assert_eq!(
            config.logging.category_levels.get("compositor"),
            Some(&"warn".to_string())
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            TesseraConfig::from_json_str(r#"{ "renderer": { "backend": "recording" } }"#).unwrap();

        assert_eq!(config.renderer.backend, "recording");
        assert_eq!(config.renderer.circle_segments, 32);
        assert_eq!(config.windowing, WindowingConfig::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = TesseraConfig::default();
        config.windowing.max_frames = 120;
        let json = config.to_json_string().unwrap();
        assert_eq!(TesseraConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TesseraConfig::from_json_str(r#"{ "renderer": { "circle_segments": 0 } }"#)
            .unwrap_err();
        assert!(matches!(err, TesseraError::Configuration { .. }));

        let err = TesseraConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, TesseraError::Json(_)));
    }

    #[test]
    fn test_config_manager() {
        let manager = ConfigManager::new();

        manager.set_category_level("renderer", "trace");
        assert_eq!(
            manager.get_category_level("renderer"),
            Some("trace".to_string())
        );

        manager.set_backend("opengl");
        assert_eq!(manager.get_renderer_settings().backend, "opengl");
    }
}
