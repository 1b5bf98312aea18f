//! Logging setup for Tessera
//!
//! All crates log through `tracing` with one target per [`LogCategory`], so
//! verbosity can be tuned per subsystem either from [`LoggingConfig`] or with
//! `RUST_LOG`, e.g. `RUST_LOG=tessera::compositor=debug`.

use crate::config::LoggingConfig;
use crate::error::{Result, TesseraError};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Tracing targets, usable directly in `tracing` macros.
pub mod targets {
    pub const CORE: &str = "tessera::core";
    pub const RENDERER: &str = "tessera::renderer";
    pub const RESOURCES: &str = "tessera::resources";
    pub const PLATFORM: &str = "tessera::platform";
    pub const WINDOW: &str = "tessera::window";
    pub const COMPOSITOR: &str = "tessera::compositor";
}

/// Categories for organizing log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    Core,
    Renderer,
    Resources,
    Platform,
    Window,
    Compositor,
}

impl LogCategory {
    pub const ALL: [LogCategory; 6] = [
        LogCategory::Core,
        LogCategory::Renderer,
        LogCategory::Resources,
        LogCategory::Platform,
        LogCategory::Window,
        LogCategory::Compositor,
    ];

    /// Key used in `LoggingConfig::category_levels`
    pub const fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Core => "core",
            LogCategory::Renderer => "renderer",
            LogCategory::Resources => "resources",
            LogCategory::Platform => "platform",
            LogCategory::Window => "window",
            LogCategory::Compositor => "compositor",
        }
    }

    pub const fn target(&self) -> &'static str {
        match self {
            LogCategory::Core => targets::CORE,
            LogCategory::Renderer => targets::RENDERER,
            LogCategory::Resources => targets::RESOURCES,
            LogCategory::Platform => targets::PLATFORM,
            LogCategory::Window => targets::WINDOW,
            LogCategory::Compositor => targets::COMPOSITOR,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Build the `EnvFilter` directive string for a logging configuration.
///
/// Unknown categories are skipped. Entries are sorted so the result is stable.
pub fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = vec![config.level.clone()];
    let mut categories: Vec<_> = config
        .category_levels
        .iter()
        .filter_map(|(name, level)| LogCategory::from_name(name).map(|c| (c.target(), level)))
        .collect();
    categories.sort();
    directives.extend(
        categories
            .into_iter()
            .map(|(target, level)| format!("{}={}", target, level)),
    );
    directives.join(",")
}

/// Initialize the logging system with default settings
pub fn init() -> Result<()> {
    init_with_config(&LoggingConfig::default())
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configuration. Calling this more than
/// once, or after another subscriber was installed, is a no-op.
pub fn init_with_config(config: &LoggingConfig) -> Result<()> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(filter_directives(config)).map_err(|e| {
            INITIALIZED.store(false, Ordering::SeqCst);
            TesseraError::configuration(format!("invalid log filter: {}", e))
        })?,
    };

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(config.ansi)
                .compact(),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!(target: targets::CORE, "global subscriber already set, keeping it");
    }
    Ok(())
}

/// Whether [`init_with_config`] has run in this process.
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}
