//! Error types for the Tessera workspace

use std::collections::HashMap;
use thiserror::Error;

/// Context information for errors to aid in debugging
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation that was being performed when the error occurred
    pub operation: String,
    /// Component or module where the error occurred
    pub component: String,
    /// Additional contextual data
    pub metadata: HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            component: component.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to the context
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Format context for logging. Metadata keys are sorted so the output is stable.
    pub fn format_for_log(&self) -> String {
        let mut parts = vec![
            format!("operation={}", self.operation),
            format!("component={}", self.component),
        ];

        if !self.metadata.is_empty() {
            let mut entries: Vec<_> = self.metadata.iter().collect();
            entries.sort();
            let metadata_str = entries
                .into_iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("metadata=[{}]", metadata_str));
        }

        parts.join(", ")
    }
}

/// Main error type for Tessera operations
#[derive(Debug, Error)]
pub enum TesseraError {
    #[error("Platform error: {message}")]
    Platform {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Renderer error: {message}")]
    Renderer {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Window error: {message}")]
    Window {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Initialization error: {message}")]
    Initialization {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Invalid usage: {message}")]
    InvalidUsage {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Not found: {message}")]
    NotFound {
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TesseraError {
    /// Create a platform error
    pub fn platform<S: Into<String>>(msg: S) -> Self {
        Self::Platform {
            message: msg.into(),
            context: None,
        }
    }

    /// Create a platform error with context
    pub fn platform_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::Platform {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create a renderer error
    pub fn renderer<S: Into<String>>(msg: S) -> Self {
        Self::Renderer {
            message: msg.into(),
            context: None,
        }
    }

    /// Create a renderer error with context
    pub fn renderer_with_context<S: Into<String>>(msg: S, context: ErrorContext) -> Self {
        Self::Renderer {
            message: msg.into(),
            context: Some(context),
        }
    }

    /// Create a window error
    pub fn window<S: Into<String>>(msg: S) -> Self {
        Self::Window {
            message: msg.into(),
            context: None,
        }
    }

    /// Create an initialization error
    pub fn initialization<S: Into<String>>(msg: S) -> Self {
        Self::Initialization {
            message: msg.into(),
            context: None,
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration {
            message: msg.into(),
            context: None,
        }
    }

    /// Create an invalid usage error
    pub fn invalid_usage<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUsage {
            message: msg.into(),
            context: None,
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound {
            message: msg.into(),
            context: None,
        }
    }

    /// Attach (or replace) the context of a message-carrying variant.
    pub fn with_context(mut self, ctx: ErrorContext) -> Self {
        match &mut self {
            Self::Platform { context, .. }
            | Self::Renderer { context, .. }
            | Self::Window { context, .. }
            | Self::Initialization { context, .. }
            | Self::Configuration { context, .. }
            | Self::InvalidUsage { context, .. }
            | Self::NotFound { context, .. } => *context = Some(ctx),
            Self::Io(_) | Self::Json(_) => {}
        }
        self
    }

    /// Get the error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Platform { context, .. }
            | Self::Renderer { context, .. }
            | Self::Window { context, .. }
            | Self::Initialization { context, .. }
            | Self::Configuration { context, .. }
            | Self::InvalidUsage { context, .. }
            | Self::NotFound { context, .. } => context.as_ref(),
            Self::Io(_) | Self::Json(_) => None,
        }
    }

    /// Format the error with its context for logging
    pub fn format_for_log(&self) -> String {
        match self.context() {
            Some(ctx) => format!("{} [{}]", self, ctx.format_for_log()),
            None => self.to_string(),
        }
    }
}

/// Result type alias for Tessera operations
pub type Result<T> = std::result::Result<T, TesseraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TesseraError::renderer("device lost");
        assert_eq!(err.to_string(), "Renderer error: device lost");
        assert!(err.context().is_none());
    }

    #[test]
    fn test_context_formatting() {
        let ctx = ErrorContext::new("create_window", "window_manager")
            .with_metadata("name", "main")
            .with_metadata("height", "300");
        let err = TesseraError::window("duplicate name").with_context(ctx);

        assert_eq!(
            err.format_for_log(),
            "Window error: duplicate name [operation=create_window, component=window_manager, metadata=[height=300, name=main]]"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TesseraError = io.into();
        assert!(matches!(err, TesseraError::Io(_)));
        assert!(err.context().is_none());
    }
}
