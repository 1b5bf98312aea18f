//! Renderer error types

use std::path::PathBuf;
use tessera_core::{ErrorContext, TesseraError};
use thiserror::Error;

/// Failures reported by a [`Backend`](crate::backend::Backend) implementation.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),

    #[error("no usable graphics device: {0}")]
    DeviceUnavailable(String),

    #[error("texture upload failed: {0}")]
    TextureUpload(String),

    #[error("shader compilation failed: {0}")]
    ShaderCompilation(String),

    #[error("{0} is not supported by this backend")]
    Unsupported(&'static str),

    #[error("frame error: {0}")]
    Frame(String),

    #[error("present failed: {0}")]
    Present(String),
}

/// Errors returned by renderer operations.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer is not initialized")]
    NotInitialized,

    #[error("renderer is already initialized")]
    AlreadyInitialized,

    #[error("renderer has been destroyed")]
    Destroyed,

    #[error("begin_frame called while a frame is already in progress")]
    FrameAlreadyBegun,

    #[error("end_frame called without a matching begin_frame")]
    NoActiveFrame,

    #[error("{0} is not allowed while a frame is in progress")]
    FrameInProgress(&'static str),

    #[error("no output surface; call set_surface or initialize again")]
    SurfaceUnavailable,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("no {0} handles left")]
    HandlesExhausted(&'static str),
    #[error("shader source {path} is empty")]
    EmptySource { path: PathBuf },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl RenderError {
    /// Lifecycle misuse, as opposed to resource or device failures.
    pub fn is_invalid_usage(&self) -> bool {
        matches!(
            self,
            RenderError::NotInitialized
                | RenderError::AlreadyInitialized
                | RenderError::Destroyed
                | RenderError::FrameAlreadyBegun
                | RenderError::NoActiveFrame
                | RenderError::FrameInProgress(_)
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RenderError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<RenderError> for TesseraError {
    fn from(err: RenderError) -> Self {
        let usage = err.is_invalid_usage();
        let context = ErrorContext::new("render", "renderer");
        if usage {
            TesseraError::invalid_usage(err.to_string()).with_context(context)
        } else {
            TesseraError::renderer_with_context(err.to_string(), context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_usage_classification() {
        assert!(RenderError::FrameAlreadyBegun.is_invalid_usage());
        assert!(RenderError::Destroyed.is_invalid_usage());
        assert!(!RenderError::SurfaceUnavailable.is_invalid_usage());
        assert!(!RenderError::from(BackendError::Present("lost".into())).is_invalid_usage());
    }

    #[test]
    fn test_conversion_to_core_error() {
        let err: TesseraError = RenderError::NoActiveFrame.into();
        assert!(matches!(err, TesseraError::InvalidUsage { .. }));

        let err: TesseraError = RenderError::InvalidInput("segments must be positive".into()).into();
        assert!(matches!(err, TesseraError::Renderer { .. }));
        assert_eq!(err.context().map(|c| c.component.as_str()), Some("renderer"));
    }
}
