//! Error types for the SlamShow surface abstraction.

use thiserror::Error;

/// Errors that can occur while talking to a display surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The window or figure is gone (closed, never created, disconnected)
    #[error("Window unavailable: {0}")]
    WindowUnavailable(String),

    /// The backend rejected a draw or logging call
    #[error("Backend error: {0}")]
    Backend(String),

    /// Terminal or file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SurfaceError {
    /// Creates a window-unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::WindowUnavailable(msg.into())
    }

    /// Creates a backend error from anything displayable.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}
