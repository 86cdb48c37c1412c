//! Error types for the overlay engine.

use slamshow_env::SurfaceError;
use thiserror::Error;

/// Errors surfaced to callers of the SlamShow engine.
///
/// Soft stop conditions (window closed, interrupted pause, cancel key) are
/// never errors; they show up as `refresh()` returning `false`.
#[derive(Debug, Error)]
pub enum ShowError {
    /// Map buffer length does not match the session's `size²`
    #[error("Map buffer has {actual} bytes, expected {expected}")]
    MapSizeMismatch { expected: usize, actual: usize },

    /// Scale must be finite and strictly positive
    #[error("Invalid map scale: {0} mm/pixel")]
    InvalidScale(f64),

    /// Map size must be at least one pixel
    #[error("Invalid map size: {0} pixels")]
    InvalidMapSize(usize),

    /// Velocity span must be finite and strictly positive
    #[error("Invalid velocity span: {0}")]
    InvalidSpan(f64),

    /// Configuration is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// A display surface call failed
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShowError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
