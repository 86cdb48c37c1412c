//! Error types for the simulation harness.

use slamshow_core::ShowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A harness parameter is out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The display engine rejected a call
    #[error(transparent)]
    Show(#[from] ShowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
