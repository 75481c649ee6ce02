//! Error types for the store crate.

use orgpulse_core::ConfigError;
use thiserror::Error;

/// Errors returned by a [`RowStore`](crate::RowStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected the request. `message` is passed through verbatim;
    /// `details` and `hint` carry the rest of the backend's error body.
    #[error("{message}")]
    Backend {
        status: Option<u16>,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },

    /// Transport failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be interpreted.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration is incomplete.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StoreError {
    /// Backend error without an HTTP status, as produced by in-process stores.
    pub fn backend(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Backend {
            status: None,
            code: Some(code.into()),
            message: message.into(),
            details: None,
            hint: None,
        }
    }

    /// Backend error code, when the backend supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Backend { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
