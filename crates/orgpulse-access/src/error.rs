//! Error types for the access layer.

use orgpulse_sql::{SafetyViolation, SqlError};
use orgpulse_store::StoreError;
use thiserror::Error;

/// Errors surfaced to analytics callers. None of them are retried.
#[derive(Debug, Error)]
pub enum AccessError {
    /// No backend handle is configured.
    #[error("not connected to the data service")]
    NotConnected,

    /// Query is outside the supported dialect or references a bad parameter.
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),

    /// Free-form query was refused before execution.
    #[error("query rejected: {0}")]
    SafetyViolation(#[from] SafetyViolation),

    /// The backend call failed; `message` is the backend's own wording.
    #[error("backend error: {message}")]
    BackendError {
        message: String,
        code: Option<String>,
        details: Option<String>,
        hint: Option<String>,
    },
}

impl From<SqlError> for AccessError {
    fn from(err: SqlError) -> Self {
        match err {
            SqlError::SafetyViolation(violation) => Self::SafetyViolation(violation),
            SqlError::Tokenize(reason) => Self::UnsupportedQuery(reason),
            SqlError::Unsupported { reason } => Self::UnsupportedQuery(reason),
        }
    }
}

impl From<StoreError> for AccessError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Backend {
                code,
                message,
                details,
                hint,
                ..
            } => Self::BackendError {
                message,
                code,
                details,
                hint,
            },
            other => Self::BackendError {
                message: other.to_string(),
                code: None,
                details: None,
                hint: None,
            },
        }
    }
}
