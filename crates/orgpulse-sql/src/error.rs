//! Error types for the SQL crate.

use thiserror::Error;

/// Reason a free-form query was refused by the safety guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SafetyViolation {
    /// Query text contains a mutating keyword.
    #[error("query contains blocked keyword '{keyword}'")]
    BlockedKeyword { keyword: String },

    /// Query does not start with SELECT.
    #[error("only SELECT queries are allowed")]
    NotSelect,
}

/// Errors that can occur while validating or parsing a query.
#[derive(Debug, Error)]
pub enum SqlError {
    /// Query was refused before parsing.
    #[error("safety violation: {0}")]
    SafetyViolation(#[from] SafetyViolation),

    /// Query text could not be tokenized.
    #[error("failed to tokenize query: {0}")]
    Tokenize(String),

    /// Query is outside the supported dialect.
    #[error("unsupported query: {reason}")]
    Unsupported { reason: String },
}

impl SqlError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::Unsupported {
            reason: reason.into(),
        }
    }
}
