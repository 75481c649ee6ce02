//! Safety checks for caller-supplied query text.
//!
//! The guard runs before any parsing. It is intentionally blunt: blocked
//! keywords are matched as raw substrings of the lower-cased text, so
//! `SELECT updated_at FROM t` is refused because it contains `update`.

use crate::error::{SafetyViolation, SqlError};

/// Keywords that mark a statement as mutating.
pub const BLOCKED_KEYWORDS: [&str; 7] = [
    "drop", "delete", "update", "insert", "alter", "create", "truncate",
];

/// Validates free-form query text and injects a row cap when missing.
#[derive(Debug, Clone)]
pub struct SafetyGuard {
    default_limit: u64,
    max_limit: u64,
}

impl Default for SafetyGuard {
    fn default() -> Self {
        Self::new(100, 100)
    }
}

impl SafetyGuard {
    /// Create a guard. `default_limit` is clamped into `1..=max_limit`.
    pub fn new(default_limit: u64, max_limit: u64) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }

    pub fn default_limit(&self) -> u64 {
        self.default_limit
    }

    pub fn max_limit(&self) -> u64 {
        self.max_limit
    }

    /// Validate `query` using the default row cap.
    pub fn validate(&self, query: &str) -> Result<String, SqlError> {
        self.validate_with_limit(query, self.default_limit)
    }

    /// Validate `query`, appending `LIMIT <cap>` when it has no limit clause.
    ///
    /// The returned text keeps the caller's casing; lower-casing is only used
    /// for inspection.
    pub fn validate_with_limit(&self, query: &str, cap: u64) -> Result<String, SqlError> {
        let normalized = query.trim().to_lowercase();

        if let Some(keyword) = BLOCKED_KEYWORDS.iter().find(|kw| normalized.contains(*kw)) {
            tracing::debug!(keyword = %keyword, "Rejected query containing blocked keyword");
            return Err(SafetyViolation::BlockedKeyword {
                keyword: keyword.to_string(),
            }
            .into());
        }

        if !normalized.starts_with("select") {
            return Err(SafetyViolation::NotSelect.into());
        }

        if has_limit_keyword(&normalized) {
            return Ok(query.to_string());
        }

        let cap = cap.clamp(1, self.max_limit);
        let body = query.trim_end().trim_end_matches(';').trim_end();
        Ok(format!("{} LIMIT {}", body, cap))
    }
}

/// Whether `normalized` contains `limit` as a whole word.
fn has_limit_keyword(normalized: &str) -> bool {
    normalized
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word == "limit")
}
