//! Query execution settings.

use serde::{Deserialize, Serialize};

/// Limits and fallback behavior for query execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Row cap appended to free-form queries that carry no `LIMIT`.
    #[serde(default = "default_limit")]
    pub default_limit: u64,

    /// Upper bound for any caller-supplied cap.
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,

    /// Server-side procedure invoked when no table can be identified.
    /// Called with `{ "query": <text>, "parameters": [...] }`.
    #[serde(default = "default_fallback_procedure")]
    pub fallback_procedure: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            fallback_procedure: default_fallback_procedure(),
        }
    }
}

fn default_limit() -> u64 {
    100
}

fn default_max_limit() -> u64 {
    100
}

fn default_fallback_procedure() -> String {
    "execute_sql".to_string()
}
