//! Canonical result envelope returned for every successful query.

use serde::Serialize;
use serde_json::Value;

/// Command tag reported for every envelope.
pub const SELECT_COMMAND: &str = "SELECT";

/// Rows returned by the backend, in response order.
///
/// `row_count` always equals `rows.len()`; the fields are private so the
/// only way to build an envelope is from a row vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    rows: Vec<Value>,
    #[serde(rename = "rowCount")]
    row_count: usize,
    command: &'static str,
}

impl ResultEnvelope {
    pub fn from_rows(rows: Vec<Value>) -> Self {
        Self {
            row_count: rows.len(),
            rows,
            command: SELECT_COMMAND,
        }
    }

    pub fn empty() -> Self {
        Self::from_rows(Vec::new())
    }

    pub fn rows(&self) -> &[Value] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn command(&self) -> &'static str {
        self.command
    }
}
