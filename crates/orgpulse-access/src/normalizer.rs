//! Result envelope construction.

use orgpulse_core::ResultEnvelope;
use serde_json::Value;

/// Wraps backend responses into [`ResultEnvelope`]s. Row shapes are never
/// inspected.
pub struct ResultNormalizer;

impl ResultNormalizer {
    /// Wrap rows returned by a select.
    pub fn wrap(rows: Vec<Value>) -> ResultEnvelope {
        ResultEnvelope::from_rows(rows)
    }

    /// Wrap whatever a remote procedure returned.
    ///
    /// An array is taken as the row list, `null` as no rows, and any other
    /// value as a single row.
    pub fn wrap_procedure_result(value: Value) -> ResultEnvelope {
        match value {
            Value::Array(rows) => Self::wrap(rows),
            Value::Null => ResultEnvelope::empty(),
            other => Self::wrap(vec![other]),
        }
    }
}
