//! Table existence probing.
//!
//! The row store publishes no schema, so existence is checked by issuing a
//! zero-row read and classifying the outcome. A failed probe cannot tell a
//! missing table from a permission or network failure; both read as "does not
//! exist" and must not drive destructive decisions.

use orgpulse_core::ExistenceVerdict;
use orgpulse_store::{RowStore, SelectRequest, StoreError};
use std::sync::Arc;

/// Backend codes meaning the relation is not there.
const ABSENT_CODES: [&str; 3] = ["42P01", "PGRST205", "PGRST106"];

/// Backend codes meaning access was refused.
const DENIED_CODES: [&str; 2] = ["42501", "PGRST301"];

#[derive(Clone)]
pub struct SchemaProbe {
    store: Option<Arc<dyn RowStore>>,
}

impl SchemaProbe {
    pub fn new(store: Option<Arc<dyn RowStore>>) -> Self {
        Self { store }
    }

    /// Whether `table` exists and is readable.
    pub async fn exists(&self, table: &str) -> bool {
        self.probe(table).await.exists()
    }

    /// Classify `table` without collapsing the failure reason.
    pub async fn probe(&self, table: &str) -> ExistenceVerdict {
        if table.trim().is_empty() {
            return ExistenceVerdict::Absent;
        }

        let Some(store) = &self.store else {
            tracing::debug!(table = %table, "Probe skipped, not connected");
            return ExistenceVerdict::Indeterminate;
        };

        let request = SelectRequest::from(table).select("*").limit(0);
        match store.select(&request).await {
            Ok(_) => ExistenceVerdict::Exists,
            Err(e) => {
                let verdict = classify(&e);
                tracing::debug!(table = %table, verdict = ?verdict, error = %e, "Probe failed");
                verdict
            }
        }
    }
}

/// Map a probe failure onto a verdict. No failure ever means the table exists.
pub fn classify(err: &StoreError) -> ExistenceVerdict {
    if let Some(code) = err.code() {
        if ABSENT_CODES.contains(&code) {
            return ExistenceVerdict::Absent;
        }
        if DENIED_CODES.contains(&code) {
            return ExistenceVerdict::Indeterminate;
        }
    }

    let message = err.to_string().to_lowercase();
    if message.contains("does not exist") || message.contains("could not find the table") {
        ExistenceVerdict::Absent
    } else {
        ExistenceVerdict::Indeterminate
    }
}
