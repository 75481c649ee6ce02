//! Single entry point bundling the access-layer components.

use crate::catalog::EntityCatalog;
use crate::error::AccessError;
use crate::probe::SchemaProbe;
use crate::translator::QueryTranslator;
use orgpulse_core::{EntityRecord, ExistenceVerdict, OrgpulseConfig, RawQuery, ResultEnvelope};
use orgpulse_sql::SafetyGuard;
use orgpulse_store::{PostgrestClient, RowStore};
use serde_json::Value;
use std::sync::Arc;

/// All inbound operations of the data-access layer over one backend handle.
///
/// The handle is created once and shared by every component; it is never
/// reconnected.
pub struct DataAccess {
    guard: SafetyGuard,
    translator: QueryTranslator,
    probe: SchemaProbe,
    catalog: EntityCatalog,
}

impl DataAccess {
    /// Build over an existing store handle (`None` means not connected).
    pub fn new(config: &OrgpulseConfig, store: Option<Arc<dyn RowStore>>) -> Self {
        Self {
            guard: SafetyGuard::new(config.query.default_limit, config.query.max_limit),
            translator: QueryTranslator::new(store.clone(), config.query.fallback_procedure.clone()),
            probe: SchemaProbe::new(store.clone()),
            catalog: EntityCatalog::new(store, config.catalog.clone()),
        }
    }

    /// Build over a PostgREST client when the data service is configured.
    ///
    /// An unconfigured or invalid data service leaves the layer disconnected;
    /// queries then fail with [`AccessError::NotConnected`].
    pub fn connect(config: &OrgpulseConfig) -> Self {
        let store = match PostgrestClient::from_config(&config.data_service) {
            Ok(client) => {
                tracing::info!("Connected to data service");
                Some(Arc::new(client) as Arc<dyn RowStore>)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Data service unavailable, running disconnected");
                None
            }
        };
        Self::new(config, store)
    }

    pub fn is_connected(&self) -> bool {
        self.translator.is_connected()
    }

    /// Execute a dialect query.
    pub async fn execute(
        &self,
        text: impl Into<String>,
        params: Vec<Value>,
    ) -> Result<ResultEnvelope, AccessError> {
        self.translator.execute(&RawQuery::new(text, params)).await
    }

    /// Validate a free-form query, injecting the default row cap.
    pub fn validate(&self, text: &str) -> Result<String, AccessError> {
        Ok(self.guard.validate(text)?)
    }

    /// Validate a free-form query with a caller-supplied row cap.
    pub fn validate_with_limit(&self, text: &str, limit: u64) -> Result<String, AccessError> {
        Ok(self.guard.validate_with_limit(text, limit)?)
    }

    /// Validate then execute a free-form query, as the custom-query tool does.
    pub async fn execute_custom(
        &self,
        text: &str,
        limit: Option<u64>,
        params: Vec<Value>,
    ) -> Result<ResultEnvelope, AccessError> {
        let checked = match limit {
            Some(limit) => self.validate_with_limit(text, limit)?,
            None => self.validate(text)?,
        };
        self.execute(checked, params).await
    }

    pub async fn exists(&self, table: &str) -> bool {
        self.probe.exists(table).await
    }

    pub async fn probe(&self, table: &str) -> ExistenceVerdict {
        self.probe.probe(table).await
    }

    pub async fn list_known_entities(&self) -> Vec<String> {
        self.catalog.list_known_entities().await
    }

    pub async fn list_entities(&self) -> Vec<EntityRecord> {
        self.catalog.list_entities().await
    }
}
