//! Entity discovery.
//!
//! The set of organizations is closed. An entity is known when either:
//! - its data table is one of the configured candidates and a probe succeeds
//! - its name is a row of the registry table (if that table exists)
//!
//! Results are rebuilt from the backend on every call.

use crate::display::{display_name, slug};
use crate::probe::SchemaProbe;
use futures::future::join_all;
use orgpulse_core::{CatalogConfig, EntityRecord};
use orgpulse_store::{RowStore, SelectRequest};
use std::collections::HashMap;
use std::sync::Arc;

pub struct EntityCatalog {
    store: Option<Arc<dyn RowStore>>,
    probe: SchemaProbe,
    config: CatalogConfig,
}

impl EntityCatalog {
    pub fn new(store: Option<Arc<dyn RowStore>>, config: CatalogConfig) -> Self {
        Self {
            probe: SchemaProbe::new(store.clone()),
            store,
            config,
        }
    }

    /// Internal names of every known entity, deduplicated case-insensitively.
    pub async fn list_known_entities(&self) -> Vec<String> {
        self.list_entities()
            .await
            .into_iter()
            .map(|record| record.internal_name)
            .collect()
    }

    /// Full records for every known entity.
    ///
    /// Candidate-table entities come first, in candidate order, followed by
    /// registry-only entities. When both sources report the same name (any
    /// casing) a single record is kept and marked as registered.
    pub async fn list_entities(&self) -> Vec<EntityRecord> {
        let mut records: Vec<EntityRecord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (table, name) in self.discover_tables().await {
            let key = name.to_lowercase();
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key, records.len());
            records.push(self.record(name, table, false));
        }

        for name in self.registry_names().await {
            let key = name.to_lowercase();
            if let Some(&position) = index.get(&key) {
                records[position].is_registered = true;
                continue;
            }
            index.insert(key, records.len());
            let table = self.config.table_for_entity(&name);
            records.push(self.record(name, table, true));
        }

        tracing::debug!(count = records.len(), "Listed known entities");
        records
    }

    /// Probe every candidate table concurrently; return `(table, entity name)`
    /// for the ones that exist.
    async fn discover_tables(&self) -> Vec<(String, String)> {
        let probes = self
            .config
            .candidate_tables
            .iter()
            .map(|table| async move { (table, self.probe.exists(table).await) });

        join_all(probes)
            .await
            .into_iter()
            .filter(|(_, exists)| *exists)
            .filter_map(|(table, _)| {
                self.config
                    .entity_name_for_table(table)
                    .map(|name| (table.clone(), name))
            })
            .collect()
    }

    /// Names listed in the registry table, or nothing when there is no
    /// readable registry.
    async fn registry_names(&self) -> Vec<String> {
        let (Some(registry), Some(store)) = (&self.config.registry_table, &self.store) else {
            return Vec::new();
        };
        if !self.probe.exists(registry).await {
            return Vec::new();
        }

        let column = self.config.registry_name_column.as_str();
        let request = SelectRequest::from(registry.as_str()).select(column);
        match store.select(&request).await {
            Ok(rows) => rows
                .iter()
                .filter_map(|row| row[column].as_str())
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                tracing::warn!(table = %registry, error = %e, "Failed to read entity registry");
                Vec::new()
            }
        }
    }

    fn record(&self, internal_name: String, table_name: String, is_registered: bool) -> EntityRecord {
        EntityRecord {
            display_name: display_name(&internal_name),
            slug: slug(&internal_name),
            internal_name,
            table_name,
            is_registered,
        }
    }
}
