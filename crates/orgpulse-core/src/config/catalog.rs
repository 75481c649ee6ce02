//! Entity catalog configuration.
//!
//! The catalog is closed: an organization is only discovered if its data
//! table is listed in `candidate_tables` or its name appears in the registry
//! table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Per-organization data tables probed for existence.
    #[serde(default = "default_candidate_tables")]
    pub candidate_tables: Vec<String>,

    /// Prefix stripped from a table name to recover the entity name.
    #[serde(default)]
    pub table_prefix: String,

    /// Suffix stripped from a table name to recover the entity name.
    #[serde(default = "default_table_suffix")]
    pub table_suffix: String,

    /// Optional registry table listing organizations explicitly.
    #[serde(default = "default_registry_table")]
    pub registry_table: Option<String>,

    /// Column of the registry table holding the entity name.
    #[serde(default = "default_registry_name_column")]
    pub registry_name_column: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            candidate_tables: default_candidate_tables(),
            table_prefix: String::new(),
            table_suffix: default_table_suffix(),
            registry_table: default_registry_table(),
            registry_name_column: default_registry_name_column(),
        }
    }
}

impl CatalogConfig {
    /// Recover the entity name from a data table name.
    ///
    /// Returns `None` when stripping leaves nothing.
    pub fn entity_name_for_table(&self, table: &str) -> Option<String> {
        let without_prefix = table.strip_prefix(self.table_prefix.as_str()).unwrap_or(table);
        let name = without_prefix
            .strip_suffix(self.table_suffix.as_str())
            .unwrap_or(without_prefix);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    /// Data table name for an entity.
    pub fn table_for_entity(&self, name: &str) -> String {
        format!("{}{}{}", self.table_prefix, name, self.table_suffix)
    }
}

fn default_candidate_tables() -> Vec<String> {
    [
        "vitadao", "athenadao", "valleydao", "hairdao", "psydao", "cryodao", "cerebrumdao",
        "quantumbiodao", "bio",
    ]
    .iter()
    .map(|name| format!("{}{}", name, default_table_suffix()))
    .collect()
}

fn default_table_suffix() -> String {
    "_tweets".to_string()
}

fn default_registry_table() -> Option<String> {
    Some("daos".to_string())
}

fn default_registry_name_column() -> String {
    "name".to_string()
}
