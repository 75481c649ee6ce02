//! Configuration types for orgpulse.
//!
//! Configuration is loaded from a single YAML file (`orgpulse.yaml` by
//! default). Every section is optional and falls back to its defaults, so an
//! empty file is a valid configuration.
//!
//! # Sections
//!
//! - **data_service**: where the REST row store lives and how to authenticate
//! - **query**: result caps and the remote query procedure name
//! - **catalog**: candidate tables and registry used for entity discovery
//! - **logging**: default log level when `RUST_LOG` is not set

pub mod catalog;
pub mod data_service;
pub mod query;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use catalog::CatalogConfig;
pub use data_service::DataServiceConfig;
pub use query::QueryConfig;

/// Complete orgpulse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrgpulseConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// REST row store connection.
    #[serde(default)]
    pub data_service: DataServiceConfig,

    /// Query limits and fallback settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Entity discovery settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `info`,
    /// `orgpulse_access=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrgpulseConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise return defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query.max_limit == 0 {
            return Err(ConfigError::Config(
                "query.max_limit must be at least 1".to_string(),
            ));
        }
        if self.query.default_limit == 0 || self.query.default_limit > self.query.max_limit {
            return Err(ConfigError::Config(format!(
                "query.default_limit must be between 1 and {}",
                self.query.max_limit
            )));
        }
        if self.query.fallback_procedure.trim().is_empty() {
            return Err(ConfigError::Config(
                "query.fallback_procedure must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = OrgpulseConfig::from_yaml("").unwrap();
        assert_eq!(config.query.default_limit, 100);
        assert_eq!(config.query.fallback_procedure, "execute_sql");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
project: desci-metrics
data_service:
  url: https://example.supabase.co
  api_key_env: ORGPULSE_TEST_KEY
query:
  default_limit: 50
catalog:
  candidate_tables: [vitadao_tweets, bio_tweets]
  registry_table: null
logging:
  level: debug
"#;
        let config = OrgpulseConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.project.as_deref(), Some("desci-metrics"));
        assert_eq!(
            config.data_service.url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert_eq!(config.query.default_limit, 50);
        assert_eq!(config.query.max_limit, 100);
        assert_eq!(
            config.catalog.candidate_tables,
            vec!["vitadao_tweets".to_string(), "bio_tweets".to_string()]
        );
        assert_eq!(config.catalog.registry_table, None);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_default_limit_above_max_is_rejected() {
        let yaml = "query:\n  default_limit: 500\n";
        let err = OrgpulseConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "project: from-file").unwrap();

        let config = OrgpulseConfig::from_file(file.path()).unwrap();
        assert_eq!(config.project.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = OrgpulseConfig::load_or_default(dir.path().join("absent.yaml")).unwrap();
        assert!(config.project.is_none());
    }
}
