//! REST row store connection settings.
//!
//! Both the base URL and the API key can come from the file directly or from
//! an environment variable; the environment variable wins when it is set and
//! non-empty.

use super::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataServiceConfig {
    /// Environment variable holding the service base URL. Highest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_env: Option<String>,

    /// Service base URL, e.g. `https://project.supabase.co`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Environment variable holding the API key. Highest precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// API key sent as `apikey` and bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Path of the REST surface below the base URL.
    #[serde(default = "default_rest_path")]
    pub rest_path: String,

    /// Database schema exposed through the REST surface (`Accept-Profile`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
}

impl Default for DataServiceConfig {
    fn default() -> Self {
        Self {
            url_env: Some("ORGPULSE_DATA_URL".to_string()),
            url: None,
            api_key_env: Some("ORGPULSE_DATA_KEY".to_string()),
            api_key: None,
            rest_path: default_rest_path(),
            schema: None,
        }
    }
}

fn default_rest_path() -> String {
    "/rest/v1".to_string()
}

fn from_env(var: &Option<String>) -> Option<String> {
    var.as_ref()
        .and_then(|name| std::env::var(name).ok())
        .filter(|value| !value.trim().is_empty())
}

impl DataServiceConfig {
    /// Resolve the base URL.
    pub fn resolve_url(&self) -> Result<String, ConfigError> {
        from_env(&self.url_env)
            .or_else(|| self.url.clone())
            .ok_or_else(|| ConfigError::Config("data_service url is not configured".to_string()))
    }

    /// Resolve the API key.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        from_env(&self.api_key_env)
            .or_else(|| self.api_key.clone())
            .ok_or_else(|| {
                ConfigError::Config("data_service api key is not configured".to_string())
            })
    }

    /// Whether enough is configured to open a connection.
    pub fn is_configured(&self) -> bool {
        self.resolve_url().is_ok() && self.resolve_api_key().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_values() {
        let config = DataServiceConfig {
            url_env: None,
            url: Some("https://db.example.com".to_string()),
            api_key_env: None,
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_url().unwrap(), "https://db.example.com");
        assert_eq!(config.resolve_api_key().unwrap(), "secret");
        assert!(config.is_configured());
    }

    #[test]
    fn test_env_takes_precedence() {
        // SAFETY: We're in a test and controlling the environment
        unsafe {
            std::env::set_var("ORGPULSE_TEST_URL_PRECEDENCE", "https://from-env.example.com");
        }

        let config = DataServiceConfig {
            url_env: Some("ORGPULSE_TEST_URL_PRECEDENCE".to_string()),
            url: Some("https://from-file.example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_url().unwrap(), "https://from-env.example.com");

        // SAFETY: Cleanup in test
        unsafe {
            std::env::remove_var("ORGPULSE_TEST_URL_PRECEDENCE");
        }
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let config = DataServiceConfig {
            url_env: Some("ORGPULSE_TEST_URL_UNSET".to_string()),
            url: None,
            ..Default::default()
        };
        assert!(matches!(config.resolve_url(), Err(ConfigError::Config(_))));
    }
}
