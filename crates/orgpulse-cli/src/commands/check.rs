//! `orgpulse check-config` command implementation.
//!
//! Reports what the loaded configuration resolves to, without contacting the
//! data service.

use anyhow::Result;
use orgpulse_core::OrgpulseConfig;
use std::path::Path;

/// Severity level for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
        }
    }
}

/// Collect findings for a loaded configuration.
pub fn check_config(config: &OrgpulseConfig) -> Vec<(Severity, String)> {
    let mut findings = Vec::new();

    match config.data_service.resolve_url() {
        Ok(url) => findings.push((Severity::Info, format!("data service: {}", url))),
        Err(e) => findings.push((Severity::Warning, e.to_string())),
    }
    if let Err(e) = config.data_service.resolve_api_key() {
        findings.push((Severity::Warning, e.to_string()));
    }

    findings.push((
        Severity::Info,
        format!(
            "query cap: default {} / max {}, fallback procedure '{}'",
            config.query.default_limit, config.query.max_limit, config.query.fallback_procedure
        ),
    ));

    let catalog = &config.catalog;
    if catalog.candidate_tables.is_empty() && catalog.registry_table.is_none() {
        findings.push((
            Severity::Warning,
            "catalog has no candidate tables and no registry; no entities can be discovered"
                .to_string(),
        ));
    } else {
        findings.push((
            Severity::Info,
            format!(
                "catalog: {} candidate table(s), registry {}",
                catalog.candidate_tables.len(),
                catalog.registry_table.as_deref().unwrap_or("disabled")
            ),
        ));
    }

    for table in &catalog.candidate_tables {
        if catalog.entity_name_for_table(table).is_none() {
            findings.push((
                Severity::Warning,
                format!("candidate table '{}' yields an empty entity name", table),
            ));
        }
    }

    findings
}

pub fn run_check(path: &Path, config: &OrgpulseConfig) -> Result<()> {
    if path.exists() {
        println!("Configuration: {}", path.display());
    } else {
        println!("Configuration: {} (not found, using defaults)", path.display());
    }

    for (severity, message) in check_config(config) {
        println!("  [{}] {}", severity, message);
    }

    println!();
    println!("Effective configuration:");
    print!("{}", serde_yaml::to_string(&redacted(config))?);
    Ok(())
}

/// Copy of `config` with inline secrets masked.
fn redacted(config: &OrgpulseConfig) -> OrgpulseConfig {
    let mut config = config.clone();
    if config.data_service.api_key.is_some() {
        config.data_service.api_key = Some("********".to_string());
    }
    config
}
