//! # orgpulse-core
//!
//! Shared value types and configuration for the orgpulse data-access layer.
//!
//! Everything in this crate is a request-scoped value object: raw queries as
//! received from analytics callers, the structured intent a query is parsed
//! into, the canonical result envelope, and the entity records produced by
//! catalog discovery.

// Configuration types shared across all orgpulse crates
pub mod config;

pub mod entity;
pub mod query;
pub mod result;

pub use config::{
    CatalogConfig, ConfigError, DataServiceConfig, LoggingConfig, OrgpulseConfig, QueryConfig,
};
pub use entity::{EntityRecord, ExistenceVerdict};
pub use query::{Filter, FilterOperator, OrderBy, ParsedIntent, RawQuery, SortDirection};
pub use result::{ResultEnvelope, SELECT_COMMAND};
