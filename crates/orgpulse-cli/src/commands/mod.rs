//! CLI command implementations for orgpulse.

pub mod catalog;
pub mod check;
pub mod query;
