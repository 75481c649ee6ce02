//! # orgpulse-store
//!
//! Outbound seam to the remote row store.
//!
//! The row store is reachable only through a REST surface: column projection,
//! equality and pattern filters, ordering, row ranges, and named remote
//! procedures. There is no generic SQL endpoint. This crate defines that
//! surface as the [`RowStore`] trait and provides two implementations:
//!
//! - [`PostgrestClient`]: HTTP client for a PostgREST-compatible service
//! - [`MemoryRowStore`]: in-process tables, used by tests and offline runs
//!
//! Requests are described with [`SelectRequest`], a builder that records the
//! calls in the order they were made.

pub mod error;
pub mod memory;
pub mod postgrest;
pub mod request;
pub mod store;

pub use error::StoreError;
pub use memory::{MemoryRowStore, StoreCall};
pub use postgrest::PostgrestClient;
pub use request::SelectRequest;
pub use store::RowStore;
