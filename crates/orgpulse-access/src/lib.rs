//! # orgpulse-access
//!
//! Data-access translation layer between analytics callers and the REST row
//! store.
//!
//! ## Architecture
//!
//! ```text
//! analytics / catalog callers
//!       │
//!       │ execute(text, params) / exists(table) / list_known_entities()
//!       ▼
//! ┌──────────────────────┐
//! │ SafetyGuard          │  ← free-form custom queries only
//! │ QueryTranslator      │  ← parse dialect, pick a request shape
//! │ SchemaProbe          │  ← zero-row existence checks
//! │ EntityCatalog        │  ← candidate tables ∪ registry rows
//! │ ResultNormalizer     │  ← one envelope for every code path
//! └──────────┬───────────┘
//!            │ select / filter / order / range / rpc
//!            ▼
//!       REST row store
//! ```
//!
//! Nothing here is cached: every existence check and catalog listing goes to
//! the backend again.

pub mod access;
pub mod catalog;
pub mod display;
pub mod error;
pub mod normalizer;
pub mod probe;
pub mod translator;

pub use access::DataAccess;
pub use catalog::EntityCatalog;
pub use display::{display_name, slug};
pub use error::AccessError;
pub use normalizer::ResultNormalizer;
pub use probe::SchemaProbe;
pub use translator::{QueryShape, QueryTranslator};
