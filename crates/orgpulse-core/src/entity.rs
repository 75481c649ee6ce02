//! Entity catalog value types.

use serde::{Deserialize, Serialize};

/// Outcome of probing a logical table.
///
/// `Indeterminate` covers permission and transport failures; callers treat it
/// the same as `Absent`, so a single negative verdict is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExistenceVerdict {
    Exists,
    Absent,
    Indeterminate,
}

impl ExistenceVerdict {
    pub fn exists(&self) -> bool {
        matches!(self, Self::Exists)
    }
}

/// One tracked organization as discovered by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    /// Lookup key; all equality checks happen on this name.
    pub internal_name: String,
    pub display_name: String,
    pub slug: String,
    pub table_name: String,
    /// `true` when the entity is listed in the registry table, `false` when it
    /// was found only through its data table.
    pub is_registered: bool,
}
