//! Query input and parsed intent types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A textual query plus its positional parameters, as handed over by callers.
///
/// Parameters are referenced from the text as `$1`, `$2`, ... (1-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawQuery {
    pub text: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RawQuery {
    pub fn new(text: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            text: text.into(),
            params,
        }
    }

    /// Query without parameters.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// Look up a parameter by its 1-based index.
    pub fn param(&self, index: usize) -> Option<&Value> {
        index.checked_sub(1).and_then(|i| self.params.get(i))
    }
}

/// Operators the row store can apply as a column filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Like,
    ILike,
}

impl FilterOperator {
    /// Whether this is a LIKE-style pattern operator.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::Like | Self::ILike)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Like => "like",
            Self::ILike => "ilike",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `column OP value` predicate with its parameter already substituted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: String,
    pub operator: FilterOperator,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_ascending(&self) -> bool {
        matches!(self, Self::Asc)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// Structured form of a [`RawQuery`].
///
/// `table == None` means no table could be identified and the caller must
/// fall back to the remote query procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedIntent {
    pub table: Option<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl ParsedIntent {
    /// First LIKE-style filter, if the query has one.
    pub fn pattern_filter(&self) -> Option<&Filter> {
        self.filters.iter().find(|f| f.operator.is_pattern())
    }

    /// Inclusive row range implied by `OFFSET` and `LIMIT`.
    ///
    /// Only defined when both are present and the limit is non-zero. The end
    /// saturates at `u64::MAX`.
    pub fn row_range(&self) -> Option<(u64, u64)> {
        match (self.offset, self.limit) {
            (Some(offset), Some(limit)) if limit > 0 => {
                Some((offset, offset.saturating_add(limit - 1)))
            }
            _ => None,
        }
    }
}
