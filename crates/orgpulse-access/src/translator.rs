//! Query translation.
//!
//! Maps dialect queries onto REST row store calls:
//! - Parsing the text into a [`ParsedIntent`]
//! - Picking one request shape by priority
//! - Falling back to the remote query procedure when no table is named
//! - Wrapping the response into a [`ResultEnvelope`]

use crate::error::AccessError;
use crate::normalizer::ResultNormalizer;
use orgpulse_core::{ParsedIntent, RawQuery, ResultEnvelope};
use orgpulse_sql::QueryParser;
use orgpulse_store::{RowStore, SelectRequest};
use serde_json::json;
use std::sync::Arc;

/// Request shape chosen for a parsed query, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// `WHERE col ILIKE $n`: one pattern filter, capped to a single row.
    PatternLookup,
    /// `LIMIT` present: projection, optional order, optional range, limit.
    Paginated,
    /// Anything else: unrestricted projection.
    Plain,
}

impl QueryShape {
    pub fn of(intent: &ParsedIntent) -> Self {
        if intent.pattern_filter().is_some() {
            Self::PatternLookup
        } else if intent.limit.is_some() {
            Self::Paginated
        } else {
            Self::Plain
        }
    }
}

/// Executes dialect queries against the row store.
pub struct QueryTranslator {
    store: Option<Arc<dyn RowStore>>,
    parser: QueryParser,
    fallback_procedure: String,
}

impl QueryTranslator {
    pub fn new(store: Option<Arc<dyn RowStore>>, fallback_procedure: impl Into<String>) -> Self {
        Self {
            store,
            parser: QueryParser::new(),
            fallback_procedure: fallback_procedure.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Execute a query and wrap the rows.
    pub async fn execute(&self, query: &RawQuery) -> Result<ResultEnvelope, AccessError> {
        let store = self.store.as_ref().ok_or(AccessError::NotConnected)?;
        let intent = self.parser.parse(query)?;

        let Some(request) = Self::plan(&intent) else {
            return self.execute_fallback(store.as_ref(), query).await;
        };

        tracing::debug!(
            table = %request.table(),
            shape = ?QueryShape::of(&intent),
            "Executing translated query"
        );

        let rows = store.select(&request).await.map_err(|e| {
            tracing::warn!(table = %request.table(), error = %e, "Backend select failed");
            AccessError::from(e)
        })?;
        Ok(ResultNormalizer::wrap(rows))
    }

    /// Build the select request for `intent`, or `None` when no table was
    /// identified.
    pub fn plan(intent: &ParsedIntent) -> Option<SelectRequest> {
        let table = intent.table.as_deref()?;
        let request = SelectRequest::from(table).select("*");

        let request = match QueryShape::of(intent) {
            QueryShape::PatternLookup => {
                // A case-insensitive name lookup resolves to at most one entity.
                let filter = intent.pattern_filter()?;
                request
                    .filter(filter.column.clone(), filter.operator, filter.value.clone())
                    .limit(1)
            }
            QueryShape::Paginated => {
                let limit = intent.limit?;
                let mut request = request;
                if let Some(order) = &intent.order_by {
                    request = request.order(order.column.clone(), order.direction.is_ascending());
                }
                if let Some((from, to)) = intent.row_range() {
                    request = request.range(from, to);
                }
                request.limit(limit)
            }
            QueryShape::Plain => {
                if intent.order_by.is_some() || intent.offset.is_some() {
                    tracing::debug!(
                        table = %table,
                        "ORDER BY / OFFSET without LIMIT is ignored"
                    );
                }
                request
            }
        };
        Some(request)
    }

    async fn execute_fallback(
        &self,
        store: &dyn RowStore,
        query: &RawQuery,
    ) -> Result<ResultEnvelope, AccessError> {
        tracing::info!(
            procedure = %self.fallback_procedure,
            "No table identified, using remote query procedure"
        );

        let args = json!({
            "query": query.text,
            "parameters": query.params,
        });
        let value = store
            .rpc(&self.fallback_procedure, &args)
            .await
            .map_err(|e| {
                tracing::warn!(
                    procedure = %self.fallback_procedure,
                    error = %e,
                    "Remote query procedure failed"
                );
                AccessError::from(e)
            })?;
        Ok(ResultNormalizer::wrap_procedure_result(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgpulse_core::{FilterOperator, SortDirection};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    fn plan(text: &str, params: Vec<Value>) -> Option<SelectRequest> {
        let intent = QueryParser::new()
            .parse(&RawQuery::new(text, params))
            .unwrap();
        QueryTranslator::plan(&intent)
    }

    #[test]
    fn test_pattern_lookup_plan() {
        let request = plan("SELECT * FROM t WHERE name ILIKE $1", vec![json!("%foo%")]).unwrap();
        assert_eq!(
            request,
            SelectRequest::from("t")
                .select("*")
                .filter("name", FilterOperator::ILike, "%foo%")
                .limit(1)
        );
    }

    #[test]
    fn test_pattern_lookup_outranks_pagination() {
        let request = plan(
            "SELECT * FROM t WHERE name ILIKE $1 ORDER BY id DESC LIMIT 50",
            vec![json!("x%")],
        )
        .unwrap();
        assert_eq!(request.row_limit(), Some(1));
        assert_eq!(request.order_by(), None);
    }

    #[test]
    fn test_paginated_plan() {
        let request = plan(
            "SELECT * FROM t ORDER BY x DESC LIMIT $1 OFFSET $2",
            vec![json!(10), json!(20)],
        )
        .unwrap();
        assert_eq!(
            request.order_by().map(|o| (o.column.as_str(), o.direction)),
            Some(("x", SortDirection::Desc))
        );
        assert_eq!(request.row_range(), Some((20, 29)));
        assert_eq!(request.row_limit(), Some(10));
    }

    #[test]
    fn test_paginated_without_offset_has_no_range() {
        let request = plan("SELECT * FROM t ORDER BY x LIMIT 5", vec![]).unwrap();
        assert_eq!(
            request.order_by().map(|o| o.direction),
            Some(SortDirection::Asc)
        );
        assert_eq!(request.row_range(), None);
        assert_eq!(request.row_limit(), Some(5));
    }

    #[test]
    fn test_plain_plan() {
        let request = plan("SELECT id FROM t ORDER BY id", vec![]).unwrap();
        assert_eq!(request, SelectRequest::from("t").select("*"));
    }

    #[test]
    fn test_no_table_means_no_plan() {
        assert_eq!(plan("SELECT 1", vec![]), None);
    }

    #[tokio::test]
    async fn test_not_connected() {
        let translator = QueryTranslator::new(None, "execute_sql");
        let err = translator
            .execute(&RawQuery::text("SELECT * FROM t"))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::NotConnected));
    }
}
