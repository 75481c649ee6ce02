//! Select request builder.

use orgpulse_core::{Filter, FilterOperator, OrderBy, SortDirection};
use serde::Serialize;
use serde_json::Value;

/// A read against one table, built up the way REST clients chain calls:
/// projection, filters, ordering, range, limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectRequest {
    table: String,
    columns: String,
    filters: Vec<Filter>,
    order: Option<OrderBy>,
    range: Option<(u64, u64)>,
    limit: Option<u64>,
}

impl SelectRequest {
    /// Start a request against `table` projecting all columns.
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            range: None,
            limit: None,
        }
    }

    /// Set the column projection (`*` or a comma-separated list).
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn filter(
        mut self,
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<Value>,
    ) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            operator,
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            direction: if ascending {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            },
        });
        self
    }

    /// Restrict to rows `from..=to` (0-based, inclusive).
    pub fn range(mut self, from: u64, to: u64) -> Self {
        self.range = Some((from, to));
        self
    }

    pub fn limit(mut self, count: u64) -> Self {
        self.limit = Some(count);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn columns(&self) -> &str {
        &self.columns
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn order_by(&self) -> Option<&OrderBy> {
        self.order.as_ref()
    }

    pub fn row_range(&self) -> Option<(u64, u64)> {
        self.range
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    /// Effective `(offset, limit)` once range and limit are combined.
    ///
    /// A range fixes the offset and caps the count; an explicit limit can only
    /// narrow it further. An inverted range selects nothing.
    pub fn window(&self) -> (Option<u64>, Option<u64>) {
        let (offset, range_count) = match self.range {
            Some((from, to)) => {
                let count = if to >= from {
                    (to - from).saturating_add(1)
                } else {
                    0
                };
                (Some(from), Some(count))
            }
            None => (None, None),
        };
        let count = match (range_count, self.limit) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        (offset, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_records_calls() {
        let request = SelectRequest::from("daos")
            .select("*")
            .filter("name", FilterOperator::ILike, "%vita%")
            .order("created_at", false)
            .range(20, 29)
            .limit(10);

        assert_eq!(request.table(), "daos");
        assert_eq!(request.filters()[0].value, json!("%vita%"));
        assert_eq!(
            request.order_by().map(|o| o.direction),
            Some(SortDirection::Desc)
        );
        assert_eq!(request.row_range(), Some((20, 29)));
        assert_eq!(request.window(), (Some(20), Some(10)));
    }

    #[test]
    fn test_window_without_range() {
        assert_eq!(SelectRequest::from("t").limit(0).window(), (None, Some(0)));
        assert_eq!(SelectRequest::from("t").window(), (None, None));
        assert_eq!(
            SelectRequest::from("t").range(5, 6).window(),
            (Some(5), Some(2))
        );
    }

    #[test]
    fn test_window_saturates_on_full_range() {
        assert_eq!(
            SelectRequest::from("t").range(0, u64::MAX).window(),
            (Some(0), Some(u64::MAX))
        );
        assert_eq!(
            SelectRequest::from("t").range(u64::MAX, u64::MAX).limit(2).window(),
            (Some(u64::MAX), Some(1))
        );
    }
}
