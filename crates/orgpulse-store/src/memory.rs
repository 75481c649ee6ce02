//! In-process row store.
//!
//! Evaluates [`SelectRequest`]s against tables held in memory and answers
//! procedure calls through registered handlers. Every call is recorded so
//! tests can assert exactly what the access layer asked for. Error messages
//! mimic the wording PostgREST passes through from Postgres.

use crate::error::StoreError;
use crate::request::SelectRequest;
use crate::store::RowStore;
use async_trait::async_trait;
use orgpulse_core::{Filter, FilterOperator};
use regex::RegexBuilder;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

type ProcedureHandler = Box<dyn Fn(&Value) -> Result<Value, StoreError> + Send + Sync>;

/// A call received by a [`MemoryRowStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Select(SelectRequest),
    Rpc { procedure: String, args: Value },
}

#[derive(Default)]
pub struct MemoryRowStore {
    tables: HashMap<String, Vec<Value>>,
    denied: HashSet<String>,
    procedures: HashMap<String, ProcedureHandler>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table with its rows (kept in insertion order).
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Value>) -> Self {
        self.tables.insert(name.into(), rows);
        self
    }

    /// Add a table that exists but rejects every read with a permission error.
    pub fn with_denied_table(mut self, name: impl Into<String>) -> Self {
        self.denied.insert(name.into());
        self
    }

    /// Register a remote procedure.
    pub fn with_procedure<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, StoreError> + Send + Sync + 'static,
    {
        self.procedures.insert(name.into(), Box::new(handler));
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Select requests received so far, oldest first.
    pub fn selects(&self) -> Vec<SelectRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Select(request) => Some(request),
                StoreCall::Rpc { .. } => None,
            })
            .collect()
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    fn evaluate(&self, request: &SelectRequest) -> Result<Vec<Value>, StoreError> {
        if self.denied.contains(request.table()) {
            return Err(StoreError::backend(
                "42501",
                format!("permission denied for table {}", request.table()),
            ));
        }

        let rows = self.tables.get(request.table()).ok_or_else(|| {
            StoreError::backend(
                "42P01",
                format!("relation \"public.{}\" does not exist", request.table()),
            )
        })?;

        let mut matched = Vec::new();
        for row in rows {
            if filters_match(request.filters(), row)? {
                matched.push(row);
            }
        }

        if let Some(order) = request.order_by() {
            matched.sort_by(|a, b| {
                let ordering = compare_values(&a[order.column.as_str()], &b[order.column.as_str()]);
                if order.direction.is_ascending() {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        let (offset, limit) = request.window();
        let window = matched
            .into_iter()
            .skip(offset.unwrap_or(0) as usize)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX));

        Ok(window.map(|row| project(row, request.columns())).collect())
    }
}

#[async_trait]
impl RowStore for MemoryRowStore {
    async fn select(&self, request: &SelectRequest) -> Result<Vec<Value>, StoreError> {
        self.record(StoreCall::Select(request.clone()));
        self.evaluate(request)
    }

    async fn rpc(&self, procedure: &str, args: &Value) -> Result<Value, StoreError> {
        self.record(StoreCall::Rpc {
            procedure: procedure.to_string(),
            args: args.clone(),
        });

        match self.procedures.get(procedure) {
            Some(handler) => handler(args),
            None => Err(StoreError::backend(
                "PGRST202",
                format!(
                    "Could not find the function public.{} in the schema cache",
                    procedure
                ),
            )),
        }
    }
}

fn filters_match(filters: &[Filter], row: &Value) -> Result<bool, StoreError> {
    for filter in filters {
        let cell = &row[filter.column.as_str()];
        let matched = match filter.operator {
            FilterOperator::Eq => cell_text(cell) == cell_text(&filter.value),
            FilterOperator::Like => like_match(&cell_text(cell), &cell_text(&filter.value), false)?,
            FilterOperator::ILike => like_match(&cell_text(cell), &cell_text(&filter.value), true)?,
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Match `text` against a SQL LIKE pattern (`%` any run, `_` any one char).
fn like_match(text: &str, pattern: &str, case_insensitive: bool) -> Result<bool, StoreError> {
    let mut expr = String::from("^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '%' | '_' => {
                expr.push_str(&regex::escape(&literal));
                literal.clear();
                expr.push_str(if c == '%' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    expr.push_str(&regex::escape(&literal));
    expr.push('$');

    let re = RegexBuilder::new(&expr)
        .case_insensitive(case_insensitive)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| StoreError::InvalidRequest(format!("invalid pattern {}: {}", pattern, e)))?;
    Ok(re.is_match(text))
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Postgres-like ordering: numbers numerically, strings lexically, nulls last.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }
    let mut projected = Map::new();
    for column in columns.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        projected.insert(column.to_string(), row[column].clone());
    }
    Value::Object(projected)
}
