//! HTTP client for a PostgREST-compatible row store.
//!
//! Reads become `GET {rest}/{table}?select=..&col=op.value&order=..&offset=..&limit=..`
//! and procedures become `POST {rest}/rpc/{name}` with a JSON body. One
//! `reqwest::Client` is shared by every call; it multiplexes requests over its
//! own connection pool.

use crate::error::StoreError;
use crate::request::SelectRequest;
use crate::store::RowStore;
use async_trait::async_trait;
use orgpulse_core::DataServiceConfig;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Error body returned by PostgREST on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

pub struct PostgrestClient {
    client: Client,
    rest_base: Url,
    api_key: String,
    schema: Option<String>,
}

impl PostgrestClient {
    /// Create a client for `base_url` with the REST surface at `rest_path`.
    pub fn new(
        base_url: &str,
        rest_path: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let mut rest_base = Url::parse(base_url)
            .map_err(|e| StoreError::InvalidRequest(format!("invalid base url: {}", e)))?;
        rest_base
            .path_segments_mut()
            .map_err(|_| StoreError::InvalidRequest(format!("{} cannot be a base url", base_url)))?
            .pop_if_empty()
            .extend(rest_path.split('/').filter(|s| !s.is_empty()));

        Ok(Self {
            client: Client::new(),
            rest_base,
            api_key: api_key.into(),
            schema: None,
        })
    }

    /// Build a client from configuration, resolving environment overrides.
    pub fn from_config(config: &DataServiceConfig) -> Result<Self, StoreError> {
        let url = config.resolve_url()?;
        let api_key = config.resolve_api_key()?;
        let client = Self::new(&url, &config.rest_path, api_key)?;
        Ok(match &config.schema {
            Some(schema) => client.with_schema(schema.clone()),
            None => client,
        })
    }

    /// Target a non-default schema through the profile headers.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.rest_base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRequest("rest url cannot be a base".to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// URL for a select request.
    pub fn select_url(&self, request: &SelectRequest) -> Result<Url, StoreError> {
        if request.table().is_empty() {
            return Err(StoreError::InvalidRequest("table name is empty".to_string()));
        }

        let (_, table) = self.target(request.table());
        let mut url = self.endpoint(&[table])?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", request.columns());

            for filter in request.filters() {
                query.append_pair(
                    &filter.column,
                    &format!("{}.{}", filter.operator, value_text(&filter.value)),
                );
            }

            if let Some(order) = request.order_by() {
                let direction = if order.direction.is_ascending() {
                    "asc"
                } else {
                    "desc"
                };
                query.append_pair("order", &format!("{}.{}", order.column, direction));
            }

            let (offset, limit) = request.window();
            if let Some(offset) = offset {
                query.append_pair("offset", &offset.to_string());
            }
            if let Some(limit) = limit {
                query.append_pair("limit", &limit.to_string());
            }
        }
        Ok(url)
    }

    /// URL for a remote procedure call.
    pub fn rpc_url(&self, procedure: &str) -> Result<Url, StoreError> {
        if procedure.is_empty() {
            return Err(StoreError::InvalidRequest("procedure name is empty".to_string()));
        }
        self.endpoint(&["rpc", procedure])
    }

    /// Schema profile and bare table name for `table`.
    ///
    /// PostgREST addresses tables by bare name under `/rest/v1`, so a
    /// `schema.table` reference moves its schema into the profile header.
    /// Unqualified names use the configured schema, if any.
    pub fn target<'r>(&'r self, table: &'r str) -> (Option<&'r str>, &'r str) {
        match table.split_once('.') {
            Some((schema, name)) if !schema.is_empty() && !name.is_empty() => (Some(schema), name),
            _ => (self.schema.as_deref(), table),
        }
    }

    fn authorize(
        &self,
        builder: RequestBuilder,
        profile_header: &str,
        schema: Option<&str>,
    ) -> RequestBuilder {
        let builder = builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key);
        match schema {
            Some(schema) => builder.header(profile_header, schema),
            None => builder,
        }
    }
}

#[async_trait]
impl RowStore for PostgrestClient {
    async fn select(&self, request: &SelectRequest) -> Result<Vec<Value>, StoreError> {
        let url = self.select_url(request)?;
        tracing::debug!(table = %request.table(), url = %url, "Issuing select");

        let (schema, _) = self.target(request.table());
        let response = self
            .authorize(self.client.get(url), "Accept-Profile", schema)
            .send()
            .await?;
        match read_body(response).await? {
            Value::Array(rows) => Ok(rows),
            other => Err(StoreError::Decode(format!(
                "expected an array of rows, got {}",
                json_kind(&other)
            ))),
        }
    }

    async fn rpc(&self, procedure: &str, args: &Value) -> Result<Value, StoreError> {
        let url = self.rpc_url(procedure)?;
        tracing::debug!(procedure = %procedure, "Invoking remote procedure");

        let response = self
            .authorize(
                self.client.post(url).json(args),
                "Content-Profile",
                self.schema.as_deref(),
            )
            .send()
            .await?;
        read_body(response).await
    }
}

/// Read a response body as JSON, turning non-2xx statuses into backend errors.
async fn read_body(response: Response) -> Result<Value, StoreError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(backend_error(status.as_u16(), &body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Interpret an error response body.
///
/// The message is taken verbatim from the body when it carries one.
fn backend_error(status: u16, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => StoreError::Backend {
            status: Some(status),
            code: parsed.code,
            message: parsed
                .message
                .unwrap_or_else(|| format!("request failed with status {}", status)),
            details: parsed.details.filter(|d| !d.is_empty()),
            hint: parsed.hint.filter(|h| !h.is_empty()),
        },
        Err(_) => StoreError::Backend {
            status: Some(status),
            code: None,
            message: if body.trim().is_empty() {
                format!("request failed with status {}", status)
            } else {
                body.trim().to_string()
            },
            details: None,
            hint: None,
        },
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
