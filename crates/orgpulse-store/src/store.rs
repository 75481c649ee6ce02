use crate::error::StoreError;
use crate::request::SelectRequest;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait RowStore: Send + Sync {
    /// Run a projected, filtered, ordered and windowed read against one table.
    /// Rows come back in backend response order.
    async fn select(&self, request: &SelectRequest) -> Result<Vec<Value>, StoreError>;

    /// Invoke a named server-side procedure with a JSON argument object.
    async fn rpc(&self, procedure: &str, args: &Value) -> Result<Value, StoreError>;
}
