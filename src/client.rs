//! HTTP client for the gateway.
//!
//! `call_tool` speaks the legacy `POST /mcp` envelope; the `*_rpc` family
//! and [`GatewayClient::initialize`] / [`GatewayClient::list_tools`] go
//! through JSON-RPC at `POST /mcp/v2`.

use std::sync::atomic::{AtomicI64, Ordering};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::protocol::{RpcRequest, RpcResponse};

const UNKNOWN_ERROR: &str = "unknown error";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("MCP call failed: {0}")]
    Call(String),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTool {
    pub name: String,
    pub description: String,
}

pub struct GatewayClient {
    base_url: String,
    http: reqwest::Client,
    next_id: AtomicI64,
}

impl GatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            next_id: AtomicI64::new(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Legacy call. Any non-200 answer becomes [`ClientError::Call`] with
    /// the server's `error` text, or "unknown error" when there is none.
    pub async fn call_tool(&self, tool: &str, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        let payload = json!({ "tool": tool, "method": method, "params": params });
        let response = self
            .http
            .post(format!("{}/mcp", self.base_url))
            .json(&payload)
            .send()
            .await?;

        let ok = response.status().is_success();
        let body: Option<Value> = response.json().await.ok();

        if ok {
            body.and_then(|mut b| b.get_mut("result").map(Value::take))
                .ok_or_else(|| ClientError::Malformed("missing 'result'".to_string()))
        } else {
            let message = body
                .as_ref()
                .and_then(|b| b.get("error"))
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_ERROR)
                .to_string();
            Err(ClientError::Call(message))
        }
    }

    pub async fn call_tool_rpc(&self, tool: &str, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        self.rpc(
            "tools/call",
            Some(json!({ "name": tool, "arguments": { "method": method, "params": params } })),
        )
        .await
    }

    /// Returns the full `initialize` result (including `session_id`).
    pub async fn initialize(&self) -> Result<Value, ClientError> {
        self.rpc("initialize", Some(json!({}))).await
    }

    pub async fn list_tools(&self) -> Result<Vec<RemoteTool>, ClientError> {
        let mut result = self.rpc("tools/list", None).await?;
        let tools = result
            .get_mut("tools")
            .map(Value::take)
            .ok_or_else(|| ClientError::Malformed("missing 'tools'".to_string()))?;
        serde_json::from_value(tools).map_err(|e| ClientError::Malformed(e.to_string()))
    }

    /// Raw JSON-RPC call. The body is read whatever the HTTP status, since
    /// envelope errors arrive with 400.
    pub async fn rpc(&self, method: &str, params: Option<Value>) -> Result<Value, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest::new(json!(id), method, params);

        let response: RpcResponse = self
            .http
            .post(format!("{}/mcp/v2", self.base_url))
            .json(&request)
            .send()
            .await?
            .json()
            .await?;

        if response.id != json!(id) {
            tracing::warn!(expected = id, got = %response.id, "rpc client: id mismatch");
        }

        match (response.result, response.error) {
            (_, Some(err)) => Err(ClientError::Rpc {
                code: err.code,
                message: err.message,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ClientError::Malformed(
                "neither 'result' nor 'error' present".to_string(),
            )),
        }
    }
}
