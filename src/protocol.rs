//! JSON-RPC 2.0 envelope types and the method switch shared by the HTTP
//! (`POST /mcp/v2`) and WebSocket transports.
//!
//! Supported methods:
//! - `initialize` — server info + capabilities + a fresh session id
//! - `tools/list` — tool names and descriptions
//! - `tools/call` — `{name, arguments: {method, params}}` → dispatcher
//!
//! Transports hand raw message bytes to [`respond`] together with a callback
//! that turns the [`RpcReply`] into whatever they send on the wire.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::dispatch::DispatchError;
use crate::state::AppState;

pub const JSONRPC_VERSION: &str = "2.0";
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Error codes. The first five are the JSON-RPC standard codes; the
/// `-3200x` range distinguishes dispatcher failures.
pub mod error_codes {
    /// Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// The RPC method does not exist.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid method parameter(s), including tool argument validation.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Unexpected failure while dispatching.
    pub const INTERNAL_ERROR: i32 = -32603;
    /// `tools/call` named a tool the registry does not have.
    pub const UNKNOWN_TOOL: i32 = -32001;
    /// The tool exists but has no such method.
    pub const UNKNOWN_METHOD: i32 = -32002;
    /// The tool handler rejected the call (e.g. division by zero).
    pub const TOOL_ERROR: i32 = -32003;
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub id: Value,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub params: Option<Value>,
}

impl RpcRequest {
    pub fn new(id: Value, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// Response envelope; exactly one of `result` / `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RpcResponse {
    pub jsonrpc: String,
    #[schema(value_type = Object)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RpcError {
    #[error("Parse error")]
    Parse(String),

    #[error("Invalid Request")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl RpcError {
    pub fn code(&self) -> i32 {
        match self {
            RpcError::Parse(_) => error_codes::PARSE_ERROR,
            RpcError::InvalidRequest(_) => error_codes::INVALID_REQUEST,
            RpcError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            RpcError::Dispatch(e) => match e {
                DispatchError::UnknownTool(_) => error_codes::UNKNOWN_TOOL,
                DispatchError::UnknownMethod { .. } => error_codes::UNKNOWN_METHOD,
                DispatchError::InvalidArguments(_) => error_codes::INVALID_PARAMS,
                DispatchError::Domain(_) => error_codes::TOOL_ERROR,
                DispatchError::Internal(_) => error_codes::INTERNAL_ERROR,
            },
        }
    }

    /// True when the message never made it past envelope validation.
    pub fn is_envelope_error(&self) -> bool {
        matches!(self, RpcError::Parse(_) | RpcError::InvalidRequest(_))
    }

    fn to_object(&self) -> RpcErrorObject {
        let data = match self {
            RpcError::Parse(detail) | RpcError::InvalidRequest(detail) => {
                Some(Value::String(detail.clone()))
            }
            _ => None,
        };
        RpcErrorObject {
            code: self.code(),
            message: self.to_string(),
            data,
        }
    }
}

/// Outcome of one message, still correlated to the request id.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcReply {
    pub id: Value,
    pub outcome: Result<Value, RpcError>,
}

impl RpcReply {
    pub fn error(&self) -> Option<&RpcError> {
        self.outcome.as_ref().err()
    }

    pub fn to_response(&self) -> RpcResponse {
        let (result, error) = match &self.outcome {
            Ok(value) => (Some(value.clone()), None),
            Err(e) => (None, Some(e.to_object())),
        };
        RpcResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: self.id.clone(),
            result,
            error,
        }
    }

    pub fn to_json(&self) -> Value {
        // RpcResponse only holds strings, numbers and `Value`s.
        serde_json::to_value(self.to_response()).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    arguments: ToolCallArguments,
}

#[derive(Debug, Deserialize)]
struct ToolCallArguments {
    method: String,
    #[serde(default)]
    params: Vec<Value>,
}

/// Handle one raw message and pass the reply to `send`.
pub fn respond<F, T>(state: &AppState, raw: impl AsRef<[u8]>, send: F) -> T
where
    F: FnOnce(RpcReply) -> T,
{
    send(handle_bytes(state, raw.as_ref()))
}

/// Raw body bytes; invalid UTF-8 is a parse error like any other bad JSON.
pub fn handle_bytes(state: &AppState, raw: &[u8]) -> RpcReply {
    match serde_json::from_slice::<Value>(raw) {
        Ok(value) => handle_value(state, value),
        Err(e) => parse_failure(e.to_string()),
    }
}

/// Reply for a message that could not be read as JSON at all.
pub fn parse_failure(detail: String) -> RpcReply {
    tracing::debug!("rpc: unparsable message: {}", detail);
    RpcReply {
        id: Value::Null,
        outcome: Err(RpcError::Parse(detail)),
    }
}

/// The id is read before any validation so every reply, including
/// envelope errors, carries the caller's id (or `null`).
pub fn handle_value(state: &AppState, value: Value) -> RpcReply {
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let outcome = parse_request(value).and_then(|request| route(state, request));
    RpcReply { id, outcome }
}

fn parse_request(value: Value) -> Result<RpcRequest, RpcError> {
    if !value.is_object() {
        return Err(RpcError::InvalidRequest("request must be a JSON object".to_string()));
    }
    if value.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(RpcError::InvalidRequest(format!(
            "jsonrpc must be \"{JSONRPC_VERSION}\""
        )));
    }
    serde_json::from_value(value).map_err(|e| RpcError::InvalidRequest(e.to_string()))
}

fn route(state: &AppState, request: RpcRequest) -> Result<Value, RpcError> {
    tracing::debug!(method = %request.method, "rpc: incoming request");

    match request.method.as_str() {
        "initialize" => Ok(initialize(state)),
        "tools/list" => Ok(tools_list(state)),
        "tools/call" => tools_call(state, request.params),
        other => Err(RpcError::MethodNotFound(other.to_string())),
    }
}

// ── initialize ──────────────────────────────────────────────────────────────

fn initialize(state: &AppState) -> Value {
    let session_id = state.new_session_id();
    tracing::info!(session_id = %session_id, "rpc: initialize");
    json!({
        "protocolVersion": MCP_PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": state.server_info.name,
            "version": state.server_info.version,
        },
        "session_id": session_id,
    })
}

// ── tools/list ──────────────────────────────────────────────────────────────

fn tools_list(state: &AppState) -> Value {
    let tools: Vec<Value> = state
        .registry
        .tools()
        .iter()
        .map(|t| json!({ "name": t.name, "description": t.description }))
        .collect();
    json!({ "tools": tools })
}

// ── tools/call ──────────────────────────────────────────────────────────────

fn tools_call(state: &AppState, params: Option<Value>) -> Result<Value, RpcError> {
    let params = params.ok_or_else(|| RpcError::InvalidParams("missing params".to_string()))?;
    let call: ToolCallParams =
        serde_json::from_value(params).map_err(|e| RpcError::InvalidParams(e.to_string()))?;

    tracing::info!(tool = %call.name, method = %call.arguments.method, "rpc: tools/call");

    state
        .dispatcher
        .invoke(&call.name, &call.arguments.method, &call.arguments.params)
        .map_err(RpcError::from)
}
