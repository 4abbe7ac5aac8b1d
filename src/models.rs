use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::registry::ToolSummary;

// ---------------------------------------------------------------------------
// Health / Introspection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// ISO 8601, UTC, millisecond precision.
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolsResponse {
    pub tools: Vec<ToolSummary>,
}

// ---------------------------------------------------------------------------
// Legacy REST call (POST /mcp)
// ---------------------------------------------------------------------------

/// Flat call envelope. Missing fields default to empty so that they surface
/// as dispatcher errors rather than body rejections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LegacyCallRequest {
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub params: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegacyCallResponse {
    #[schema(value_type = Object)]
    pub result: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LegacyErrorResponse {
    pub error: String,
}
