// ---------------------------------------------------------------------------
// handlers/system.rs — Health, tool listing, OpenAPI document
// ---------------------------------------------------------------------------

use axum::extract::State;
use axum::Json;
use chrono::SecondsFormat;
use mockable::Clock;
use utoipa::OpenApi;

use crate::models::{HealthResponse, ToolsResponse};
use crate::state::AppState;

#[utoipa::path(get, path = "/health", tag = "health",
    responses((status = 200, description = "Liveness with server timestamp", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: state
            .effects
            .clock
            .utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        version: state.server_info.version.clone(),
    })
}

/// GET /tools — every tool with its method names, in registry order.
#[utoipa::path(get, path = "/tools", tag = "tools",
    responses((status = 200, description = "Registered tools and their methods", body = ToolsResponse))
)]
pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: state.registry.list_tools(),
    })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(crate::ApiDoc::openapi())
}
