pub mod client;
pub mod config;
pub mod dispatch;
pub mod effects;
pub mod handlers;
pub mod models;
pub mod protocol;
pub mod registry;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(title = "MCP Gateway", description = "Tool-invocation gateway: legacy REST, JSON-RPC over HTTP and WebSocket"),
    paths(
        handlers::health,
        handlers::list_tools,
        handlers::legacy_call,
        handlers::rpc_call,
    ),
    components(schemas(
        models::HealthResponse,
        models::ToolsResponse,
        models::LegacyCallRequest,
        models::LegacyCallResponse,
        models::LegacyErrorResponse,
        registry::ToolSummary,
        protocol::RpcRequest,
        protocol::RpcResponse,
        protocol::RpcErrorObject,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "tools", description = "Tool listing and invocation"),
    )
)]
pub struct ApiDoc;

/// Build the application router with the given state.
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a network port.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Introspection
        .route("/health", get(handlers::health))
        .route("/tools", get(handlers::list_tools))
        .route("/api-docs/openapi.json", get(handlers::openapi_json))
        // Tool calls
        .route("/mcp", post(handlers::legacy_call))
        .route("/mcp/v2", post(handlers::rpc_call))
        // WebSocket JSON-RPC (same port, upgrade handshake)
        .route("/", get(handlers::ws_upgrade))
        .route("/ws", get(handlers::ws_upgrade))
        .with_state(state)
}
