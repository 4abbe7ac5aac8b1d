// ---------------------------------------------------------------------------
// handlers/ — one sub-module per surface; mod.rs re-exports the handlers
// so `crate::handlers::*` paths stay flat for the router and OpenAPI doc.
// ---------------------------------------------------------------------------

// Sub-modules are pub(crate) so utoipa __path_* types are accessible from lib.rs OpenApi derive.
pub(crate) mod legacy;
pub(crate) mod rpc;
pub(crate) mod streaming;
pub(crate) mod system;

// Health / introspection
pub use system::{health, list_tools, openapi_json};

// Legacy REST
pub use legacy::legacy_call;

// JSON-RPC over HTTP
pub use rpc::rpc_call;

// WebSocket
pub use streaming::{serve_socket, ws_upgrade};

// ── utoipa __path_* re-exports ───────────────────────────────────────────────
pub use legacy::__path_legacy_call;
pub use rpc::__path_rpc_call;
pub use system::{__path_health, __path_list_tools};

use axum::http::StatusCode;
use axum::Json;

use crate::dispatch::DispatchError;
use crate::models::LegacyErrorResponse;

// ---------------------------------------------------------------------------
// Legacy REST error
// ---------------------------------------------------------------------------

/// Error type for `POST /mcp`.
///
/// The legacy envelope has no error codes: every failure is a `400` whose
/// body is `{ "error": "<message>" }`. The variant only affects logging.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl ApiError {
    /// Machine-readable error code, for logs only.
    fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Dispatch(e) => e.kind(),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        tracing::warn!(code = self.error_code(), "legacy call rejected: {}", self);
        let body = LegacyErrorResponse {
            error: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
