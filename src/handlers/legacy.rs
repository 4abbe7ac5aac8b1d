// ---------------------------------------------------------------------------
// handlers/legacy.rs — POST /mcp, the flat {tool, method, params} envelope
// ---------------------------------------------------------------------------

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;

use crate::models::{LegacyCallRequest, LegacyCallResponse, LegacyErrorResponse};
use crate::state::AppState;

use super::ApiError;

/// The body is read as raw bytes and parsed by hand so that unreadable,
/// non-UTF-8 or malformed bodies get the same `{ "error": ... }` shape as
/// every other failure.
#[utoipa::path(post, path = "/mcp", tag = "tools",
    request_body = LegacyCallRequest,
    responses(
        (status = 200, description = "Tool result", body = LegacyCallResponse),
        (status = 400, description = "Malformed body or dispatch failure", body = LegacyErrorResponse)
    )
)]
pub async fn legacy_call(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<LegacyCallResponse>, ApiError> {
    let body = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request: LegacyCallRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    tracing::info!(tool = %request.tool, method = %request.method, "legacy: call");

    let result = state
        .dispatcher
        .invoke(&request.tool, &request.method, &request.params)?;

    Ok(Json(LegacyCallResponse { result }))
}
