// ---------------------------------------------------------------------------
// handlers/rpc.rs — POST /mcp/v2, JSON-RPC 2.0 over HTTP
// ---------------------------------------------------------------------------

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::protocol::{self, RpcReply, RpcRequest, RpcResponse};
use crate::state::AppState;

/// Envelope failures (unparsable JSON, wrong `jsonrpc`, no method) answer
/// with HTTP 400; every other reply, success or error, with HTTP 200.
pub fn http_status(reply: &RpcReply) -> StatusCode {
    match reply.error() {
        Some(e) if e.is_envelope_error() => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    }
}

#[utoipa::path(post, path = "/mcp/v2", tag = "tools",
    request_body = RpcRequest,
    responses(
        (status = 200, description = "JSON-RPC response (result or error object)", body = RpcResponse),
        (status = 400, description = "Malformed JSON or invalid JSON-RPC envelope", body = RpcResponse)
    )
)]
pub async fn rpc_call(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match body {
        Ok(body) => protocol::respond(&state, &body, reply_response),
        // Unreadable body (over the size limit, aborted upload)
        Err(rejection) => reply_response(protocol::parse_failure(rejection.body_text())),
    }
}

fn reply_response(reply: RpcReply) -> Response {
    if let Some(e) = reply.error() {
        tracing::debug!(code = e.code(), "rpc(http): error reply: {}", e);
    }
    (http_status(&reply), Json(reply.to_response())).into_response()
}
