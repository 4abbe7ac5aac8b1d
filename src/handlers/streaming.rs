// ---------------------------------------------------------------------------
// handlers/streaming.rs — JSON-RPC 2.0 over WebSocket
// ---------------------------------------------------------------------------

use std::fmt::Display;
use std::pin::pin;

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use uuid::Uuid;

use crate::protocol::{self, RpcReply};
use crate::state::AppState;

/// One text frame per reply; `None` only if serialisation fails.
fn reply_frame(reply: RpcReply) -> Option<WsMessage> {
    if let Some(e) = reply.error() {
        tracing::debug!(code = e.code(), "rpc(ws): error reply: {}", e);
    }
    serde_json::to_string(&reply.to_response())
        .ok()
        .map(|json| WsMessage::Text(json.into()))
}

pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(socket: WebSocket, state: AppState) {
    let (sender, receiver) = socket.split();
    serve_socket(sender, receiver, state).await;
}

/// Connection loop: `Open → (receive frame → handle → reply)* → Closed`.
///
/// Frames are handled one at a time, so replies leave in the order their
/// requests arrived. Generic over the stream/sink halves so the loop runs
/// on anything shaped like a split `WebSocket`.
pub async fn serve_socket<S, R, E>(sender: S, receiver: R, state: AppState)
where
    S: Sink<WsMessage>,
    S::Error: Display,
    R: Stream<Item = Result<WsMessage, E>>,
    E: Display,
{
    let mut sender = pin!(sender);
    let mut receiver = pin!(receiver);
    let conn_id = Uuid::new_v4();
    tracing::info!(conn = %conn_id, "ws: connection opened");

    while let Some(frame) = receiver.next().await {
        let outbound = match frame {
            Ok(WsMessage::Text(text)) => {
                protocol::respond(&state, text.as_str(), reply_frame)
            }
            Ok(WsMessage::Close(_)) => break,
            // ping is answered by the transport; binary / pong are ignored
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(conn = %conn_id, "ws: receive error: {}", e);
                break;
            }
        };

        if let Some(msg) = outbound {
            if let Err(e) = sender.send(msg).await {
                tracing::warn!(conn = %conn_id, "ws: send failed: {}", e);
                break;
            }
        }
    }

    tracing::info!(conn = %conn_id, "ws: connection closed");
}
