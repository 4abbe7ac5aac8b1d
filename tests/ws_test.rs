// WebSocket connection loop tests.
//
// `serve_socket` is driven with an in-memory frame stream and a channel-backed
// sink, so no socket is opened. The last tests go through a real upgrade on a
// live listener.

use std::convert::Infallible;

use axum::extract::ws::Message as WsMessage;
use chrono::{TimeZone, Utc};
use futures_util::{sink, stream, SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as ClientMessage;

use mcp_gateway::effects::Effects;
use mcp_gateway::handlers::serve_socket;
use mcp_gateway::state::AppState;

fn state() -> AppState {
    let now = Utc.with_ymd_and_hms(2024, 11, 5, 12, 0, 0).unwrap();
    AppState::new(Effects::fixed(now, 18, "wsession1"))
}

fn text(value: Value) -> WsMessage {
    WsMessage::Text(value.to_string().into())
}

/// Run one connection over `frames` and return every frame sent back.
async fn run(frames: Vec<WsMessage>) -> Vec<WsMessage> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let sender = sink::unfold(tx, |tx, msg: WsMessage| async move {
        tx.send(msg).map_err(|_| "receiver dropped")?;
        Ok::<_, &'static str>(tx)
    });
    let receiver = stream::iter(frames.into_iter().map(Ok::<_, Infallible>));

    serve_socket(sender, receiver, state()).await;

    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn as_json(msg: &WsMessage) -> Value {
    match msg {
        WsMessage::Text(t) => serde_json::from_str(t.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

fn tools_call(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": "calculator", "arguments": { "method": method, "params": params } }
    })
}

#[tokio::test]
async fn add_over_websocket_returns_five() {
    let replies = run(vec![text(tools_call(1, "add", json!([2, 3])))]).await;
    assert_eq!(replies.len(), 1);
    let reply = as_json(&replies[0]);
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"], 5);
}

#[tokio::test]
async fn replies_keep_request_order_and_ids() {
    let replies = run(vec![
        text(tools_call(11, "multiply", json!([3, 4]))),
        text(tools_call(12, "subtract", json!([3, 4]))),
    ])
    .await;
    assert_eq!(replies.len(), 2);
    let first = as_json(&replies[0]);
    let second = as_json(&replies[1]);
    assert_eq!((first["id"].clone(), first["result"].clone()), (json!(11), json!(12)));
    assert_eq!((second["id"].clone(), second["result"].clone()), (json!(12), json!(-1)));
}

#[tokio::test]
async fn errors_are_frames_on_the_same_connection() {
    let replies = run(vec![
        text(tools_call(1, "divide", json!([1, 0]))),
        text(json!({"jsonrpc":"1.0","id":2,"method":"tools/list"})),
        text(json!({"jsonrpc":"2.0","id":3,"method":"tools/list"})),
    ])
    .await;
    assert_eq!(replies.len(), 3);

    let divide = as_json(&replies[0]);
    assert_eq!(divide["id"], 1);
    assert_eq!(divide["error"]["code"], -32003);

    let version = as_json(&replies[1]);
    assert_eq!(version["id"], 2);
    assert_eq!(version["error"]["code"], -32600);

    let list = as_json(&replies[2]);
    assert_eq!(list["result"]["tools"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_frame_gets_null_id_and_connection_survives() {
    let replies = run(vec![
        WsMessage::Text("{{{ not json".to_string().into()),
        text(json!({"jsonrpc":"2.0","id":"after","method":"initialize"})),
    ])
    .await;
    assert_eq!(replies.len(), 2);

    let parse = as_json(&replies[0]);
    assert!(parse["id"].is_null());
    assert_eq!(parse["error"]["code"], -32700);

    let init = as_json(&replies[1]);
    assert_eq!(init["id"], "after");
    assert_eq!(init["result"]["session_id"], "session_1730808000000_wsession1");
}

#[tokio::test]
async fn control_frames_get_no_reply_and_close_stops_the_loop() {
    let replies = run(vec![
        WsMessage::Ping(vec![1u8, 2, 3].into()),
        WsMessage::Binary(vec![0xffu8].into()),
        text(tools_call(1, "add", json!([1, 1]))),
        WsMessage::Close(None),
        text(tools_call(99, "add", json!([1, 1]))),
    ])
    .await;
    assert_eq!(replies.len(), 1);
    let reply = as_json(&replies[0]);
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"], 2);
}

async fn spawn_gateway() -> String {
    let app = mcp_gateway::create_router(state());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("ws://{addr}")
}

#[tokio::test]
async fn live_upgrade_on_both_paths() {
    let base = spawn_gateway().await;

    for path in ["/ws", "/"] {
        let (mut socket, response) = tokio_tungstenite::connect_async(format!("{base}{path}"))
            .await
            .unwrap();
        assert_eq!(response.status(), 101, "{path}");

        socket
            .send(ClientMessage::Text(tools_call(7, "add", json!([2, 3])).to_string().into()))
            .await
            .unwrap();
        socket
            .send(ClientMessage::Text("not json".to_string().into()))
            .await
            .unwrap();

        let first = socket.next().await.unwrap().unwrap();
        let reply: Value = serde_json::from_str(first.to_text().unwrap()).unwrap();
        assert_eq!(reply["id"], 7, "{path}");
        assert_eq!(reply["result"], 5, "{path}");

        let second = socket.next().await.unwrap().unwrap();
        let reply: Value = serde_json::from_str(second.to_text().unwrap()).unwrap();
        assert!(reply["id"].is_null(), "{path}");
        assert_eq!(reply["error"]["code"], -32700, "{path}");

        let _ = socket.close(None).await;
    }
}
