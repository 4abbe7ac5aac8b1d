// Health and tool-listing endpoint integration tests
//
// AppState is built with fixed effects so the timestamp is predictable.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use mcp_gateway::effects::Effects;
use mcp_gateway::state::AppState;

fn test_app() -> axum::Router {
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
    mcp_gateway::create_router(AppState::new(Effects::fixed(now, 22, "abc123xyz")))
}

/// Collect a response body into a `serde_json::Value`.
async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(uri: &str) -> axum::response::Response {
    test_app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let response = get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_status_timestamp_and_version() {
    let json = body_json(get("/health").await).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["timestamp"], "2025-03-14T09:26:53.000Z");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn tools_lists_exact_method_keys() {
    let response = get("/tools").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let tools = json["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 2);

    assert_eq!(tools[0]["name"], "calculator");
    assert_eq!(tools[0]["methods"], json!(["add", "subtract", "multiply", "divide"]));
    assert!(tools[0]["description"].as_str().is_some_and(|d| !d.is_empty()));

    assert_eq!(tools[1]["name"], "weather");
    assert_eq!(tools[1]["methods"], json!(["getTemperature"]));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let response = get("/api-docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"].get("/mcp/v2").is_some());
}

#[tokio::test]
async fn nonexistent_route_returns_404() {
    let response = get("/api/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
