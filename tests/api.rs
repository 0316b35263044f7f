use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use countdown_engine::{create_router, create_timer, ApiState, TimerOptions};

fn app(duration: f64) -> Router {
    let engine = create_timer(TimerOptions::new(duration)).unwrap();
    create_router(Arc::new(ApiState::new(engine)))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test(start_paused = true)]
async fn test_health() {
    let app = app(10.0);
    let (status, body) = call(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn test_pause_unpause_reset() {
    let app = app(10.0);

    let (status, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["state"], "paused");

    let (_, body) = call(&app, "POST", "/unpause", None).await;
    assert_eq!(body["status"], "running");

    let (_, body) = call(&app, "POST", "/reset", None).await;
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["context"]["elapsed"], 0.0);
    assert_eq!(body["timer"]["context"]["offset"], 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_duration_update() {
    let app = app(10.0);

    let (status, body) = call(&app, "POST", "/duration", Some(json!({ "value": 5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["context"]["duration"], 15.0);

    let (_, body) = call(&app, "POST", "/duration", Some(json!({ "value": -20 }))).await;
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["context"]["duration"], 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_raw_events() {
    let app = app(10.0);

    let (status, body) = call(&app, "POST", "/events", Some(json!({ "type": "PAUSE" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");

    let (status, body) = call(&app, "POST", "/events", Some(json!({ "type": "LAP" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");

    let (_, body) = call(
        &app,
        "POST",
        "/events",
        Some(json!({ "type": "DURATION.UPDATE", "value": 2.5 })),
    )
    .await;
    assert_eq!(body["timer"]["context"]["duration"], 12.5);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_body_is_rejected() {
    let app = app(10.0);
    let (status, _) = call(&app, "POST", "/duration", Some(json!({ "value": "ten" }))).await;
    assert!(status.is_client_error());

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["duration"], 10.0);
}

#[tokio::test(start_paused = true)]
async fn test_status_reports_progress() {
    let app = app(10.0);
    tokio::time::sleep(std::time::Duration::from_millis(2050)).await;
    call(&app, "POST", "/pause", None).await;

    let (status, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "paused");
    assert_eq!(body["elapsed"], 2.05);
    assert_eq!(body["remaining"], 7.95);
    assert_eq!(body["interval"], 0.1);
    assert_eq!(body["last_action"], "pause");
}
