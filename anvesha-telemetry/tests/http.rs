//! HTTP-level tests for the telemetry API.

use anvesha_telemetry::{build_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = build_router(AppState::new());
    let response = app
        .oneshot(Request::get("/bot/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_add_then_get_round_trip() {
    let state = AppState::new();

    let response = build_router(state.clone())
        .oneshot(
            Request::post("/bot/coordinates/add")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"x": 1.5, "y": -3.25, "status": "SEARCHING", "tick": 42}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 1);
    assert_eq!(state.marker_count(), 1);

    let response = build_router(state.clone())
        .oneshot(
            Request::get("/bot/coordinates/get")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json[0]["x"], 1.5);
    assert_eq!(json[0]["y"], -3.25);
    // Extra fields pass through untouched
    assert_eq!(json[0]["status"], "SEARCHING");
    assert_eq!(json[0]["tick"], 42);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let response = build_router(AppState::new())
        .oneshot(
            Request::post("/bot/coordinates/add")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"x": "not a number"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
