//! Coordinate logging service.
//!
//! A small HTTP API the robot posts its position markers to. Storage
//! is an in-memory list; the service is fire-and-forget telemetry and
//! is never a precondition for the navigation engine to tick.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// One reported robot position. Unknown fields (status text, detected
/// kinds, tick counters) are carried through untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Clone, Default)]
pub struct AppState {
    markers: Arc<Mutex<Vec<Coordinate>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.lock().map(|m| m.len()).unwrap_or(0)
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/bot/test", get(test_endpoint))
        .route("/bot/coordinates/get", get(get_coordinates))
        .route("/bot/coordinates/add", post(add_coordinate))
        .with_state(state)
}

async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "service": "anvesha-telemetry" }))
}

async fn get_coordinates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Coordinate>>, (StatusCode, String)> {
    let markers = state
        .markers
        .lock()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(markers.clone()))
}

async fn add_coordinate(
    State(state): State<AppState>,
    Json(marker): Json<Coordinate>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let mut markers = state
        .markers
        .lock()
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    log::debug!("marker recorded at ({:.2}, {:.2})", marker.x, marker.y);
    markers.push(marker);
    Ok(Json(json!({ "success": true, "count": markers.len() })))
}
