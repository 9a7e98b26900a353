//! cardio-baseline library - constant-prediction service
//!
//! The degenerate first variant of the exercise: no validation, no model,
//! no storage. Every prediction request gets the same answer, which makes
//! it a floor to compare the real service against.

use axum::{routing::get, routing::post, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

/// Health check response: status, module name, and version
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// POST /predict
///
/// Always answers `{"prediction": 0.5}` regardless of the request body.
pub async fn predict() -> Json<Value> {
    Json(json!({ "prediction": 0.5 }))
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "cardio-baseline".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build application router
pub fn build_router() -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}
