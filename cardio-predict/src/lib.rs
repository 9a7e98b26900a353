//! cardio-predict library - validated prediction service
//!
//! Scores caller-submitted observations with the exported classifier
//! pipeline and records each result for later labeling.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use model::ModelArtifact;

pub mod api;
pub mod db;
pub mod model;
pub mod validate;

/// Application state shared across HTTP handlers
///
/// The model artifact is loaded once at startup and never mutated; handlers
/// share it by reference.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Loaded model artifacts (columns, dtypes, pipeline)
    pub model: Arc<ModelArtifact>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, model: Arc<ModelArtifact>) -> Self {
        Self { db, model }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/predict", post(api::predict))
        .route("/update", post(api::update))
        .route("/list-db-contents", get(api::list_db_contents))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
