//! True-label update endpoint
//!
//! POST /update attaches the observed outcome to a stored prediction.
//! Unknown identifiers are reported in the body with status 200; only
//! storage faults get a 500.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::db::{self, StoreError};
use crate::AppState;

/// Request body for /update. `id` names the observation, not the row.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: i64,
    pub true_class: i64,
}

/// POST /update
///
/// Returns the full updated record as a flat object.
pub async fn update(State(state): State<AppState>, Json(request): Json<UpdateRequest>) -> Response {
    match db::set_true_class(&state.db, request.id, request.true_class).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(unknown @ StoreError::UnknownId(_)) => (
            StatusCode::OK,
            Json(json!({ "error": unknown.to_string() })),
        )
            .into_response(),
        Err(e) => {
            error!("Updating observation {} failed: {}", request.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
