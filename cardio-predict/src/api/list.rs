//! Stored-record listing endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::db;
use crate::AppState;

/// GET /list-db-contents
///
/// Every stored prediction as a JSON array, in storage order.
pub async fn list_db_contents(State(state): State<AppState>) -> Response {
    match db::list_all(&state.db).await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => {
            error!("Listing stored predictions failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
