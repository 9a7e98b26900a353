//! Prediction endpoint
//!
//! POST /predict takes `{"observation_id": int, "data": {nine features}}`,
//! validates it, scores it, and records the result. Validation failures and
//! duplicate identifiers are reported in the response body with status 200
//! (the `error` field is the contract); only malformed JSON and server
//! faults get non-200 statuses.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::db::{self, StoreError};
use crate::validate::validate_request;
use crate::AppState;

/// Response body for /predict.
///
/// `observation_id` echoes the identifier as submitted (null when the
/// request carried none). Fields that do not apply to an outcome are
/// omitted: a validation failure has no prediction, a clean success has
/// no error, a duplicate has all of them.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub observation_id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    fn error(observation_id: Value, message: String) -> Self {
        Self {
            observation_id,
            prediction: None,
            probability: None,
            error: Some(message),
        }
    }
}

/// POST /predict
///
/// The raw body is kept as received so the persisted record stores the
/// observation verbatim.
pub async fn predict(State(state): State<AppState>, body: String) -> Response {
    let parsed: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!("Rejected malformed predict body: {}", e);
            let response =
                PredictResponse::error(Value::Null, format!("Malformed JSON body: {}", e));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let valid = match validate_request(&parsed) {
        Ok(valid) => valid,
        Err(failure) => {
            let response = PredictResponse::error(
                failure.observation_id.unwrap_or(Value::Null),
                failure.message,
            );
            return (StatusCode::OK, Json(response)).into_response();
        }
    };

    let observation_id = valid.observation_id;
    let (prediction, probability) = match state.model.score(&valid.observation) {
        Ok(scored) => scored,
        Err(e) => {
            error!("Scoring observation {} failed: {}", observation_id, e);
            let response = PredictResponse::error(observation_id.into(), e.to_string());
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response();
        }
    };

    // Duplicate submission is a soft error: the caller still gets the
    // prediction, with a note that nothing new was recorded.
    let error = match db::insert(&state.db, observation_id, &body, probability).await {
        Ok(()) => None,
        Err(duplicate @ StoreError::Duplicate(_)) => Some(duplicate.to_string()),
        Err(e) => {
            error!("Recording observation {} failed: {}", observation_id, e);
            let response = PredictResponse::error(observation_id.into(), e.to_string());
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response();
        }
    };

    let response = PredictResponse {
        observation_id: observation_id.into(),
        prediction: Some(prediction),
        probability: Some(probability),
        error,
    };
    (StatusCode::OK, Json(response)).into_response()
}
