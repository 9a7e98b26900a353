//! Database record types

use serde::{Deserialize, Serialize};

/// One stored prediction, as returned by `/list-db-contents`.
///
/// `observation` holds the observation JSON exactly as it was persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: i64,
    pub observation_id: i64,
    pub observation: String,
    pub proba: f64,
    pub true_class: Option<i64>,
}
