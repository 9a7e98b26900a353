//! Predictions table access
//!
//! A narrow repository over the one table: insert a scored observation,
//! attach a true label later, list everything. Duplicate and unknown
//! identifiers are conditions the handlers report to the caller, not
//! server faults, so they get their own variants distinct from storage
//! errors.

use cardio_common::db::Prediction;
use sqlx::SqlitePool;
use thiserror::Error;

/// Outcome of a repository operation that can fail on identifier conditions.
///
/// The duplicate/unknown display strings are the wire messages returned to
/// callers in the `error` response field.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Observation ID: \"{0}\" already exists")]
    Duplicate(i64),

    #[error("Observation ID: \"{0}\" does not exist")]
    UnknownId(i64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Insert one scored observation.
///
/// `observation_id` is unique; a colliding insert fails with `Duplicate`
/// and leaves the existing row untouched (single-statement INSERT, nothing
/// partial to roll back).
pub async fn insert(
    pool: &SqlitePool,
    observation_id: i64,
    observation: &str,
    proba: f64,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        "INSERT INTO predictions (observation_id, observation, proba) VALUES (?, ?, ?)",
    )
    .bind(observation_id)
    .bind(observation)
    .bind(proba)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(StoreError::Duplicate(observation_id))
        }
        Err(e) => Err(e.into()),
    }
}

/// Set the true class on a stored observation and return the updated record.
///
/// Unknown identifiers fail with `UnknownId` and mutate nothing. A record
/// that already carries a true class is overwritten unconditionally.
pub async fn set_true_class(
    pool: &SqlitePool,
    observation_id: i64,
    true_class: i64,
) -> Result<Prediction, StoreError> {
    let updated = sqlx::query("UPDATE predictions SET true_class = ? WHERE observation_id = ?")
        .bind(true_class)
        .bind(observation_id)
        .execute(pool)
        .await?;

    if updated.rows_affected() == 0 {
        return Err(StoreError::UnknownId(observation_id));
    }

    let row = sqlx::query_as::<_, (i64, i64, String, f64, Option<i64>)>(
        "SELECT id, observation_id, observation, proba, true_class \
         FROM predictions WHERE observation_id = ?",
    )
    .bind(observation_id)
    .fetch_one(pool)
    .await?;

    Ok(from_row(row))
}

/// Every stored record, in storage order.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Prediction>, StoreError> {
    let rows = sqlx::query_as::<_, (i64, i64, String, f64, Option<i64>)>(
        "SELECT id, observation_id, observation, proba, true_class FROM predictions",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(from_row).collect())
}

fn from_row(row: (i64, i64, String, f64, Option<i64>)) -> Prediction {
    Prediction {
        id: row.0,
        observation_id: row.1,
        observation: row.2,
        proba: row.3,
        true_class: row.4,
    }
}
