//! Common error types for the cardio services

use thiserror::Error;

/// Common result type for cardio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the cardio services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model artifact loading or consistency error
    #[error("Model artifact error: {0}")]
    Artifact(String),

    /// Model inference failure (e.g. a feature that cannot be coerced)
    #[error("Inference error: {0}")]
    Inference(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
