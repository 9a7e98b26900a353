//! Database initialization
//!
//! Creates the SQLite connection pool and the predictions schema on first
//! run. Initialization is idempotent; reopening an existing database leaves
//! its contents untouched.

use crate::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;
use tracing::info;

/// Initialize the database connection pool and create tables if needed.
///
/// Accepts any sqlx SQLite URL, e.g. `sqlite://predictions.db?mode=rwc`
/// or `sqlite::memory:`.
pub async fn init_database(database_url: &str) -> Result<SqlitePool> {
    let file_path = database_file_path(database_url);

    if let Some(path) = &file_path {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let newly_created = file_path.as_ref().map(|p| !p.exists());

    // An in-memory database exists per connection, so the pool must be
    // capped at one connection or each checkout would see an empty schema.
    let max_connections = if file_path.is_some() { 5 } else { 1 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    match (&file_path, newly_created) {
        (Some(path), Some(true)) => info!("Initialized new database: {}", path.display()),
        (Some(path), _) => info!("Opened existing database: {}", path.display()),
        (None, _) => info!("Opened in-memory database"),
    }

    // WAL allows concurrent readers with one writer
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    // Wait on locks instead of failing immediately
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_predictions_table(&pool).await?;

    Ok(pool)
}

/// Create the predictions table
///
/// One row per scored observation. `observation_id` is the caller-supplied
/// key and must be unique; `id` is the internal row key. `true_class` stays
/// NULL until an update supplies the observed outcome.
pub async fn create_predictions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            observation_id INTEGER NOT NULL UNIQUE,
            observation TEXT NOT NULL,
            proba REAL NOT NULL,
            true_class INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Extract the filesystem path from a SQLite URL, or None for in-memory
/// databases.
fn database_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);

    let path = rest.split('?').next().unwrap_or(rest);
    let query = rest.split_once('?').map(|(_, q)| q).unwrap_or("");

    if path.is_empty() || path == ":memory:" || query.contains("mode=memory") {
        return None;
    }

    Some(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_url_yields_path() {
        assert_eq!(
            database_file_path("sqlite://predictions.db?mode=rwc"),
            Some(PathBuf::from("predictions.db"))
        );
        assert_eq!(
            database_file_path("sqlite:///tmp/data/predictions.db"),
            Some(PathBuf::from("/tmp/data/predictions.db"))
        );
    }

    #[test]
    fn memory_urls_yield_none() {
        assert_eq!(database_file_path("sqlite::memory:"), None);
        assert_eq!(database_file_path(":memory:"), None);
        assert_eq!(database_file_path("sqlite://?mode=memory"), None);
        assert_eq!(
            database_file_path("sqlite://file:test?mode=memory&cache=shared"),
            None
        );
    }
}
