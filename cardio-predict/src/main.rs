//! cardio-predict - Heart disease prediction service
//!
//! Serves the exported classifier over HTTP: POST /predict validates and
//! scores one observation and records the result, POST /update attaches a
//! true label to a stored observation, GET /list-db-contents dumps the
//! stored records.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use cardio_common::config::{
    load_toml_config, resolve_database_url, resolve_model_dir, resolve_port,
};
use cardio_common::db::init_database;
use cardio_predict::model::ModelArtifact;
use cardio_predict::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::info;

/// Default listen port for the prediction service
const DEFAULT_PORT: u16 = 5000;

/// Command-line arguments for cardio-predict
#[derive(Parser, Debug)]
#[command(name = "cardio-predict")]
#[command(about = "Heart disease prediction service")]
#[command(version)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "CARDIO_CONFIG")]
    config: Option<PathBuf>,

    /// Database URL (any sqlx SQLite URL)
    #[arg(short, long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Directory holding the exported model artifacts
    #[arg(short, long, env = "CARDIO_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "CARDIO_PREDICT_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting cardio-predict v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml_config = load_toml_config(args.config.as_deref())?;
    let database_url = resolve_database_url(args.database_url, &toml_config);
    let model_dir = resolve_model_dir(args.model_dir, &toml_config);
    let port = resolve_port(args.port, &toml_config, DEFAULT_PORT);

    let model = ModelArtifact::load(&model_dir)
        .with_context(|| format!("Failed to load model artifacts from {}", model_dir.display()))?;

    let pool = init_database(&database_url)
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(pool, Arc::new(model));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("cardio-predict listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
