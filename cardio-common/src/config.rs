//! Configuration loading and resolution
//!
//! Every tunable resolves through the same priority order:
//! 1. Command-line argument / environment variable (highest priority)
//! 2. TOML config file
//! 3. Compiled default (fallback)
//!
//! Command-line and environment tiers are merged by the binary's argument
//! parser before the values reach this module.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default database URL when no other source provides one.
///
/// `mode=rwc` lets sqlx create the database file on first run.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://predictions.db?mode=rwc";

/// Default directory holding the exported model artifacts.
pub const DEFAULT_MODEL_DIR: &str = "model";

/// Optional settings loaded from a TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub database_url: Option<String>,
    pub model_dir: Option<String>,
    pub port: Option<u16>,
}

/// Load the TOML config file, if one exists.
///
/// Search order:
/// 1. Explicit path (from `--config` or `CARDIO_CONFIG`); missing file is an error
/// 2. `./cardio.toml` in the working directory
/// 3. `cardio/config.toml` under the platform config directory
///
/// No file found is not an error; resolution falls through to defaults.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return read_toml_config(path);
    }

    let local = PathBuf::from("cardio.toml");
    if local.exists() {
        return read_toml_config(&local);
    }

    if let Some(dir) = dirs::config_dir() {
        let platform = dir.join("cardio").join("config.toml");
        if platform.exists() {
            return read_toml_config(&platform);
        }
    }

    Ok(TomlConfig::default())
}

fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}

/// Resolve the database URL from argument, TOML, or default.
pub fn resolve_database_url(arg: Option<String>, toml_config: &TomlConfig) -> String {
    if let Some(url) = arg {
        info!("Database URL taken from command line or environment");
        return url;
    }
    if let Some(url) = &toml_config.database_url {
        info!("Database URL taken from config file");
        return url.clone();
    }
    info!("Database URL using default: {}", DEFAULT_DATABASE_URL);
    DEFAULT_DATABASE_URL.to_string()
}

/// Resolve the model artifact directory from argument, TOML, or default.
pub fn resolve_model_dir(arg: Option<PathBuf>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(dir) = arg {
        info!("Model directory taken from command line or environment");
        return dir;
    }
    if let Some(dir) = &toml_config.model_dir {
        info!("Model directory taken from config file");
        return PathBuf::from(dir);
    }
    PathBuf::from(DEFAULT_MODEL_DIR)
}

/// Resolve the listen port from argument, TOML, or the service default.
pub fn resolve_port(arg: Option<u16>, toml_config: &TomlConfig, default_port: u16) -> u16 {
    if let Some(port) = arg {
        return port;
    }
    if let Some(port) = toml_config.port {
        info!("Listen port taken from config file");
        return port;
    }
    default_port
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_wins_over_toml() {
        let toml_config = TomlConfig {
            database_url: Some("sqlite://toml.db".to_string()),
            model_dir: Some("toml-model".to_string()),
            port: Some(9000),
        };

        let url = resolve_database_url(Some("sqlite://cli.db".to_string()), &toml_config);
        assert_eq!(url, "sqlite://cli.db");

        let dir = resolve_model_dir(Some(PathBuf::from("cli-model")), &toml_config);
        assert_eq!(dir, PathBuf::from("cli-model"));

        assert_eq!(resolve_port(Some(8080), &toml_config, 5000), 8080);
    }

    #[test]
    fn toml_wins_over_default() {
        let toml_config = TomlConfig {
            database_url: Some("sqlite://toml.db".to_string()),
            model_dir: None,
            port: Some(9000),
        };

        assert_eq!(resolve_database_url(None, &toml_config), "sqlite://toml.db");
        assert_eq!(resolve_model_dir(None, &toml_config), PathBuf::from("model"));
        assert_eq!(resolve_port(None, &toml_config, 5000), 9000);
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let toml_config = TomlConfig::default();

        assert_eq!(resolve_database_url(None, &toml_config), DEFAULT_DATABASE_URL);
        assert_eq!(resolve_model_dir(None, &toml_config), PathBuf::from("model"));
        assert_eq!(resolve_port(None, &toml_config, 5001), 5001);
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardio.toml");
        std::fs::write(
            &path,
            "database_url = \"sqlite:///tmp/custom.db\"\nport = 6000\n",
        )
        .unwrap();

        let config = load_toml_config(Some(&path)).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite:///tmp/custom.db"));
        assert_eq!(config.model_dir, None);
        assert_eq!(config.port, Some(6000));
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let result = load_toml_config(Some(Path::new("/nonexistent/cardio.toml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
