//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::MockConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::observability::metrics;
use crate::routing::RuleDocument;

/// Name of the route document inside the config folder.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a JSON file.
///
/// Reply and TLS files are resolved against the directory holding `path`.
pub fn load_config(path: &Path) -> Result<MockConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: MockConfig = serde_json::from_str(&content)?;

    validate_config(config_folder(path), &config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load, validate and compile the rule document stored at `path`.
pub fn load_document(path: &Path) -> Result<RuleDocument, ConfigError> {
    let config = load_config(path)?;
    RuleDocument::compile(config_folder(path), &config).map_err(ConfigError::Validation)
}

/// Load a changed document for a live reload.
///
/// Records the outcome and logs failures. The caller keeps its current
/// document when this returns an error.
pub fn reload_document(path: &Path) -> Result<RuleDocument, ConfigError> {
    match load_document(path) {
        Ok(document) => {
            metrics::record_reload(true);
            Ok(document)
        }
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(path = ?path, error = %e, "Failed to reload config. Keeping current configuration.");
            Err(e)
        }
    }
}

/// Directory reply files are resolved against.
pub fn config_folder(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}
