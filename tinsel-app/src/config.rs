//! Config file loading and application errors.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tinsel_capture::CaptureError;
use tinsel_engine::{EngineConfig, ViewportError};
use tracing::info;

/// Errors that stop the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Viewport error: {0}")]
    Viewport(#[from] ViewportError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Parse an engine config from JSON. Missing fields keep their defaults.
pub fn parse_config<R: Read>(reader: R) -> Result<EngineConfig, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Load an engine config from a JSON file.
pub fn load_config(path: &Path) -> Result<EngineConfig, AppError> {
    let file = File::open(path).map_err(|source| AppError::ConfigIo {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(BufReader::new(file)).map_err(|source| AppError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}
