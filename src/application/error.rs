//! Application-level failures surfaced to `main`.

use std::path::Path;

use thiserror::Error;

use crate::infra::api::ApiError;
use crate::infra::key::KeyError;
use crate::infra::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("export key is required (use --key-file or RICALCO_EXPORT_KEY)")]
    MissingKey,
    #[error("failed to read key file {path}: {source}")]
    KeyFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid export key: {0}")]
    Key(#[from] KeyError),
    #[error("api request failed: {0}")]
    Api(#[from] ApiError),
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid document payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("{0}")]
    Telemetry(#[from] TelemetryError),
}

impl AppError {
    pub fn key_file(path: &Path, source: std::io::Error) -> Self {
        Self::KeyFile {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn read_input(path: &Path, source: std::io::Error) -> Self {
        Self::ReadInput {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.display().to_string(),
            source,
        }
    }
}
