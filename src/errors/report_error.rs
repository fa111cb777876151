//! Error types for report assembly and baseline persistence.

use super::{AccuracyError, ConfigError, DatasetError, PredictionResultError};
use thiserror::Error;

/// Errors that can occur while assembling or persisting experiment reports.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    PredictionResults(#[from] PredictionResultError),

    #[error(transparent)]
    Accuracy(#[from] AccuracyError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{path}: failed to parse JSON document: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: I/O error: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    pub fn json(path: impl AsRef<std::path::Path>, source: serde_json::Error) -> Self {
        ReportError::Json {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
