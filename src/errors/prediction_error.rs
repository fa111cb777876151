//! Error types for reading prediction result documents.

use thiserror::Error;

/// Errors that can occur while parsing a prediction result document.
#[derive(Error, Debug)]
pub enum PredictionResultError {
    #[error("{source_name}: required field '{field}' is missing")]
    MissingField { source_name: String, field: String },

    #[error("{source_name}: failed to parse prediction results: {source}")]
    Parse {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{source_name}: I/O error: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl PredictionResultError {
    pub fn missing(source_name: &str, field: &str) -> Self {
        PredictionResultError::MissingField {
            source_name: source_name.to_string(),
            field: field.to_string(),
        }
    }
}
