//! Error types for loading and validating configuration files.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    ConfigFileNotFound {
        path: String,
    },
    ConfigParseError {
        path: String,
        source: serde_json::Error,
    },
    ConfigValidationError {
        field: String,
        message: String,
    },
    IoError {
        path: String,
        source: std::io::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
            ConfigError::ConfigParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse configuration file '{}': {}",
                    path, source
                )
            }
            ConfigError::ConfigValidationError { field, message } => {
                write!(
                    f,
                    "Configuration validation error for field '{}': {}",
                    field, message
                )
            }
            ConfigError::IoError { path, source } => {
                write!(f, "IO error reading '{}': {}", path, source)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::ConfigParseError { source, .. } => Some(source),
            ConfigError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
