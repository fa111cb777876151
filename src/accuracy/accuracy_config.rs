//! Accuracy policy configuration and its JSON loader.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Absolute error below which a prediction counts as an exact match.
pub const EXACT_MATCH_TOLERANCE: f64 = 1e-6;

/// Added to `|ground truth|` before dividing, so zero ground truth stays finite.
pub const RELATIVE_ERROR_EPSILON: f64 = 1e-10;

/// Mean relative error above which a regression is reported (0.1%).
pub const REGRESSION_THRESHOLD: f64 = 0.001;

/// Tolerances used by the accuracy engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyConfig {
    pub exact_match_tolerance: f64,
    pub relative_error_epsilon: f64,
    pub regression_threshold: f64,
}

impl Default for AccuracyConfig {
    fn default() -> Self {
        Self {
            exact_match_tolerance: EXACT_MATCH_TOLERANCE,
            relative_error_epsilon: RELATIVE_ERROR_EPSILON,
            regression_threshold: REGRESSION_THRESHOLD,
        }
    }
}

impl AccuracyConfig {
    /// Validates the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let checks = [
            ("exact_match_tolerance", self.exact_match_tolerance),
            ("relative_error_epsilon", self.relative_error_epsilon),
            ("regression_threshold", self.regression_threshold),
        ];
        for (field, value) in checks {
            if !value.is_finite() {
                return Err(ConfigError::ConfigValidationError {
                    field: field.to_string(),
                    message: format!("Must be a finite number, got {}", value),
                });
            }
        }

        if self.exact_match_tolerance <= 0.0 {
            return Err(ConfigError::ConfigValidationError {
                field: "exact_match_tolerance".to_string(),
                message: "Tolerance must be greater than 0".to_string(),
            });
        }

        if self.relative_error_epsilon <= 0.0 {
            return Err(ConfigError::ConfigValidationError {
                field: "relative_error_epsilon".to_string(),
                message: "Epsilon must be greater than 0".to_string(),
            });
        }

        if self.regression_threshold < 0.0 {
            return Err(ConfigError::ConfigValidationError {
                field: "regression_threshold".to_string(),
                message: "Threshold must not be negative".to_string(),
            });
        }

        Ok(())
    }
}

/// Loads JSON configuration files given explicitly by the caller.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration file. A missing file is an error, never a silent default.
    pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> ConfigResult<T> {
        let path_name = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::ConfigFileNotFound {
                path: path_name.clone(),
            },
            _ => ConfigError::IoError {
                path: path_name.clone(),
                source: e,
            },
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path_name,
            source: e,
        })
    }

    /// Load and validate the accuracy configuration, or use the defaults when no path is given.
    pub fn load_accuracy_config(path: Option<&Path>) -> ConfigResult<AccuracyConfig> {
        let config = match path {
            Some(path) => {
                info!("Loading accuracy configuration from {}", path.display());
                Self::load_config::<AccuracyConfig>(path)?
            }
            None => AccuracyConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_policy_constants() {
        let config = AccuracyConfig::default();
        assert_eq!(config.exact_match_tolerance, 1e-6);
        assert_eq!(config.relative_error_epsilon, 1e-10);
        assert_eq!(config.regression_threshold, 0.001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        let config = AccuracyConfig {
            relative_error_epsilon: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ConfigValidationError { field, .. }) if field == "relative_error_epsilon"
        ));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"regression_threshold": 0.01}}"#).unwrap();

        let config = ConfigLoader::load_accuracy_config(Some(file.path())).unwrap();
        assert_eq!(config.regression_threshold, 0.01);
        assert_eq!(config.exact_match_tolerance, EXACT_MATCH_TOLERANCE);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let result = ConfigLoader::load_accuracy_config(Some(path.as_path()));
        assert!(matches!(result, Err(ConfigError::ConfigFileNotFound { .. })));
    }
}
