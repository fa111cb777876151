//! Error types for the prediction benchmarking library.
//!
//! Each component has its own error enum so callers can match on the exact
//! failure without going through generic wrappers like `anyhow` or
//! `Box<dyn Error>`. All errors are fatal to the operation that raised them.

mod accuracy_error;
mod config_error;
mod dataset_error;
mod harness_error;
mod prediction_error;
mod report_error;

pub use accuracy_error::AccuracyError;
pub use config_error::{ConfigError, ConfigResult};
pub use dataset_error::DatasetError;
pub use harness_error::HarnessError;
pub use prediction_error::PredictionResultError;
pub use report_error::ReportError;

/// Result type alias for dataset codec operations.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

/// Result type alias for prediction document parsing.
pub type PredictionResultsResult<T> = std::result::Result<T, PredictionResultError>;

/// Result type alias for accuracy computations.
pub type AccuracyResult<T> = std::result::Result<T, AccuracyError>;

/// Result type alias for report assembly.
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Result type alias for the native batch harness.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;
