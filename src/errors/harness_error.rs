//! Error types for the native batch harness.

use thiserror::Error;

/// Errors that can occur while configuring or running the batch harness.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("At least one batch size is required")]
    NoBatchSizes,

    #[error("Invalid batch size: {size}. Batch sizes must be greater than 0")]
    InvalidBatchSize { size: usize },

    #[error("No records to run predictions on")]
    NoRecords,
}
