//! Error types for the accuracy engine.

use thiserror::Error;

/// Errors that can occur while comparing predictions against ground truth.
#[derive(Error, Debug)]
pub enum AccuracyError {
    #[error(
        "No overlapping samples to compare: {predictions} predictions, {ground_truth} ground truth values"
    )]
    EmptyComparison {
        predictions: usize,
        ground_truth: usize,
    },

    #[error("{section}[{index}] is {value}, only finite values can be compared")]
    NonFiniteValue {
        section: &'static str,
        index: usize,
        value: f32,
    },
}
