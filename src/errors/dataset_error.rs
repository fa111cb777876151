//! Error types for the binary dataset codec.

use thiserror::Error;

/// Errors that can occur while reading or writing a dataset file.
///
/// Every variant that concerns a concrete file carries `source_name`, which is
/// the path of the file (or the label given to an in-memory reader).
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error(
        "{source_name}: not a recognized dataset file (magic 0x{found:08X}, expected 0x{expected:08X})"
    )]
    InvalidMagic {
        source_name: String,
        found: u32,
        expected: u32,
    },

    #[error("{source_name}: unsupported dataset version {version}")]
    UnsupportedVersion { source_name: String, version: u32 },

    #[error("{source_name}: truncated dataset file: expected {expected} bytes, found {actual}")]
    Truncated {
        source_name: String,
        expected: u64,
        actual: u64,
    },

    #[error(
        "{source_name}: malformed dataset file: declared layout needs {expected} bytes, file has {actual}"
    )]
    SizeMismatch {
        source_name: String,
        expected: u64,
        actual: u64,
    },

    #[error(
        "Record {index} has {actual} {section} values, but the layout expects {expected}"
    )]
    RecordShapeMismatch {
        index: u64,
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Expected {expected} records to be written, got {written}")]
    RecordCountMismatch { expected: u64, written: u64 },

    #[error("Expected {expected} labels, got {actual}")]
    LabelCountMismatch { expected: u64, actual: usize },

    #[error("Sample count {count} does not fit the 32-bit header field")]
    SampleCountOverflow { count: usize },

    #[error("{source_name}: I/O error: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    /// Wraps an I/O error with the name of the file being processed.
    pub fn io(source_name: &str, source: std::io::Error) -> Self {
        DatasetError::Io {
            source_name: source_name.to_string(),
            source,
        }
    }

    /// True for the errors that mean "this is not a well-formed dataset file".
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DatasetError::InvalidMagic { .. }
                | DatasetError::UnsupportedVersion { .. }
                | DatasetError::SizeMismatch { .. }
        )
    }
}
