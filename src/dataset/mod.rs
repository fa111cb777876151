//! Binary test-vector format.
//!
//! A dataset file holds a fixed-size header, `sample_count` fixed-size feature
//! records and finally `sample_count` little-endian f32 ground-truth labels:
//!
//! ```text
//! v1: magic | version | samples | features                      (16 bytes)
//!     samples x features f32 (row-major)
//!     samples x f32 labels
//!
//! v2: magic | version | samples | numeric | categorical         (20 bytes)
//!     samples x (numeric f32 + categorical u8 + 1 padding byte)
//!     samples x f32 labels
//! ```
//!
//! Because every record has a size known from the header, the label section
//! can be reached with a single seek and records can be streamed one at a time.

pub mod layouts;
pub mod reader;
pub mod writer;

use std::path::Path;

use crate::errors::{DatasetError, DatasetResult};
use layouts::{PRELUDE_SIZE, RawPrelude};

pub use reader::{DatasetReader, RecordIter};
pub use writer::{DatasetWriter, WRITE_CHUNK_RECORDS, write_dataset};

/// Sentinel stored in the first four bytes of every dataset file.
pub const DATASET_MAGIC: u32 = 0xCAFE_BABE;

/// Size in bytes of one ground-truth label.
pub const LABEL_SIZE: u64 = 4;

/// Record layout selected by the header version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetLayout {
    /// Version 1: every feature is an f32, categorical columns pre-encoded as float indices.
    Dense { feature_count: u32 },
    /// Version 2: f32 numeric features followed by u8 category indices and one padding byte.
    Mixed {
        numeric_feature_count: u32,
        categorical_feature_count: u32,
    },
}

impl DatasetLayout {
    pub fn version(&self) -> u32 {
        match self {
            DatasetLayout::Dense { .. } => 1,
            DatasetLayout::Mixed { .. } => 2,
        }
    }

    pub fn header_size(&self) -> usize {
        // sample count + layout fields
        PRELUDE_SIZE + 4 * (1 + self.header_fields().len())
    }

    /// Size in bytes of one feature record.
    pub fn record_size(&self) -> u64 {
        match *self {
            DatasetLayout::Dense { feature_count } => 4 * feature_count as u64,
            DatasetLayout::Mixed {
                numeric_feature_count,
                categorical_feature_count,
            } => 4 * numeric_feature_count as u64 + categorical_feature_count as u64 + 1,
        }
    }

    pub fn numeric_feature_count(&self) -> usize {
        match *self {
            DatasetLayout::Dense { feature_count } => feature_count as usize,
            DatasetLayout::Mixed {
                numeric_feature_count,
                ..
            } => numeric_feature_count as usize,
        }
    }

    pub fn categorical_feature_count(&self) -> usize {
        match *self {
            DatasetLayout::Dense { .. } => 0,
            DatasetLayout::Mixed {
                categorical_feature_count,
                ..
            } => categorical_feature_count as usize,
        }
    }

    /// Total number of feature columns per sample.
    pub fn feature_count(&self) -> usize {
        self.numeric_feature_count() + self.categorical_feature_count()
    }
}

/// Decoded dataset header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetHeader {
    pub sample_count: u32,
    pub layout: DatasetLayout,
}

impl DatasetHeader {
    pub fn new(sample_count: u32, layout: DatasetLayout) -> Self {
        Self {
            sample_count,
            layout,
        }
    }

    /// Creates a header from an in-memory sample count, rejecting counts above `u32::MAX`.
    pub fn for_samples(sample_count: usize, layout: DatasetLayout) -> DatasetResult<Self> {
        let sample_count = u32::try_from(sample_count)
            .map_err(|_| DatasetError::SampleCountOverflow {
                count: sample_count,
            })?;
        Ok(Self::new(sample_count, layout))
    }

    pub fn version(&self) -> u32 {
        self.layout.version()
    }

    pub fn header_size(&self) -> u64 {
        self.layout.header_size() as u64
    }

    pub fn record_size(&self) -> u64 {
        self.layout.record_size()
    }

    /// Byte offset of the first ground-truth label.
    ///
    /// Saturates instead of wrapping, so an absurd header is reported as a
    /// truncated file rather than overflowing.
    pub fn label_offset(&self) -> u64 {
        (self.sample_count as u64)
            .saturating_mul(self.record_size())
            .saturating_add(self.header_size())
    }

    /// Exact size a well-formed file with this header must have.
    pub fn expected_file_size(&self) -> u64 {
        self.label_offset()
            .saturating_add(self.sample_count as u64 * LABEL_SIZE)
    }

    /// Encodes the header in its on-disk form.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.layout.header_size());
        bytes.extend_from_slice(bytemuck::bytes_of(&RawPrelude::new(self.version())));
        bytes.extend_from_slice(&self.sample_count.to_le_bytes());
        for field in self.layout.header_fields() {
            bytes.extend_from_slice(&field.to_le_bytes());
        }
        bytes
    }
}

/// One test sample's features.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRecord {
    pub numeric: Vec<f32>,
    /// Category indices; always empty for version 1 files.
    pub categorical: Vec<u8>,
}

impl FeatureRecord {
    pub fn dense(values: Vec<f32>) -> Self {
        Self {
            numeric: values,
            categorical: Vec::new(),
        }
    }

    pub fn mixed(numeric: Vec<f32>, categorical: Vec<u8>) -> Self {
        Self {
            numeric,
            categorical,
        }
    }

    /// All features as floats, category indices widened to f32.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.numeric
            .iter()
            .copied()
            .chain(self.categorical.iter().map(|&c| c as f32))
            .collect()
    }
}

/// A fully materialized dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub header: DatasetHeader,
    pub records: Vec<FeatureRecord>,
    pub labels: Vec<f32>,
}

/// Reads only the ground-truth labels of a dataset file.
pub fn load_ground_truth(path: impl AsRef<Path>) -> DatasetResult<Vec<f32>> {
    DatasetReader::open(path)?.read_labels()
}
