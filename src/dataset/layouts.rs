//! Record layouts and the version dispatch table.
//!
//! A dataset file starts with an 8 byte prelude (magic, version) followed by
//! layout specific header fields. The version selects an entry of
//! [`LAYOUT_TABLE`], which knows how many header fields follow and how to
//! turn them into a [`DatasetLayout`]. Supporting a new layout means adding a
//! variant to [`DatasetLayout`] and one entry to the table.

use std::io::{self, Read};

use bytemuck::{Pod, Zeroable};

use super::{DATASET_MAGIC, DatasetLayout, FeatureRecord};
use crate::errors::{DatasetError, DatasetResult};

/// Size in bytes of the magic and version fields shared by every layout.
pub const PRELUDE_SIZE: usize = 8;

/// The fixed prelude of every dataset file, as stored on disk (little-endian).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub(crate) struct RawPrelude {
    magic: u32,
    version: u32,
}

impl RawPrelude {
    pub(crate) fn new(version: u32) -> Self {
        Self {
            magic: DATASET_MAGIC.to_le(),
            version: version.to_le(),
        }
    }

    pub(crate) fn magic(&self) -> u32 {
        u32::from_le(self.magic)
    }

    pub(crate) fn version(&self) -> u32 {
        u32::from_le(self.version)
    }
}

/// Builds a layout from the header fields that follow the sample count.
type LayoutDecoder = fn(&[u32]) -> DatasetLayout;

/// One supported on-disk layout.
pub struct LayoutEntry {
    pub version: u32,
    /// Number of u32 header fields after the prelude, sample count included.
    pub field_count: usize,
    decode: LayoutDecoder,
}

impl LayoutEntry {
    pub fn header_size(&self) -> usize {
        PRELUDE_SIZE + self.field_count * 4
    }

    /// Decodes the header fields (sample count first) into `(sample_count, layout)`.
    pub fn decode(&self, fields: &[u32]) -> (u32, DatasetLayout) {
        (fields[0], (self.decode)(&fields[1..]))
    }
}

pub const LAYOUT_TABLE: &[LayoutEntry] = &[
    LayoutEntry {
        version: 1,
        field_count: 2,
        decode: decode_dense,
    },
    LayoutEntry {
        version: 2,
        field_count: 3,
        decode: decode_mixed,
    },
];

fn decode_dense(fields: &[u32]) -> DatasetLayout {
    DatasetLayout::Dense {
        feature_count: fields[0],
    }
}

fn decode_mixed(fields: &[u32]) -> DatasetLayout {
    DatasetLayout::Mixed {
        numeric_feature_count: fields[0],
        categorical_feature_count: fields[1],
    }
}

/// Looks up the layout entry for a header version.
pub fn layout_entry(version: u32) -> Option<&'static LayoutEntry> {
    LAYOUT_TABLE.iter().find(|entry| entry.version == version)
}

impl DatasetLayout {
    /// Header fields written after the sample count.
    pub(crate) fn header_fields(&self) -> Vec<u32> {
        match *self {
            DatasetLayout::Dense { feature_count } => vec![feature_count],
            DatasetLayout::Mixed {
                numeric_feature_count,
                categorical_feature_count,
            } => vec![numeric_feature_count, categorical_feature_count],
        }
    }

    /// Decodes one record from exactly `record_size()` bytes.
    pub fn decode_record(&self, bytes: &[u8]) -> FeatureRecord {
        let numeric_count = self.numeric_feature_count();
        let numeric_bytes = &bytes[..numeric_count * 4];
        let numeric = numeric_bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        let categorical = match self {
            DatasetLayout::Dense { .. } => Vec::new(),
            DatasetLayout::Mixed { .. } => {
                let start = numeric_count * 4;
                bytes[start..start + self.categorical_feature_count()].to_vec()
            }
        };

        FeatureRecord {
            numeric,
            categorical,
        }
    }

    /// Appends the encoded record to `out`, checking its shape against the layout.
    pub fn encode_record(
        &self,
        record: &FeatureRecord,
        index: u64,
        out: &mut Vec<u8>,
    ) -> DatasetResult<()> {
        if record.numeric.len() != self.numeric_feature_count() {
            return Err(DatasetError::RecordShapeMismatch {
                index,
                section: "numeric",
                expected: self.numeric_feature_count(),
                actual: record.numeric.len(),
            });
        }
        if record.categorical.len() != self.categorical_feature_count() {
            return Err(DatasetError::RecordShapeMismatch {
                index,
                section: "categorical",
                expected: self.categorical_feature_count(),
                actual: record.categorical.len(),
            });
        }

        extend_f32_le(out, &record.numeric);
        if let DatasetLayout::Mixed { .. } = self {
            out.extend_from_slice(&record.categorical);
            // padding byte
            out.push(0);
        }
        Ok(())
    }
}

/// Reads `count` little-endian f32 values straight into a new vector.
pub(crate) fn read_f32_le<R: Read>(reader: &mut R, count: usize) -> io::Result<Vec<f32>> {
    let mut values = vec![0.0f32; count];
    reader.read_exact(bytemuck::cast_slice_mut(&mut values))?;
    if cfg!(target_endian = "big") {
        for value in values.iter_mut() {
            *value = f32::from_bits(u32::from_le(value.to_bits()));
        }
    }
    Ok(values)
}

/// Reads `count` little-endian u32 values.
pub(crate) fn read_u32_le<R: Read>(reader: &mut R, count: usize) -> io::Result<Vec<u32>> {
    let mut values = vec![0u32; count];
    reader.read_exact(bytemuck::cast_slice_mut(&mut values))?;
    for value in values.iter_mut() {
        *value = u32::from_le(*value);
    }
    Ok(values)
}

pub(crate) fn extend_f32_le(out: &mut Vec<u8>, values: &[f32]) {
    if cfg!(target_endian = "little") {
        out.extend_from_slice(bytemuck::cast_slice(values));
    } else {
        for value in values {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_known_versions() {
        assert_eq!(layout_entry(1).map(|e| e.header_size()), Some(16));
        assert_eq!(layout_entry(2).map(|e| e.header_size()), Some(20));
        assert!(layout_entry(0).is_none());
        assert!(layout_entry(99).is_none());
    }

    #[test]
    fn table_entries_decode_their_own_layout() {
        let (samples, layout) = layout_entry(2).unwrap().decode(&[10, 6, 3]);
        assert_eq!(samples, 10);
        assert_eq!(
            layout,
            DatasetLayout::Mixed {
                numeric_feature_count: 6,
                categorical_feature_count: 3
            }
        );
        assert_eq!(layout.version(), 2);
        assert_eq!(layout.header_fields(), vec![6, 3]);
    }

    #[test]
    fn mixed_record_has_padding_byte() {
        let layout = DatasetLayout::Mixed {
            numeric_feature_count: 2,
            categorical_feature_count: 3,
        };
        let record = FeatureRecord {
            numeric: vec![1.5, -2.0],
            categorical: vec![4, 0, 7],
        };
        let mut out = Vec::new();
        layout.encode_record(&record, 0, &mut out).unwrap();

        assert_eq!(out.len() as u64, layout.record_size());
        assert_eq!(&out[0..4], &1.5f32.to_le_bytes());
        assert_eq!(&out[8..11], &[4, 0, 7]);
        assert_eq!(out[11], 0);
        assert_eq!(layout.decode_record(&out), record);
    }

    #[test]
    fn dense_record_rejects_categorical_values() {
        let layout = DatasetLayout::Dense { feature_count: 2 };
        let record = FeatureRecord {
            numeric: vec![1.0, 2.0],
            categorical: vec![1],
        };
        let result = layout.encode_record(&record, 3, &mut Vec::new());
        assert!(matches!(
            result,
            Err(DatasetError::RecordShapeMismatch {
                index: 3,
                section: "categorical",
                ..
            })
        ));
    }

    #[test]
    fn prelude_is_little_endian_on_disk() {
        let prelude = RawPrelude::new(2);
        assert_eq!(
            bytemuck::bytes_of(&prelude),
            &[0xBE, 0xBA, 0xFE, 0xCA, 2, 0, 0, 0]
        );
        assert_eq!(prelude.magic(), DATASET_MAGIC);
        assert_eq!(prelude.version(), 2);
    }
}
