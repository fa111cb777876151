//! Dataset file reader.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;

use super::layouts::{PRELUDE_SIZE, RawPrelude, layout_entry, read_f32_le, read_u32_le};
use super::{DATASET_MAGIC, Dataset, DatasetHeader, DatasetLayout, FeatureRecord};
use crate::errors::{DatasetError, DatasetResult};

/// Reads a dataset file whose header and total size have already been validated.
///
/// Construction fails unless the byte source is exactly as long as the header
/// declares, so every later read stays inside the validated bounds.
pub struct DatasetReader<R> {
    reader: R,
    header: DatasetHeader,
    source_name: String,
}

impl DatasetReader<BufReader<File>> {
    /// Opens and validates a dataset file on disk.
    pub fn open(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|e| DatasetError::io(&source_name, e))?;
        Self::from_reader(BufReader::new(file), source_name)
    }
}

impl<R: Read + Seek> DatasetReader<R> {
    /// Validates the header and size of any seekable byte source.
    pub fn from_reader(mut reader: R, source_name: impl Into<String>) -> DatasetResult<Self> {
        let source_name = source_name.into();
        let actual_size = reader
            .seek(SeekFrom::End(0))
            .map_err(|e| DatasetError::io(&source_name, e))?;
        reader
            .seek(SeekFrom::Start(0))
            .map_err(|e| DatasetError::io(&source_name, e))?;

        let header = read_header(&mut reader, &source_name, actual_size)?;

        let expected_size = header.expected_file_size();
        if actual_size < expected_size {
            return Err(DatasetError::Truncated {
                source_name,
                expected: expected_size,
                actual: actual_size,
            });
        }
        if actual_size > expected_size {
            return Err(DatasetError::SizeMismatch {
                source_name,
                expected: expected_size,
                actual: actual_size,
            });
        }

        debug!(
            "{}: dataset v{} with {} samples, {} numeric + {} categorical features",
            source_name,
            header.version(),
            header.sample_count,
            header.layout.numeric_feature_count(),
            header.layout.categorical_feature_count()
        );

        Ok(Self {
            reader,
            header,
            source_name,
        })
    }

    pub fn header(&self) -> &DatasetHeader {
        &self.header
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Reads the ground-truth labels without touching the feature records.
    pub fn read_labels(&mut self) -> DatasetResult<Vec<f32>> {
        self.reader
            .seek(SeekFrom::Start(self.header.label_offset()))
            .map_err(|e| DatasetError::io(&self.source_name, e))?;
        read_f32_le(&mut self.reader, self.header.sample_count as usize)
            .map_err(|e| DatasetError::io(&self.source_name, e))
    }

    /// Streams the feature records, keeping one record resident at a time.
    pub fn records(&mut self) -> DatasetResult<RecordIter<'_, R>> {
        self.reader
            .seek(SeekFrom::Start(self.header.header_size()))
            .map_err(|e| DatasetError::io(&self.source_name, e))?;
        Ok(RecordIter {
            reader: &mut self.reader,
            layout: self.header.layout,
            buffer: Vec::new(),
            record_size: self.header.record_size() as usize,
            remaining: self.header.sample_count as u64,
            source_name: &self.source_name,
        })
    }

    /// Materializes the whole dataset.
    pub fn read_dataset(mut self) -> DatasetResult<Dataset> {
        let records = self.records()?.collect::<DatasetResult<Vec<_>>>()?;
        let labels = self.read_labels()?;
        Ok(Dataset {
            header: self.header,
            records,
            labels,
        })
    }
}

/// Iterator over the feature records of a dataset.
pub struct RecordIter<'a, R> {
    reader: &'a mut R,
    layout: DatasetLayout,
    /// Filled on the first record, so header-only files allocate nothing.
    buffer: Vec<u8>,
    record_size: usize,
    remaining: u64,
    source_name: &'a str,
}

impl<R: Read> Iterator for RecordIter<'_, R> {
    type Item = DatasetResult<FeatureRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        if self.buffer.len() != self.record_size {
            self.buffer.resize(self.record_size, 0);
        }
        if let Err(e) = self.reader.read_exact(&mut self.buffer) {
            self.remaining = 0;
            return Some(Err(DatasetError::io(self.source_name, e)));
        }
        Some(Ok(self.layout.decode_record(&self.buffer)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

/// Reads and validates the prelude, then dispatches on the version to decode the rest.
fn read_header<R: Read>(
    reader: &mut R,
    source_name: &str,
    actual_size: u64,
) -> DatasetResult<DatasetHeader> {
    let truncated = |expected: usize| DatasetError::Truncated {
        source_name: source_name.to_string(),
        expected: expected as u64,
        actual: actual_size,
    };

    let mut prelude = RawPrelude::default();
    reader
        .read_exact(bytemuck::bytes_of_mut(&mut prelude))
        .map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => truncated(PRELUDE_SIZE),
            _ => DatasetError::io(source_name, e),
        })?;

    if prelude.magic() != DATASET_MAGIC {
        return Err(DatasetError::InvalidMagic {
            source_name: source_name.to_string(),
            found: prelude.magic(),
            expected: DATASET_MAGIC,
        });
    }

    let entry = layout_entry(prelude.version()).ok_or_else(|| DatasetError::UnsupportedVersion {
        source_name: source_name.to_string(),
        version: prelude.version(),
    })?;

    let fields = read_u32_le(reader, entry.field_count).map_err(|e| match e.kind() {
        ErrorKind::UnexpectedEof => truncated(entry.header_size()),
        _ => DatasetError::io(source_name, e),
    })?;

    let (sample_count, layout) = entry.decode(&fields);
    Ok(DatasetHeader::new(sample_count, layout))
}
