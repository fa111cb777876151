//! Dataset file writer.
//!
//! Records are encoded into a bounded chunk buffer that is flushed every
//! [`WRITE_CHUNK_RECORDS`] records, so writing a large dataset never needs the
//! whole feature matrix in memory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use super::layouts::extend_f32_le;
use super::{DatasetHeader, FeatureRecord};
use crate::errors::{DatasetError, DatasetResult};

/// Number of records buffered before a chunk is written out.
pub const WRITE_CHUNK_RECORDS: usize = 50_000;

pub struct DatasetWriter<W: Write> {
    writer: W,
    header: DatasetHeader,
    chunk: Vec<u8>,
    chunk_records: usize,
    written: u64,
    source_name: String,
}

impl DatasetWriter<BufWriter<File>> {
    /// Creates (or truncates) a dataset file and writes its header.
    pub fn create(path: impl AsRef<Path>, header: DatasetHeader) -> DatasetResult<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = File::create(path).map_err(|e| DatasetError::io(&source_name, e))?;
        Self::new(BufWriter::new(file), header, source_name)
    }
}

impl<W: Write> DatasetWriter<W> {
    pub fn new(
        mut writer: W,
        header: DatasetHeader,
        source_name: impl Into<String>,
    ) -> DatasetResult<Self> {
        let source_name = source_name.into();
        writer
            .write_all(&header.encode())
            .map_err(|e| DatasetError::io(&source_name, e))?;

        let chunk_capacity = (header.sample_count as usize).min(WRITE_CHUNK_RECORDS)
            * header.record_size() as usize;

        Ok(Self {
            writer,
            header,
            chunk: Vec::with_capacity(chunk_capacity),
            chunk_records: 0,
            written: 0,
            source_name,
        })
    }

    pub fn header(&self) -> &DatasetHeader {
        &self.header
    }

    /// Number of records accepted so far.
    pub fn records_written(&self) -> u64 {
        self.written
    }

    /// Appends one record; fails if the record does not match the layout or
    /// the header's sample count has already been reached.
    pub fn write_record(&mut self, record: &FeatureRecord) -> DatasetResult<()> {
        let expected = self.header.sample_count as u64;
        if self.written >= expected {
            return Err(DatasetError::RecordCountMismatch {
                expected,
                written: self.written + 1,
            });
        }

        self.header
            .layout
            .encode_record(record, self.written, &mut self.chunk)?;
        self.written += 1;
        self.chunk_records += 1;

        if self.chunk_records == WRITE_CHUNK_RECORDS {
            self.flush_chunk()?;
        }
        Ok(())
    }

    fn flush_chunk(&mut self) -> DatasetResult<()> {
        if self.chunk.is_empty() {
            return Ok(());
        }
        self.writer
            .write_all(&self.chunk)
            .map_err(|e| DatasetError::io(&self.source_name, e))?;
        debug!(
            "{}: flushed {} records ({}/{})",
            self.source_name, self.chunk_records, self.written, self.header.sample_count
        );
        self.chunk.clear();
        self.chunk_records = 0;
        Ok(())
    }

    /// Writes the label section and returns the underlying writer.
    ///
    /// A generator never leaves a partial file behind on the happy path: the
    /// record count and label count must both equal the header's sample count.
    pub fn finish(mut self, labels: &[f32]) -> DatasetResult<W> {
        let expected = self.header.sample_count as u64;
        if self.written != expected {
            return Err(DatasetError::RecordCountMismatch {
                expected,
                written: self.written,
            });
        }
        if labels.len() as u64 != expected {
            return Err(DatasetError::LabelCountMismatch {
                expected,
                actual: labels.len(),
            });
        }

        self.flush_chunk()?;
        for label_chunk in labels.chunks(WRITE_CHUNK_RECORDS) {
            extend_f32_le(&mut self.chunk, label_chunk);
            self.writer
                .write_all(&self.chunk)
                .map_err(|e| DatasetError::io(&self.source_name, e))?;
            self.chunk.clear();
        }
        self.writer
            .flush()
            .map_err(|e| DatasetError::io(&self.source_name, e))?;
        Ok(self.writer)
    }
}

/// Writes a complete dataset file in one call.
pub fn write_dataset(
    path: impl AsRef<Path>,
    header: DatasetHeader,
    records: &[FeatureRecord],
    labels: &[f32],
) -> DatasetResult<()> {
    let mut writer = DatasetWriter::create(path, header)?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.finish(labels)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetLayout, DatasetReader};
    use std::io::Cursor;

    fn dense_header(samples: u32) -> DatasetHeader {
        DatasetHeader::new(samples, DatasetLayout::Dense { feature_count: 2 })
    }

    #[test]
    fn writes_exact_file_size() {
        let mut writer = DatasetWriter::new(Vec::new(), dense_header(2), "mem").unwrap();
        writer.write_record(&FeatureRecord::dense(vec![1.0, 2.0])).unwrap();
        writer.write_record(&FeatureRecord::dense(vec![3.0, 4.0])).unwrap();
        let bytes = writer.finish(&[0.5, 0.75]).unwrap();

        assert_eq!(bytes.len() as u64, dense_header(2).expected_file_size());

        let mut reader = DatasetReader::from_reader(Cursor::new(bytes), "mem").unwrap();
        assert_eq!(reader.read_labels().unwrap(), vec![0.5, 0.75]);
    }

    #[test]
    fn finish_rejects_missing_records() {
        let mut writer = DatasetWriter::new(Vec::new(), dense_header(3), "mem").unwrap();
        writer.write_record(&FeatureRecord::dense(vec![1.0, 2.0])).unwrap();
        let result = writer.finish(&[0.0, 0.0, 0.0]);
        assert!(matches!(
            result,
            Err(DatasetError::RecordCountMismatch {
                expected: 3,
                written: 1
            })
        ));
    }

    #[test]
    fn rejects_records_beyond_sample_count() {
        let mut writer = DatasetWriter::new(Vec::new(), dense_header(1), "mem").unwrap();
        writer.write_record(&FeatureRecord::dense(vec![1.0, 2.0])).unwrap();
        let result = writer.write_record(&FeatureRecord::dense(vec![1.0, 2.0]));
        assert!(matches!(
            result,
            Err(DatasetError::RecordCountMismatch {
                expected: 1,
                written: 2
            })
        ));
    }

    #[test]
    fn finish_rejects_label_count_mismatch() {
        let mut writer = DatasetWriter::new(Vec::new(), dense_header(1), "mem").unwrap();
        writer.write_record(&FeatureRecord::dense(vec![1.0, 2.0])).unwrap();
        let result = writer.finish(&[]);
        assert!(matches!(
            result,
            Err(DatasetError::LabelCountMismatch {
                expected: 1,
                actual: 0
            })
        ));
    }

    #[test]
    fn chunk_buffer_stays_bounded() {
        let samples = WRITE_CHUNK_RECORDS as u32 + 10;
        let header = DatasetHeader::new(samples, DatasetLayout::Dense { feature_count: 1 });
        let mut writer = DatasetWriter::new(Vec::new(), header, "mem").unwrap();
        for i in 0..samples {
            writer.write_record(&FeatureRecord::dense(vec![i as f32])).unwrap();
            assert!(writer.chunk.len() <= WRITE_CHUNK_RECORDS * 4);
        }
        let labels = vec![1.0f32; samples as usize];
        let bytes = writer.finish(&labels).unwrap();
        assert_eq!(bytes.len() as u64, header.expected_file_size());
    }
}
