//! Integration tests for the binary dataset codec.

use predbench::dataset::{
    DATASET_MAGIC, DatasetHeader, DatasetLayout, DatasetReader, DatasetWriter, FeatureRecord,
    load_ground_truth, write_dataset,
};
use predbench::errors::DatasetError;
use std::fs;
use std::io::Cursor;
use tempfile::tempdir;

fn dense_records() -> (Vec<FeatureRecord>, Vec<f32>) {
    let records = vec![
        FeatureRecord::dense(vec![0.1, -2.5, 3.0e-8]),
        FeatureRecord::dense(vec![f32::MAX, f32::MIN_POSITIVE, -0.0]),
        FeatureRecord::dense(vec![1.0, 2.0, 3.0]),
    ];
    let labels = vec![412.7, 1803.25, -0.125];
    (records, labels)
}

fn mixed_records() -> (Vec<FeatureRecord>, Vec<f32>) {
    let records = (0..4)
        .map(|i| {
            FeatureRecord::mixed(
                (0..6).map(|j| i as f32 * 0.37 - j as f32 * 1.1).collect(),
                vec![i as u8, 255, (i * 7) as u8],
            )
        })
        .collect();
    let labels = vec![100.5, 200.25, 300.125, 400.0625];
    (records, labels)
}

fn encode(header: DatasetHeader, records: &[FeatureRecord], labels: &[f32]) -> Vec<u8> {
    let mut writer = DatasetWriter::new(Vec::new(), header, "mem").unwrap();
    for record in records {
        writer.write_record(record).unwrap();
    }
    writer.finish(labels).unwrap()
}

#[test]
fn test_v1_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test_data.bin");
    let (records, labels) = dense_records();
    let header = DatasetHeader::new(3, DatasetLayout::Dense { feature_count: 3 });

    write_dataset(&path, header, &records, &labels).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 16 + 3 * 12 + 3 * 4);

    let dataset = DatasetReader::open(&path).unwrap().read_dataset().unwrap();
    assert_eq!(dataset.header, header);
    assert_eq!(dataset.labels.len(), header.sample_count as usize);

    for (decoded, original) in dataset.records.iter().zip(&records) {
        let decoded_bits: Vec<u32> = decoded.numeric.iter().map(|v| v.to_bits()).collect();
        let original_bits: Vec<u32> = original.numeric.iter().map(|v| v.to_bits()).collect();
        assert_eq!(decoded_bits, original_bits);
        assert!(decoded.categorical.is_empty());
    }
    let label_bits: Vec<u32> = dataset.labels.iter().map(|v| v.to_bits()).collect();
    let expected_bits: Vec<u32> = labels.iter().map(|v| v.to_bits()).collect();
    assert_eq!(label_bits, expected_bits);
}

#[test]
fn test_v2_file_round_trip() {
    let (records, labels) = mixed_records();
    let header = DatasetHeader::new(
        4,
        DatasetLayout::Mixed {
            numeric_feature_count: 6,
            categorical_feature_count: 3,
        },
    );
    assert_eq!(header.record_size(), 28);

    let bytes = encode(header, &records, &labels);
    assert_eq!(bytes.len() as u64, header.expected_file_size());

    let dataset = DatasetReader::from_reader(Cursor::new(bytes), "v2")
        .unwrap()
        .read_dataset()
        .unwrap();
    assert_eq!(dataset.header.version(), 2);
    assert_eq!(dataset.records, records);
    assert_eq!(dataset.labels, labels);
}

#[test]
fn test_load_ground_truth_returns_only_labels() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("labels.bin");
    let (records, labels) = mixed_records();
    let header = DatasetHeader::for_samples(
        records.len(),
        DatasetLayout::Mixed {
            numeric_feature_count: 6,
            categorical_feature_count: 3,
        },
    )
    .unwrap();
    write_dataset(&path, header, &records, &labels).unwrap();

    assert_eq!(load_ground_truth(&path).unwrap(), labels);
}

#[test]
fn test_header_only_files_have_no_labels() {
    for layout in [
        DatasetLayout::Dense { feature_count: 4 },
        DatasetLayout::Mixed {
            numeric_feature_count: 2,
            categorical_feature_count: 1,
        },
    ] {
        let header = DatasetHeader::new(0, layout);
        let bytes = encode(header, &[], &[]);
        assert_eq!(bytes.len() as u64, header.header_size());

        let mut reader = DatasetReader::from_reader(Cursor::new(bytes), "empty").unwrap();
        assert!(reader.read_labels().unwrap().is_empty());
        assert_eq!(reader.records().unwrap().count(), 0);
    }
}

#[test]
fn test_one_byte_short_is_truncated() {
    let (records, labels) = dense_records();
    let header = DatasetHeader::new(3, DatasetLayout::Dense { feature_count: 3 });
    let mut bytes = encode(header, &records, &labels);
    bytes.pop();

    let result = DatasetReader::from_reader(Cursor::new(bytes), "short.bin");
    match result {
        Err(DatasetError::Truncated {
            source_name,
            expected,
            actual,
        }) => {
            assert_eq!(source_name, "short.bin");
            assert_eq!(expected, header.expected_file_size());
            assert_eq!(actual, expected - 1);
        }
        other => panic!("expected Truncated, got {:?}", other.err()),
    }
}

#[test]
fn test_one_byte_long_is_size_mismatch() {
    let (records, labels) = dense_records();
    let header = DatasetHeader::new(3, DatasetLayout::Dense { feature_count: 3 });
    let mut bytes = encode(header, &records, &labels);
    bytes.push(0);

    let result = DatasetReader::from_reader(Cursor::new(bytes), "long.bin");
    assert!(matches!(result, Err(DatasetError::SizeMismatch { .. })));
}

#[test]
fn test_wrong_magic_is_rejected() {
    let (records, labels) = dense_records();
    let header = DatasetHeader::new(3, DatasetLayout::Dense { feature_count: 3 });
    let mut bytes = encode(header, &records, &labels);
    bytes[..4].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

    let result = DatasetReader::from_reader(Cursor::new(bytes), "bad.bin");
    match result {
        Err(error @ DatasetError::InvalidMagic { .. }) => {
            assert!(error.is_format_error());
            if let DatasetError::InvalidMagic {
                found, expected, ..
            } = error
            {
                assert_eq!(found, 0xDEAD_BEEF);
                assert_eq!(expected, DATASET_MAGIC);
            }
        }
        other => panic!("expected InvalidMagic, got {:?}", other.err()),
    }
}

#[test]
fn test_unknown_version_is_unsupported() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&DATASET_MAGIC.to_le_bytes());
    bytes.extend_from_slice(&99u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 64]);

    let error = DatasetReader::from_reader(Cursor::new(bytes), "v99.bin")
        .err()
        .unwrap();
    assert!(matches!(
        error,
        DatasetError::UnsupportedVersion { version: 99, .. }
    ));
    assert!(error.is_format_error());
}

#[test]
fn test_header_only_file_with_wide_layout_streams_nothing() {
    let mut bytes = Vec::new();
    for field in [DATASET_MAGIC, 1, 0, u32::MAX] {
        bytes.extend_from_slice(&field.to_le_bytes());
    }

    let mut reader = DatasetReader::from_reader(Cursor::new(bytes), "wide.bin").unwrap();
    assert_eq!(reader.header().record_size(), u32::MAX as u64 * 4);
    assert_eq!(reader.records().unwrap().count(), 0);
    assert!(reader.read_labels().unwrap().is_empty());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let result = DatasetReader::open(dir.path().join("missing.bin"));
    assert!(matches!(result, Err(DatasetError::Io { .. })));
}

#[test]
fn test_finish_with_too_few_records() {
    let header = DatasetHeader::new(3, DatasetLayout::Dense { feature_count: 1 });
    let mut writer = DatasetWriter::new(Vec::new(), header, "mem").unwrap();
    writer.write_record(&FeatureRecord::dense(vec![1.0])).unwrap();
    assert_eq!(writer.records_written(), 1);

    let result = writer.finish(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        result,
        Err(DatasetError::RecordCountMismatch {
            expected: 3,
            written: 1
        })
    ));
}

#[test]
fn test_record_shape_is_checked_on_write() {
    let header = DatasetHeader::new(
        1,
        DatasetLayout::Mixed {
            numeric_feature_count: 2,
            categorical_feature_count: 2,
        },
    );
    let mut writer = DatasetWriter::new(Vec::new(), header, "mem").unwrap();
    let result = writer.write_record(&FeatureRecord::mixed(vec![1.0, 2.0], vec![1]));
    assert!(matches!(
        result,
        Err(DatasetError::RecordShapeMismatch {
            section: "categorical",
            expected: 2,
            actual: 1,
            ..
        })
    ));
}
