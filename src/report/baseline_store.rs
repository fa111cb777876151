//! Persistence of the last-known baseline record.
//!
//! The baseline is the only shared mutable state in a benchmarking session:
//! one record, overwritten whenever a baseline experiment is reported and read
//! by every later comparison. Writers follow a last-writer-wins discipline; the
//! file store replaces the record with an atomic rename, so a concurrent reader
//! sees either the old or the new record and never a partial one.

use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::errors::{ReportError, ReportResult};

/// A report type that can serve as a baseline.
pub trait BaselineRecord: Serialize + DeserializeOwned + Clone {
    /// File name of the record inside a results directory.
    const FILE_NAME: &'static str;

    /// JSON pointer to the throughput inside a stored record.
    const THROUGHPUT_POINTER: &'static str;

    /// Throughput other runs are compared against.
    fn predictions_per_second(&self) -> f64;
}

/// Storage for the baseline record.
pub trait BaselineStore<R: BaselineRecord> {
    /// Returns the stored baseline, or `None` if no baseline has been recorded yet.
    fn load(&self) -> ReportResult<Option<R>>;

    /// Replaces the stored baseline.
    fn store(&self, record: &R) -> ReportResult<()>;

    /// Throughput of the stored baseline, or `None` if there is none.
    fn load_throughput(&self) -> ReportResult<Option<f64>> {
        Ok(self.load()?.map(|record| record.predictions_per_second()))
    }
}

/// Baseline record kept as a JSON file at a well-known path.
#[derive(Debug, Clone)]
pub struct FileBaselineStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: BaselineRecord> FileBaselineStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Store at `<results_dir>/<R::FILE_NAME>`.
    pub fn in_dir(results_dir: impl AsRef<Path>) -> Self {
        Self::new(results_dir.as_ref().join(R::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: BaselineRecord> BaselineStore<R> for FileBaselineStore<R> {
    fn load(&self) -> ReportResult<Option<R>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| ReportError::io(&self.path, e))?;
        let record = serde_json::from_str(&content).map_err(|e| ReportError::json(&self.path, e))?;
        Ok(Some(record))
    }

    /// Reads only the throughput, so records written by older report layouts
    /// still serve as a baseline.
    fn load_throughput(&self) -> ReportResult<Option<f64>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| ReportError::io(&self.path, e))?;
        let record: Value =
            serde_json::from_str(&content).map_err(|e| ReportError::json(&self.path, e))?;

        let throughput = record.pointer(R::THROUGHPUT_POINTER).and_then(Value::as_f64);
        if throughput.is_none() {
            warn!(
                "Baseline record {} has no numeric {}, ignoring it",
                self.path.display(),
                R::THROUGHPUT_POINTER
            );
        }
        Ok(throughput)
    }

    fn store(&self, record: &R) -> ReportResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| ReportError::io(dir, e))?;

        let mut file = NamedTempFile::new_in(dir).map_err(|e| ReportError::io(dir, e))?;
        serde_json::to_writer_pretty(&mut file, record)
            .map_err(|e| ReportError::json(file.path(), e))?;
        file.write_all(b"\n")
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| ReportError::io(file.path(), e))?;
        file.persist(&self.path)
            .map_err(|e| ReportError::io(&self.path, e.error))?;

        debug!("Stored baseline record at {}", self.path.display());
        Ok(())
    }
}

/// Baseline held in memory, for tests and single-process pipelines.
#[derive(Debug)]
pub struct InMemoryBaselineStore<R> {
    record: RefCell<Option<R>>,
}

impl<R> Default for InMemoryBaselineStore<R> {
    fn default() -> Self {
        Self {
            record: RefCell::new(None),
        }
    }
}

impl<R: Clone> InMemoryBaselineStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: R) -> Self {
        Self {
            record: RefCell::new(Some(record)),
        }
    }
}

impl<R: BaselineRecord> BaselineStore<R> for InMemoryBaselineStore<R> {
    fn load(&self) -> ReportResult<Option<R>> {
        Ok(self.record.borrow().clone())
    }

    fn store(&self, record: &R) -> ReportResult<()> {
        *self.record.borrow_mut() = Some(record.clone());
        Ok(())
    }
}

impl<R: BaselineRecord, S: BaselineStore<R>> BaselineStore<R> for &S {
    fn load(&self) -> ReportResult<Option<R>> {
        (**self).load()
    }

    fn store(&self, record: &R) -> ReportResult<()> {
        (**self).store(record)
    }

    fn load_throughput(&self) -> ReportResult<Option<f64>> {
        (**self).load_throughput()
    }
}
