//! Loading records from files.
//!
//! `*.json` files hold a record envelope
//! (`{"identifier": .., "standard": .., "metadata": {..}}`) or an array of
//! them. `*.xml` files hold one metadata document whose standard and
//! identifier are detected from its content.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geocat_model::{JsonRecord, XmlElement};
use serde_json::Value;

use crate::core::SharedRecord;
use crate::error::{ResourceError, StorageError};
use crate::search::{QueryableRegistry, identify_xml};

/// Records read by [`RecordFileLoader::load_lenient`].
#[derive(Debug, Default)]
pub struct LoadedRecords {
    /// Records read successfully.
    pub records: Vec<SharedRecord>,
    /// Files that could not be read, with the reason.
    pub skipped: Vec<(PathBuf, StorageError)>,
}

/// Reads records from a file or every supported file in a directory.
pub struct RecordFileLoader<'a> {
    registry: &'a QueryableRegistry,
}

impl<'a> RecordFileLoader<'a> {
    /// Creates a loader; the registry locates XML identifiers.
    pub fn new(registry: &'a QueryableRegistry) -> Self {
        Self { registry }
    }

    /// Loads a file, or every `.json`/`.xml` file directly inside a directory
    /// in file name order.
    pub fn load(&self, path: &Path) -> Result<Vec<SharedRecord>, StorageError> {
        let mut records = Vec::new();
        for file in self.files(path)? {
            records.extend(self.load_file(&file)?);
        }
        tracing::debug!(path = %path.display(), records = records.len(), "Loaded record files");
        Ok(records)
    }

    /// Like [`load`](Self::load), but a file that cannot be read is skipped
    /// and reported instead of failing the whole load.
    pub fn load_lenient(&self, path: &Path) -> Result<LoadedRecords, StorageError> {
        let mut loaded = LoadedRecords::default();
        for file in self.files(path)? {
            match self.load_file(&file) {
                Ok(records) => loaded.records.extend(records),
                Err(e) => {
                    tracing::warn!(file = %file.display(), error = %e, "Skipping unreadable record file");
                    loaded.skipped.push((file, e));
                }
            }
        }
        Ok(loaded)
    }

    fn files(&self, path: &Path) -> Result<Vec<PathBuf>, StorageError> {
        if !path.is_dir() {
            return Ok(vec![path.to_path_buf()]);
        }
        let entries = std::fs::read_dir(path).map_err(|e| unreadable(path, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| matches!(extension(p).as_deref(), Some("json" | "xml")))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Loads one file.
    pub fn load_file(&self, path: &Path) -> Result<Vec<SharedRecord>, StorageError> {
        let content = std::fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
        match extension(path).as_deref() {
            Some("xml") => {
                let root = XmlElement::parse(&content).map_err(|e| unreadable(path, e))?;
                let record = identify_xml(self.registry, root)?;
                Ok(vec![Arc::new(record) as SharedRecord])
            }
            _ => {
                let json: Value = serde_json::from_str(&content).map_err(|e| unreadable(path, e))?;
                let envelopes = match json {
                    Value::Array(items) => items,
                    other => vec![other],
                };
                envelopes
                    .into_iter()
                    .map(|envelope| {
                        JsonRecord::from_json(envelope)
                            .map(|r| Arc::new(r) as SharedRecord)
                            .map_err(|e| unreadable(path, e))
                    })
                    .collect()
            }
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn unreadable(path: &Path, err: impl std::fmt::Display) -> StorageError {
    ResourceError::Unreadable {
        id: path.display().to_string(),
        message: err.to_string(),
    }
    .into()
}
