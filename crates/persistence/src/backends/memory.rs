//! In-memory record storage.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{RecordStorage, SharedRecord, StoreOutcome};
use crate::error::{ResourceError, StorageResult};

/// Record storage held in process memory.
///
/// Suitable for tests, the command line tool and harvests whose results are
/// only needed for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryRecordStorage {
    records: RwLock<BTreeMap<String, SharedRecord>>,
}

impl MemoryRecordStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStorage for MemoryRecordStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, identifier: &str) -> StorageResult<Option<SharedRecord>> {
        Ok(self.records.read().get(identifier.trim()).cloned())
    }

    async fn store(&self, record: SharedRecord) -> StorageResult<StoreOutcome> {
        let identifier = record.identifier().trim().to_string();
        if identifier.is_empty() {
            return Err(ResourceError::Unreadable {
                id: String::new(),
                message: "record has no identifier".to_string(),
            }
            .into());
        }

        let previous = self.records.write().insert(identifier, record);
        Ok(match previous {
            Some(_) => StoreOutcome::Updated,
            None => StoreOutcome::Inserted,
        })
    }

    async fn delete(&self, identifier: &str) -> StorageResult<bool> {
        Ok(self.records.write().remove(identifier.trim()).is_some())
    }

    async fn identifiers(&self) -> StorageResult<Vec<String>> {
        Ok(self.records.read().keys().cloned().collect())
    }

    async fn count(&self) -> StorageResult<usize> {
        Ok(self.records.read().len())
    }
}
