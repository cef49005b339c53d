//! Record storage trait.
//!
//! Storage owns the authoritative copy of every metadata record; the search
//! index is derived from it and can be rebuilt at any time with
//! [`reindex_all`](crate::search::reindex_all).

use std::sync::Arc;

use async_trait::async_trait;
use geocat_model::MetadataRecord;
use serde::{Deserialize, Serialize};

use crate::error::StorageResult;

/// A record shared between storage, the indexer and callers.
pub type SharedRecord = Arc<dyn MetadataRecord>;

/// Whether a store created or replaced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreOutcome {
    /// No record with that identifier existed.
    Inserted,
    /// An existing record was replaced.
    Updated,
}

/// Persistent storage for metadata records, keyed by identifier.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use geocat_model::{JsonRecord, Standard};
/// use geocat_persistence::backends::MemoryRecordStorage;
/// use geocat_persistence::core::{RecordStorage, StoreOutcome};
///
/// # tokio_test_block(async {
/// let storage = MemoryRecordStorage::new();
/// let record = JsonRecord::new("dc-1", Standard::DublinCore, serde_json::json!({"title": "A"}));
/// let outcome = storage.store(Arc::new(record)).await.unwrap();
/// assert_eq!(outcome, StoreOutcome::Inserted);
/// assert!(storage.exists("dc-1").await.unwrap());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[async_trait]
pub trait RecordStorage: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Reads a record by identifier.
    async fn get(&self, identifier: &str) -> StorageResult<Option<SharedRecord>>;

    /// Returns true if a record exists.
    async fn exists(&self, identifier: &str) -> StorageResult<bool> {
        Ok(self.get(identifier).await?.is_some())
    }

    /// Creates or replaces a record.
    async fn store(&self, record: SharedRecord) -> StorageResult<StoreOutcome>;

    /// Deletes a record. Returns true if it existed.
    async fn delete(&self, identifier: &str) -> StorageResult<bool>;

    /// All identifiers, ascending.
    async fn identifiers(&self) -> StorageResult<Vec<String>>;

    /// Number of stored records.
    async fn count(&self) -> StorageResult<usize> {
        Ok(self.identifiers().await?.len())
    }
}
