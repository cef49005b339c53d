//! Catalogue facade.
//!
//! Ties record storage to the search index: records are validated by building
//! their document first, then stored, then staged in the index. Searches take
//! textual constraints and go through the [`QueryTranslator`].
//!
//! Writes hold one catalogue-wide lock from the storage write through the
//! index commit, so storage and index always agree on the last writer of an
//! identifier.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::StorageResult;
use crate::search::{DocumentIndexer, QueryTranslator, QueryableRegistry, ReindexReport, reindex_all};
use crate::types::{Pagination, SearchPage, SortKey, StructuredQuery};

use super::storage::{RecordStorage, SharedRecord, StoreOutcome};

/// Storage plus index behind one API.
pub struct Catalogue {
    storage: Arc<dyn RecordStorage>,
    indexer: DocumentIndexer,
    translator: QueryTranslator,
    writer: Mutex<()>,
}

impl Catalogue {
    /// Creates a catalogue over a storage backend.
    pub fn new(storage: Arc<dyn RecordStorage>, registry: Arc<QueryableRegistry>) -> Self {
        Self {
            storage,
            indexer: DocumentIndexer::new(Arc::clone(&registry)),
            translator: QueryTranslator::new(registry),
            writer: Mutex::new(()),
        }
    }

    /// The storage backend.
    pub fn storage(&self) -> &Arc<dyn RecordStorage> {
        &self.storage
    }

    /// The document indexer.
    pub fn indexer(&self) -> &DocumentIndexer {
        &self.indexer
    }

    /// The query translator.
    pub fn translator(&self) -> &QueryTranslator {
        &self.translator
    }

    /// Stores and indexes a record. Visible to searches after [`refresh`](Self::refresh).
    ///
    /// A record that cannot be indexed is not stored.
    pub async fn put(&self, record: SharedRecord) -> StorageResult<StoreOutcome> {
        let document = self.indexer.build_document(record.as_ref())?;
        let _writer = self.writer.lock().await;
        let outcome = self.storage.store(record).await?;
        self.indexer.commit(document);
        Ok(outcome)
    }

    /// Deletes a record from storage and the index.
    pub async fn delete(&self, identifier: &str) -> StorageResult<bool> {
        let identifier = identifier.trim();
        let _writer = self.writer.lock().await;
        let stored = self.storage.delete(identifier).await?;
        let indexed = self.indexer.remove(identifier);
        Ok(stored || indexed)
    }

    /// Reads a stored record.
    pub async fn get(&self, identifier: &str) -> StorageResult<Option<SharedRecord>> {
        self.storage.get(identifier).await
    }

    /// Publishes staged index writes.
    pub fn refresh(&self) -> u64 {
        self.indexer.refresh()
    }

    /// Rebuilds the index from storage.
    pub async fn reindex(&self) -> StorageResult<ReindexReport> {
        let _writer = self.writer.lock().await;
        reindex_all(&self.indexer, self.storage.as_ref()).await
    }

    /// Translates a constraint and optional sort specification.
    pub fn prepare(
        &self,
        constraint: &str,
        sort: Option<&str>,
    ) -> StorageResult<(StructuredQuery, Option<SortKey>)> {
        let query = self.translator.parse(constraint)?;
        let sort = sort.map(|s| self.translator.parse_sort(s)).transpose()?;
        Ok((query, sort))
    }

    /// Runs a textual search and returns one page.
    pub fn search(
        &self,
        constraint: &str,
        sort: Option<&str>,
        pagination: Pagination,
    ) -> StorageResult<SearchPage> {
        let (query, sort) = self.prepare(constraint, sort)?;
        Ok(self.indexer.search_page(&query, sort.as_ref(), pagination))
    }
}

impl std::fmt::Debug for Catalogue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalogue")
            .field("backend", &self.storage.backend_name())
            .field("indexer", &self.indexer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use geocat_model::{JsonRecord, Standard};
    use serde_json::json;

    use super::*;
    use crate::backends::MemoryRecordStorage;
    use crate::error::{SearchError, StorageError};

    fn catalogue() -> Catalogue {
        Catalogue::new(
            Arc::new(MemoryRecordStorage::new()),
            Arc::new(QueryableRegistry::builtin().unwrap()),
        )
    }

    fn dc(id: &str, title: &str) -> SharedRecord {
        Arc::new(JsonRecord::new(
            id,
            Standard::DublinCore,
            json!({ "identifier": id, "title": title }),
        ))
    }

    #[tokio::test]
    async fn test_put_search_delete() {
        let catalogue = catalogue();
        assert_eq!(catalogue.put(dc("a", "Rivers")).await.unwrap(), StoreOutcome::Inserted);
        assert_eq!(catalogue.put(dc("b", "Lakes")).await.unwrap(), StoreOutcome::Inserted);
        catalogue.refresh();

        let page = catalogue
            .search("Title:rivers", None, Pagination::default())
            .unwrap();
        assert_eq!(page.identifiers, vec!["a"]);

        assert!(catalogue.delete("a").await.unwrap());
        catalogue.refresh();
        let page = catalogue.search("", Some("Title"), Pagination::default()).unwrap();
        assert_eq!(page.identifiers, vec!["b"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_puts_keep_storage_and_index_in_step() {
        let catalogue = Arc::new(catalogue());
        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let catalogue = Arc::clone(&catalogue);
                tokio::spawn(async move {
                    catalogue
                        .put(dc("shared", &format!("Version {}", i)))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }
        catalogue.refresh();

        let stored = catalogue.get("shared").await.unwrap().unwrap();
        let expected = catalogue.indexer().build_document(stored.as_ref()).unwrap();
        let indexed = catalogue.indexer().document("shared").unwrap();
        assert_eq!(*indexed, expected);
    }

    #[tokio::test]
    async fn test_unknown_field_surfaces() {
        let catalogue = catalogue();
        let err = catalogue.search("Colour:red", None, Pagination::default()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::Search(SearchError::NotQueryable { .. })
        ));
    }

    #[tokio::test]
    async fn test_reindex_restores_index() {
        let catalogue = catalogue();
        catalogue.storage().store(dc("x", "Only in storage")).await.unwrap();
        assert!(!catalogue.indexer().exists("x"));

        let report = catalogue.reindex().await.unwrap();
        assert_eq!(report.indexed, 1);
        assert!(report.is_clean());
        assert!(catalogue.indexer().exists("x"));
    }
}
