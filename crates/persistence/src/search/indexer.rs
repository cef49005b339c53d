//! Document indexer.
//!
//! Turns metadata records into [`IndexedDocument`]s using the registry's
//! paths for the record's standard, and commits them to the
//! [`DocumentStore`]. Every sortable field also gets its [`SortValues`], so
//! the caller can sort lexically, numerically or chronologically on demand.

use std::sync::Arc;

use geocat_model::MetadataRecord;

use crate::types::{
    Envelope, IndexValue, IndexedDocument, Pagination, SearchPage, SortKey, SortValues,
    StructuredQuery,
};

use super::errors::ExtractionError;
use super::executor::QueryExecutor;
use super::extractor::PathEvaluator;
use super::registry::{ANY_TEXT, FieldType, QueryableRegistry};
use super::store::{DocumentStore, IndexSnapshot};

const WEST: &str = "WestBoundLongitude";
const EAST: &str = "EastBoundLongitude";
const SOUTH: &str = "SouthBoundLatitude";
const NORTH: &str = "NorthBoundLatitude";

/// Builds, stores and publishes indexed documents.
#[derive(Debug)]
pub struct DocumentIndexer {
    registry: Arc<QueryableRegistry>,
    evaluator: PathEvaluator,
    store: DocumentStore,
}

impl DocumentIndexer {
    /// Creates an indexer with an empty store.
    pub fn new(registry: Arc<QueryableRegistry>) -> Self {
        Self {
            registry,
            evaluator: PathEvaluator::new(),
            store: DocumentStore::new(),
        }
    }

    /// The registry in use.
    pub fn registry(&self) -> &Arc<QueryableRegistry> {
        &self.registry
    }

    /// Builds the document for a record without storing it.
    pub fn build_document(&self, record: &dyn MetadataRecord) -> Result<IndexedDocument, ExtractionError> {
        let identifier = record.identifier().trim();
        if identifier.is_empty() {
            return Err(ExtractionError::InvalidRecord {
                identifier: String::new(),
                message: "record has no identifier".to_string(),
            });
        }

        let mut doc = IndexedDocument::new(identifier, record.standard());
        let mut any_text = Vec::new();

        for field in self.registry.fields().filter(|f| !f.is_synthetic()) {
            let values = self.evaluator.extract_field(record, field);
            if values.is_empty() {
                continue;
            }
            if field.field_type() == FieldType::Text {
                any_text.extend(values.iter().cloned());
            }
            if field.is_sortable() {
                doc.sort_keys
                    .insert(field.name().to_string(), SortValues::from_values(&values));
            }
            doc.fields.insert(field.name().to_string(), values);
        }

        if !any_text.is_empty() {
            doc.fields.insert(ANY_TEXT.to_string(), any_text);
        }
        doc.geometry = geometry(&doc);

        Ok(doc)
    }

    /// Indexes a record, replacing any document with the same identifier.
    ///
    /// The new document becomes visible at the next [`refresh`](Self::refresh).
    pub fn index(&self, record: &dyn MetadataRecord) -> Result<(), ExtractionError> {
        let doc = match self.build_document(record) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping record that cannot be indexed");
                return Err(e);
            }
        };
        self.commit(doc);
        Ok(())
    }

    /// Stages an already built document.
    pub fn commit(&self, doc: IndexedDocument) {
        tracing::debug!(
            identifier = %doc.identifier,
            standard = %doc.standard,
            fields = doc.fields.len(),
            "Indexed record"
        );
        self.store.put(doc);
    }

    /// Removes a document. Returns true if one existed.
    pub fn remove(&self, identifier: &str) -> bool {
        let removed = self.store.delete(identifier);
        if removed {
            tracing::debug!(identifier = %identifier, "Removed document");
        }
        removed
    }

    /// Returns true if a document is visible to searches.
    pub fn exists(&self, identifier: &str) -> bool {
        self.store.snapshot().contains(identifier)
    }

    /// Publishes pending writes. Returns the snapshot generation.
    pub fn refresh(&self) -> u64 {
        let generation = self.store.refresh();
        tracing::trace!(generation, "Index refreshed");
        generation
    }

    /// A searcher bound to the currently published snapshot.
    ///
    /// Later writes and refreshes do not affect it.
    pub fn searcher(&self) -> Searcher {
        Searcher {
            snapshot: self.store.snapshot(),
        }
    }

    /// Searches the current snapshot.
    pub fn search(&self, query: &StructuredQuery, sort: Option<&SortKey>) -> Vec<String> {
        self.searcher().search(query, sort)
    }

    /// Searches the current snapshot and returns one page.
    pub fn search_page(
        &self,
        query: &StructuredQuery,
        sort: Option<&SortKey>,
        pagination: Pagination,
    ) -> SearchPage {
        self.searcher().search_page(query, sort, pagination)
    }

    /// The published document for an identifier.
    pub fn document(&self, identifier: &str) -> Option<Arc<IndexedDocument>> {
        self.store.snapshot().get(identifier).cloned()
    }

    /// The published document as deterministic JSON.
    pub fn dump(&self, identifier: &str) -> Result<Option<String>, ExtractionError> {
        self.document(identifier)
            .map(|doc| {
                doc.to_json().map_err(|e| ExtractionError::SerializationFailed {
                    identifier: identifier.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Identifiers of all published documents, ascending.
    pub fn identifiers(&self) -> Vec<String> {
        self.store
            .snapshot()
            .identifiers()
            .map(str::to_string)
            .collect()
    }

    /// Identifiers including writes not yet published, ascending.
    pub fn staged_identifiers(&self) -> Vec<String> {
        self.store.pending_identifiers()
    }
}

/// Zips the four bounding coordinates into envelopes, one per extent.
fn geometry(doc: &IndexedDocument) -> Vec<Envelope> {
    let numbers = |field: &str| -> Vec<f64> {
        doc.values(field)
            .iter()
            .filter_map(IndexValue::as_number)
            .collect()
    };
    let (west, east, south, north) = (numbers(WEST), numbers(EAST), numbers(SOUTH), numbers(NORTH));

    west.iter()
        .zip(&east)
        .zip(south.iter().zip(&north))
        .map(|((w, e), (s, n))| Envelope::new(*w, *s, *e, *n))
        .filter(Envelope::is_valid)
        .collect()
}

/// Read-only view over one published snapshot.
#[derive(Debug, Clone)]
pub struct Searcher {
    snapshot: Arc<IndexSnapshot>,
}

impl Searcher {
    /// Returns true if the document is visible to this searcher.
    pub fn exists(&self, identifier: &str) -> bool {
        self.snapshot.contains(identifier)
    }

    /// Number of visible documents.
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns true if nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    /// Snapshot generation this searcher reads.
    pub fn generation(&self) -> u64 {
        self.snapshot.generation()
    }

    /// Matching identifiers in result order.
    pub fn search(&self, query: &StructuredQuery, sort: Option<&SortKey>) -> Vec<String> {
        QueryExecutor::new(&self.snapshot).execute(query, sort)
    }

    /// One page of matching identifiers.
    pub fn search_page(
        &self,
        query: &StructuredQuery,
        sort: Option<&SortKey>,
        pagination: Pagination,
    ) -> SearchPage {
        SearchPage::slice(self.search(query, sort), pagination)
    }
}
