//! In-memory document store with refresh semantics.
//!
//! Writes go to a pending map behind a single writer lock. Readers only ever
//! see a published [`IndexSnapshot`], an immutable map swapped in atomically by
//! [`DocumentStore::refresh`]. A document is therefore visible either in its
//! old or its new form, never partially, and a reader holding a snapshot keeps
//! a stable view while writers continue.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::types::IndexedDocument;

/// An immutable, point-in-time view of the index.
#[derive(Debug, Default)]
pub struct IndexSnapshot {
    documents: BTreeMap<String, Arc<IndexedDocument>>,
    generation: u64,
}

impl IndexSnapshot {
    /// Looks up a document.
    pub fn get(&self, identifier: &str) -> Option<&Arc<IndexedDocument>> {
        self.documents.get(identifier)
    }

    /// Returns true if the document is visible in this snapshot.
    pub fn contains(&self, identifier: &str) -> bool {
        self.documents.contains_key(identifier)
    }

    /// Documents in ascending identifier order.
    pub fn documents(&self) -> impl Iterator<Item = &Arc<IndexedDocument>> {
        self.documents.values()
    }

    /// Identifiers in ascending order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if the snapshot holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// How many refreshes produced this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Pending writes plus the published snapshot.
#[derive(Debug)]
pub struct DocumentStore {
    pending: Mutex<Pending>,
    published: ArcSwap<IndexSnapshot>,
}

#[derive(Debug, Default)]
struct Pending {
    documents: BTreeMap<String, Arc<IndexedDocument>>,
    dirty: bool,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Pending::default()),
            published: ArcSwap::from_pointee(IndexSnapshot::default()),
        }
    }

    /// Stages a document, replacing any previous one with the same identifier.
    pub fn put(&self, document: IndexedDocument) {
        let mut pending = self.pending.lock();
        pending
            .documents
            .insert(document.identifier.clone(), Arc::new(document));
        pending.dirty = true;
    }

    /// Stages a deletion. Returns true if the document existed.
    pub fn delete(&self, identifier: &str) -> bool {
        let mut pending = self.pending.lock();
        let removed = pending.documents.remove(identifier).is_some();
        pending.dirty |= removed;
        removed
    }

    /// Returns the staged document, which may not be visible yet.
    pub fn pending(&self, identifier: &str) -> Option<Arc<IndexedDocument>> {
        self.pending.lock().documents.get(identifier).cloned()
    }

    /// Identifiers of all staged documents, ascending.
    pub fn pending_identifiers(&self) -> Vec<String> {
        self.pending.lock().documents.keys().cloned().collect()
    }

    /// Publishes all staged writes. Returns the new generation.
    pub fn refresh(&self) -> u64 {
        let mut pending = self.pending.lock();
        let current = self.published.load();
        if !pending.dirty {
            return current.generation;
        }

        let snapshot = IndexSnapshot {
            documents: pending.documents.clone(),
            generation: current.generation + 1,
        };
        let generation = snapshot.generation;
        self.published.store(Arc::new(snapshot));
        pending.dirty = false;
        generation
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.published.load_full()
    }
}
