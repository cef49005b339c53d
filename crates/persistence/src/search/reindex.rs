//! Index rebuild.
//!
//! Re-extracts every stored record with the current registry. Used after the
//! registry changes (a new overlay file) or to repair an index that drifted
//! from storage. Records that fail are reported and skipped; documents whose
//! record no longer exists are removed. The result is published with a single
//! refresh at the end.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::RecordStorage;
use crate::error::StorageResult;

use super::errors::ReindexError;
use super::indexer::DocumentIndexer;

/// Outcome of a rebuild.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReindexReport {
    /// Records indexed.
    pub indexed: usize,
    /// Stale documents removed.
    pub removed: usize,
    /// Records that could not be indexed.
    pub skipped: Vec<ReindexError>,
    /// Snapshot generation after the final refresh.
    pub generation: u64,
}

impl ReindexReport {
    /// Returns true if every record was indexed.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Rebuilds the index from storage.
pub async fn reindex_all(
    indexer: &DocumentIndexer,
    storage: &dyn RecordStorage,
) -> StorageResult<ReindexReport> {
    let mut report = ReindexReport::default();
    let identifiers = storage.identifiers().await?;
    tracing::info!(
        backend = storage.backend_name(),
        records = identifiers.len(),
        "Reindex started"
    );

    for identifier in &identifiers {
        match storage.get(identifier).await? {
            Some(record) => match indexer.index(record.as_ref()) {
                Ok(()) => report.indexed += 1,
                Err(e) => report.skipped.push(ReindexError::ProcessingFailed {
                    identifier: identifier.clone(),
                    error: e.to_string(),
                }),
            },
            None => report.skipped.push(ReindexError::Vanished {
                identifier: identifier.clone(),
            }),
        }
    }

    let live: BTreeSet<&str> = identifiers.iter().map(String::as_str).collect();
    for stale in indexer
        .staged_identifiers()
        .into_iter()
        .filter(|id| !live.contains(id.as_str()))
    {
        if indexer.remove(&stale) {
            report.removed += 1;
        }
    }

    report.generation = indexer.refresh();
    tracing::info!(
        indexed = report.indexed,
        removed = report.removed,
        skipped = report.skipped.len(),
        "Reindex finished"
    );
    Ok(report)
}
