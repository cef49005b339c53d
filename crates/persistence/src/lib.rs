//! Indexing and search layer of the geocat metadata catalogue.
//!
//! Metadata records in several standards (ISO 19139, Dublin Core, ebRIM)
//! are reduced to a common set of queryable fields, indexed, and searched
//! with textual constraints plus spatial and temporal filters.
//!
//! # Architecture
//!
//! - [`types`] - indexed documents, structured queries, sort keys and pages
//! - [`search`] - queryable registry, path evaluation, indexing and query translation
//! - [`core`] - the record storage trait and the [`Catalogue`] facade
//! - [`backends`] - in-memory storage and on-disk record loading
//! - [`error`] - error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use geocat_model::{JsonRecord, Standard};
//! use geocat_persistence::backends::MemoryRecordStorage;
//! use geocat_persistence::search::QueryableRegistry;
//! use geocat_persistence::{Catalogue, Pagination};
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let catalogue = Catalogue::new(
//!     Arc::new(MemoryRecordStorage::new()),
//!     Arc::new(QueryableRegistry::builtin().unwrap()),
//! );
//!
//! let record = JsonRecord::new(
//!     "dc-1",
//!     Standard::DublinCore,
//!     json!({ "identifier": "dc-1", "title": "Ocean colour", "subject": "ocean" }),
//! );
//! catalogue.put(Arc::new(record)).await.unwrap();
//! catalogue.refresh();
//!
//! let page = catalogue
//!     .search("Subject:ocean", Some("Title:asc"), Pagination::default())
//!     .unwrap();
//! assert_eq!(page.identifiers, vec!["dc-1"]);
//! # });
//! ```
//!
//! # Visibility
//!
//! Writes are staged and become visible to searches only after
//! [`Catalogue::refresh`]. A searcher obtained before a refresh keeps its view.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{StorageError, StorageResult};
pub use types::{IndexedDocument, Pagination, SearchPage, SortKey, StructuredQuery};

pub use core::{Catalogue, RecordStorage, SharedRecord, StoreOutcome};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
