//! Queryable fields, path evaluation, indexing and query translation.
//!
//! - [`registry`] - queryable fields and their per-vocabulary paths
//! - [`loader`] - embedded and configured queryable definitions
//! - [`path`] - the path expression language
//! - [`extractor`] - evaluates path expressions over metadata records
//! - [`converters`] - typed index values from extracted primitives
//! - [`indexer`] - builds documents and publishes them on refresh
//! - [`translator`] - textual constraints into structured queries
//! - [`reindex`] - rebuilds the index from record storage
//!
//! # Record lifecycle
//!
//! ```text
//! record ──> PathEvaluator ──> IndexedDocument ──> DocumentStore (pending)
//!                                                       │ refresh()
//!                                                       v
//! constraint ──> QueryTranslator ──> StructuredQuery ──> IndexSnapshot
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use geocat_model::{JsonRecord, Standard};
//! use geocat_persistence::search::{DocumentIndexer, QueryTranslator, QueryableRegistry};
//! use serde_json::json;
//!
//! let registry = Arc::new(QueryableRegistry::builtin().unwrap());
//! let indexer = DocumentIndexer::new(Arc::clone(&registry));
//! let record = JsonRecord::new(
//!     "dc-1",
//!     Standard::DublinCore,
//!     json!({ "identifier": "dc-1", "title": "Sea surface temperature" }),
//! );
//! indexer.index(&record).unwrap();
//! indexer.refresh();
//!
//! let query = QueryTranslator::new(registry).parse(r#"Title:"surface temperature""#).unwrap();
//! assert_eq!(indexer.search(&query, None), vec!["dc-1"]);
//! ```

pub mod converters;
pub mod errors;
pub mod executor;
pub mod extractor;
pub mod indexer;
pub mod loader;
pub mod path;
pub mod query_parser;
pub mod registry;
pub mod reindex;
pub mod store;
pub mod translator;

pub use converters::{ValueConverter, canonical_date, canonical_date_end};
pub use errors::{ExtractionError, LoaderError, RegistryError, ReindexError};
pub use executor::QueryExecutor;
pub use extractor::{IDENTIFIER, PathEvaluator, identify_xml};
pub use indexer::{DocumentIndexer, Searcher};
pub use loader::QueryableLoader;
pub use path::PathExpression;
pub use query_parser::QueryParser;
pub use registry::{
    ANY_TEXT, FieldScope, FieldType, QueryableDefinition, QueryableField, QueryableRegistry,
    QueryableSource, Vocabulary,
};
pub use reindex::{ReindexReport, reindex_all};
pub use store::{DocumentStore, IndexSnapshot};
pub use translator::QueryTranslator;
