//! Error types for the persistence layer.
//!
//! Record and search failures are grouped under [`StorageError`].
//! Extraction misses (a queryable field with no value in a record) are not
//! errors at all; they simply leave the field out of the document.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::search::errors::{ExtractionError, RegistryError};

/// The primary error type for all storage and search operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Search and query translation errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// A record could not be turned into a document
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested record was not found.
    #[error("record not found: {id}")]
    NotFound { id: String },

    /// The record exists but cannot be read.
    #[error("record {id} is unreadable: {message}")]
    Unreadable { id: String, message: String },
}

/// Errors related to search operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The field has no path mapping for any supported standard.
    #[error("field not queryable: {field}")]
    NotQueryable { field: String },

    /// The field is queryable but carries no sort representation.
    #[error("field not sortable: {field}")]
    NotSortable { field: String },

    /// The constraint cannot be parsed or a bound cannot be coerced.
    #[error("malformed query near '{fragment}': {message}")]
    MalformedQuery { fragment: String, message: String },

    /// Paging parameters are out of range.
    #[error("invalid pagination: {message}")]
    InvalidPagination { message: String },
}

impl SearchError {
    /// Creates a malformed query error for the given fragment.
    pub fn malformed(fragment: impl Into<String>, message: impl Into<String>) -> Self {
        SearchError::MalformedQuery {
            fragment: fragment.into(),
            message: message.into(),
        }
    }
}

impl From<RegistryError> for SearchError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotQueryable { field } => SearchError::NotQueryable { field },
            other => SearchError::malformed("", other.to_string()),
        }
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
