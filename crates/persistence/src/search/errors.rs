//! Search-specific error types.
//!
//! This module provides error types for queryable field operations:
//! - Loading embedded and configured queryable definitions
//! - Registry lookups
//! - Path expression syntax
//! - Value extraction
//! - Reindexing

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error during queryable definition loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoaderError {
    /// A definition is structurally invalid.
    InvalidDefinition {
        /// Description of what was invalid.
        message: String,
        /// Name of the problematic field, if known.
        field: Option<String>,
    },

    /// A path expression in a definition does not parse.
    InvalidExpression {
        /// The field the expression belongs to.
        field: String,
        /// The invalid expression.
        expression: String,
        /// Parser error message.
        error: String,
    },

    /// A field shared by every standard lacks paths for one of them.
    IncompleteMapping {
        /// The field name.
        field: String,
        /// The standard without paths.
        standard: String,
    },

    /// Two definitions of one field cannot be merged.
    Conflict(RegistryError),

    /// Failed to read the configuration file.
    ConfigLoadFailed {
        /// Path to the config file.
        path: String,
        /// Error message.
        message: String,
    },
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::InvalidDefinition { message, field } => {
                if let Some(field) = field {
                    write!(f, "Invalid queryable '{}': {}", field, message)
                } else {
                    write!(f, "Invalid queryable: {}", message)
                }
            }
            LoaderError::InvalidExpression {
                field,
                expression,
                error,
            } => {
                write!(
                    f,
                    "Invalid path expression '{}' for queryable '{}': {}",
                    expression, field, error
                )
            }
            LoaderError::IncompleteMapping { field, standard } => {
                write!(
                    f,
                    "Queryable '{}' is declared common but has no paths for {}",
                    field, standard
                )
            }
            LoaderError::Conflict(err) => write!(f, "{}", err),
            LoaderError::ConfigLoadFailed { path, message } => {
                write!(f, "Failed to load queryables from '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for LoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoaderError::Conflict(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistryError> for LoaderError {
    fn from(err: RegistryError) -> Self {
        LoaderError::Conflict(err)
    }
}

/// Error during registry lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryError {
    /// The field has no mapping in any vocabulary.
    NotQueryable {
        /// The requested field name.
        field: String,
    },

    /// Two definitions of the same field disagree.
    ConflictingDefinition {
        /// The field name.
        field: String,
        /// What differs.
        message: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotQueryable { field } => {
                write!(f, "Field '{}' is not queryable", field)
            }
            RegistryError::ConflictingDefinition { field, message } => {
                write!(f, "Conflicting definitions for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Error while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSyntaxError {
    /// The full expression.
    pub expression: String,
    /// Byte offset of the offending segment.
    pub position: usize,
    /// What went wrong.
    pub message: String,
}

impl fmt::Display for PathSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Path syntax error in '{}' at position {}: {}",
            self.expression, self.position, self.message
        )
    }
}

impl std::error::Error for PathSyntaxError {}

/// Error during value extraction.
///
/// Only records that cannot be read at all produce an error; missing values
/// are not errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractionError {
    /// The record cannot be indexed.
    InvalidRecord {
        /// Identifier of the record, possibly empty.
        identifier: String,
        /// Description of the problem.
        message: String,
    },

    /// Document serialisation failed.
    SerializationFailed {
        /// Identifier of the record.
        identifier: String,
        /// Serializer message.
        message: String,
    },
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::InvalidRecord {
                identifier,
                message,
            } => {
                write!(f, "Cannot index record '{}': {}", identifier, message)
            }
            ExtractionError::SerializationFailed {
                identifier,
                message,
            } => {
                write!(f, "Cannot serialise document '{}': {}", identifier, message)
            }
        }
    }
}

impl std::error::Error for ExtractionError {}

/// Error during reindex operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReindexError {
    /// Failed to process a record during reindex.
    ProcessingFailed {
        /// Record identifier.
        identifier: String,
        /// Error message.
        error: String,
    },

    /// The record vanished between listing and reading.
    Vanished {
        /// Record identifier.
        identifier: String,
    },
}

impl fmt::Display for ReindexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReindexError::ProcessingFailed { identifier, error } => {
                write!(f, "Failed to reindex '{}': {}", identifier, error)
            }
            ReindexError::Vanished { identifier } => {
                write!(f, "Record '{}' disappeared during reindex", identifier)
            }
        }
    }
}

impl std::error::Error for ReindexError {}
