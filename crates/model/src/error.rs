//! Error types for the metadata object model.

use thiserror::Error;

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building records from external representations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The input is not well-formed XML.
    #[error("invalid XML: {message}")]
    InvalidXml {
        /// Parser message.
        message: String,
    },

    /// The input is structurally not a metadata record.
    #[error("invalid record: {message}")]
    InvalidRecord {
        /// What was wrong.
        message: String,
    },

    /// The record standard could not be recognised.
    #[error("unknown metadata standard: {name}")]
    UnknownStandard {
        /// The offending name or root element.
        name: String,
    },
}
