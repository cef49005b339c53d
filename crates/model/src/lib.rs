//! geocat metadata object model.
//!
//! The indexing engine never looks at concrete metadata classes. Every record
//! is reached through the [`MetadataNode`] traversal trait: a node exposes
//! named, possibly repeated properties, and each property is a primitive, a
//! nested node or a collection of either.
//!
//! Two implementations ship with the crate:
//!
//! - [`serde_json::Value`] implements [`MetadataNode`] directly, so JSON
//!   documents can be indexed as-is through [`JsonRecord`].
//! - [`XmlElement`] is an owned element tree built with `roxmltree`, used for
//!   records harvested from remote catalogues through [`XmlRecord`].
//!
//! # Example
//!
//! ```
//! use geocat_model::{JsonRecord, MetadataNode, MetadataRecord, PropertyValue, Standard};
//! use serde_json::json;
//!
//! let record = JsonRecord::new(
//!     "rec-1",
//!     Standard::DublinCore,
//!     json!({"title": "Sea surface temperature", "subject": ["ocean", "sst"]}),
//! );
//!
//! assert_eq!(record.identifier(), "rec-1");
//! match record.root().property("subject") {
//!     Some(PropertyValue::Collection(items)) => assert_eq!(items.len(), 2),
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod json;
pub mod node;
pub mod record;
pub mod xml;

pub use error::{ModelError, ModelResult};
pub use json::JsonRecord;
pub use node::{MetadataNode, Primitive, PropertyValue};
pub use record::{MetadataRecord, Standard};
pub use xml::{XmlElement, XmlRecord, detect_standard};
