//! Indexed documents.
//!
//! A document is the flattened, searchable form of one metadata record. Every
//! queryable field keeps two representations: the extracted values used for
//! matching, and a [`SortValues`] entry holding one pre-computed key per sort
//! type, because sorting `9` and `10` as strings and as numbers gives
//! different orders.

use std::collections::BTreeMap;

use geocat_model::Standard;
use serde::{Deserialize, Serialize};

use super::spatial::Envelope;

/// A value extracted and normalised for the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum IndexValue {
    /// Text, kept in its original case.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Date in canonical `yyyyMMddHHmmss` form.
    Date(String),
    /// Boolean flag.
    Boolean(bool),
}

impl IndexValue {
    /// Creates a text value.
    pub fn text(s: impl Into<String>) -> Self {
        IndexValue::Text(s.into())
    }

    /// Returns the text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            IndexValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number, parsing text values that hold one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            IndexValue::Number(n) => Some(*n),
            IndexValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Returns the canonical date if this is a date value.
    pub fn as_date(&self) -> Option<&str> {
        match self {
            IndexValue::Date(d) => Some(d),
            _ => None,
        }
    }

    /// The lower-cased lexical form used for text matching and text sorting.
    pub fn lexical(&self) -> String {
        match self {
            IndexValue::Text(s) => s.to_lowercase(),
            IndexValue::Number(n) => n.to_string(),
            IndexValue::Date(d) => d.clone(),
            IndexValue::Boolean(b) => b.to_string(),
        }
    }
}

/// Pre-computed sort keys of one field.
///
/// Which key is used is chosen by the caller at query time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortValues {
    /// Lower-cased lexical key.
    pub text: Option<String>,
    /// Numeric key.
    pub number: Option<f64>,
    /// Canonical date key.
    pub date: Option<String>,
}

impl SortValues {
    /// Derives the sort keys from a field's values; the first value that
    /// supports a representation provides it.
    pub fn from_values(values: &[IndexValue]) -> Self {
        SortValues {
            text: values.first().map(IndexValue::lexical),
            number: values.iter().find_map(IndexValue::as_number),
            date: values.iter().find_map(|v| v.as_date().map(str::to_string)),
        }
    }
}

/// The searchable representation of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedDocument {
    /// Identifier of the source record.
    pub identifier: String,
    /// Standard of the source record.
    pub standard: Standard,
    /// Extracted values per queryable field.
    pub fields: BTreeMap<String, Vec<IndexValue>>,
    /// Sort keys per sortable field.
    pub sort_keys: BTreeMap<String, SortValues>,
    /// Geographic extents of the record.
    pub geometry: Vec<Envelope>,
}

impl IndexedDocument {
    /// Creates an empty document.
    pub fn new(identifier: impl Into<String>, standard: Standard) -> Self {
        Self {
            identifier: identifier.into(),
            standard,
            fields: BTreeMap::new(),
            sort_keys: BTreeMap::new(),
            geometry: Vec::new(),
        }
    }

    /// Values of a field; empty when the record had none.
    pub fn values(&self, field: &str) -> &[IndexValue] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the field has at least one value.
    pub fn has_field(&self, field: &str) -> bool {
        !self.values(field).is_empty()
    }

    /// Sort keys of a field, if it is sortable and had a value.
    pub fn sort_values(&self, field: &str) -> Option<&SortValues> {
        self.sort_keys.get(field)
    }

    /// Deterministic JSON form of the document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
