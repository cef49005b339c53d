//! JSON-backed metadata records.
//!
//! [`serde_json::Value`] implements [`MetadataNode`]: objects are complex
//! nodes, arrays are repeated properties and scalars are primitives. A
//! `@type` member, when present, names the node's type.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;
use crate::node::{MetadataNode, Primitive, PropertyValue};
use crate::record::{MetadataRecord, Standard};

/// Object members tried, in order, for the external form of a JSON object.
const EXTERNAL_FORM_KEYS: [&str; 4] = ["value", "codeListValue", "#text", "href"];

fn to_property(value: &Value) -> Option<PropertyValue<'_>> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(PropertyValue::Primitive(Primitive::Boolean(*b))),
        Value::Number(n) => {
            let primitive = match n.as_i64() {
                Some(i) => Primitive::Integer(i),
                None => Primitive::Decimal(n.as_f64()?),
            };
            Some(PropertyValue::Primitive(primitive))
        }
        Value::String(s) => Some(PropertyValue::Primitive(Primitive::Text(s.clone()))),
        Value::Array(items) => Some(PropertyValue::Collection(
            items.iter().filter_map(to_property).collect(),
        )),
        Value::Object(_) => Some(PropertyValue::Node(value)),
    }
}

impl MetadataNode for Value {
    fn type_name(&self) -> &str {
        match self {
            Value::Object(obj) => obj.get("@type").and_then(Value::as_str).unwrap_or("object"),
            Value::Array(_) => "array",
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
        }
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        self.as_object()
            .and_then(|obj| obj.get(name))
            .and_then(to_property)
    }

    fn property_names(&self) -> Vec<&str> {
        match self {
            Value::Object(obj) => obj
                .keys()
                .filter(|k| !k.starts_with('@'))
                .map(String::as_str)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn external_form(&self) -> Option<String> {
        match self {
            Value::Object(obj) => EXTERNAL_FORM_KEYS.iter().find_map(|key| match obj.get(*key) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                Some(Value::Bool(b)) => Some(b.to_string()),
                _ => None,
            }),
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// A metadata record whose object graph is a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRecord {
    identifier: String,
    standard: Standard,
    metadata: Value,
}

impl JsonRecord {
    /// Creates a record from its parts.
    pub fn new(identifier: impl Into<String>, standard: Standard, metadata: Value) -> Self {
        Self {
            identifier: identifier.into(),
            standard,
            metadata,
        }
    }

    /// Builds a record from an envelope of the form
    /// `{"identifier": .., "standard": .., "metadata": {..}}`.
    pub fn from_json(envelope: Value) -> Result<Self, ModelError> {
        let record: JsonRecord =
            serde_json::from_value(envelope).map_err(|e| ModelError::InvalidRecord {
                message: e.to_string(),
            })?;
        if record.identifier.trim().is_empty() {
            return Err(ModelError::InvalidRecord {
                message: "record identifier is empty".to_string(),
            });
        }
        if !record.metadata.is_object() {
            return Err(ModelError::InvalidRecord {
                message: format!("metadata of '{}' must be a JSON object", record.identifier),
            });
        }
        Ok(record)
    }

    /// The record content.
    pub fn metadata(&self) -> &Value {
        &self.metadata
    }
}

impl MetadataRecord for JsonRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn standard(&self) -> Standard {
        self.standard
    }

    fn root(&self) -> &dyn MetadataNode {
        &self.metadata
    }
}
