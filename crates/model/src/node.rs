//! Capability-based traversal over metadata object graphs.
//!
//! A metadata record is a deep, possibly cyclic graph of typed objects. Rather
//! than reflecting over concrete classes, the indexing engine asks each node
//! for a property by name and receives a [`PropertyValue`]. Implementations
//! decide how names map onto their own storage.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A terminal value reachable inside a metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Primitive {
    /// Free text, codes and anything without a more specific type.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating point number.
    Decimal(f64),
    /// Boolean flag.
    Boolean(bool),
    /// Calendar date without time.
    Date(NaiveDate),
    /// Date and time with offset.
    DateTime(DateTime<FixedOffset>),
}

impl Primitive {
    /// Creates a text primitive.
    pub fn text(s: impl Into<String>) -> Self {
        Primitive::Text(s.into())
    }

    /// Returns the text content if this is a text primitive.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Primitive::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a numeric view of the value when one exists.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Primitive::Integer(i) => Some(*i as f64),
            Primitive::Decimal(d) => Some(*d),
            Primitive::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns true for text primitives that hold only whitespace.
    pub fn is_blank(&self) -> bool {
        matches!(self, Primitive::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Text(s) => write!(f, "{}", s),
            Primitive::Integer(i) => write!(f, "{}", i),
            Primitive::Decimal(d) => write!(f, "{}", d),
            Primitive::Boolean(b) => write!(f, "{}", b),
            Primitive::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Primitive::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

/// The value of a named property on a [`MetadataNode`].
pub enum PropertyValue<'a> {
    /// A terminal value.
    Primitive(Primitive),
    /// A nested complex object.
    Node(&'a dyn MetadataNode),
    /// A repeated property; elements keep document order.
    Collection(Vec<PropertyValue<'a>>),
}

impl<'a> PropertyValue<'a> {
    /// Flattens nested collections into their elements, in order.
    ///
    /// A single value yields itself.
    pub fn into_elements(self) -> Vec<PropertyValue<'a>> {
        match self {
            PropertyValue::Collection(items) => items
                .into_iter()
                .flat_map(PropertyValue::into_elements)
                .collect(),
            other => vec![other],
        }
    }

    /// Returns the standard externalized string form of this value.
    ///
    /// Primitives use their display form, nodes their own external form and
    /// collections the form of their first element that has one.
    pub fn string_form(&self) -> Option<String> {
        match self {
            PropertyValue::Primitive(p) => Some(p.to_string()),
            PropertyValue::Node(node) => node.external_form(),
            PropertyValue::Collection(items) => items.iter().find_map(|i| i.string_form()),
        }
    }
}

impl fmt::Debug for PropertyValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Primitive(p) => f.debug_tuple("Primitive").field(p).finish(),
            PropertyValue::Node(n) => f.debug_tuple("Node").field(&n.type_name()).finish(),
            PropertyValue::Collection(items) => f.debug_tuple("Collection").field(items).finish(),
        }
    }
}

/// A node in a metadata object graph.
///
/// Implementations must be side-effect free: traversal never mutates the
/// record, and asking for a property the node does not have returns `None`
/// rather than failing.
pub trait MetadataNode: fmt::Debug + Send + Sync {
    /// The node's type name (e.g. `MD_DataIdentification`, `object`).
    fn type_name(&self) -> &str;

    /// Looks up a property by name.
    fn property(&self, name: &str) -> Option<PropertyValue<'_>>;

    /// Names of all properties present on this node, in document order.
    fn property_names(&self) -> Vec<&str>;

    /// The standard externalized string form of a complex node.
    ///
    /// Used when a path terminates on a complex object, e.g. a code list
    /// element whose meaningful value is its text or `codeListValue`.
    fn external_form(&self) -> Option<String>;
}
