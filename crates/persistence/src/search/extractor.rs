//! Path expression evaluation.
//!
//! Walks a record's object graph one segment at a time. Repeated properties
//! fan out: the rest of the path continues against every element, so one path
//! can yield several values. A missing property, an out-of-range ordinal, or
//! a path that runs into a primitive before its last segment simply yields
//! nothing for that branch. Evaluation never fails.

use geocat_model::{
    MetadataNode, MetadataRecord, Primitive, PropertyValue, XmlElement, XmlRecord,
    detect_standard,
};

use crate::types::IndexValue;

use super::converters::ValueConverter;
use super::errors::ExtractionError;
use super::path::{PathExpression, PathSegment, Step};
use super::registry::{QueryableField, QueryableRegistry};

/// Field holding the record identifier.
pub const IDENTIFIER: &str = "Identifier";

/// Evaluates path expressions against metadata records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathEvaluator;

impl PathEvaluator {
    /// Creates an evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Extracts raw primitives for every path, in path order.
    pub fn extract(&self, record: &dyn MetadataRecord, paths: &[&PathExpression]) -> Vec<Primitive> {
        paths
            .iter()
            .flat_map(|path| self.evaluate(record.root(), path))
            .collect()
    }

    /// Extracts the typed values of a field from a record.
    ///
    /// Single-valued fields keep the first value of the first path that
    /// produced one; later paths are fallbacks. Multi-valued fields keep
    /// every value from every path.
    pub fn extract_field(&self, record: &dyn MetadataRecord, field: &QueryableField) -> Vec<IndexValue> {
        let mut values = Vec::new();
        for path in field.paths_for(record.standard()) {
            let primitives = self.evaluate(record.root(), path);
            let mut converted = primitives
                .iter()
                .filter_map(|p| ValueConverter::convert(p, field.field_type()));

            if field.is_multi_valued() {
                values.extend(converted);
            } else if let Some(first) = converted.next() {
                values.push(first);
                break;
            }
        }
        values
    }

    /// Evaluates one path from a starting node.
    pub fn evaluate(&self, root: &dyn MetadataNode, path: &PathExpression) -> Vec<Primitive> {
        let mut results = Vec::new();
        walk(PropertyValue::Node(root), path.segments(), &mut results);
        results
    }
}

/// Wraps a parsed XML document as a record.
///
/// The standard comes from the root element and the identifier from the
/// registry's `Identifier` paths for that standard.
pub fn identify_xml(
    registry: &QueryableRegistry,
    root: XmlElement,
) -> Result<XmlRecord, ExtractionError> {
    let standard = detect_standard(&root).ok_or_else(|| ExtractionError::InvalidRecord {
        identifier: String::new(),
        message: format!("unrecognised root element '{}'", root.name()),
    })?;

    let paths = registry
        .paths_for(standard, IDENTIFIER)
        .map_err(|e| ExtractionError::InvalidRecord {
            identifier: String::new(),
            message: e.to_string(),
        })?;

    let evaluator = PathEvaluator::new();
    let identifier = paths
        .iter()
        .flat_map(|path| evaluator.evaluate(&root, path))
        .map(|value| value.to_string().trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or_else(|| ExtractionError::InvalidRecord {
            identifier: String::new(),
            message: format!("{} record without identifier", standard),
        })?;

    Ok(XmlRecord::new(identifier, standard, root))
}

fn walk(current: PropertyValue<'_>, segments: &[PathSegment], out: &mut Vec<Primitive>) {
    let Some((segment, rest)) = segments.split_first() else {
        terminal(current, out);
        return;
    };

    let node = match current {
        PropertyValue::Node(node) => node,
        PropertyValue::Collection(items) => {
            for item in items {
                walk(item, segments, out);
            }
            return;
        }
        PropertyValue::Primitive(_) => return,
    };

    let reached: Vec<PropertyValue<'_>> = match &segment.step {
        Step::Name(name) => node
            .property(name)
            .map(PropertyValue::into_elements)
            .unwrap_or_default(),
        Step::Wildcard => node
            .property_names()
            .into_iter()
            .filter_map(|name| node.property(name))
            .flat_map(PropertyValue::into_elements)
            .collect(),
    };

    let selected: Vec<PropertyValue<'_>> = match segment.ordinal {
        Some(n) => reached.into_iter().nth(n).into_iter().collect(),
        None => reached,
    };

    for element in selected {
        if let Some(predicate) = &segment.predicate {
            if !sibling_matches(&element, &predicate.property, |v| predicate.value.matches(v)) {
                continue;
            }
        }
        walk(element, rest, out);
    }
}

/// Tests the named property of an element; any of its values may match.
fn sibling_matches<F>(element: &PropertyValue<'_>, property: &str, matches: F) -> bool
where
    F: Fn(&str) -> bool,
{
    let PropertyValue::Node(node) = element else {
        return false;
    };
    node.property(property)
        .map(PropertyValue::into_elements)
        .unwrap_or_default()
        .iter()
        .filter_map(PropertyValue::string_form)
        .any(|v| matches(&v))
}

fn terminal(value: PropertyValue<'_>, out: &mut Vec<Primitive>) {
    match value {
        PropertyValue::Primitive(p) => {
            if !p.is_blank() {
                out.push(p);
            }
        }
        PropertyValue::Node(node) => {
            if let Some(text) = node.external_form().filter(|t| !t.trim().is_empty()) {
                out.push(Primitive::Text(text));
            }
        }
        PropertyValue::Collection(items) => {
            for item in items {
                terminal(item, out);
            }
        }
    }
}
