//! XML-backed metadata records.
//!
//! Remote catalogues answer in XML. [`XmlElement`] is an owned copy of a
//! `roxmltree` element tree, keyed by local names so that paths stay free of
//! namespace prefixes:
//!
//! - child elements are properties named after their local name; several
//!   children with the same name form a repeated property;
//! - attributes are properties named `@local-name`;
//! - an element with neither children nor attributes is a text primitive.

use std::collections::BTreeSet;

use crate::error::ModelError;
use crate::node::{MetadataNode, Primitive, PropertyValue};
use crate::record::{MetadataRecord, Standard};

/// An owned XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element with the given local name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Sets the namespace URI.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Adds an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Sets the direct text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Parses a document and returns its root element.
    pub fn parse(xml: &str) -> Result<XmlElement, ModelError> {
        let doc = roxmltree::Document::parse(xml).map_err(|e| ModelError::InvalidXml {
            message: e.to_string(),
        })?;
        Ok(XmlElement::from_node(doc.root_element()))
    }

    /// Copies a `roxmltree` element and its subtree.
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> XmlElement {
        let mut text = String::new();
        let mut children = Vec::new();
        for child in node.children() {
            if child.is_element() {
                children.push(XmlElement::from_node(child));
            } else if child.is_text() {
                if let Some(t) = child.text() {
                    text.push_str(t);
                }
            }
        }

        XmlElement {
            name: node.tag_name().name().to_string(),
            namespace: node.tag_name().namespace().map(str::to_string),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            text,
            children,
        }
    }

    /// Local name of the element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Value of an attribute by local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Direct text content, trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant (depth-first, self excluded) with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.find(name)
            }
        })
    }

    /// All text of this element and its descendants, whitespace collapsed.
    pub fn deep_text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        parts.extend(self.text.split_whitespace());
        for child in &self.children {
            child.collect_text(parts);
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty()
    }

    fn as_property(&self) -> PropertyValue<'_> {
        if self.is_leaf() {
            PropertyValue::Primitive(Primitive::Text(self.text().to_string()))
        } else {
            PropertyValue::Node(self)
        }
    }
}

impl MetadataNode for XmlElement {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        if let Some(attr) = name.strip_prefix('@') {
            return self
                .attribute(attr)
                .map(|v| PropertyValue::Primitive(Primitive::text(v)));
        }

        let mut matches: Vec<PropertyValue<'_>> = self
            .children
            .iter()
            .filter(|c| c.name == name)
            .map(XmlElement::as_property)
            .collect();
        match matches.len() {
            0 => None,
            1 => matches.pop(),
            _ => Some(PropertyValue::Collection(matches)),
        }
    }

    fn property_names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.children
            .iter()
            .map(|c| c.name.as_str())
            .filter(|n| seen.insert(*n))
            .collect()
    }

    fn external_form(&self) -> Option<String> {
        let text = self.deep_text();
        if !text.is_empty() {
            return Some(text);
        }
        ["codeListValue", "href", "value"]
            .iter()
            .find_map(|a| self.attribute(a))
            .map(str::to_string)
            .or_else(|| self.children.iter().find_map(XmlElement::external_form))
    }
}

/// Detects the metadata standard of a record from its root element.
pub fn detect_standard(root: &XmlElement) -> Option<Standard> {
    match root.name() {
        "MD_Metadata" | "MI_Metadata" => Some(Standard::Iso19139),
        "Record" | "SummaryRecord" | "BriefRecord" => Some(Standard::DublinCore),
        "RegistryPackage" | "ExtrinsicObject" | "RegistryObject" | "Service" | "Organization" => {
            Some(Standard::Ebrim)
        }
        _ => None,
    }
}

/// A metadata record whose object graph is an XML element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlRecord {
    identifier: String,
    standard: Standard,
    root: XmlElement,
}

impl XmlRecord {
    /// Creates a record from its parts.
    pub fn new(identifier: impl Into<String>, standard: Standard, root: XmlElement) -> Self {
        Self {
            identifier: identifier.into(),
            standard,
            root,
        }
    }

    /// The root element.
    pub fn element(&self) -> &XmlElement {
        &self.root
    }
}

impl MetadataRecord for XmlRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn standard(&self) -> Standard {
        self.standard
    }

    fn root(&self) -> &dyn MetadataNode {
        &self.root
    }
}
