//! Queryable path registry.
//!
//! Maps abstract queryable field names (`Title`, `Modified`, ...) to the path
//! expressions that locate them in each metadata vocabulary. The registry is
//! assembled once from the loader's definitions and is immutable afterwards,
//! so it can be shared as `Arc<QueryableRegistry>` without locking.
//!
//! Field names are matched case-insensitively; the canonical spelling is the
//! one used in the definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use geocat_model::Standard;
use serde::{Deserialize, Serialize};

use super::errors::{LoaderError, RegistryError};
use super::loader::QueryableLoader;
use super::path::PathExpression;

/// Name of the synthetic full-text field.
pub const ANY_TEXT: &str = "AnyText";

/// Value type of a queryable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text and codes.
    Text,
    /// Numeric values.
    Number,
    /// Dates, stored in canonical form.
    Date,
    /// Boolean flags.
    Boolean,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => f.write_str("text"),
            FieldType::Number => f.write_str("number"),
            FieldType::Date => f.write_str("date"),
            FieldType::Boolean => f.write_str("boolean"),
        }
    }
}

/// A path vocabulary.
///
/// `Inspire` is an overlay on ISO records: it adds fields, it does not replace
/// the ISO paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vocabulary {
    /// Full ISO 19139 records.
    Iso,
    /// Dublin Core brief and summary records.
    DublinCore,
    /// ebRIM registry objects.
    Ebrim,
    /// INSPIRE compliance fields on ISO records.
    Inspire,
}

impl Vocabulary {
    /// All vocabularies.
    pub const ALL: [Vocabulary; 4] = [
        Vocabulary::Iso,
        Vocabulary::DublinCore,
        Vocabulary::Ebrim,
        Vocabulary::Inspire,
    ];

    /// The record standard this vocabulary's paths apply to.
    pub fn standard(&self) -> Standard {
        match self {
            Vocabulary::Iso | Vocabulary::Inspire => Standard::Iso19139,
            Vocabulary::DublinCore => Standard::DublinCore,
            Vocabulary::Ebrim => Standard::Ebrim,
        }
    }

    /// Vocabularies consulted for records of a standard, in lookup order.
    pub fn for_standard(standard: Standard) -> &'static [Vocabulary] {
        match standard {
            Standard::Iso19139 => &[Vocabulary::Iso, Vocabulary::Inspire],
            Standard::DublinCore => &[Vocabulary::DublinCore],
            Standard::Ebrim => &[Vocabulary::Ebrim],
        }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vocabulary::Iso => "iso",
            Vocabulary::DublinCore => "dublincore",
            Vocabulary::Ebrim => "ebrim",
            Vocabulary::Inspire => "inspire",
        }
    }
}

impl fmt::Display for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "iso" | "iso19139" => Ok(Vocabulary::Iso),
            "dublincore" | "dc" => Ok(Vocabulary::DublinCore),
            "ebrim" | "rim" => Ok(Vocabulary::Ebrim),
            "inspire" => Ok(Vocabulary::Inspire),
            _ => Err(format!("unknown vocabulary: {}", s)),
        }
    }
}

/// Which standards a field must cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldScope {
    /// Mapped for every standard; a missing mapping is a load error.
    Common,
    /// Mapped for some vocabularies only.
    #[default]
    Specific,
    /// Computed by the indexer rather than extracted by path.
    Synthetic,
}

/// Where a definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryableSource {
    /// Built-in tables.
    #[default]
    Embedded,
    /// Runtime overlay file.
    Config,
}

/// One field's paths in one vocabulary, as loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryableDefinition {
    /// Abstract field name.
    pub name: String,

    /// Value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether all extracted values are kept.
    #[serde(default)]
    pub multi_valued: bool,

    /// Whether a sort representation is stored.
    #[serde(default)]
    pub sortable: bool,

    /// Coverage requirement.
    #[serde(default)]
    pub scope: FieldScope,

    /// Vocabulary the paths belong to; absent for synthetic fields.
    #[serde(default)]
    pub vocabulary: Option<Vocabulary>,

    /// Path expressions, tried in order.
    #[serde(default)]
    pub paths: Vec<String>,

    /// Origin of the definition.
    #[serde(default)]
    pub source: QueryableSource,
}

impl QueryableDefinition {
    /// Creates a single-valued, unsortable definition without paths.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            multi_valued: false,
            sortable: false,
            scope: FieldScope::Specific,
            vocabulary: None,
            paths: Vec::new(),
            source: QueryableSource::Embedded,
        }
    }

    /// Sets the vocabulary and its paths.
    pub fn with_paths<I, S>(mut self, vocabulary: Vocabulary, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = Some(vocabulary);
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Marks the field multi-valued.
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    /// Marks the field sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sets the scope.
    pub fn with_scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    /// Sets the source.
    pub fn with_source(mut self, source: QueryableSource) -> Self {
        self.source = source;
        self
    }
}

/// A queryable field with its parsed paths per vocabulary.
#[derive(Debug, Clone)]
pub struct QueryableField {
    name: String,
    field_type: FieldType,
    multi_valued: bool,
    sortable: bool,
    scope: FieldScope,
    paths: BTreeMap<Vocabulary, Vec<PathExpression>>,
}

impl QueryableField {
    /// Canonical field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Whether every extracted value is kept.
    pub fn is_multi_valued(&self) -> bool {
        self.multi_valued
    }

    /// Whether a sort representation is stored.
    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Coverage requirement.
    pub fn scope(&self) -> FieldScope {
        self.scope
    }

    /// True for fields computed by the indexer.
    pub fn is_synthetic(&self) -> bool {
        self.scope == FieldScope::Synthetic
    }

    /// Paths in one vocabulary.
    pub fn paths(&self, vocabulary: Vocabulary) -> &[PathExpression] {
        self.paths.get(&vocabulary).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Vocabularies that map this field.
    pub fn vocabularies(&self) -> impl Iterator<Item = Vocabulary> + '_ {
        self.paths
            .iter()
            .filter(|(_, p)| !p.is_empty())
            .map(|(v, _)| *v)
    }

    /// Paths for records of a standard, across its vocabularies, in order.
    pub fn paths_for(&self, standard: Standard) -> Vec<&PathExpression> {
        Vocabulary::for_standard(standard)
            .iter()
            .flat_map(|v| self.paths(*v))
            .collect()
    }
}

/// Immutable registry of queryable fields.
#[derive(Debug, Clone, Default)]
pub struct QueryableRegistry {
    /// Fields keyed by lower-cased name.
    fields: BTreeMap<String, QueryableField>,
}

impl QueryableRegistry {
    /// Builds the registry from the embedded tables.
    pub fn builtin() -> Result<Self, LoaderError> {
        Self::from_definitions(QueryableLoader::new().load_embedded()?)
    }

    /// Builds the registry from every source the loader knows about.
    pub fn load_all(loader: &QueryableLoader) -> Result<Self, LoaderError> {
        let registry = Self::from_definitions(loader.load_all()?)?;
        tracing::debug!(fields = registry.len(), "Queryable registry built");
        Ok(registry)
    }

    /// Builds the registry from explicit definitions.
    ///
    /// Definitions for the same field are merged: paths for the same
    /// vocabulary are appended in load order, and `sortable`/`multiValued`
    /// are widened. Disagreeing value types are rejected.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, LoaderError>
    where
        I: IntoIterator<Item = QueryableDefinition>,
    {
        let mut registry = QueryableRegistry::default();
        for definition in definitions {
            registry.register(definition)?;
        }
        registry.check_common_coverage()?;
        Ok(registry)
    }

    fn register(&mut self, definition: QueryableDefinition) -> Result<(), LoaderError> {
        let name = definition.name.trim();
        if name.is_empty() {
            return Err(LoaderError::InvalidDefinition {
                message: "field name is empty".to_string(),
                field: None,
            });
        }

        let mut parsed = Vec::with_capacity(definition.paths.len());
        for expression in &definition.paths {
            let path = PathExpression::parse(expression).map_err(|e| {
                LoaderError::InvalidExpression {
                    field: name.to_string(),
                    expression: expression.clone(),
                    error: e.message,
                }
            })?;
            parsed.push(path);
        }

        if definition.scope != FieldScope::Synthetic && definition.vocabulary.is_none() {
            return Err(LoaderError::InvalidDefinition {
                message: "a vocabulary is required for path-based fields".to_string(),
                field: Some(name.to_string()),
            });
        }

        let key = name.to_lowercase();
        match self.fields.get_mut(&key) {
            Some(field) => {
                if field.field_type != definition.field_type {
                    return Err(RegistryError::ConflictingDefinition {
                        field: field.name.clone(),
                        message: format!(
                            "type {} does not match {}",
                            definition.field_type, field.field_type
                        ),
                    }
                    .into());
                }
                field.multi_valued |= definition.multi_valued;
                field.sortable |= definition.sortable;
                if definition.scope == FieldScope::Common {
                    field.scope = FieldScope::Common;
                }
                if let Some(vocabulary) = definition.vocabulary {
                    field.paths.entry(vocabulary).or_default().extend(parsed);
                }
            }
            None => {
                let mut paths = BTreeMap::new();
                if let Some(vocabulary) = definition.vocabulary {
                    paths.insert(vocabulary, parsed);
                }
                self.fields.insert(
                    key,
                    QueryableField {
                        name: name.to_string(),
                        field_type: definition.field_type,
                        multi_valued: definition.multi_valued,
                        sortable: definition.sortable,
                        scope: definition.scope,
                        paths,
                    },
                );
            }
        }
        Ok(())
    }

    fn check_common_coverage(&self) -> Result<(), LoaderError> {
        for field in self.fields.values().filter(|f| f.scope == FieldScope::Common) {
            for standard in Standard::ALL {
                if field.paths_for(standard).is_empty() {
                    return Err(LoaderError::IncompleteMapping {
                        field: field.name.clone(),
                        standard: standard.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field.
    pub fn field(&self, name: &str) -> Result<&QueryableField, RegistryError> {
        self.fields
            .get(&name.trim().to_lowercase())
            .ok_or_else(|| RegistryError::NotQueryable {
                field: name.to_string(),
            })
    }

    /// Returns true if the field is known in any vocabulary.
    pub fn is_queryable(&self, name: &str) -> bool {
        self.field(name).is_ok()
    }

    /// Ordered paths of a field for records of a standard.
    ///
    /// An empty list means the field is queryable but not mapped for that
    /// standard; an unknown field is an error.
    pub fn paths_for(
        &self,
        standard: Standard,
        name: &str,
    ) -> Result<Vec<&PathExpression>, RegistryError> {
        Ok(self.field(name)?.paths_for(standard))
    }

    /// Fields usable against records of a vocabulary, synthetic fields
    /// included.
    pub fn queryables(&self, vocabulary: Vocabulary) -> Vec<&QueryableField> {
        self.fields
            .values()
            .filter(|f| f.is_synthetic() || !f.paths(vocabulary).is_empty())
            .collect()
    }

    /// All fields, ordered by lower-cased name.
    pub fn fields(&self) -> impl Iterator<Item = &QueryableField> {
        self.fields.values()
    }
}
