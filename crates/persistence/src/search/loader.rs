//! Queryable definition loader.
//!
//! Definitions come from two sources:
//! - the embedded tables below, one per vocabulary
//! - an optional JSON overlay file given at start-up
//!
//! Overlay entries use the same shape as [`QueryableDefinition`]:
//!
//! ```json
//! [
//!   {
//!     "name": "Platform",
//!     "type": "text",
//!     "multiValued": true,
//!     "vocabulary": "iso",
//!     "paths": ["acquisitionInformation/*/platform/*/identifier"]
//!   }
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::LoaderError;
use super::registry::{
    ANY_TEXT, FieldScope, FieldType, QueryableDefinition, QueryableSource, Vocabulary,
};

/// Static description of a built-in field.
struct EmbeddedField {
    name: &'static str,
    field_type: FieldType,
    multi_valued: bool,
    sortable: bool,
    scope: FieldScope,
}

const fn field(
    name: &'static str,
    field_type: FieldType,
    multi_valued: bool,
    sortable: bool,
    scope: FieldScope,
) -> EmbeddedField {
    EmbeddedField {
        name,
        field_type,
        multi_valued,
        sortable,
        scope,
    }
}

use FieldScope::{Common, Specific, Synthetic};
use FieldType::{Boolean, Date, Number, Text};

const FIELDS: &[EmbeddedField] = &[
    field("Title", Text, false, true, Common),
    field("AlternateTitle", Text, true, false, Specific),
    field("Abstract", Text, false, false, Common),
    field("Identifier", Text, false, true, Common),
    field("Subject", Text, true, false, Common),
    field("TopicCategory", Text, true, false, Specific),
    field("KeywordType", Text, true, false, Specific),
    field("Type", Text, false, true, Common),
    field("Modified", Date, false, true, Common),
    field("Format", Text, true, false, Common),
    field("CreationDate", Date, false, true, Specific),
    field("PublicationDate", Date, false, true, Specific),
    field("RevisionDate", Date, false, true, Specific),
    field("Language", Text, false, true, Specific),
    field("ResourceLanguage", Text, true, false, Specific),
    field("ParentIdentifier", Text, false, false, Specific),
    field("ResourceIdentifier", Text, true, false, Specific),
    field("OrganisationName", Text, true, true, Specific),
    field("Creator", Text, true, true, Specific),
    field("Publisher", Text, true, false, Specific),
    field("Contributor", Text, true, false, Specific),
    field("Denominator", Number, true, true, Specific),
    field("DistanceValue", Number, true, true, Specific),
    field("TempExtent_begin", Date, false, true, Specific),
    field("TempExtent_end", Date, false, true, Specific),
    field("ServiceType", Text, false, false, Specific),
    field("CRS", Text, true, false, Specific),
    field("WestBoundLongitude", Number, true, false, Specific),
    field("EastBoundLongitude", Number, true, false, Specific),
    field("SouthBoundLatitude", Number, true, false, Specific),
    field("NorthBoundLatitude", Number, true, false, Specific),
    field("Degree", Boolean, false, false, Specific),
    field("SpecificationTitle", Text, true, false, Specific),
    field("SpecificationDate", Date, true, false, Specific),
    field("AccessConstraints", Text, true, false, Specific),
    field("OtherConstraints", Text, true, false, Specific),
    field("Classification", Text, true, false, Specific),
    field("ConditionApplyingToAccessAndUse", Text, true, false, Specific),
    field("Lineage", Text, false, false, Specific),
    field("MetadataPointOfContact", Text, true, false, Specific),
    field("ResponsiblePartyRole", Text, true, false, Specific),
    field(ANY_TEXT, Text, true, false, Synthetic),
];

type PathTable = &'static [(&'static str, &'static [&'static str])];

const ISO_PATHS: PathTable = &[
    ("Title", &["identificationInfo/*/citation/*/title"]),
    ("AlternateTitle", &["identificationInfo/*/citation/*/alternateTitle"]),
    ("Abstract", &["identificationInfo/*/abstract"]),
    ("Identifier", &["fileIdentifier"]),
    (
        "Subject",
        &[
            "identificationInfo/*/descriptiveKeywords/*/keyword",
            "identificationInfo/*/topicCategory",
        ],
    ),
    ("TopicCategory", &["identificationInfo/*/topicCategory"]),
    ("KeywordType", &["identificationInfo/*/descriptiveKeywords/*/type"]),
    ("Type", &["hierarchyLevel"]),
    ("Modified", &["dateStamp"]),
    (
        "Format",
        &["distributionInfo/*/distributionFormat/*/name"],
    ),
    (
        "CreationDate",
        &["identificationInfo/*/citation/*/date/*#dateType=creation/date"],
    ),
    (
        "PublicationDate",
        &["identificationInfo/*/citation/*/date/*#dateType=publication/date"],
    ),
    (
        "RevisionDate",
        &["identificationInfo/*/citation/*/date/*#dateType=revision/date"],
    ),
    ("Language", &["language"]),
    ("ResourceLanguage", &["identificationInfo/*/language"]),
    ("ParentIdentifier", &["parentIdentifier"]),
    (
        "ResourceIdentifier",
        &["identificationInfo/*/citation/*/identifier/*/code"],
    ),
    (
        "OrganisationName",
        &[
            "identificationInfo/*/pointOfContact/*/organisationName",
            "contact/*/organisationName",
        ],
    ),
    (
        "Denominator",
        &["identificationInfo/*/spatialResolution/*/equivalentScale/*/denominator"],
    ),
    (
        "DistanceValue",
        &["identificationInfo/*/spatialResolution/*/distance"],
    ),
    (
        "TempExtent_begin",
        &[
            "identificationInfo/*/extent/*/temporalElement/*/extent/*/beginPosition",
            "identificationInfo/*/extent/*/temporalElement/*/extent/*/begin/*/timePosition",
        ],
    ),
    (
        "TempExtent_end",
        &[
            "identificationInfo/*/extent/*/temporalElement/*/extent/*/endPosition",
            "identificationInfo/*/extent/*/temporalElement/*/extent/*/end/*/timePosition",
        ],
    ),
    ("ServiceType", &["identificationInfo/*/serviceType"]),
    ("CRS", &["referenceSystemInfo/*/referenceSystemIdentifier/*/code"]),
    (
        "WestBoundLongitude",
        &["identificationInfo/*/extent/*/geographicElement/*/westBoundLongitude"],
    ),
    (
        "EastBoundLongitude",
        &["identificationInfo/*/extent/*/geographicElement/*/eastBoundLongitude"],
    ),
    (
        "SouthBoundLatitude",
        &["identificationInfo/*/extent/*/geographicElement/*/southBoundLatitude"],
    ),
    (
        "NorthBoundLatitude",
        &["identificationInfo/*/extent/*/geographicElement/*/northBoundLatitude"],
    ),
];

const INSPIRE_PATHS: PathTable = &[
    ("Degree", &["dataQualityInfo/*/report/*/result/*/pass"]),
    (
        "SpecificationTitle",
        &["dataQualityInfo/*/report/*/result/*/specification/*/title"],
    ),
    (
        "SpecificationDate",
        &["dataQualityInfo/*/report/*/result/*/specification/*/date/*/date"],
    ),
    (
        "AccessConstraints",
        &["identificationInfo/*/resourceConstraints/*/accessConstraints"],
    ),
    (
        "OtherConstraints",
        &["identificationInfo/*/resourceConstraints/*/otherConstraints"],
    ),
    (
        "Classification",
        &["identificationInfo/*/resourceConstraints/*/classification"],
    ),
    (
        "ConditionApplyingToAccessAndUse",
        &["identificationInfo/*/resourceConstraints/*/useLimitation"],
    ),
    ("Lineage", &["dataQualityInfo/*/lineage/*/statement"]),
    ("MetadataPointOfContact", &["contact/*/organisationName"]),
    (
        "ResponsiblePartyRole",
        &["identificationInfo/*/pointOfContact/*/role"],
    ),
];

const DUBLIN_CORE_PATHS: PathTable = &[
    ("Title", &["title"]),
    ("AlternateTitle", &["alternative"]),
    ("Abstract", &["abstract", "description"]),
    ("Identifier", &["identifier"]),
    ("Subject", &["subject"]),
    ("Type", &["type"]),
    ("Modified", &["modified", "date"]),
    ("Format", &["format"]),
    ("Language", &["language"]),
    ("Creator", &["creator"]),
    ("Publisher", &["publisher"]),
    ("Contributor", &["contributor"]),
];

const EBRIM_PATHS: PathTable = &[
    ("Title", &["Name/LocalizedString/@value"]),
    ("Abstract", &["Description/LocalizedString/@value"]),
    ("Identifier", &["@id"]),
    ("Subject", &["Slot#@name=[.*[Ss]ubject]/ValueList/Value"]),
    ("Type", &["@objectType"]),
    ("Modified", &["Slot#@name=[.*[Mm]odified]/ValueList/Value"]),
    (
        "Format",
        &["@mimeType", "Slot#@name=[.*[Ff]ormat]/ValueList/Value"],
    ),
    ("Creator", &["Slot#@name=[.*[Cc]reator]/ValueList/Value"]),
];

/// Loader for queryable definitions.
#[derive(Debug, Clone, Default)]
pub struct QueryableLoader {
    config_path: Option<PathBuf>,
}

impl QueryableLoader {
    /// Creates a loader for the embedded tables only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an overlay file, loaded after the embedded tables.
    pub fn with_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// The configured overlay file, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Loads the embedded tables and the overlay file.
    pub fn load_all(&self) -> Result<Vec<QueryableDefinition>, LoaderError> {
        let mut definitions = self.load_embedded()?;
        if let Some(path) = &self.config_path {
            let overlay = self.load_config(path)?;
            tracing::info!(
                path = %path.display(),
                count = overlay.len(),
                "Loaded queryable overlay"
            );
            definitions.extend(overlay);
        }
        Ok(definitions)
    }

    /// Loads the built-in definitions.
    pub fn load_embedded(&self) -> Result<Vec<QueryableDefinition>, LoaderError> {
        let mut definitions = Vec::new();

        for embedded in FIELDS.iter().filter(|f| f.scope == Synthetic) {
            definitions.push(Self::definition(embedded));
        }

        let tables = [
            (Vocabulary::Iso, ISO_PATHS),
            (Vocabulary::Inspire, INSPIRE_PATHS),
            (Vocabulary::DublinCore, DUBLIN_CORE_PATHS),
            (Vocabulary::Ebrim, EBRIM_PATHS),
        ];
        for (vocabulary, table) in tables {
            for (name, paths) in table {
                let embedded = FIELDS.iter().find(|f| f.name == *name).ok_or_else(|| {
                    LoaderError::InvalidDefinition {
                        message: format!("no field description for {} paths", vocabulary),
                        field: Some((*name).to_string()),
                    }
                })?;
                definitions.push(
                    Self::definition(embedded).with_paths(vocabulary, paths.iter().copied()),
                );
            }
        }

        Ok(definitions)
    }

    fn definition(embedded: &EmbeddedField) -> QueryableDefinition {
        let mut definition = QueryableDefinition::new(embedded.name, embedded.field_type)
            .with_scope(embedded.scope);
        definition.multi_valued = embedded.multi_valued;
        definition.sortable = embedded.sortable;
        definition
    }

    /// Parses overlay definitions from a JSON array or a single object.
    pub fn load_from_json(&self, json: &Value) -> Result<Vec<QueryableDefinition>, LoaderError> {
        let items: Vec<&Value> = match json {
            Value::Array(items) => items.iter().collect(),
            Value::Object(_) => vec![json],
            _ => {
                return Err(LoaderError::InvalidDefinition {
                    message: "expected an array of queryable definitions".to_string(),
                    field: None,
                });
            }
        };

        items
            .into_iter()
            .map(|item| {
                let field = item.get("name").and_then(Value::as_str).map(str::to_string);
                let mut definition: QueryableDefinition = serde_json::from_value(item.clone())
                    .map_err(|e| LoaderError::InvalidDefinition {
                        message: e.to_string(),
                        field,
                    })?;
                definition.source = QueryableSource::Config;
                Ok(definition)
            })
            .collect()
    }

    /// Loads overlay definitions from a file.
    pub fn load_config(&self, config_path: &Path) -> Result<Vec<QueryableDefinition>, LoaderError> {
        let content = std::fs::read_to_string(config_path).map_err(|e| {
            LoaderError::ConfigLoadFailed {
                path: config_path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let json: Value = serde_json::from_str(&content).map_err(|e| {
            LoaderError::ConfigLoadFailed {
                path: config_path.display().to_string(),
                message: format!("Invalid JSON: {}", e),
            }
        })?;

        self.load_from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use super::*;
    use crate::search::registry::QueryableRegistry;

    #[test]
    fn test_every_table_entry_has_a_field() {
        let definitions = QueryableLoader::new().load_embedded().unwrap();
        assert!(definitions.iter().any(|d| d.name == ANY_TEXT));
        assert!(definitions
            .iter()
            .all(|d| d.scope == Synthetic || d.vocabulary.is_some()));
    }

    #[test]
    fn test_load_from_json() {
        let json = json!([{
            "name": "Platform",
            "type": "text",
            "multiValued": true,
            "vocabulary": "iso",
            "paths": ["acquisitionInformation/*/platform/*/identifier"]
        }]);
        let definitions = QueryableLoader::new().load_from_json(&json).unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].source, QueryableSource::Config);
        assert_eq!(definitions[0].vocabulary, Some(Vocabulary::Iso));
        assert!(definitions[0].multi_valued);
        assert!(!definitions[0].sortable);
    }

    #[test]
    fn test_load_from_json_rejects_bad_type() {
        let json = json!([{ "name": "Platform", "type": "colour", "vocabulary": "iso" }]);
        let err = QueryableLoader::new().load_from_json(&json).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidDefinition { field: Some(ref f), .. } if f == "Platform"));
    }

    #[test]
    fn test_overlay_file_extends_registry() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Platform", "type": "text", "vocabulary": "iso",
                 "paths": ["acquisitionInformation/*/platform/*/identifier"]}},
                {{"name": "Title", "type": "text", "vocabulary": "dublincore",
                 "paths": ["alternative"]}}]"#
        )
        .unwrap();

        let loader = QueryableLoader::new().with_config(file.path());
        let registry = QueryableRegistry::load_all(&loader).unwrap();
        assert!(registry.is_queryable("Platform"));
        let title_paths = registry
            .paths_for(geocat_model::Standard::DublinCore, "Title")
            .unwrap();
        assert_eq!(title_paths.last().map(|p| p.as_str()), Some("alternative"));
    }

    #[test]
    fn test_overlay_with_bad_path_is_invalid_expression() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "Broken", "type": "text", "vocabulary": "iso", "paths": ["a[x]"]}}]"#
        )
        .unwrap();

        let loader = QueryableLoader::new().with_config(file.path());
        assert!(matches!(
            QueryableRegistry::load_all(&loader),
            Err(LoaderError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let loader = QueryableLoader::new().with_config("/nonexistent/queryables.json");
        assert!(matches!(
            loader.load_all(),
            Err(LoaderError::ConfigLoadFailed { .. })
        ));
    }
}
