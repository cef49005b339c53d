//! Queryable registry coverage and lookups.

use geocat_model::Standard;
use geocat_persistence::error::SearchError;
use geocat_persistence::search::{FieldScope, LoaderError, QueryableLoader, QueryableRegistry, Vocabulary};

use crate::common::*;

#[test]
fn test_common_fields_mapped_for_every_standard() {
    let registry = registry();
    let common: Vec<_> = registry
        .fields()
        .filter(|f| f.scope() == FieldScope::Common)
        .collect();
    assert!(!common.is_empty());

    for field in common {
        for standard in [Standard::Iso19139, Standard::DublinCore, Standard::Ebrim] {
            assert!(
                !field.paths_for(standard).is_empty(),
                "{} has no path for {}",
                field.name(),
                standard
            );
        }
    }
}

#[test]
fn test_unknown_field_is_not_queryable() {
    let translator = translator();
    assert_eq!(
        translator.parse("Colour:red").unwrap_err(),
        SearchError::NotQueryable {
            field: "Colour".to_string()
        }
    );
    assert!(matches!(
        translator.parse_sort("Colour"),
        Err(SearchError::NotQueryable { .. })
    ));
}

#[test]
fn test_lookup_is_case_insensitive() {
    let registry = registry();
    assert_eq!(registry.field("title").unwrap().name(), "Title");
    assert!(registry.is_queryable("DENOMINATOR"));
}

#[test]
fn test_vocabulary_listing_includes_any_text() {
    let registry = registry();
    let names: Vec<&str> = registry
        .queryables(Vocabulary::DublinCore)
        .into_iter()
        .map(|f| f.name())
        .collect();
    assert!(names.contains(&"Title"));
    assert!(names.contains(&"AnyText"));
    assert!(!names.contains(&"Denominator"));
}

#[test]
fn test_config_extends_embedded_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queryables.json");
    std::fs::write(
        &path,
        r#"[{ "name": "Platform", "type": "text", "vocabulary": "iso",
              "paths": ["acquisitionInformation/*/platform/*/identifier"] }]"#,
    )
    .unwrap();

    let registry = QueryableRegistry::load_all(&QueryableLoader::new().with_config(&path)).unwrap();
    assert!(registry.is_queryable("Platform"));
    assert_eq!(registry.paths_for(Standard::Iso19139, "Platform").unwrap().len(), 1);
}

#[test]
fn test_config_with_bad_path_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("queryables.json");
    std::fs::write(
        &path,
        r#"[{ "name": "Broken", "type": "text", "vocabulary": "iso", "paths": ["a/b[x"] }]"#,
    )
    .unwrap();

    let err = QueryableRegistry::load_all(&QueryableLoader::new().with_config(&path)).unwrap_err();
    assert!(matches!(err, LoaderError::InvalidExpression { .. }));
}
