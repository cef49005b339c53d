//! Metadata record fixtures.
//!
//! Builders for ISO 19139 and Dublin Core records in their JSON form, plus
//! helpers that stand up a catalogue over in-memory storage.

use std::sync::Arc;

use serde_json::{Value, json};

use geocat_model::{JsonRecord, Standard};
use geocat_persistence::Catalogue;
use geocat_persistence::backends::MemoryRecordStorage;
use geocat_persistence::search::{DocumentIndexer, QueryTranslator, QueryableRegistry};

/// An ISO 19139 dataset record.
#[derive(Debug, Clone)]
pub struct IsoFixture {
    pub identifier: String,
    pub title: String,
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,
    pub date_stamp: Option<String>,
    pub denominator: Option<String>,
    pub bbox: Option<[f64; 4]>,
}

impl IsoFixture {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            abstract_text: None,
            keywords: vec![],
            date_stamp: None,
            denominator: None,
            bbox: None,
        }
    }

    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_date_stamp(mut self, date: impl Into<String>) -> Self {
        self.date_stamp = Some(date.into());
        self
    }

    pub fn with_denominator(mut self, denominator: impl ToString) -> Self {
        self.denominator = Some(denominator.to_string());
        self
    }

    /// West, south, east, north.
    pub fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn to_metadata(&self) -> Value {
        let mut identification = json!({
            "citation": { "CI_Citation": { "title": self.title } },
        });
        if let Some(text) = &self.abstract_text {
            identification["abstract"] = json!(text);
        }
        if !self.keywords.is_empty() {
            identification["descriptiveKeywords"] =
                json!({ "MD_Keywords": { "keyword": self.keywords } });
        }
        if let Some(denominator) = &self.denominator {
            identification["spatialResolution"] = json!({ "MD_Resolution": {
                "equivalentScale": { "MD_RepresentativeFraction": { "denominator": denominator } }
            }});
        }
        if let Some([w, s, e, n]) = self.bbox {
            identification["extent"] = json!({ "EX_Extent": { "geographicElement": {
                "EX_GeographicBoundingBox": {
                    "westBoundLongitude": w, "eastBoundLongitude": e,
                    "southBoundLatitude": s, "northBoundLatitude": n
                }
            }}});
        }

        let mut metadata = json!({
            "fileIdentifier": self.identifier,
            "hierarchyLevel": "dataset",
            "identificationInfo": { "MD_DataIdentification": identification },
        });
        if let Some(date) = &self.date_stamp {
            metadata["dateStamp"] = json!(date);
        }
        metadata
    }

    pub fn build(&self) -> JsonRecord {
        JsonRecord::new(self.identifier.as_str(), Standard::Iso19139, self.to_metadata())
    }
}

/// A Dublin Core record with a title and optional subjects.
pub fn dublin_core(identifier: &str, title: &str, subjects: &[&str]) -> JsonRecord {
    JsonRecord::new(
        identifier,
        Standard::DublinCore,
        json!({ "identifier": identifier, "title": title, "subject": subjects }),
    )
}

pub fn registry() -> Arc<QueryableRegistry> {
    Arc::new(QueryableRegistry::builtin().expect("builtin queryables load"))
}

pub fn indexer() -> DocumentIndexer {
    DocumentIndexer::new(registry())
}

pub fn translator() -> QueryTranslator {
    QueryTranslator::new(registry())
}

pub fn catalogue() -> Catalogue {
    Catalogue::new(Arc::new(MemoryRecordStorage::new()), registry())
}

/// Indexes records and publishes them.
pub fn indexed(records: &[JsonRecord]) -> DocumentIndexer {
    let indexer = indexer();
    for record in records {
        indexer.index(record).expect("fixture indexes");
    }
    indexer.refresh();
    indexer
}
