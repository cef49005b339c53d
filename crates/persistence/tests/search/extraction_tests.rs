//! Field extraction and the indexed document form.

use geocat_model::{MetadataRecord, XmlElement};
use geocat_persistence::backends::RecordFileLoader;
use geocat_persistence::search::{ANY_TEXT, identify_xml};
use geocat_persistence::types::IndexValue;

use crate::common::*;

const EBRIM_PACKAGE: &str = r#"
<rim:ExtrinsicObject xmlns:rim="urn:oasis:names:tc:ebxml-regrep:xsd:rim:3.0"
    id="urn:uuid:ebrim-1" objectType="urn:ogc:def:objectType:OGC-CSW-ebRIM-CIM::DataMetadata"
    mimeType="application/xml">
  <rim:Slot name="http://purl.org/dc/terms/modified">
    <rim:ValueList><rim:Value>2011-04-02</rim:Value></rim:ValueList>
  </rim:Slot>
  <rim:Slot name="http://purl.org/dc/elements/1.1/subject">
    <rim:ValueList><rim:Value>hydrography</rim:Value><rim:Value>rivers</rim:Value></rim:ValueList>
  </rim:Slot>
  <rim:Name><rim:LocalizedString value="River network"/></rim:Name>
</rim:ExtrinsicObject>
"#;

#[test]
fn test_title_round_trip() {
    let indexer = indexed(&[IsoFixture::new("iso-1", "Bathymetry of the North Sea").build()]);
    let doc = indexer.document("iso-1").unwrap();
    assert_eq!(
        doc.values("Title"),
        &[IndexValue::text("Bathymetry of the North Sea")]
    );
    assert_eq!(doc.values("Identifier"), &[IndexValue::text("iso-1")]);
}

#[test]
fn test_title_phrase_finds_exactly_its_record() {
    let indexer = indexed(&[
        IsoFixture::new("r1", "Rivers").build(),
        IsoFixture::new("r2", "Rivers and lakes").build(),
        dublin_core("r3", "Lakes, rivers", &[]),
    ]);
    let translator = translator();
    for (id, title) in [("r1", "Rivers"), ("r2", "Rivers and lakes"), ("r3", "Lakes, rivers")] {
        let query = translator.parse(&format!("Title:\"{}\"", title)).unwrap();
        assert_eq!(indexer.search(&query, None), vec![id], "title {title}");
    }

    // Unfielded phrases still match inside a value.
    let query = translator.parse("\"and lakes\"").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["r2"]);
}

#[test]
fn test_dump_is_deterministic() {
    let fixture = IsoFixture::new("iso-1", "Land cover")
        .with_abstract("Classified land cover")
        .with_keywords(&["land", "cover", "land"])
        .with_date_stamp("2012-05-01")
        .with_denominator(25000)
        .with_bbox([-5.0, 50.0, 2.0, 56.0]);

    let first = indexed(&[fixture.build()]);
    let second = indexed(&[fixture.build()]);

    let dump = first.dump("iso-1").unwrap().unwrap();
    assert_eq!(dump, first.dump("iso-1").unwrap().unwrap());
    assert_eq!(dump, second.dump("iso-1").unwrap().unwrap());
    assert!(first.dump("missing").unwrap().is_none());
}

#[test]
fn test_reindexing_same_record_is_idempotent() {
    let record = IsoFixture::new("iso-1", "Land cover")
        .with_keywords(&["land", "cover"])
        .with_date_stamp("2012-05-01")
        .with_denominator(25000)
        .with_bbox([-5.0, 50.0, 2.0, 56.0])
        .build();

    let indexer = indexer();
    indexer.index(&record).unwrap();
    indexer.refresh();
    let before = indexer.dump("iso-1").unwrap().unwrap();

    indexer.index(&record).unwrap();
    indexer.refresh();
    let after = indexer.dump("iso-1").unwrap().unwrap();

    assert_eq!(before, after);
    assert_eq!(indexer.identifiers(), vec!["iso-1"]);
}

#[test]
fn test_multi_valued_fields_keep_duplicates() {
    let record = IsoFixture::new("iso-1", "Land cover")
        .with_keywords(&["land", "cover", "land"])
        .build();
    let doc = indexer().build_document(&record).unwrap();
    assert_eq!(doc.values("Subject").len(), 3);
}

#[test]
fn test_any_text_covers_text_fields() {
    let record = IsoFixture::new("iso-1", "Land cover")
        .with_abstract("Derived from satellite imagery")
        .with_denominator(1000)
        .build();
    let doc = indexer().build_document(&record).unwrap();
    let any_text = doc.values(ANY_TEXT);
    assert!(any_text.contains(&IndexValue::text("Land cover")));
    assert!(any_text.contains(&IndexValue::text("Derived from satellite imagery")));
    assert!(!any_text.iter().any(|v| v.as_number().is_some()));
}

#[test]
fn test_ebrim_xml_package() {
    let registry = registry();
    let root = XmlElement::parse(EBRIM_PACKAGE).unwrap();
    let record = identify_xml(&registry, root).unwrap();
    assert_eq!(record.identifier(), "urn:uuid:ebrim-1");

    let indexer = indexed(&[]);
    indexer.index(&record).unwrap();
    indexer.refresh();

    let doc = indexer.document("urn:uuid:ebrim-1").unwrap();
    assert_eq!(doc.values("Title"), &[IndexValue::text("River network")]);
    assert_eq!(doc.values("Subject").len(), 2);
    assert_eq!(doc.values("Modified"), &[IndexValue::Date("20110402000000".into())]);
}

#[test]
fn test_spatial_filter_over_loaded_files() {
    let dir = tempfile::tempdir().unwrap();
    let north = IsoFixture::new("north", "Arctic").with_bbox([-20.0, 65.0, 40.0, 85.0]);
    let south = IsoFixture::new("south", "Antarctic").with_bbox([-180.0, -90.0, 180.0, -60.0]);
    for fixture in [&north, &south] {
        let envelope = serde_json::json!({
            "identifier": fixture.identifier,
            "standard": "iso19139",
            "metadata": fixture.to_metadata(),
        });
        std::fs::write(
            dir.path().join(format!("{}.json", fixture.identifier)),
            envelope.to_string(),
        )
        .unwrap();
    }

    let registry = registry();
    let records = RecordFileLoader::new(&registry).load(dir.path()).unwrap();
    assert_eq!(records.len(), 2);

    let indexer = indexer();
    for record in &records {
        indexer.index(record.as_ref()).unwrap();
    }
    indexer.refresh();

    let translator = translator();
    let spatial = translator
        .translate_spatial(
            geocat_persistence::types::Envelope::new(0.0, 60.0, 10.0, 70.0),
            geocat_persistence::types::SpatialOperator::Intersects,
        )
        .unwrap();
    let query = geocat_persistence::StructuredQuery::new()
        .and(geocat_persistence::types::Predicate::Spatial(spatial));
    assert_eq!(indexer.search(&query, None), vec!["north"]);
}
