//! End-to-end tests of the command implementations.

use std::fs;
use std::path::Path;

use clap::Parser;
use geocat::{Cli, run};

fn write_records(dir: &Path) {
    fs::write(
        dir.join("dc.json"),
        r#"[
            {"identifier": "dc-ocean", "standard": "dublincore",
             "metadata": {"identifier": "dc-ocean", "title": "Ocean temperature", "subject": ["ocean"]}},
            {"identifier": "dc-land", "standard": "dublincore",
             "metadata": {"identifier": "dc-land", "title": "Land cover", "subject": ["land"]}}
        ]"#,
    )
    .unwrap();
    fs::write(
        dir.join("iso.xml"),
        r#"<gmd:MD_Metadata xmlns:gmd="http://www.isotc211.org/2005/gmd"
                            xmlns:gco="http://www.isotc211.org/2005/gco">
             <gmd:fileIdentifier><gco:CharacterString>iso-sea</gco:CharacterString></gmd:fileIdentifier>
             <gmd:identificationInfo><gmd:MD_DataIdentification>
               <gmd:citation><gmd:CI_Citation>
                 <gmd:title><gco:CharacterString>Sea ice extent</gco:CharacterString></gmd:title>
               </gmd:CI_Citation></gmd:citation>
             </gmd:MD_DataIdentification></gmd:identificationInfo>
           </gmd:MD_Metadata>"#,
    )
    .unwrap();
}

async fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    run(cli).await
}

#[tokio::test]
async fn test_index_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    write_records(dir.path());
    fs::write(dir.path().join("broken.json"), "{").unwrap();

    let records = dir.path().to_str().unwrap();
    let out = run_args(&["geocat", "index", "--records", records]).await.unwrap();
    assert_eq!(out, "indexed 3 records (3 inserted, 0 updated, 1 failed)");
}

#[tokio::test]
async fn test_index_dump_prints_document() {
    let dir = tempfile::tempdir().unwrap();
    write_records(dir.path());

    let records = dir.path().to_str().unwrap();
    let out = run_args(&["geocat", "index", "--records", records, "--dump", "iso-sea"])
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["identifier"], "iso-sea");
    assert!(out.contains("Sea ice extent"));

    let missing = run_args(&["geocat", "index", "--records", records, "--dump", "nope"]).await;
    assert!(missing.is_err());
}

#[tokio::test]
async fn test_search_lists_matches() {
    let dir = tempfile::tempdir().unwrap();
    write_records(dir.path());
    let records = dir.path().to_str().unwrap();

    let out = run_args(&["geocat", "search", "--records", records, "-q", "Subject:ocean"])
        .await
        .unwrap();
    assert_eq!(out, "1 matched, showing 1 from 1\ndc-ocean");

    let out = run_args(&[
        "geocat", "search", "--records", records, "--sort", "Title", "--max", "2",
    ])
    .await
    .unwrap();
    assert_eq!(out, "3 matched, showing 2 from 1\ndc-land\ndc-ocean\nnext: 3");
}

#[tokio::test]
async fn test_search_unknown_field_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_records(dir.path());
    let records = dir.path().to_str().unwrap();

    let err = run_args(&["geocat", "search", "--records", records, "-q", "Colour:red"])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Colour"));
}

#[tokio::test]
async fn test_records_dir_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write_records(dir.path());
    let records = dir.path().to_str().unwrap();

    let out = run_args(&["geocat", "--records-dir", records, "search", "-q", "sea"])
        .await
        .unwrap();
    assert!(out.ends_with("iso-sea"));

    assert!(run_args(&["geocat", "search"]).await.is_err());
}

#[tokio::test]
async fn test_queryables_by_vocabulary() {
    let out = run_args(&["geocat", "queryables", "--vocabulary", "dublincore"])
        .await
        .unwrap();
    assert!(out.lines().any(|l| l.starts_with("Title\t")));
    assert!(!out.lines().any(|l| l.starts_with("Denominator\t")));
}
