//! Refresh and snapshot visibility.

use geocat_persistence::Pagination;

use crate::common::*;

#[test]
fn test_writes_visible_only_after_refresh() {
    let indexer = indexer();
    let query = translator().parse("Title:rivers").unwrap();

    indexer.index(&dublin_core("r1", "Rivers", &[])).unwrap();
    assert!(indexer.search(&query, None).is_empty());
    assert_eq!(indexer.staged_identifiers(), vec!["r1"]);

    indexer.refresh();
    assert_eq!(indexer.search(&query, None), vec!["r1"]);
}

#[test]
fn test_deletion_and_held_searcher() {
    let indexer = indexed(&[
        dublin_core("r1", "Rivers", &[]),
        dublin_core("r2", "Rivers and lakes", &[]),
    ]);
    let query = translator().parse("Title:rivers").unwrap();

    let before = indexer.searcher();
    assert!(indexer.remove("r1"));
    indexer.refresh();

    // New queries no longer see the deleted record.
    assert_eq!(indexer.search(&query, None), vec!["r2"]);
    assert!(!indexer.exists("r1"));

    // A searcher taken before the refresh keeps its view.
    assert_eq!(before.search(&query, None), vec!["r1", "r2"]);
    assert!(before.generation() < indexer.searcher().generation());
}

#[test]
fn test_replacement_is_atomic_per_document() {
    let indexer = indexed(&[dublin_core("r1", "Rivers", &["water"])]);
    indexer.index(&dublin_core("r1", "Mountains", &["rock"])).unwrap();
    indexer.refresh();

    let translator = translator();
    assert!(indexer.search(&translator.parse("Title:rivers").unwrap(), None).is_empty());
    assert!(indexer.search(&translator.parse("Subject:water").unwrap(), None).is_empty());
    assert_eq!(
        indexer.search(&translator.parse("Title:mountains Subject:rock").unwrap(), None),
        vec!["r1"]
    );
}

#[test]
fn test_paging_through_results() {
    let records: Vec<_> = (1..=5)
        .map(|i| dublin_core(&format!("rec-{}", i), "Coastline", &[]))
        .collect();
    let indexer = indexed(&records);
    let query = translator().parse("Coastline").unwrap();

    let first = indexer.search_page(&query, None, Pagination::new(1, 2).unwrap());
    assert_eq!(first.total, 5);
    assert_eq!(first.identifiers, vec!["rec-1", "rec-2"]);
    assert_eq!(first.next_record, 3);

    let last = indexer.search_page(&query, None, Pagination::new(5, 2).unwrap());
    assert_eq!(last.identifiers, vec!["rec-5"]);
    assert_eq!(last.next_record, 0);
}
