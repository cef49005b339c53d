//! Range and exact-value constraints on typed fields.

use crate::common::*;

fn scales() -> geocat_persistence::search::DocumentIndexer {
    indexed(&[
        IsoFixture::new("iso-5", "Five").with_denominator(5).build(),
        IsoFixture::new("iso-25", "Twenty five").with_denominator(25).build(),
        IsoFixture::new("iso-60", "Sixty").with_denominator(60).build(),
    ])
}

#[test]
fn test_numeric_range_with_open_lower_bound() {
    let indexer = scales();
    let query = translator().parse("Denominator:[-∞ TO 25]").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["iso-25", "iso-5"]);
}

#[test]
fn test_numeric_range_is_not_lexical() {
    let indexer = scales();
    // Lexically "25" sorts below "6".
    let query = translator().parse("Denominator:[6 TO 30]").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["iso-25"]);
}

#[test]
fn test_exclusive_bounds() {
    let indexer = scales();
    let query = translator().parse("Denominator:{5 TO 60}").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["iso-25"]);

    let query = translator().parse("Denominator:{5 TO *]").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["iso-25", "iso-60"]);
}

#[test]
fn test_exact_number_term() {
    let indexer = scales();
    let query = translator().parse("Denominator:25").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["iso-25"]);
}

#[test]
fn test_date_range_accepts_partial_dates() {
    let indexer = indexed(&[
        IsoFixture::new("old", "Old").with_date_stamp("1999-12-31").build(),
        IsoFixture::new("mid", "Mid").with_date_stamp("2005-06-15T10:00:00Z").build(),
        IsoFixture::new("dec15", "December").with_date_stamp("2010-12-15").build(),
        IsoFixture::new("new", "New").with_date_stamp("2020-01-01").build(),
    ]);
    // An inclusive upper bound covers the whole final month.
    let query = translator().parse("Modified:[2000 TO 2010-12]").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["dec15", "mid"]);

    // An exclusive lower bound skips the whole year.
    let query = translator().parse("Modified:{2010 TO *]").unwrap();
    assert_eq!(indexer.search(&query, None), vec!["new"]);
}

#[test]
fn test_range_combined_serially() {
    let indexer = scales();
    // ((Denominator <= 25) OR Title has "sixty") AND NOT Title has "five")
    let query = translator()
        .parse("Denominator:[* TO 25] OR Title:sixty NOT Title:five")
        .unwrap();
    assert_eq!(indexer.search(&query, None), vec!["iso-60"]);
}
