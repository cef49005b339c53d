//! Caller-selected sort representations.

use geocat_persistence::types::SortValueType;

use crate::common::*;

fn nine_and_ten() -> geocat_persistence::search::DocumentIndexer {
    indexed(&[
        IsoFixture::new("nine", "Nine").with_denominator(9).build(),
        IsoFixture::new("ten", "Ten").with_denominator(10).build(),
    ])
}

#[test]
fn test_text_and_number_sorts_diverge() {
    let indexer = nine_and_ten();
    let translator = translator();
    let all = translator.parse("").unwrap();

    let text = translator
        .translate_sort("Denominator", true, SortValueType::Text)
        .unwrap();
    assert_eq!(indexer.search(&all, Some(&text)), vec!["ten", "nine"]);

    let number = translator
        .translate_sort("Denominator", true, SortValueType::Number)
        .unwrap();
    assert_eq!(indexer.search(&all, Some(&number)), vec!["nine", "ten"]);
}

#[test]
fn test_missing_values_last_in_both_directions() {
    let indexer = indexed(&[
        IsoFixture::new("a-none", "No scale").build(),
        IsoFixture::new("b-small", "Small").with_denominator(1000).build(),
        IsoFixture::new("c-large", "Large").with_denominator(50000).build(),
    ]);
    let translator = translator();
    let all = translator.parse("").unwrap();

    let asc = translator.parse_sort("Denominator:asc").unwrap();
    assert_eq!(
        indexer.search(&all, Some(&asc)),
        vec!["b-small", "c-large", "a-none"]
    );

    let desc = translator.parse_sort("Denominator:desc").unwrap();
    assert_eq!(
        indexer.search(&all, Some(&desc)),
        vec!["c-large", "b-small", "a-none"]
    );
}

#[test]
fn test_ties_break_on_identifier() {
    let indexer = indexed(&[
        dublin_core("b", "Same", &[]),
        dublin_core("a", "Same", &[]),
        dublin_core("c", "Another", &[]),
    ]);
    let translator = translator();
    let sort = translator.parse_sort("Title:desc").unwrap();
    assert_eq!(
        indexer.search(&translator.parse("").unwrap(), Some(&sort)),
        vec!["a", "b", "c"]
    );
}

#[test]
fn test_date_sort() {
    let indexer = indexed(&[
        IsoFixture::new("x", "X").with_date_stamp("2010-03-01").build(),
        IsoFixture::new("y", "Y").with_date_stamp("2009").build(),
    ]);
    let translator = translator();
    let sort = translator.parse_sort("Modified:asc:date").unwrap();
    assert_eq!(
        indexer.search(&translator.parse("").unwrap(), Some(&sort)),
        vec!["y", "x"]
    );
}
