//! Query execution against an index snapshot.
//!
//! Every document is tested against the serial filter chain independently,
//! then the matches are ordered by the caller's sort key. Without a sort key
//! results come back in ascending identifier order.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::types::{
    IndexValue, IndexedDocument, Predicate, RangeBound, SortKey, SortValueType, StructuredQuery,
    TermMatch, ValueRange,
};

use super::registry::ANY_TEXT;
use super::store::IndexSnapshot;

/// Runs structured queries over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor<'a> {
    snapshot: &'a IndexSnapshot,
}

impl<'a> QueryExecutor<'a> {
    /// Creates an executor over a snapshot.
    pub fn new(snapshot: &'a IndexSnapshot) -> Self {
        Self { snapshot }
    }

    /// Returns matching identifiers in result order.
    pub fn execute(&self, query: &StructuredQuery, sort: Option<&SortKey>) -> Vec<String> {
        let mut hits: Vec<&Arc<IndexedDocument>> = self
            .snapshot
            .documents()
            .filter(|doc| matches(doc, query))
            .collect();

        if let Some(key) = sort {
            hits.sort_by(|a, b| compare_documents(a, b, key));
        }

        hits.into_iter().map(|d| d.identifier.clone()).collect()
    }
}

/// Tests a document against the whole chain.
pub fn matches(doc: &IndexedDocument, query: &StructuredQuery) -> bool {
    query.combine(|predicate| predicate_matches(doc, predicate))
}

fn predicate_matches(doc: &IndexedDocument, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::All => true,
        Predicate::Exists { field } => doc.has_field(field),
        Predicate::Term { field, matcher } => {
            let within = field == ANY_TEXT;
            doc.values(field)
                .iter()
                .any(|value| term_matches(value, matcher, within))
        }
        Predicate::Range { field, range } => doc
            .values(field)
            .iter()
            .any(|value| in_range(value, range)),
        Predicate::Spatial(spatial) => spatial.matches(&doc.geometry),
    }
}

/// Lower-cased alphanumeric words.
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(value: &str, phrase: &str) -> bool {
    if value.trim().eq_ignore_ascii_case(phrase.trim()) {
        return true;
    }
    let needle = words(phrase);
    if needle.is_empty() {
        return false;
    }
    let haystack = words(value);
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Whole-value phrase match: the value's words are exactly the phrase's words.
fn equals_phrase(value: &str, phrase: &str) -> bool {
    let needle = words(phrase);
    !needle.is_empty() && words(value) == needle
}

/// `within` lets a phrase match part of a value, as on `AnyText`.
fn term_matches(value: &IndexValue, matcher: &TermMatch, within: bool) -> bool {
    let text = match value {
        IndexValue::Text(s) => s.clone(),
        other => other.lexical(),
    };
    match matcher {
        TermMatch::Phrase(phrase) if within => contains_phrase(&text, phrase),
        TermMatch::Phrase(phrase) => equals_phrase(&text, phrase),
        TermMatch::Token(token) => contains_phrase(&text, token),
        TermMatch::Wildcard(pattern) => {
            pattern.is_match(text.trim()) || words(&text).iter().any(|w| pattern.is_match(w))
        }
    }
}

/// Orders a value against a bound, coercing the value to the bound's type.
///
/// `None` means the two cannot be compared and the value is out of range.
fn compare_to_bound(value: &IndexValue, bound: &IndexValue) -> Option<Ordering> {
    match bound {
        IndexValue::Number(b) => value.as_number().map(|v| v.total_cmp(b)),
        IndexValue::Date(b) => value.as_date().map(|v| v.cmp(b.as_str())),
        IndexValue::Text(b) => Some(value.lexical().cmp(&b.to_lowercase())),
        IndexValue::Boolean(b) => match value {
            IndexValue::Boolean(v) => Some(v.cmp(b)),
            _ => None,
        },
    }
}

fn in_range(value: &IndexValue, range: &ValueRange) -> bool {
    let lower_ok = match &range.lower {
        RangeBound::Unbounded => true,
        RangeBound::Inclusive(b) => compare_to_bound(value, b).is_some_and(Ordering::is_ge),
        RangeBound::Exclusive(b) => compare_to_bound(value, b).is_some_and(Ordering::is_gt),
    };
    let upper_ok = match &range.upper {
        RangeBound::Unbounded => true,
        RangeBound::Inclusive(b) => compare_to_bound(value, b).is_some_and(Ordering::is_le),
        RangeBound::Exclusive(b) => compare_to_bound(value, b).is_some_and(Ordering::is_lt),
    };
    lower_ok && upper_ok
}

/// Present keys first in the requested direction, missing keys last.
fn compare_keys<T, F>(a: Option<T>, b: Option<T>, ascending: bool, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(x), Some(y)) => {
            let ord = cmp(&x, &y);
            if ascending { ord } else { ord.reverse() }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_documents(a: &IndexedDocument, b: &IndexedDocument, key: &SortKey) -> Ordering {
    let sa = a.sort_values(&key.field);
    let sb = b.sort_values(&key.field);
    let ord = match key.value_type {
        SortValueType::Text => compare_keys(
            sa.and_then(|s| s.text.as_deref()),
            sb.and_then(|s| s.text.as_deref()),
            key.ascending,
            |x, y| x.cmp(y),
        ),
        SortValueType::Number => compare_keys(
            sa.and_then(|s| s.number),
            sb.and_then(|s| s.number),
            key.ascending,
            |x, y| x.total_cmp(y),
        ),
        SortValueType::Date => compare_keys(
            sa.and_then(|s| s.date.as_deref()),
            sb.and_then(|s| s.date.as_deref()),
            key.ascending,
            |x, y| x.cmp(y),
        ),
    };
    ord.then_with(|| a.identifier.cmp(&b.identifier))
}

#[cfg(test)]
mod tests {
    use geocat_model::Standard;

    use super::*;
    use crate::types::{SortValues, WildcardPattern};

    fn text_doc(id: &str, title: &str) -> IndexedDocument {
        let mut doc = IndexedDocument::new(id, Standard::DublinCore);
        doc.fields.insert("Title".into(), vec![IndexValue::text(title)]);
        doc
    }

    fn term(matcher: TermMatch) -> Predicate {
        Predicate::Term {
            field: "Title".into(),
            matcher,
        }
    }

    #[test]
    fn test_phrase_and_token() {
        let doc = text_doc("a", "Sea Surface Temperature, daily");
        let query = |m| StructuredQuery::new().and(term(m));

        assert!(matches(&doc, &query(TermMatch::Phrase("sea surface temperature daily".into()))));
        assert!(!matches(&doc, &query(TermMatch::Phrase("surface temperature".into()))));
        assert!(matches(&doc, &query(TermMatch::Token("DAILY".into()))));
        assert!(!matches(&doc, &query(TermMatch::Token("dai".into()))));
    }

    #[test]
    fn test_phrase_within_any_text() {
        let mut doc = IndexedDocument::new("a", Standard::DublinCore);
        doc.fields
            .insert(ANY_TEXT.into(), vec![IndexValue::text("Sea Surface Temperature")]);
        let query = |phrase: &str| {
            StructuredQuery::new().and(Predicate::Term {
                field: ANY_TEXT.into(),
                matcher: TermMatch::Phrase(phrase.into()),
            })
        };
        assert!(matches(&doc, &query("surface temperature")));
        assert!(!matches(&doc, &query("temperature surface")));
    }

    #[test]
    fn test_wildcard() {
        let doc = text_doc("a", "Sea Surface Temperature");
        let pattern = |p: &str| {
            StructuredQuery::new().and(term(TermMatch::Wildcard(WildcardPattern::new(p).unwrap())))
        };
        assert!(matches(&doc, &pattern("temp*")));
        assert!(matches(&doc, &pattern("sea*temperature")));
        assert!(!matches(&doc, &pattern("ocean*")));
    }

    #[test]
    fn test_numeric_range_coerces_text_values() {
        let mut doc = IndexedDocument::new("a", Standard::Iso19139);
        doc.fields.insert("Denominator".into(), vec![IndexValue::text("9")]);

        let range = ValueRange {
            lower: RangeBound::Inclusive(IndexValue::Number(5.0)),
            upper: RangeBound::Exclusive(IndexValue::Number(10.0)),
        };
        assert!(in_range(&doc.values("Denominator")[0], &range));

        let lexical = ValueRange {
            lower: RangeBound::Inclusive(IndexValue::text("5")),
            upper: RangeBound::Exclusive(IndexValue::text("10")),
        };
        // Lexically "9" > "10": the trap numeric coercion avoids.
        assert!(!in_range(&doc.values("Denominator")[0], &lexical));
    }

    #[test]
    fn test_missing_sort_values_go_last() {
        let mut with = IndexedDocument::new("b", Standard::Iso19139);
        with.sort_keys.insert(
            "Denominator".into(),
            SortValues::from_values(&[IndexValue::Number(3.0)]),
        );
        let without = IndexedDocument::new("a", Standard::Iso19139);

        for ascending in [true, false] {
            let key = SortKey {
                field: "Denominator".into(),
                ascending,
                value_type: SortValueType::Number,
            };
            assert_eq!(compare_documents(&with, &without, &key), Ordering::Less);
        }
    }
}
