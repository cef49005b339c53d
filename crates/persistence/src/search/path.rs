//! Path expressions.
//!
//! A path is a slash-separated list of segments. Each segment is
//!
//! ```text
//! step ( '[' ordinal ']' )? ( '#' property '=' value )?
//! ```
//!
//! where `step` is a property name, `@attribute`, or `*` (any property).
//! The ordinal is 0-based. A predicate value wrapped in brackets is a regular
//! expression matched against the whole sibling value; otherwise the sibling's
//! trimmed string form must equal the literal.
//!
//! ```
//! use geocat_persistence::search::PathExpression;
//!
//! let path = PathExpression::parse(
//!     "identificationInfo/*/citation/*/date/*#dateType=creation/date",
//! ).unwrap();
//! assert_eq!(path.segments().len(), 7);
//! ```

use std::fmt;

use regex::Regex;

use super::errors::PathSyntaxError;

/// What a segment navigates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A named property (or `@attribute`).
    Name(String),
    /// Every property of the node.
    Wildcard,
}

/// How a predicate compares the sibling value.
#[derive(Debug, Clone)]
pub enum PredicateValue {
    /// Exact equality with the trimmed string form.
    Literal(String),
    /// Whole-value regular expression.
    Pattern(Regex),
}

impl PredicateValue {
    /// Tests a sibling's string form.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            PredicateValue::Literal(literal) => value.trim() == literal,
            PredicateValue::Pattern(regex) => regex.is_match(value.trim()),
        }
    }
}

impl PartialEq for PredicateValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PredicateValue::Literal(a), PredicateValue::Literal(b)) => a == b,
            (PredicateValue::Pattern(a), PredicateValue::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// A `#property=value` filter on the elements reached by a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPredicate {
    /// Sibling property to inspect.
    pub property: String,
    /// Expected value.
    pub value: PredicateValue,
}

/// One parsed segment.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    /// Navigation step.
    pub step: Step,
    /// Optional 0-based element selector.
    pub ordinal: Option<usize>,
    /// Optional sibling filter.
    pub predicate: Option<SegmentPredicate>,
}

/// A parsed, stateless path expression.
#[derive(Debug, Clone)]
pub struct PathExpression {
    source: String,
    segments: Vec<PathSegment>,
}

impl PathExpression {
    /// Parses an expression.
    pub fn parse(expression: &str) -> Result<Self, PathSyntaxError> {
        let source = expression.trim();
        if source.is_empty() {
            return Err(syntax_error(expression, 0, "empty path"));
        }

        let mut segments = Vec::new();
        for (offset, raw) in split_segments(source) {
            segments.push(parse_segment(source, offset, raw)?);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The expression text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parsed segments in walk order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl PartialEq for PathExpression {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn syntax_error(expression: &str, position: usize, message: &str) -> PathSyntaxError {
    PathSyntaxError {
        expression: expression.to_string(),
        position,
        message: message.to_string(),
    }
}

/// Splits on `/` outside brackets, keeping each segment's byte offset.
fn split_segments(source: &str) -> Vec<(usize, &str)> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in source.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '/' if depth == 0 => {
                parts.push((start, &source[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push((start, &source[start..]));
    parts
}

fn parse_segment(source: &str, offset: usize, raw: &str) -> Result<PathSegment, PathSyntaxError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(syntax_error(source, offset, "empty segment"));
    }

    let (head, predicate) = match raw.split_once('#') {
        Some((head, tail)) => (head, Some(parse_predicate(source, offset, tail)?)),
        None => (raw, None),
    };

    let (name, ordinal) = match head.find('[') {
        Some(open) => {
            let Some(inner) = head[open + 1..].strip_suffix(']') else {
                return Err(syntax_error(source, offset, "unterminated ordinal"));
            };
            let ordinal = inner
                .trim()
                .parse::<usize>()
                .map_err(|_| syntax_error(source, offset, "ordinal must be a non-negative integer"))?;
            (&head[..open], Some(ordinal))
        }
        None => (head, None),
    };

    let step = match name.trim() {
        "" => return Err(syntax_error(source, offset, "missing property name")),
        "*" => Step::Wildcard,
        n if n.contains(['*', ']', '=']) => {
            return Err(syntax_error(source, offset, "invalid character in property name"));
        }
        n => Step::Name(n.to_string()),
    };

    Ok(PathSegment {
        step,
        ordinal,
        predicate,
    })
}

fn parse_predicate(source: &str, offset: usize, tail: &str) -> Result<SegmentPredicate, PathSyntaxError> {
    let Some((property, value)) = tail.split_once('=') else {
        return Err(syntax_error(source, offset, "predicate needs property=value"));
    };
    let property = property.trim();
    if property.is_empty() {
        return Err(syntax_error(source, offset, "predicate property is empty"));
    }

    let value = value.trim();
    let value = match value.strip_prefix('[').and_then(|v| v.strip_suffix(']')) {
        Some(pattern) => {
            let regex = Regex::new(&format!("^(?:{})$", pattern))
                .map_err(|e| syntax_error(source, offset, &e.to_string()))?;
            PredicateValue::Pattern(regex)
        }
        None => PredicateValue::Literal(value.to_string()),
    };

    Ok(SegmentPredicate {
        property: property.to_string(),
        value,
    })
}
